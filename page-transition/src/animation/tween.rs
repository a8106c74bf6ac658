//! # Tween 模块
//!
//! 单个补间实例：一个 f32 值在 `duration` 秒内从 `from` 变化到 `to`。
//! 起始值由时间轴在补间真正开始时读取目标属性得到。

use super::Ease;

/// 补间状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    /// 尚未推进
    #[default]
    Pending,
    /// 正在播放
    Playing,
    /// 已完成
    Completed,
}

/// 补间实例
#[derive(Debug, Clone)]
pub struct Tween {
    /// 起始值
    pub from: f32,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub ease: Ease,
    /// 当前状态
    pub state: TweenState,
    /// 当前进度（0.0 - 1.0，已应用缓动）
    pub progress: f32,
    elapsed: f32,
}

impl Tween {
    /// 创建补间
    ///
    /// 时长不大于 0 的补间创建即完成，当前值就是 `to`。
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        let (state, progress) = if duration <= 0.0 {
            (TweenState::Completed, 1.0)
        } else {
            (TweenState::Pending, 0.0)
        };

        Self {
            from,
            to,
            duration: duration.max(0.0),
            ease: Ease::default(),
            state,
            progress,
            elapsed: 0.0,
        }
    }

    /// 设置缓动函数
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// 推进补间
    ///
    /// # 返回
    /// - `true`: 补间仍在进行中
    /// - `false`: 补间已结束
    pub fn update(&mut self, dt: f32) -> bool {
        if self.state == TweenState::Completed {
            return false;
        }

        self.state = TweenState::Playing;
        self.elapsed += dt.max(0.0);

        let raw = self.elapsed / self.duration;
        if raw >= 1.0 {
            self.force_complete();
            false
        } else {
            self.progress = self.ease.apply(raw);
            true
        }
    }

    /// 直接跳到终点
    pub fn force_complete(&mut self) {
        self.progress = 1.0;
        self.state = TweenState::Completed;
    }

    /// 当前值
    pub fn value(&self) -> f32 {
        if self.state == TweenState::Completed {
            return self.to;
        }
        self.from + (self.to - self.from) * self.progress
    }

    /// 是否已结束
    pub fn is_finished(&self) -> bool {
        self.state == TweenState::Completed
    }
}
