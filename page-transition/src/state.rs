//! # State 模块
//!
//! 控制器自身持有的可变状态：过渡阶段、路径长度缓存、显示文字。
//!
//! 全部只在事件循环线程上访问，用 `Cell` / `RefCell` 即可。

use std::cell::{Cell, RefCell};

use serde::Serialize;
use tracing::debug;

/// 过渡阶段
///
/// 只有 `Idle` 时才接受新的导航；`Covering` 与 `Revealing` 期间的点击一律忽略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionState {
    /// 空闲，可以开始新的过渡
    Idle,
    /// 遮罩动画 + 预加载进行中
    Covering,
    /// 新页面揭示动画进行中
    Revealing,
}

impl TransitionState {
    pub fn is_in_flight(self) -> bool {
        self != TransitionState::Idle
    }
}

/// 控制器状态
#[derive(Debug)]
pub struct ControllerState {
    phase: Cell<TransitionState>,
    /// 签名路径长度（每次挂载计算一次）
    path_length: Cell<Option<f32>>,
    /// 揭示完成次数
    reveals: Cell<u32>,
    /// 下一次挂载时显示的文字
    display_text: RefCell<Option<String>>,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerState {
    /// 初始为 `Revealing`：首次挂载的揭示动画结束后才可点击
    pub fn new() -> Self {
        Self {
            phase: Cell::new(TransitionState::Revealing),
            path_length: Cell::new(None),
            reveals: Cell::new(0),
            display_text: RefCell::new(None),
        }
    }

    pub fn phase(&self) -> TransitionState {
        self.phase.get()
    }

    /// 尝试进入 `Covering`
    ///
    /// # 返回
    /// - `true`: 成功占用过渡
    /// - `false`: 已有过渡在进行中
    pub fn try_begin_cover(&self) -> bool {
        if self.phase.get().is_in_flight() {
            return false;
        }
        self.phase.set(TransitionState::Covering);
        true
    }

    pub fn begin_reveal(&self) {
        self.phase.set(TransitionState::Revealing);
    }

    /// 揭示结束，回到 `Idle`
    pub fn finish_reveal(&self) {
        self.phase.set(TransitionState::Idle);
        self.reveals.set(self.reveals.get() + 1);
        debug!(reveals = self.reveals.get(), "过渡状态回到 Idle");
    }

    pub fn reveal_count(&self) -> u32 {
        self.reveals.get()
    }

    pub fn path_length(&self) -> Option<f32> {
        self.path_length.get()
    }

    pub fn cache_path_length(&self, length: Option<f32>) {
        self.path_length.set(length);
    }

    pub fn display_text(&self) -> Option<String> {
        self.display_text.borrow().clone()
    }

    /// 提交下一个周期首帧使用的文字
    pub fn commit_display_text(&self, text: Option<String>) {
        if text.is_some() {
            *self.display_text.borrow_mut() = text;
        }
    }
}
