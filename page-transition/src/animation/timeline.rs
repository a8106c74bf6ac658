//! # Timeline 模块
//!
//! 声明式时间轴：一串带相对起点的步骤（立即设值 / 补间）。
//!
//! 起点用 [`Position`] 表示，语义与常见前端动画库一致：
//! - `End`：接在当前时间轴末尾
//! - `Offset(-0.2)`：相对末尾提前 0.2 秒（即 `"-=0.2"`）
//! - `WithPrevious(d)`：相对上一步的起点
//! - `At(t)`：绝对时间
//!
//! `Timeline` 只描述“何时、对谁、改什么”，由 [`TimelinePlayer`] 按帧推进。

use std::fmt;
use std::rc::Rc;

use super::{Animatable, Ease, Tween};

/// 步骤起点
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// 接在时间轴末尾
    End,
    /// 相对时间轴末尾偏移（负数表示与前面的步骤重叠）
    Offset(f32),
    /// 相对上一步的起点偏移
    WithPrevious(f32),
    /// 绝对时间（秒）
    At(f32),
}

/// 补间参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    /// 属性名称
    pub property: &'static str,
    /// 目标值
    pub to: f32,
    /// 时长（秒）
    pub duration: f32,
    /// 缓动函数
    pub ease: Ease,
}

impl TweenSpec {
    pub fn new(property: &'static str, to: f32, duration: f32) -> Self {
        Self {
            property,
            to,
            duration,
            ease: Ease::default(),
        }
    }

    /// 设置缓动函数
    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StepAction {
    Set(f32),
    Tween { to: f32, duration: f32, ease: Ease },
}

struct Step {
    label: &'static str,
    target: Rc<dyn Animatable>,
    property: &'static str,
    start: f32,
    action: StepAction,
}

impl Step {
    fn end(&self) -> f32 {
        match self.action {
            StepAction::Set(_) => self.start,
            StepAction::Tween { duration, .. } => self.start + duration.max(0.0),
        }
    }
}

/// 编排结果中的一行（用于调试和测试）
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub label: &'static str,
    pub property: &'static str,
    pub start: f32,
    pub end: f32,
}

/// 声明式时间轴
#[derive(Default)]
pub struct Timeline {
    steps: Vec<Step>,
    end: f32,
    previous_start: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    fn resolve(&self, position: Position) -> f32 {
        let start = match position {
            Position::End => self.end,
            Position::Offset(offset) => self.end + offset,
            Position::WithPrevious(offset) => self.previous_start + offset,
            Position::At(time) => time,
        };
        start.max(0.0)
    }

    fn push(&mut self, step: Step) {
        debug_assert!(
            step.target.property_list().is_empty()
                || step.target.property_list().contains(&step.property),
            "目标不支持属性 '{}'",
            step.property
        );
        self.end = self.end.max(step.end());
        self.steps.push(step);
    }

    /// 在指定位置立即设置属性值
    pub fn set(
        mut self,
        label: &'static str,
        target: Rc<dyn Animatable>,
        property: &'static str,
        value: f32,
        position: Position,
    ) -> Self {
        let start = self.resolve(position);
        self.push(Step {
            label,
            target,
            property,
            start,
            action: StepAction::Set(value),
        });
        self.previous_start = start;
        self
    }

    /// 对一组目标在同一时刻设置属性值
    pub fn set_all(
        mut self,
        label: &'static str,
        targets: &[Rc<dyn Animatable>],
        property: &'static str,
        value: f32,
        position: Position,
    ) -> Self {
        let start = self.resolve(position);
        for target in targets {
            self.push(Step {
                label,
                target: target.clone(),
                property,
                start,
                action: StepAction::Set(value),
            });
        }
        self.previous_start = start;
        self
    }

    /// 补间到目标值
    pub fn to(
        self,
        label: &'static str,
        target: Rc<dyn Animatable>,
        tween: TweenSpec,
        position: Position,
    ) -> Self {
        self.to_staggered(label, &[target], tween, 0.0, position)
    }

    /// 对一组目标依次错开 `stagger` 秒执行同一补间
    pub fn to_staggered(
        mut self,
        label: &'static str,
        targets: &[Rc<dyn Animatable>],
        tween: TweenSpec,
        stagger: f32,
        position: Position,
    ) -> Self {
        let start = self.resolve(position);
        for (index, target) in targets.iter().enumerate() {
            self.push(Step {
                label,
                target: target.clone(),
                property: tween.property,
                start: start + stagger.max(0.0) * index as f32,
                action: StepAction::Tween {
                    to: tween.to,
                    duration: tween.duration,
                    ease: tween.ease,
                },
            });
        }
        self.previous_start = start;
        self
    }

    /// 时间轴总时长（秒）
    pub fn duration(&self) -> f32 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 按起点排序的编排结果
    pub fn schedule(&self) -> Vec<ScheduleEntry> {
        let mut entries: Vec<ScheduleEntry> = self
            .steps
            .iter()
            .map(|step| ScheduleEntry {
                label: step.label,
                property: step.property,
                start: step.start,
                end: step.end(),
            })
            .collect();
        entries.sort_by(|a, b| a.start.total_cmp(&b.start));
        entries
    }

    /// 最后一个以 `label` 命名的步骤的结束时间
    pub fn end_of(&self, label: &str) -> Option<f32> {
        self.steps
            .iter()
            .filter(|step| step.label == label)
            .map(Step::end)
            .reduce(f32::max)
    }

    /// 第一个以 `label` 命名的步骤的起点
    pub fn start_of(&self, label: &str) -> Option<f32> {
        self.steps
            .iter()
            .filter(|step| step.label == label)
            .map(|step| step.start)
            .reduce(f32::min)
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("steps", &self.steps.len())
            .field("duration", &self.end)
            .finish()
    }
}

enum StepProgress {
    Waiting,
    Running(Tween),
    Done,
}

struct PlayerStep {
    step: Step,
    progress: StepProgress,
}

impl PlayerStep {
    /// 步骤到点时激活：设值步骤直接落地，补间从目标的当前值出发
    fn activate(&self, overshoot: f32) -> StepProgress {
        match self.step.action {
            StepAction::Set(value) => {
                self.step.target.set_property(self.step.property, value);
                StepProgress::Done
            }
            StepAction::Tween { to, duration, ease } => {
                let from = self.step.target.get_property(self.step.property).unwrap_or(to);
                let mut tween = Tween::new(from, to, duration).with_ease(ease);
                tween.update(overshoot);
                self.apply(&tween);
                if tween.is_finished() {
                    StepProgress::Done
                } else {
                    StepProgress::Running(tween)
                }
            }
        }
    }

    fn apply(&self, tween: &Tween) {
        self.step.target.set_property(self.step.property, tween.value());
    }
}

/// 时间轴播放器
///
/// 由宿主按帧调用 [`advance`](Self::advance)。
pub struct TimelinePlayer {
    steps: Vec<PlayerStep>,
    elapsed: f32,
    duration: f32,
    finished: bool,
}

impl TimelinePlayer {
    pub fn new(timeline: Timeline) -> Self {
        let duration = timeline.duration();
        let mut steps: Vec<PlayerStep> = timeline
            .steps
            .into_iter()
            .map(|step| PlayerStep {
                step,
                progress: StepProgress::Waiting,
            })
            .collect();
        // 稳定排序：同一时刻的步骤保持声明顺序
        steps.sort_by(|a, b| a.step.start.total_cmp(&b.step.start));

        Self {
            steps,
            elapsed: 0.0,
            duration,
            finished: false,
        }
    }

    /// 推进时间轴
    ///
    /// # 返回
    /// - `true`: 时间轴仍在播放
    /// - `false`: 时间轴已播放完毕（所有属性都已落到终值）
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.finished {
            return false;
        }

        self.elapsed += dt.max(0.0);
        let now = self.elapsed;

        for entry in &mut self.steps {
            let next = match std::mem::replace(&mut entry.progress, StepProgress::Done) {
                StepProgress::Waiting if now >= entry.step.start => {
                    entry.activate(now - entry.step.start)
                }
                StepProgress::Waiting => StepProgress::Waiting,
                StepProgress::Running(mut tween) => {
                    let running = tween.update(dt);
                    entry.apply(&tween);
                    if running {
                        StepProgress::Running(tween)
                    } else {
                        StepProgress::Done
                    }
                }
                StepProgress::Done => StepProgress::Done,
            };
            entry.progress = next;
        }

        if now >= self.duration {
            self.settle();
        }
        !self.finished
    }

    /// 跳到时间轴终点
    pub fn finish(&mut self) {
        if !self.finished {
            self.advance(self.duration - self.elapsed.min(self.duration));
            self.settle();
        }
    }

    /// 收尾：浮点累积误差可能让补间差一点没走完
    fn settle(&mut self) {
        for entry in &mut self.steps {
            match std::mem::replace(&mut entry.progress, StepProgress::Done) {
                StepProgress::Running(mut tween) => {
                    tween.force_complete();
                    entry.apply(&tween);
                }
                StepProgress::Waiting => {
                    let _ = entry.activate(f32::MAX);
                }
                StepProgress::Done => {}
            }
        }
        self.elapsed = self.elapsed.max(self.duration);
        self.finished = true;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl fmt::Debug for TimelinePlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelinePlayer")
            .field("elapsed", &self.elapsed)
            .field("duration", &self.duration)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::NullTarget;
    use std::cell::Cell;

    struct Dot {
        x: Cell<f32>,
        alpha: Cell<f32>,
    }

    impl Dot {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                x: Cell::new(0.0),
                alpha: Cell::new(0.0),
            })
        }
    }

    impl Animatable for Dot {
        fn get_property(&self, property_id: &str) -> Option<f32> {
            match property_id {
                "x" => Some(self.x.get()),
                "alpha" => Some(self.alpha.get()),
                _ => None,
            }
        }

        fn set_property(&self, property_id: &str, value: f32) -> bool {
            match property_id {
                "x" => self.x.set(value),
                "alpha" => self.alpha.set(value),
                _ => return false,
            }
            true
        }

        fn property_list(&self) -> &'static [&'static str] {
            &["x", "alpha"]
        }
    }

    #[test]
    fn test_position_resolution() {
        let dot = Dot::new();
        let timeline = Timeline::new()
            .to("a", dot.clone(), TweenSpec::new("x", 1.0, 1.0), Position::End)
            .to("b", dot.clone(), TweenSpec::new("alpha", 1.0, 0.5), Position::Offset(-0.25))
            .set("c", dot.clone(), "x", 0.0, Position::WithPrevious(0.1))
            .to("d", dot, TweenSpec::new("x", 2.0, 0.5), Position::At(3.0));

        assert_eq!(timeline.start_of("b"), Some(0.75));
        assert_eq!(timeline.end_of("b"), Some(1.25));
        assert!((timeline.start_of("c").unwrap() - 0.85).abs() < 1e-6);
        assert_eq!(timeline.end_of("d"), Some(3.5));
        assert_eq!(timeline.duration(), 3.5);
    }

    #[test]
    fn test_set_does_not_extend_timeline() {
        let dot = Dot::new();
        let timeline = Timeline::new()
            .to("a", dot.clone(), TweenSpec::new("x", 1.0, 1.0), Position::End)
            .set("b", dot, "alpha", 1.0, Position::Offset(-0.5));
        assert_eq!(timeline.duration(), 1.0);
        assert_eq!(timeline.start_of("b"), Some(0.5));
    }

    #[test]
    fn test_negative_start_clamped() {
        let dot = Dot::new();
        let timeline = Timeline::new().to("a", dot, TweenSpec::new("x", 1.0, 1.0), Position::Offset(-5.0));
        assert_eq!(timeline.start_of("a"), Some(0.0));
    }

    #[test]
    fn test_stagger() {
        let dots: Vec<Rc<dyn Animatable>> = (0..3).map(|_| Dot::new() as Rc<dyn Animatable>).collect();
        let timeline = Timeline::new().to_staggered(
            "wipe",
            &dots,
            TweenSpec::new("x", 1.0, 0.4),
            0.02,
            Position::At(0.0),
        );
        let schedule = timeline.schedule();
        assert_eq!(schedule.len(), 3);
        assert!((schedule[2].start - 0.04).abs() < 1e-6);
        assert!((timeline.duration() - 0.44).abs() < 1e-6);
    }

    #[test]
    fn test_player_applies_values() {
        let dot = Dot::new();
        let timeline = Timeline::new()
            .to(
                "move",
                dot.clone(),
                TweenSpec::new("x", 10.0, 1.0).ease(Ease::Linear),
                Position::End,
            )
            .set("show", dot.clone(), "alpha", 1.0, Position::At(0.5));

        let mut player = TimelinePlayer::new(timeline);
        assert!(player.advance(0.25));
        assert!((dot.x.get() - 2.5).abs() < 1e-4);
        assert_eq!(dot.alpha.get(), 0.0);

        assert!(player.advance(0.5));
        assert_eq!(dot.alpha.get(), 1.0);

        assert!(!player.advance(0.5));
        assert_eq!(dot.x.get(), 10.0);
        assert!(player.is_finished());
    }

    #[test]
    fn test_tween_starts_from_current_value() {
        let dot = Dot::new();
        let timeline = Timeline::new()
            .set("jump", dot.clone(), "x", 4.0, Position::At(0.0))
            .to(
                "back",
                dot.clone(),
                TweenSpec::new("x", 0.0, 1.0).ease(Ease::Linear),
                Position::End,
            );

        let mut player = TimelinePlayer::new(timeline);
        player.advance(0.5);
        assert!((dot.x.get() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_large_step_lands_everything() {
        let dot = Dot::new();
        let timeline = Timeline::new()
            .to("a", dot.clone(), TweenSpec::new("x", 5.0, 0.3), Position::End)
            .to("b", dot.clone(), TweenSpec::new("alpha", 1.0, 0.3), Position::End);

        let mut player = TimelinePlayer::new(timeline);
        assert!(!player.advance(10.0));
        assert_eq!(dot.x.get(), 5.0);
        assert_eq!(dot.alpha.get(), 1.0);
    }

    #[test]
    fn test_finish_jumps_to_end() {
        let dot = Dot::new();
        let timeline = Timeline::new().to("a", dot.clone(), TweenSpec::new("x", 3.0, 2.0), Position::End);
        let mut player = TimelinePlayer::new(timeline);
        player.advance(0.1);
        player.finish();
        assert!(player.is_finished());
        assert_eq!(dot.x.get(), 3.0);
    }

    #[test]
    fn test_empty_timeline_finishes_immediately() {
        let mut player = TimelinePlayer::new(Timeline::new());
        assert!(!player.advance(0.0));
    }

    #[test]
    fn test_null_target_steps_are_noops() {
        let timeline = Timeline::new()
            .set("missing", Rc::new(NullTarget), "stroke_dashoffset", 100.0, Position::At(0.0))
            .to(
                "missing",
                Rc::new(NullTarget),
                TweenSpec::new("stroke_dashoffset", 0.0, 1.0),
                Position::End,
            );
        let mut player = TimelinePlayer::new(timeline);
        assert!(player.advance(0.5));
        assert!(!player.advance(0.6));
    }
}
