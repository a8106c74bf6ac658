//! # Animation 模块
//!
//! 过渡动画的时间轴系统。
//!
//! ## 核心设计理念
//!
//! 动画系统只负责 **时间轴管理**：
//! - 知道某个属性从 A 到 B 需要在 duration 内变化，以及何时开始
//! - 通过 `Animatable` trait 直接写回对象属性
//! - **不假设对象类型**，由宿主决定如何把这些值画到屏幕上
//!
//! ## 核心概念
//!
//! - `Ease`: 缓动函数
//! - `Tween`: 单个补间实例
//! - `Timeline`: 带相对起点的声明式步骤列表
//! - `TimelinePlayer`: 按帧推进时间轴
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! let timeline = Timeline::new()
//!     .to("overlay", panel, TweenSpec::new("translate_y", 0.0, 0.75), Position::End)
//!     .to("logo", logo, TweenSpec::new("opacity", 1.0, 0.25), Position::Offset(-0.2));
//!
//! let mut player = TimelinePlayer::new(timeline);
//! while player.advance(dt) {
//!     // 宿主按帧重绘
//! }
//! ```

mod easing;
mod timeline;
mod traits;
mod tween;

pub use easing::Ease;
pub use timeline::{Position, ScheduleEntry, Timeline, TimelinePlayer, TweenSpec};
pub use traits::{Animatable, NullTarget};
pub use tween::{Tween, TweenState};
