//! # Page Transition
//!
//! 站点的页面切换过渡控制器。
//!
//! ## 架构概述
//!
//! 控制器不直接操作浏览器，而是通过一组边界 trait 与宿主通信：
//!
//! ```text
//! Host                                   TransitionController
//!   │                                            │
//!   │──── mount() ─────────────────────────────►│ 扫描链接 + 揭幕
//!   │──── click(ClickEvent) ───────────────────►│ 遮罩 ∥ 预加载 → 导航
//!   │◄─── Router::push(path) ───────────────────│
//!   │──── mount() ─────────────────────────────►│ 新页面揭幕
//!   │◄─── snapshot() / take_events() ───────────│
//! ```
//!
//! ## 核心类型
//!
//! - [`TransitionController`]：过渡控制器
//! - [`TransitionConfig`]：配置（样式预设、时长、预加载超时）
//! - [`Timeline`] / [`TimelinePlayer`]：声明式时间轴与逐帧播放
//! - [`Preloader`]：目标页图片预加载
//! - [`OverlaySnapshot`]：宿主每帧绘制所需的遮罩状态
//!
//! ## 模块结构
//!
//! - [`animation`]：缓动、补间、时间轴
//! - [`controller`]：控制器与事件
//! - [`cover`] / [`reveal`]：入场与揭幕时间轴
//! - [`preload`]：预加载与 HTML 扫描
//! - [`interceptor`]：站内链接拦截
//! - [`host`]：宿主边界 trait

pub mod animation;
pub mod config;
pub mod controller;
pub mod cover;
pub mod driver;
pub mod error;
pub mod host;
pub mod interceptor;
pub mod navigator;
pub mod phrases;
pub mod preload;
pub mod reveal;
pub mod scramble;
pub mod state;
pub mod visual;

// 重导出核心类型
pub use animation::{Animatable, Ease, Position, Timeline, TimelinePlayer, TweenSpec};
pub use config::{CoverStyle, TransitionConfig};
pub use controller::{
    ClickEvent, ClickOutcome, HostBindings, IgnoreReason, Intercept, TransitionController,
    TransitionEvent,
};
pub use driver::FrameDriver;
pub use error::{ConfigError, PreloadError, TransitionError, TransitionResult};
pub use host::{
    Anchor, Document, ElementId, FetchResponse, Fetcher, ImageLoader, ListenerHandle, Router,
    TimelineDriver,
};
pub use interceptor::{LinkInterceptor, is_internal_href, resolve_pathname};
pub use navigator::{NavigationRequest, Navigator};
pub use preload::{PreloadOutcome, PreloadReport, Preloader};
pub use scramble::ScrambleText;
pub use state::TransitionState;
pub use visual::OverlaySnapshot;
