//! # Controller 模块
//!
//! 页面过渡控制器：把链接拦截、遮罩动画、预加载、导航和揭幕串成一个周期。
//!
//! ```text
//! mount ──► reveal ──► Idle ──► click ──┬─► cover 时间轴 ─┐
//!   ▲                                  └─► preload ──────┴─► join ─► dismiss ─► navigate
//!   └──────────────────────────── 宿主重新挂载 ◄──────────────────────────────────┘
//! ```
//!
//! 所有方法都只需要 `&self`：状态放在 `Cell` / `RefCell` 里，
//! 同一个控制器可以同时处理多个点击（只有第一个会被执行）。

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::TransitionConfig;
use crate::cover::CoverAnimator;
use crate::error::TransitionResult;
use crate::host::{Document, ElementId, Fetcher, ImageLoader, Router, TimelineDriver};
use crate::interceptor::{LinkInterceptor, resolve_pathname};
use crate::navigator::{NavigationRequest, Navigator};
use crate::phrases::pick_phrase;
use crate::preload::{PreloadReport, Preloader};
use crate::reveal::RevealAnimator;
use crate::state::{ControllerState, TransitionState};
use crate::visual::{OverlaySnapshot, OverlayVisuals};

/// 宿主提供的全部边界实现
pub struct HostBindings {
    pub document: Rc<dyn Document>,
    pub router: Rc<dyn Router>,
    pub fetcher: Rc<dyn Fetcher>,
    pub images: Rc<dyn ImageLoader>,
    pub driver: Rc<dyn TimelineDriver>,
}

/// 一次点击
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub element: ElementId,
    default_prevented: bool,
}

impl ClickEvent {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            default_prevented: false,
        }
    }

    /// 阻止浏览器默认导航
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// 点击被忽略的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// 目标就是当前页面
    SamePath,
    /// 已有过渡在进行中
    InFlight,
    /// href 无法解析
    InvalidHref,
}

/// 拦截判定结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intercept {
    /// 不是被拦截的链接，交给宿主默认处理
    Passthrough,
    /// 已阻止默认导航，但不开始过渡
    Ignored(IgnoreReason),
    /// 开始过渡
    Start(NavigationRequest),
}

/// 点击处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Passthrough,
    Ignored(IgnoreReason),
    /// 已导航到该路径
    Navigated(String),
}

/// 控制器事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransitionEvent {
    Mounted { path: String, links: usize },
    Intercepted { path: String },
    Ignored { href: String, reason: IgnoreReason },
    CoverStarted { path: String },
    CoverFinished { path: String },
    PreloadSettled(PreloadReport),
    Navigated { path: String },
    Revealed { path: String },
}

/// 页面过渡控制器
pub struct TransitionController {
    config: TransitionConfig,
    origin: Url,
    document: Rc<dyn Document>,
    driver: Rc<dyn TimelineDriver>,
    navigator: Navigator,
    preloader: Preloader,
    cover: CoverAnimator,
    reveal: RevealAnimator,
    visuals: OverlayVisuals,
    state: ControllerState,
    interceptor: RefCell<Option<LinkInterceptor>>,
    rng: RefCell<StdRng>,
    events: RefCell<Vec<TransitionEvent>>,
}

impl TransitionController {
    /// 创建控制器
    ///
    /// 配置无效或站点源无法解析时返回错误。
    pub fn new(config: TransitionConfig, host: HostBindings) -> TransitionResult<Self> {
        config.validate()?;
        let origin = config.origin_url()?;

        let preloader = Preloader::new(
            host.fetcher,
            host.images,
            origin.clone(),
            config.preload_timeout(),
        );

        Ok(Self {
            origin,
            document: host.document,
            driver: host.driver,
            navigator: Navigator::new(host.router),
            preloader,
            cover: CoverAnimator::new(&config),
            reveal: RevealAnimator::new(&config),
            visuals: OverlayVisuals::new(&config),
            state: ControllerState::new(),
            interceptor: RefCell::new(None),
            rng: RefCell::new(StdRng::from_entropy()),
            events: RefCell::new(Vec::new()),
            config,
        })
    }

    /// 固定随机种子（文案选取与乱码字符）
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.borrow_mut() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn state(&self) -> TransitionState {
        self.state.phase()
    }

    /// 已完成的揭幕次数
    pub fn reveal_count(&self) -> u32 {
        self.state.reveal_count()
    }

    /// 本次挂载缓存的签名路径长度
    pub fn path_length(&self) -> Option<f32> {
        self.state.path_length()
    }

    pub fn display_text(&self) -> Option<String> {
        self.state.display_text()
    }

    /// 当前被拦截的链接数
    pub fn intercepted_links(&self) -> usize {
        self.interceptor
            .borrow()
            .as_ref()
            .map_or(0, LinkInterceptor::len)
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        self.visuals.snapshot()
    }

    /// 取出并清空事件队列
    pub fn take_events(&self) -> Vec<TransitionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    fn emit(&self, event: TransitionEvent) {
        self.events.borrow_mut().push(event);
    }

    /// 挂载（首次加载和每次导航后都要调用）
    ///
    /// 重新扫描链接，缓存签名路径长度，播放揭幕动画，结束后进入 `Idle`。
    pub async fn mount(&self) {
        self.unmount();
        self.state.begin_reveal();

        let measured = self.document.logo_path_length();
        let length = self.reveal.prepare(&self.visuals, measured);
        self.state.cache_path_length(length);

        if self.visuals.text_enabled() {
            let text = match self.state.display_text() {
                Some(text) => Some(text),
                None => {
                    let picked = pick_phrase(&self.config.text.phrases, &mut *self.rng.borrow_mut())
                        .map(str::to_string);
                    self.state.commit_display_text(picked.clone());
                    picked
                }
            };
            if let Some(text) = text {
                self.visuals.text.show(&text);
            }
        }

        let interceptor = LinkInterceptor::attach(self.document.clone());
        let links = interceptor.len();
        *self.interceptor.borrow_mut() = Some(interceptor);

        let path = self.navigator.current_path();
        info!(path = %path, links = links, "挂载");
        self.emit(TransitionEvent::Mounted {
            path: path.clone(),
            links,
        });

        self.driver.play(self.reveal.build(&self.visuals)).await;

        self.state.finish_reveal();
        self.emit(TransitionEvent::Revealed { path });
    }

    /// 卸载：移除所有链接监听器
    pub fn unmount(&self) {
        if let Some(interceptor) = self.interceptor.borrow_mut().take() {
            interceptor.detach();
        }
    }

    /// 点击判定（同步部分）
    ///
    /// 被拦截的链接一律阻止默认导航；返回 `Start` 时状态已切换为 `Covering`。
    pub fn intercept(&self, event: &mut ClickEvent) -> Intercept {
        let href = match self.interceptor.borrow().as_ref() {
            Some(interceptor) => match interceptor.href_for(event.element) {
                Some(href) => href.to_string(),
                None => return Intercept::Passthrough,
            },
            None => return Intercept::Passthrough,
        };
        event.prevent_default();

        let path = match resolve_pathname(&self.origin, &href) {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "忽略无法解析的链接");
                return self.ignore(href, IgnoreReason::InvalidHref);
            }
        };

        if path == self.navigator.current_path() {
            return self.ignore(href, IgnoreReason::SamePath);
        }

        if !self.state.try_begin_cover() {
            return self.ignore(href, IgnoreReason::InFlight);
        }

        let display_text = if self.visuals.text_enabled() {
            pick_phrase(&self.config.text.phrases, &mut *self.rng.borrow_mut()).map(str::to_string)
        } else {
            None
        };

        info!(path = %path, text = ?display_text, "拦截导航");
        self.emit(TransitionEvent::Intercepted { path: path.clone() });
        Intercept::Start(NavigationRequest::new(path, display_text))
    }

    fn ignore(&self, href: String, reason: IgnoreReason) -> Intercept {
        debug!(href = %href, reason = ?reason, "忽略点击");
        self.emit(TransitionEvent::Ignored { href, reason });
        Intercept::Ignored(reason)
    }

    /// 执行一次过渡：遮罩与预加载并行，都结束后淡出 logo 并导航
    ///
    /// 调用者需先通过 [`intercept`](Self::intercept) 占用过渡。
    pub async fn run(&self, request: NavigationRequest) {
        let path = request.target_path.clone();

        if let Some(text) = &request.display_text {
            let seed = self.rng.borrow_mut().r#gen::<u64>();
            self.visuals.text.prepare(text, seed);
        }

        let timeline = self.cover.build(&self.visuals);
        debug!(path = %path, duration = timeline.duration(), "开始遮罩");
        self.emit(TransitionEvent::CoverStarted { path: path.clone() });

        let cover = async {
            self.driver.play(timeline).await;
            self.emit(TransitionEvent::CoverFinished { path: path.clone() });
        };
        let preload = async {
            let report = self.preloader.preload(&path).await;
            self.emit(TransitionEvent::PreloadSettled(report));
        };
        tokio::join!(cover, preload);

        self.driver.play(self.cover.dismiss(&self.visuals)).await;

        self.navigator.navigate(&request, &self.state);
        self.emit(TransitionEvent::Navigated { path });
    }

    /// 处理一次点击
    pub async fn click(&self, event: &mut ClickEvent) -> ClickOutcome {
        match self.intercept(event) {
            Intercept::Passthrough => ClickOutcome::Passthrough,
            Intercept::Ignored(reason) => ClickOutcome::Ignored(reason),
            Intercept::Start(request) => {
                let path = request.target_path.clone();
                self.run(request).await;
                ClickOutcome::Navigated(path)
            }
        }
    }
}

impl Drop for TransitionController {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for TransitionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionController")
            .field("origin", &self.origin.as_str())
            .field("state", &self.state.phase())
            .field("interceptor", &self.interceptor)
            .finish_non_exhaustive()
    }
}
