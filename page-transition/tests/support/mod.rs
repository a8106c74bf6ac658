//! 集成测试用的宿主替身
//!
//! 所有替身共享一个 `Journal`，按发生顺序记录调用，用于断言先后关系。

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use page_transition::animation::TimelinePlayer;
use page_transition::{
    Anchor, ClickEvent, Document, ElementId, FetchResponse, Fetcher, HostBindings, ImageLoader,
    ListenerHandle, PreloadError, Router, Timeline, TimelineDriver, TransitionConfig,
    TransitionController, TransitionEvent,
};
use url::Url;

/// 调用日志
pub type Journal = Rc<RefCell<Vec<String>>>;

pub fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

fn anchors(list: &[(u64, &str)]) -> Vec<Anchor> {
    list.iter()
        .map(|(id, href)| Anchor::new(ElementId(*id), *href))
        .collect()
}

/// 首页的链接
pub const HOME_LINKS: &[(u64, &str)] = &[
    (1, "/"),
    (2, "/archive"),
    (3, "/about"),
    (4, "https://github.com/someone"),
    (5, "/contact?ref=nav#form"),
    (6, "//cdn.example.com/press-kit"),
];

/// 内存文档
pub struct FakeDocument {
    anchors: RefCell<Vec<Anchor>>,
    logo_length: Cell<Option<f32>>,
    next_handle: Cell<u64>,
    listeners: RefCell<Vec<(ElementId, ListenerHandle)>>,
    removed: Cell<usize>,
}

impl FakeDocument {
    pub fn new(list: &[(u64, &str)]) -> Rc<Self> {
        Rc::new(Self {
            anchors: RefCell::new(anchors(list)),
            logo_length: Cell::new(Some(1227.0)),
            next_handle: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
            removed: Cell::new(0),
        })
    }

    /// 模拟宿主渲染了新页面
    pub fn set_anchors(&self, list: &[(u64, &str)]) {
        *self.anchors.borrow_mut() = anchors(list);
    }

    pub fn set_logo_length(&self, length: Option<f32>) {
        self.logo_length.set(length);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn has_listener(&self, element: u64) -> bool {
        self.listeners
            .borrow()
            .iter()
            .any(|(id, _)| *id == ElementId(element))
    }

    pub fn removed(&self) -> usize {
        self.removed.get()
    }
}

impl Document for FakeDocument {
    fn anchors(&self) -> Vec<Anchor> {
        self.anchors.borrow().clone()
    }

    fn add_click_listener(&self, element: ElementId) -> ListenerHandle {
        let handle = ListenerHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);
        self.listeners.borrow_mut().push((element, handle));
        handle
    }

    fn remove_click_listener(&self, element: ElementId, handle: ListenerHandle) {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|entry| *entry != (element, handle));
        self.removed
            .set(self.removed.get() + before - listeners.len());
    }

    fn logo_path_length(&self) -> Option<f32> {
        self.logo_length.get()
    }
}

/// 记录所有 push 的路由
pub struct RecordingRouter {
    current: RefCell<String>,
    pushes: RefCell<Vec<String>>,
    journal: Journal,
}

impl RecordingRouter {
    pub fn new(start: &str, journal: Journal) -> Rc<Self> {
        Rc::new(Self {
            current: RefCell::new(start.to_string()),
            pushes: RefCell::new(Vec::new()),
            journal,
        })
    }

    pub fn pushes(&self) -> Vec<String> {
        self.pushes.borrow().clone()
    }
}

impl Router for RecordingRouter {
    fn pathname(&self) -> String {
        self.current.borrow().clone()
    }

    fn push(&self, path: &str) {
        self.journal.borrow_mut().push(format!("navigate {path}"));
        *self.current.borrow_mut() = path.to_string();
        self.pushes.borrow_mut().push(path.to_string());
    }
}

/// 页面脚本
#[derive(Debug, Clone)]
pub enum Page {
    Html(String),
    Status(u16),
    Json(String),
    /// 网络错误
    Fail,
    /// 永远不返回
    Hang,
}

/// 按路径返回预设响应的请求器
pub struct ScriptedFetcher {
    pages: RefCell<HashMap<String, (Duration, Page)>>,
    requests: RefCell<Vec<String>>,
    journal: Journal,
}

impl ScriptedFetcher {
    pub fn new(journal: Journal) -> Rc<Self> {
        Rc::new(Self {
            pages: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            journal,
        })
    }

    pub fn page(&self, path: &str, page: Page) {
        self.delayed_page(path, Duration::ZERO, page);
    }

    pub fn delayed_page(&self, path: &str, delay: Duration, page: Page) {
        self.pages
            .borrow_mut()
            .insert(path.to_string(), (delay, page));
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, PreloadError> {
        self.requests.borrow_mut().push(path.to_string());
        let (delay, page) = self
            .pages
            .borrow()
            .get(path)
            .cloned()
            .unwrap_or((Duration::ZERO, Page::Status(404)));

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.journal.borrow_mut().push(format!("fetched {path}"));

        match page {
            Page::Html(body) => Ok(FetchResponse::html(body)),
            Page::Status(status) => Ok(FetchResponse {
                status,
                ..FetchResponse::html("")
            }),
            Page::Json(body) => Ok(FetchResponse {
                content_type: Some("application/json".to_string()),
                ..FetchResponse::html(body)
            }),
            Page::Fail => Err(PreloadError::FetchFailed {
                path: path.to_string(),
                message: "connection reset".to_string(),
            }),
            Page::Hang => std::future::pending().await,
        }
    }
}

/// 带延迟的图片加载器
pub struct FakeImages {
    delay: Cell<Duration>,
    delays: RefCell<HashMap<String, Duration>>,
    failing: RefCell<Vec<String>>,
    loads: RefCell<Vec<String>>,
    journal: Journal,
}

impl FakeImages {
    pub fn new(delay: Duration, journal: Journal) -> Rc<Self> {
        Rc::new(Self {
            delay: Cell::new(delay),
            delays: RefCell::new(HashMap::new()),
            failing: RefCell::new(Vec::new()),
            loads: RefCell::new(Vec::new()),
            journal,
        })
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay.set(delay);
    }

    pub fn delay_for(&self, url: &str, delay: Duration) {
        self.delays.borrow_mut().insert(url.to_string(), delay);
    }

    pub fn fail(&self, url: &str) {
        self.failing.borrow_mut().push(url.to_string());
    }

    /// 已开始加载的图片
    pub fn loads(&self) -> Vec<String> {
        self.loads.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ImageLoader for FakeImages {
    async fn load(&self, url: &Url) -> Result<(), PreloadError> {
        let url = url.to_string();
        self.loads.borrow_mut().push(url.clone());

        let delay = self
            .delays
            .borrow()
            .get(&url)
            .copied()
            .unwrap_or(self.delay.get());
        tokio::time::sleep(delay).await;
        self.journal.borrow_mut().push(format!("image {url}"));

        if self.failing.borrow().contains(&url) {
            return Err(PreloadError::ImageFailed {
                url,
                message: "decode error".to_string(),
            });
        }
        Ok(())
    }
}

/// 每条时间轴固定耗时的驱动
///
/// 等待 `hold` 后直接跳到时间轴终点。
pub struct TimedDriver {
    hold: Cell<Duration>,
    plays: Cell<usize>,
    journal: Journal,
}

impl TimedDriver {
    pub fn new(hold: Duration, journal: Journal) -> Rc<Self> {
        Rc::new(Self {
            hold: Cell::new(hold),
            plays: Cell::new(0),
            journal,
        })
    }

    pub fn set_hold(&self, hold: Duration) {
        self.hold.set(hold);
    }

    pub fn plays(&self) -> usize {
        self.plays.get()
    }
}

#[async_trait(?Send)]
impl TimelineDriver for TimedDriver {
    async fn play(&self, timeline: Timeline) {
        tokio::time::sleep(self.hold.get()).await;
        TimelinePlayer::new(timeline).finish();
        self.plays.set(self.plays.get() + 1);
        self.journal.borrow_mut().push("timeline done".to_string());
    }
}

/// 一整套宿主替身
pub struct Fixture {
    pub document: Rc<FakeDocument>,
    pub router: Rc<RecordingRouter>,
    pub fetcher: Rc<ScriptedFetcher>,
    pub images: Rc<FakeImages>,
    pub journal: Journal,
}

impl Fixture {
    /// 停在 `start` 的首页，所有站内页面都是不含图片的空页面
    pub fn new(start: &str) -> Self {
        let journal = journal();
        let fetcher = ScriptedFetcher::new(journal.clone());
        for path in ["/", "/archive", "/about", "/contact"] {
            fetcher.page(path, Page::Html(format!("<main>{path}</main>")));
        }

        Self {
            document: FakeDocument::new(HOME_LINKS),
            router: RecordingRouter::new(start, journal.clone()),
            fetcher,
            images: FakeImages::new(Duration::from_millis(50), journal.clone()),
            journal,
        }
    }

    pub fn bindings(&self, driver: Rc<dyn TimelineDriver>) -> HostBindings {
        HostBindings {
            document: self.document.clone(),
            router: self.router.clone(),
            fetcher: self.fetcher.clone(),
            images: self.images.clone(),
            driver,
        }
    }

    pub fn controller(
        &self,
        config: TransitionConfig,
        driver: Rc<dyn TimelineDriver>,
    ) -> TransitionController {
        TransitionController::new(config, self.bindings(driver))
            .expect("测试配置有效")
            .with_seed(7)
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }
}

pub fn click(element: u64) -> ClickEvent {
    ClickEvent::new(ElementId(element))
}

/// 带若干图片的页面
pub fn page_with_images(srcs: &[&str]) -> String {
    let images: String = srcs
        .iter()
        .map(|src| format!(r#"<img src="{src}" alt="">"#))
        .collect();
    format!("<html><body><main>{images}</main></body></html>")
}

/// 事件种类（忽略载荷）
pub fn kinds(events: &[TransitionEvent]) -> Vec<&'static str> {
    events
        .iter()
        .map(|event| match event {
            TransitionEvent::Mounted { .. } => "mounted",
            TransitionEvent::Intercepted { .. } => "intercepted",
            TransitionEvent::Ignored { .. } => "ignored",
            TransitionEvent::CoverStarted { .. } => "cover_started",
            TransitionEvent::CoverFinished { .. } => "cover_finished",
            TransitionEvent::PreloadSettled(_) => "preload_settled",
            TransitionEvent::Navigated { .. } => "navigated",
            TransitionEvent::Revealed { .. } => "revealed",
        })
        .collect()
}
