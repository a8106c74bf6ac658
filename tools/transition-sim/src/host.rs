//! 基于文件系统的宿主实现

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use page_transition::animation::TimelinePlayer;
use page_transition::preload::extract_anchor_hrefs;
use page_transition::{
    Anchor, Document, ElementId, FetchResponse, Fetcher, ImageLoader, ListenerHandle,
    PreloadError, Router, Timeline, TimelineDriver, resolve_pathname,
};
use tracing::debug;
use url::Url;

use crate::site::Site;

/// 模拟的网络延迟
async fn latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

/// 从站点目录读取页面
pub struct FsFetcher {
    site: Rc<Site>,
    latency: Duration,
}

impl FsFetcher {
    pub fn new(site: Rc<Site>, latency: Duration) -> Self {
        Self { site, latency }
    }
}

#[async_trait(?Send)]
impl Fetcher for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, PreloadError> {
        latency(self.latency).await;
        match self.site.read_page(path) {
            Ok(Some(body)) => Ok(FetchResponse::html(body)),
            Ok(None) => Ok(FetchResponse {
                status: 404,
                ..FetchResponse::html("")
            }),
            Err(e) => Err(PreloadError::FetchFailed {
                path: path.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// 检查图片文件是否存在
pub struct FsImageLoader {
    site: Rc<Site>,
    origin: Url,
    latency: Duration,
}

impl FsImageLoader {
    pub fn new(site: Rc<Site>, origin: Url, latency: Duration) -> Self {
        Self {
            site,
            origin,
            latency,
        }
    }
}

#[async_trait(?Send)]
impl ImageLoader for FsImageLoader {
    async fn load(&self, url: &Url) -> Result<(), PreloadError> {
        latency(self.latency).await;
        match self.site.asset_file(url, &self.origin) {
            Some(file) if file.is_file() => Ok(()),
            Some(file) => Err(PreloadError::ImageFailed {
                url: url.to_string(),
                message: format!("文件不存在: {}", file.display()),
            }),
            None => Err(PreloadError::ImageFailed {
                url: url.to_string(),
                message: "离线模拟不加载外部图片".to_string(),
            }),
        }
    }
}

/// 当前路由
pub struct SimRouter {
    current: RefCell<String>,
    history: RefCell<Vec<String>>,
}

impl SimRouter {
    pub fn new(start: &str) -> Self {
        Self {
            current: RefCell::new(start.to_string()),
            history: RefCell::new(vec![start.to_string()]),
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.history.borrow().clone()
    }
}

impl Router for SimRouter {
    fn pathname(&self) -> String {
        self.current.borrow().clone()
    }

    fn push(&self, path: &str) {
        *self.current.borrow_mut() = path.to_string();
        self.history.borrow_mut().push(path.to_string());
    }
}

/// 当前渲染的页面
///
/// 每个 `<a href>` 按出现顺序分配一个元素 ID（从 1 开始）。
pub struct SimDocument {
    site: Rc<Site>,
    anchors: RefCell<Vec<Anchor>>,
    logo_length: Option<f32>,
    next_handle: Cell<u64>,
    listeners: RefCell<Vec<(ElementId, ListenerHandle)>>,
}

impl SimDocument {
    pub fn new(site: Rc<Site>, logo_length: Option<f32>) -> Self {
        Self {
            site,
            anchors: RefCell::new(Vec::new()),
            logo_length,
            next_handle: Cell::new(1),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// 渲染路由对应的页面
    pub fn render(&self, route: &str) -> anyhow::Result<()> {
        let Some(body) = self.site.read_page(route)? else {
            anyhow::bail!("站点中没有页面 {route}");
        };

        let anchors: Vec<Anchor> = extract_anchor_hrefs(&body)
            .into_iter()
            .enumerate()
            .map(|(index, href)| Anchor::new(ElementId(index as u64 + 1), href))
            .collect();
        debug!(route = %route, anchors = anchors.len(), "渲染页面");
        *self.anchors.borrow_mut() = anchors;
        Ok(())
    }

    /// 找到第一个指向 `target` 路径的被监听链接
    ///
    /// `target` 可以是未编码的路由（`/über`），比较前两边都解析为编码后的路径名。
    pub fn element_for(&self, origin: &Url, target: &str) -> Option<ElementId> {
        let target_path = resolve_pathname(origin, target).ok();
        let listeners = self.listeners.borrow();
        self.anchors
            .borrow()
            .iter()
            .filter(|anchor| listeners.iter().any(|(id, _)| *id == anchor.element))
            .find(|anchor| {
                anchor.href == target
                    || resolve_pathname(origin, &anchor.href)
                        .is_ok_and(|path| Some(&path) == target_path.as_ref())
            })
            .map(|anchor| anchor.element)
    }
}

impl Document for SimDocument {
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
        self.listeners
            .borrow_mut()
            .retain(|entry| *entry != (element, handle));
    }

    fn logo_path_length(&self) -> Option<f32> {
        self.logo_length
    }
}

/// 不等帧，直接跳到时间轴终点
#[derive(Debug, Default)]
pub struct InstantDriver;

#[async_trait(?Send)]
impl TimelineDriver for InstantDriver {
    async fn play(&self, timeline: Timeline) {
        TimelinePlayer::new(timeline).finish();
    }
}
