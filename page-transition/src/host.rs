//! # Host 模块
//!
//! 控制器与宿主环境之间的边界。
//!
//! ```text
//! Host (浏览器 / 模拟器)              TransitionController
//!   │── Document: 链接、监听器、路径长度 ──►│
//!   │── Router: 当前路径、push ───────────►│
//!   │── Fetcher / ImageLoader ───────────►│ 预加载
//!   │── TimelineDriver ──────────────────►│ 按帧播放时间轴
//!   │◄── OverlaySnapshot / TransitionEvent │
//! ```
//!
//! 控制器运行在单线程事件循环上，所有 trait 都不要求 `Send`。

use async_trait::async_trait;
use url::Url;

use crate::animation::Timeline;
use crate::error::PreloadError;

/// 文档中元素的标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// 点击监听器注册句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u64);

/// 文档中的一个链接元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub element: ElementId,
    /// 原始 href 属性
    pub href: String,
}

impl Anchor {
    pub fn new(element: ElementId, href: impl Into<String>) -> Self {
        Self {
            element,
            href: href.into(),
        }
    }
}

/// 当前渲染文档
pub trait Document {
    /// 文档中所有带 href 的链接元素
    fn anchors(&self) -> Vec<Anchor>;

    /// 给元素注册点击监听器
    fn add_click_listener(&self, element: ElementId) -> ListenerHandle;

    /// 移除之前注册的监听器
    fn remove_click_listener(&self, element: ElementId, handle: ListenerHandle);

    /// 签名矢量路径的总长度；文档中没有该路径时返回 `None`
    fn logo_path_length(&self) -> Option<f32>;
}

/// 宿主路由
pub trait Router {
    /// 当前路径（pathname）
    fn pathname(&self) -> String;

    /// 编程式导航
    fn push(&self, path: &str);
}

/// 请求响应
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    /// 200 的 HTML 响应
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.into(),
        }
    }

    /// 检查响应是否为可解析的 HTML 文档
    ///
    /// 未声明 content-type 的响应按 HTML 处理。
    pub fn ensure_html(&self, path: &str) -> Result<(), PreloadError> {
        if !(200..300).contains(&self.status) {
            return Err(PreloadError::BadStatus {
                path: path.to_string(),
                status: self.status,
            });
        }

        match &self.content_type {
            Some(content_type) if !content_type.to_ascii_lowercase().contains("html") => {
                Err(PreloadError::NotHtml {
                    path: path.to_string(),
                    content_type: content_type.clone(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// 同源页面请求
#[async_trait(?Send)]
pub trait Fetcher {
    async fn fetch(&self, path: &str) -> Result<FetchResponse, PreloadError>;
}

/// 离屏图片加载（成功即进入浏览器缓存）
#[async_trait(?Send)]
pub trait ImageLoader {
    async fn load(&self, url: &Url) -> Result<(), PreloadError>;
}

/// 时间轴驱动
///
/// 播放完整个时间轴后返回。默认实现见 [`FrameDriver`](crate::FrameDriver)。
#[async_trait(?Send)]
pub trait TimelineDriver {
    async fn play(&self, timeline: Timeline);
}
