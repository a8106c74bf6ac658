//! # Preload 模块
//!
//! 尽力而为的目标页图片预加载。
//!
//! 流程：请求目标页 → 提取 `<img src>` → 并发加载所有图片 → 全部结束。
//! 整个流程与超时（默认 2000ms）赛跑，先到者为准。
//!
//! 预加载**永远不会失败**：请求失败、非 HTML 响应、单张图片出错都只记录日志，
//! 然后按“已完成”处理，过渡动画照常继续。

mod html;

pub use html::{extract_anchor_hrefs, extract_image_sources};

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::PreloadError;
use crate::host::{Fetcher, ImageLoader};

/// 预加载结局
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum PreloadOutcome {
    /// 所有图片都已结束（成功或失败）
    Completed,
    /// 超时，剩余图片不再等待
    TimedOut,
    /// 请求或解析失败，直接放行
    Skipped(String),
}

/// 预加载报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    pub path: String,
    pub outcome: PreloadOutcome,
    /// 页面中找到的图片数
    pub images_found: usize,
    /// 加载成功的图片数
    pub images_loaded: usize,
    /// 加载失败的图片数
    pub images_failed: usize,
}

impl PreloadReport {
    /// 超时前是否所有图片都已结束
    pub fn is_complete(&self) -> bool {
        self.outcome == PreloadOutcome::Completed
    }
}

/// 预加载过程中的计数（超时后仍可读取）
#[derive(Debug, Default)]
struct PreloadProgress {
    found: Cell<usize>,
    loaded: Cell<usize>,
    failed: Cell<usize>,
}

/// 图片预加载器
pub struct Preloader {
    fetcher: Rc<dyn Fetcher>,
    images: Rc<dyn ImageLoader>,
    origin: Url,
    timeout: Duration,
}

impl Preloader {
    pub fn new(
        fetcher: Rc<dyn Fetcher>,
        images: Rc<dyn ImageLoader>,
        origin: Url,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            images,
            origin,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 预加载目标页的图片，最迟在超时时间后返回
    pub async fn preload(&self, path: &str) -> PreloadReport {
        let progress = PreloadProgress::default();

        let outcome = match tokio::time::timeout(self.timeout, self.warm(path, &progress)).await {
            Ok(Ok(())) => PreloadOutcome::Completed,
            Ok(Err(e)) => {
                warn!(path = %path, error = %e, "预加载失败，直接继续过渡");
                PreloadOutcome::Skipped(e.to_string())
            }
            Err(_) => {
                debug!(
                    path = %path,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "预加载超时，不再等待剩余图片"
                );
                PreloadOutcome::TimedOut
            }
        };

        let report = PreloadReport {
            path: path.to_string(),
            outcome,
            images_found: progress.found.get(),
            images_loaded: progress.loaded.get(),
            images_failed: progress.failed.get(),
        };
        debug!(
            path = %report.path,
            found = report.images_found,
            loaded = report.images_loaded,
            failed = report.images_failed,
            "预加载结束"
        );
        report
    }

    async fn warm(&self, path: &str, progress: &PreloadProgress) -> Result<(), PreloadError> {
        let response = self.fetcher.fetch(path).await?;
        response.ensure_html(path)?;

        let urls: Vec<Url> = extract_image_sources(&response.body)
            .into_iter()
            .filter_map(|src| match self.resolve_image(&src) {
                Ok(url) => Some(url),
                Err(e) => {
                    debug!(error = %e, "跳过无法解析的图片地址");
                    None
                }
            })
            .collect();
        progress.found.set(urls.len());

        let loads = urls.iter().map(|url| async move {
            match self.images.load(url).await {
                Ok(()) => progress.loaded.set(progress.loaded.get() + 1),
                Err(e) => {
                    // 单张图片失败不影响整体
                    debug!(url = %url, error = %e, "图片预加载失败");
                    progress.failed.set(progress.failed.get() + 1);
                }
            }
        });
        join_all(loads).await;

        Ok(())
    }

    /// 绝对地址原样使用，其余相对站点源解析
    fn resolve_image(&self, src: &str) -> Result<Url, PreloadError> {
        let lower = src.to_ascii_lowercase();
        let parsed = if lower.starts_with("http://") || lower.starts_with("https://") {
            Url::parse(src)
        } else {
            self.origin.join(src)
        };
        parsed.map_err(|e| PreloadError::InvalidUrl {
            src: src.to_string(),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for Preloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preloader")
            .field("origin", &self.origin.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}
