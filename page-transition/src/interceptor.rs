//! # Interceptor 模块
//!
//! 站内链接拦截。
//!
//! 挂载时扫描文档中 href 以 `/` 开头的链接，为每个链接注册一个点击监听器，
//! 并记录 元素 → 注册句柄 的映射。卸载（`detach` 或 `Drop`）时只移除自己
//! 注册过的监听器。挂载之后新增的链接不会被拦截。

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};
use url::Url;

use crate::error::{TransitionError, TransitionResult};
use crate::host::{Document, ElementId, ListenerHandle};

/// 是否为站内链接
///
/// `//host/path` 是协议相对地址，指向外部站点。
pub fn is_internal_href(href: &str) -> bool {
    href.starts_with('/') && !href.starts_with("//")
}

/// 把 href 解析为路径名（丢弃 query 和 fragment）
pub fn resolve_pathname(origin: &Url, href: &str) -> TransitionResult<String> {
    let url = origin
        .join(href)
        .map_err(|e| TransitionError::InvalidHref {
            href: href.to_string(),
            message: e.to_string(),
        })?;
    Ok(url.path().to_string())
}

#[derive(Debug)]
struct Registration {
    href: String,
    handle: ListenerHandle,
}

/// 链接拦截器
pub struct LinkInterceptor {
    document: Rc<dyn Document>,
    registrations: HashMap<ElementId, Registration>,
}

impl LinkInterceptor {
    /// 扫描文档并注册监听器
    pub fn attach(document: Rc<dyn Document>) -> Self {
        let mut registrations = HashMap::new();

        for anchor in document.anchors() {
            if !is_internal_href(&anchor.href) {
                trace!(href = %anchor.href, "跳过外部链接");
                continue;
            }
            if registrations.contains_key(&anchor.element) {
                continue;
            }
            let handle = document.add_click_listener(anchor.element);
            registrations.insert(
                anchor.element,
                Registration {
                    href: anchor.href,
                    handle,
                },
            );
        }

        debug!(count = registrations.len(), "链接拦截器已挂载");
        Self {
            document,
            registrations,
        }
    }

    /// 被拦截元素的原始 href
    pub fn href_for(&self, element: ElementId) -> Option<&str> {
        self.registrations
            .get(&element)
            .map(|registration| registration.href.as_str())
    }

    pub fn is_intercepted(&self, element: ElementId) -> bool {
        self.registrations.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// 移除所有注册过的监听器
    pub fn detach(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.registrations.is_empty() {
            return;
        }
        let count = self.registrations.len();
        for (element, registration) in self.registrations.drain() {
            self.document
                .remove_click_listener(element, registration.handle);
        }
        debug!(count = count, "链接拦截器已卸载");
    }
}

impl Drop for LinkInterceptor {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for LinkInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkInterceptor")
            .field("registrations", &self.registrations)
            .finish()
    }
}
