//! 站点检查：站内链接是否指向存在的页面，图片是否存在

use page_transition::preload::{extract_anchor_hrefs, extract_image_sources};
use page_transition::{is_internal_href, resolve_pathname};
use url::Url;

use crate::site::Site;

/// 一条失效引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenRef {
    /// 引用所在页面的路由
    pub page: String,
    /// 原始 href / src
    pub target: String,
}

/// 检查结果
#[derive(Debug, Default)]
pub struct CheckReport {
    pub pages: usize,
    pub links: usize,
    pub images: usize,
    pub broken_links: Vec<BrokenRef>,
    pub missing_images: Vec<BrokenRef>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.broken_links.is_empty() && self.missing_images.is_empty()
    }
}

/// 检查整个站点
pub fn check_site(site: &Site, origin: &Url) -> anyhow::Result<CheckReport> {
    let mut report = CheckReport::default();

    for page in site.pages() {
        let body = std::fs::read_to_string(&page.file)?;
        report.pages += 1;

        for href in extract_anchor_hrefs(&body) {
            if !is_internal_href(&href) {
                continue;
            }
            report.links += 1;

            let exists = resolve_pathname(origin, &href)
                .ok()
                .and_then(|path| site.page_file(&path))
                .is_some();
            if !exists {
                report.broken_links.push(BrokenRef {
                    page: page.route.clone(),
                    target: href,
                });
            }
        }

        for src in extract_image_sources(&body) {
            let url = match origin.join(&src) {
                Ok(url) => url,
                Err(_) => {
                    report.missing_images.push(BrokenRef {
                        page: page.route.clone(),
                        target: src,
                    });
                    continue;
                }
            };
            // 外部图片不检查
            let Some(file) = site.asset_file(&url, origin) else {
                continue;
            };
            report.images += 1;
            if !file.is_file() {
                report.missing_images.push(BrokenRef {
                    page: page.route.clone(),
                    target: src,
                });
            }
        }
    }

    Ok(report)
}
