//! 静态站点目录
//!
//! 路由到文件的映射：
//! - `/` → `index.html`
//! - `/archive` → `archive.html` 或 `archive/index.html`
//! - `/notes.html` → `notes.html`

use std::path::{Path, PathBuf};

use anyhow::Context;
use percent_encoding::percent_decode_str;
use url::Url;
use walkdir::WalkDir;

/// 站点中的一个页面
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePage {
    /// 路由路径
    pub route: String,
    pub file: PathBuf,
}

/// 静态站点
#[derive(Debug, Clone)]
pub struct Site {
    root: PathBuf,
}

impl Site {
    pub fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            anyhow::bail!("站点目录不存在: {}", root.display());
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 路由对应的页面文件
    pub fn page_file(&self, route: &str) -> Option<PathBuf> {
        let relative = relative_path(route)?;
        if relative.as_os_str().is_empty() {
            return Some(self.root.join("index.html")).filter(|p| p.is_file());
        }

        let direct = self.root.join(&relative);
        if direct.extension().is_some_and(|ext| ext == "html") && direct.is_file() {
            return Some(direct);
        }

        let with_ext = self.root.join(relative.with_extension("html"));
        if with_ext.is_file() {
            return Some(with_ext);
        }

        let index = direct.join("index.html");
        index.is_file().then_some(index)
    }

    /// 读取页面；页面不存在时返回 `Ok(None)`
    pub fn read_page(&self, route: &str) -> anyhow::Result<Option<String>> {
        match self.page_file(route) {
            Some(file) => {
                let body = std::fs::read_to_string(&file)
                    .with_context(|| format!("无法读取页面 {}", file.display()))?;
                Ok(Some(body))
            }
            None => Ok(None),
        }
    }

    /// 同源地址对应的本地文件；外部地址返回 `None`
    pub fn asset_file(&self, url: &Url, origin: &Url) -> Option<PathBuf> {
        if url.origin() != origin.origin() {
            return None;
        }
        let relative = relative_path(url.path())?;
        Some(self.root.join(relative))
    }

    /// 所有页面（按路由排序）
    pub fn pages(&self) -> Vec<SitePage> {
        let mut pages: Vec<SitePage> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "html"))
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                Some(SitePage {
                    route: route_for(relative),
                    file: entry.path().to_path_buf(),
                })
            })
            .collect();
        pages.sort_by(|a, b| a.route.cmp(&b.route));
        pages
    }
}

/// 路由路径 → 相对文件路径
///
/// 每一段先做百分号解码（`my%20pic.jpg` → `my pic.jpg`）。
/// 包含 `..`、解码后含路径分隔符或不是合法 UTF-8 时返回 `None`。
fn relative_path(route: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in route.split('/') {
        let segment = percent_decode_str(segment).decode_utf8().ok()?;
        match segment.as_ref() {
            "" | "." => {}
            ".." => return None,
            part if part.contains(['/', '\\']) => return None,
            part => relative.push(part),
        }
    }
    Some(relative)
}

/// 相对文件路径 → 路由路径
fn route_for(relative: &Path) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.pop()
        && last != "index.html"
    {
        segments.push(last.trim_end_matches(".html").to_string());
    }
    format!("/{}", segments.join("/"))
}
