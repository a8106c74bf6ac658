//! # HTML 模块
//!
//! 从页面标记中提取图片和链接地址。只做属性级别的扫描，
//! 不构建 DOM；注释中的标签同样会被扫描到。

use std::sync::LazyLock;

use regex::Regex;

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\ssrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("img 正则无效")
});

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\shref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("a 正则无效")
});

fn decode_entities(value: &str) -> String {
    value
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

fn collect_attribute(re: &Regex, html: &str) -> Vec<String> {
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|value| !value.is_empty())
        .collect()
}

/// 提取所有需要预加载的图片地址
///
/// 跳过 `data:` URI，按首次出现顺序去重。
pub fn extract_image_sources(html: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for src in collect_attribute(&IMG_SRC, html) {
        if src.to_ascii_lowercase().starts_with("data:") {
            continue;
        }
        if !sources.contains(&src) {
            sources.push(src);
        }
    }
    sources
}

/// 提取所有链接地址（原始 href，保留重复）
pub fn extract_anchor_hrefs(html: &str) -> Vec<String> {
    collect_attribute(&ANCHOR_HREF, html)
}
