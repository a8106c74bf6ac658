//! # Error 模块
//!
//! 定义 page-transition 中使用的错误类型。
//!
//! 预加载错误永远不会传递到用户层面：`Preloader` 把它们记录到日志后
//! 按“预加载已完成”处理。只有配置加载、控制器构造这类宿主侧调用
//! 才会真正返回错误。

use thiserror::Error;

/// 预加载错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreloadError {
    /// 请求失败（网络错误等）
    #[error("请求 {path} 失败: {message}")]
    FetchFailed { path: String, message: String },

    /// 非 2xx 状态码
    #[error("请求 {path} 返回状态码 {status}")]
    BadStatus { path: String, status: u16 },

    /// 响应不是 HTML 文档
    #[error("{path} 不是 HTML 文档 (content-type: {content_type})")]
    NotHtml { path: String, content_type: String },

    /// 图片地址无法解析
    #[error("无效的图片地址 '{src}': {message}")]
    InvalidUrl { src: String, message: String },

    /// 图片加载失败
    #[error("图片加载失败: {url} - {message}")]
    ImageFailed { url: String, message: String },
}

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO 错误
    #[error("配置 IO 错误: {0}")]
    Io(String),

    /// 解析失败
    #[error("配置解析失败: {0}")]
    Parse(String),

    /// 序列化失败
    #[error("配置序列化失败: {0}")]
    Serialize(String),

    /// 验证失败
    #[error("配置验证失败: {0}")]
    Validation(String),
}

/// page-transition 统一错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 预加载错误
    #[error("预加载错误: {0}")]
    Preload(#[from] PreloadError),

    /// 链接地址无法解析为站内路径
    #[error("无效的链接地址 '{href}': {message}")]
    InvalidHref { href: String, message: String },
}

/// Result 类型别名
pub type TransitionResult<T> = Result<T, TransitionError>;
