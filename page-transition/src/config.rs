//! # Config 模块
//!
//! 过渡控制器的配置，集中管理所有动画参数。
//!
//! ## 配置优先级
//!
//! 1. 宿主显式传入（最高）
//! 2. 配置文件 (transition.json)
//! 3. 预设默认值（最低）
//!
//! 两套预设对应两种遮罩样式：
//! - [`CoverStyle::Slide`]（默认）：整块遮罩自下而上滑入，签名描边 + 乱码文字
//! - [`CoverStyle::Blocks`]：多条竖向面板依次横向展开，不显示文字

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;

use crate::animation::Ease;
use crate::error::ConfigError;
use crate::phrases::DEFAULT_PHRASES;
use crate::scramble::DEFAULT_SCRAMBLE_CHARS;

/// 遮罩样式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoverStyle {
    /// 单层遮罩上下滑动
    #[default]
    Slide,
    /// 多面板横向擦除
    Blocks,
}

/// 过渡配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransitionConfig {
    /// 遮罩样式
    #[serde(default)]
    pub style: CoverStyle,

    /// 站点源（用于把链接和图片地址解析为绝对地址）
    #[serde(default = "default_origin")]
    pub origin: String,

    /// 动画帧间隔（毫秒）
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// 遮罩参数
    #[serde(default)]
    pub cover: CoverConfig,

    /// logo / 签名参数
    #[serde(default)]
    pub logo: LogoConfig,

    /// 乱码文字参数
    #[serde(default)]
    pub text: TextConfig,

    /// 预加载参数
    #[serde(default)]
    pub preload: PreloadConfig,
}

/// 遮罩参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverConfig {
    /// 滑入时长（秒，Slide）
    #[serde(default = "default_slide_duration")]
    pub slide_duration: f32,

    /// 揭幕滑出时长（秒，Slide）
    #[serde(default = "default_reveal_slide_duration")]
    pub reveal_slide_duration: f32,

    /// 面板数量（Blocks）
    #[serde(default = "default_block_count")]
    pub block_count: usize,

    /// 单个面板展开时长（秒，Blocks）
    #[serde(default = "default_block_duration")]
    pub block_duration: f32,

    /// 相邻面板的错开时间（秒，Blocks）
    #[serde(default = "default_block_stagger")]
    pub block_stagger: f32,

    /// 缓动函数
    #[serde(default)]
    pub ease: Ease,
}

/// logo / 签名参数
///
/// `*_lead` 表示相对时间轴末尾提前多少秒开始。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogoConfig {
    /// logo 图层淡入时长（秒）
    #[serde(default = "default_fade_in")]
    pub fade_in: f32,
    #[serde(default = "default_fade_in_lead")]
    pub fade_in_lead: f32,

    /// 描边绘制时长（秒）
    #[serde(default = "default_draw_duration")]
    pub draw_duration: f32,
    #[serde(default = "default_draw_lead")]
    pub draw_lead: f32,

    /// 填充时长（秒）
    #[serde(default = "default_fill_duration")]
    pub fill_duration: f32,
    #[serde(default = "default_fill_lead")]
    pub fill_lead: f32,

    /// 导航前 logo 图层淡出时长（秒）
    #[serde(default = "default_dismiss_duration")]
    pub dismiss_duration: f32,

    /// 签名路径不可测量时使用的描边长度
    #[serde(default)]
    pub fallback_path_length: Option<f32>,

    #[serde(default)]
    pub ease: Ease,
}

/// 乱码文字参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextConfig {
    /// 是否启用乱码文字
    #[serde(default = "default_text_enabled")]
    pub enabled: bool,

    /// 乱码到目标文字的总时长（秒）
    #[serde(default = "default_text_duration")]
    pub duration: f32,
    #[serde(default = "default_text_lead")]
    pub lead: f32,

    /// 开始逐字揭示前的纯乱码时间（秒）
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay: f32,

    /// 乱码字符刷新间隔（秒）
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: f32,

    /// 乱码字符集
    #[serde(default = "default_scramble_chars")]
    pub chars: String,

    /// 候选文案
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,
}

/// 预加载参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreloadConfig {
    /// 预加载最长等待时间（毫秒）
    #[serde(default = "default_preload_timeout_ms")]
    pub timeout_ms: u64,
}

// 默认值函数
fn default_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_slide_duration() -> f32 {
    0.75
}

fn default_reveal_slide_duration() -> f32 {
    0.6
}

fn default_block_count() -> usize {
    20
}

/// Blocks 样式允许的最大面板数
pub const MAX_BLOCK_COUNT: usize = 200;

fn default_block_duration() -> f32 {
    0.4
}

fn default_block_stagger() -> f32 {
    0.02
}

fn default_fade_in() -> f32 {
    0.25
}

fn default_fade_in_lead() -> f32 {
    0.2
}

fn default_draw_duration() -> f32 {
    1.5
}

fn default_draw_lead() -> f32 {
    0.1
}

fn default_fill_duration() -> f32 {
    0.8
}

fn default_fill_lead() -> f32 {
    0.7
}

fn default_dismiss_duration() -> f32 {
    0.3
}

fn default_text_enabled() -> bool {
    true
}

fn default_text_duration() -> f32 {
    1.2
}

fn default_text_lead() -> f32 {
    1.0
}

fn default_reveal_delay() -> f32 {
    0.3
}

fn default_refresh_interval() -> f32 {
    0.05
}

fn default_scramble_chars() -> String {
    DEFAULT_SCRAMBLE_CHARS.to_string()
}

fn default_phrases() -> Vec<String> {
    DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect()
}

fn default_preload_timeout_ms() -> u64 {
    2000
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self::preset(CoverStyle::Slide)
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            slide_duration: default_slide_duration(),
            reveal_slide_duration: default_reveal_slide_duration(),
            block_count: default_block_count(),
            block_duration: default_block_duration(),
            block_stagger: default_block_stagger(),
            ease: Ease::default(),
        }
    }
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            fade_in: default_fade_in(),
            fade_in_lead: default_fade_in_lead(),
            draw_duration: default_draw_duration(),
            draw_lead: default_draw_lead(),
            fill_duration: default_fill_duration(),
            fill_lead: default_fill_lead(),
            dismiss_duration: default_dismiss_duration(),
            fallback_path_length: None,
            ease: Ease::default(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            enabled: default_text_enabled(),
            duration: default_text_duration(),
            lead: default_text_lead(),
            reveal_delay: default_reveal_delay(),
            refresh_interval: default_refresh_interval(),
            chars: default_scramble_chars(),
            phrases: default_phrases(),
        }
    }
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_preload_timeout_ms(),
        }
    }
}

impl TransitionConfig {
    /// 指定样式的预设
    pub fn preset(style: CoverStyle) -> Self {
        match style {
            CoverStyle::Slide => Self {
                style,
                origin: default_origin(),
                frame_interval_ms: default_frame_interval_ms(),
                cover: CoverConfig::default(),
                logo: LogoConfig::default(),
                text: TextConfig::default(),
                preload: PreloadConfig::default(),
            },
            CoverStyle::Blocks => Self {
                style,
                origin: default_origin(),
                frame_interval_ms: default_frame_interval_ms(),
                cover: CoverConfig::default(),
                logo: LogoConfig {
                    fade_in: 0.2,
                    fade_in_lead: 0.02,
                    draw_duration: 2.0,
                    draw_lead: 0.1,
                    fill_duration: 1.0,
                    fill_lead: 0.5,
                    dismiss_duration: 0.25,
                    ..LogoConfig::default()
                },
                text: TextConfig {
                    enabled: false,
                    ..TextConfig::default()
                },
                preload: PreloadConfig::default(),
            },
        }
    }

    /// 从 JSON 字符串解析
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 加载配置文件
    ///
    /// 如果文件不存在或解析失败，返回默认配置并记录警告。
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            warn!(path = ?path, "过渡配置文件不存在，使用默认配置");
            return Self::default();
        }

        match Self::load_strict(path) {
            Ok(config) => {
                info!(path = ?path, "过渡配置加载成功");
                config
            }
            Err(e) => {
                warn!(path = ?path, error = %e, "过渡配置加载失败，使用默认配置");
                Self::default()
            }
        }
    }

    /// 加载配置文件，失败时返回错误
    pub fn load_strict(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&content)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))?;

        Ok(())
    }

    /// 解析后的站点源
    pub fn origin_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.origin)
            .map_err(|e| ConfigError::Validation(format!("站点源无效 '{}': {}", self.origin, e)))
    }

    /// 预加载超时
    pub fn preload_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.preload.timeout_ms)
    }

    /// 帧间隔
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.frame_interval_ms)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.origin_url()?;

        if self.frame_interval_ms == 0 {
            return Err(ConfigError::Validation("帧间隔必须大于 0".to_string()));
        }

        if self.preload.timeout_ms == 0 {
            return Err(ConfigError::Validation("预加载超时必须大于 0".to_string()));
        }

        let durations = [
            ("cover.slide_duration", self.cover.slide_duration),
            ("cover.reveal_slide_duration", self.cover.reveal_slide_duration),
            ("cover.block_duration", self.cover.block_duration),
            ("cover.block_stagger", self.cover.block_stagger),
            ("logo.fade_in", self.logo.fade_in),
            ("logo.fade_in_lead", self.logo.fade_in_lead),
            ("logo.draw_duration", self.logo.draw_duration),
            ("logo.draw_lead", self.logo.draw_lead),
            ("logo.fill_duration", self.logo.fill_duration),
            ("logo.fill_lead", self.logo.fill_lead),
            ("logo.dismiss_duration", self.logo.dismiss_duration),
            ("text.duration", self.text.duration),
            ("text.lead", self.text.lead),
            ("text.reveal_delay", self.text.reveal_delay),
        ];
        for (name, value) in durations {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{} 必须是非负数，实际为 {}",
                    name, value
                )));
            }
        }

        if self.style == CoverStyle::Blocks && self.cover.block_count == 0 {
            return Err(ConfigError::Validation(
                "Blocks 样式至少需要 1 个面板".to_string(),
            ));
        }

        if self.cover.block_count > MAX_BLOCK_COUNT {
            return Err(ConfigError::Validation(format!(
                "cover.block_count 不能超过 {}，实际为 {}",
                MAX_BLOCK_COUNT, self.cover.block_count
            )));
        }

        if let Some(length) = self.logo.fallback_path_length
            && (!length.is_finite() || length <= 0.0)
        {
            return Err(ConfigError::Validation(
                "logo.fallback_path_length 必须大于 0".to_string(),
            ));
        }

        if self.text.enabled {
            if self.text.phrases.iter().all(|p| p.trim().is_empty()) {
                return Err(ConfigError::Validation(
                    "启用乱码文字时必须至少配置一条文案".to_string(),
                ));
            }
            if self.text.chars.is_empty() {
                return Err(ConfigError::Validation("乱码字符集不能为空".to_string()));
            }
            if !self.text.refresh_interval.is_finite() || self.text.refresh_interval <= 0.0 {
                return Err(ConfigError::Validation(
                    "text.refresh_interval 必须大于 0".to_string(),
                ));
            }
        }

        Ok(())
    }
}
