//! # Visual 模块
//!
//! 过渡遮罩层的可动画状态。
//!
//! 这里只保存数值（缩放、位移、透明度、描边偏移……），
//! 宿主每帧通过 [`OverlayVisuals::snapshot`] 读取并绘制。
//!
//! 层次结构：
//! - `Blocker`：遮挡整个视口的遮罩（1 个滑动面板或 N 个横向面板）
//! - `LogoOverlay`：居中 logo 图层
//! - `SignaturePath`：签名矢量路径（描边绘制 + 填充）
//! - `TransitionText`：签名下方的乱码文字

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::Serialize;

use crate::animation::{Animatable, NullTarget};
use crate::config::{CoverStyle, TransitionConfig};
use crate::scramble::ScrambleText;

/// 变换原点
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransformOrigin {
    #[default]
    Left,
    Right,
}

/// 遮罩面板
///
/// - `scale_x`: 横向缩放 (0.0 - 1.0)
/// - `translate_y`: 纵向位移（百分比，100 = 视口下方，-100 = 视口上方）
#[derive(Debug)]
pub struct Panel {
    scale_x: Cell<f32>,
    translate_y: Cell<f32>,
}

impl Panel {
    fn new(scale_x: f32, translate_y: f32) -> Self {
        Self {
            scale_x: Cell::new(scale_x),
            translate_y: Cell::new(translate_y),
        }
    }

    pub fn scale_x(&self) -> f32 {
        self.scale_x.get()
    }

    pub fn translate_y(&self) -> f32 {
        self.translate_y.get()
    }
}

impl Animatable for Panel {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            "scale_x" => Some(self.scale_x.get()),
            "translate_y" => Some(self.translate_y.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            "scale_x" => self.scale_x.set(value),
            "translate_y" => self.translate_y.set(value),
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["scale_x", "translate_y"]
    }
}

/// 视口遮罩
#[derive(Debug)]
pub struct Blocker {
    style: CoverStyle,
    panels: Vec<Rc<Panel>>,
    origin: Cell<TransformOrigin>,
}

impl Blocker {
    /// 创建遮罩，初始为完全遮挡（首帧由揭幕动画打开）
    pub fn new(style: CoverStyle, block_count: usize) -> Self {
        let panels = match style {
            CoverStyle::Slide => vec![Rc::new(Panel::new(1.0, 0.0))],
            CoverStyle::Blocks => (0..block_count.max(1))
                .map(|_| Rc::new(Panel::new(1.0, 0.0)))
                .collect(),
        };

        Self {
            style,
            panels,
            origin: Cell::new(TransformOrigin::Left),
        }
    }

    pub fn style(&self) -> CoverStyle {
        self.style
    }

    pub fn panels(&self) -> &[Rc<Panel>] {
        &self.panels
    }

    /// 以动画目标形式返回所有面板
    pub fn targets(&self) -> Vec<Rc<dyn Animatable>> {
        self.panels
            .iter()
            .map(|panel| panel.clone() as Rc<dyn Animatable>)
            .collect()
    }

    pub fn origin(&self) -> TransformOrigin {
        self.origin.get()
    }

    pub fn set_origin(&self, origin: TransformOrigin) {
        self.origin.set(origin);
    }

    /// 是否完全遮挡视口
    pub fn is_covering(&self) -> bool {
        match self.style {
            CoverStyle::Slide => self.panels.iter().all(|p| p.translate_y().abs() < 1e-3),
            CoverStyle::Blocks => self.panels.iter().all(|p| p.scale_x() >= 1.0 - 1e-3),
        }
    }

    /// 是否完全不遮挡
    pub fn is_hidden(&self) -> bool {
        match self.style {
            CoverStyle::Slide => self.panels.iter().all(|p| p.translate_y().abs() >= 100.0 - 1e-3),
            CoverStyle::Blocks => self.panels.iter().all(|p| p.scale_x() <= 1e-3),
        }
    }
}

/// logo 图层
#[derive(Debug, Default)]
pub struct LogoOverlay {
    opacity: Cell<f32>,
}

impl LogoOverlay {
    pub fn opacity(&self) -> f32 {
        self.opacity.get()
    }

    pub fn set_opacity(&self, opacity: f32) {
        self.opacity.set(opacity);
    }
}

impl Animatable for LogoOverlay {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            "opacity" => Some(self.opacity.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            "opacity" => {
                self.opacity.set(value);
                true
            }
            _ => false,
        }
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["opacity"]
    }
}

/// 签名路径
///
/// `length` 即 stroke-dasharray；`stroke_dashoffset == length` 表示未绘制，
/// 0 表示完全绘制。`fill` 为填充不透明度。
#[derive(Debug, Default)]
pub struct SignaturePath {
    length: Cell<f32>,
    stroke_dashoffset: Cell<f32>,
    fill: Cell<f32>,
}

impl SignaturePath {
    pub fn length(&self) -> f32 {
        self.length.get()
    }

    pub fn stroke_dashoffset(&self) -> f32 {
        self.stroke_dashoffset.get()
    }

    pub fn fill(&self) -> f32 {
        self.fill.get()
    }

    /// 重置为未绘制状态
    pub fn reset(&self, length: f32) {
        self.length.set(length);
        self.stroke_dashoffset.set(length);
        self.fill.set(0.0);
    }

    /// 绘制进度 (0.0 - 1.0)
    pub fn drawn_ratio(&self) -> f32 {
        let length = self.length.get();
        if length <= 0.0 {
            return 0.0;
        }
        (1.0 - self.stroke_dashoffset.get() / length).clamp(0.0, 1.0)
    }
}

impl Animatable for SignaturePath {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            "stroke_dashoffset" => Some(self.stroke_dashoffset.get()),
            "fill" => Some(self.fill.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            "stroke_dashoffset" => self.stroke_dashoffset.set(value),
            "fill" => self.fill.set(value),
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["stroke_dashoffset", "fill"]
    }
}

/// 过渡文字
///
/// `progress` 驱动乱码效果，`opacity` 为文字透明度。
#[derive(Debug)]
pub struct TransitionText {
    target: RefCell<String>,
    progress: Cell<f32>,
    opacity: Cell<f32>,
    scramble: RefCell<ScrambleText>,
}

impl TransitionText {
    pub fn new(scramble: ScrambleText) -> Self {
        Self {
            target: RefCell::new(String::new()),
            progress: Cell::new(1.0),
            opacity: Cell::new(1.0),
            scramble: RefCell::new(scramble),
        }
    }

    /// 静态显示一段文字（不乱码）
    pub fn show(&self, text: &str) {
        *self.target.borrow_mut() = text.to_string();
        self.progress.set(1.0);
    }

    /// 为下一次乱码动画准备目标文字
    pub fn prepare(&self, target: &str, seed: u64) {
        *self.target.borrow_mut() = target.to_string();
        self.scramble.borrow_mut().set_seed(seed);
    }

    pub fn target(&self) -> String {
        self.target.borrow().clone()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity.get()
    }

    /// 当前显示的文字
    pub fn text(&self) -> String {
        self.scramble
            .borrow()
            .render(&self.target.borrow(), self.progress.get())
    }
}

impl Animatable for TransitionText {
    fn get_property(&self, property_id: &str) -> Option<f32> {
        match property_id {
            "progress" => Some(self.progress.get()),
            "opacity" => Some(self.opacity.get()),
            _ => None,
        }
    }

    fn set_property(&self, property_id: &str, value: f32) -> bool {
        match property_id {
            "progress" => self.progress.set(value),
            "opacity" => self.opacity.set(value),
            _ => return false,
        }
        true
    }

    fn property_list(&self) -> &'static [&'static str] {
        &["progress", "opacity"]
    }
}

/// 单个面板的快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub scale_x: f32,
    pub translate_y: f32,
}

/// 签名路径的快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignatureSnapshot {
    pub length: f32,
    pub stroke_dashoffset: f32,
    pub fill: f32,
}

/// 遮罩层完整快照（宿主每帧据此绘制）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlaySnapshot {
    pub style: CoverStyle,
    pub origin: TransformOrigin,
    pub panels: Vec<PanelSnapshot>,
    pub logo_opacity: f32,
    pub signature: Option<SignatureSnapshot>,
    pub text: Option<String>,
    pub text_opacity: f32,
}

/// 遮罩层全部可动画对象
#[derive(Debug)]
pub struct OverlayVisuals {
    pub blocker: Blocker,
    pub logo: Rc<LogoOverlay>,
    pub signature: Rc<SignaturePath>,
    pub text: Rc<TransitionText>,
    signature_present: Cell<bool>,
    text_enabled: bool,
}

impl OverlayVisuals {
    pub fn new(config: &TransitionConfig) -> Self {
        let scramble = ScrambleText::new(
            &config.text.chars,
            config.text.duration,
            config.text.reveal_delay,
            config.text.refresh_interval,
        );

        Self {
            blocker: Blocker::new(config.style, config.cover.block_count),
            logo: Rc::new(LogoOverlay::default()),
            signature: Rc::new(SignaturePath::default()),
            text: Rc::new(TransitionText::new(scramble)),
            signature_present: Cell::new(false),
            text_enabled: config.text.enabled,
        }
    }

    /// 标记签名路径是否存在，存在时重置为未绘制
    pub fn attach_signature(&self, length: Option<f32>) {
        match length {
            Some(length) => {
                self.signature.reset(length);
                self.signature_present.set(true);
            }
            None => self.signature_present.set(false),
        }
    }

    pub fn has_signature(&self) -> bool {
        self.signature_present.get()
    }

    /// 签名路径的动画目标；路径缺失时返回空目标
    pub fn signature_target(&self) -> Rc<dyn Animatable> {
        if self.signature_present.get() {
            self.signature.clone() as Rc<dyn Animatable>
        } else {
            Rc::new(NullTarget) as Rc<dyn Animatable>
        }
    }

    pub fn logo_target(&self) -> Rc<dyn Animatable> {
        self.logo.clone()
    }

    pub fn text_target(&self) -> Rc<dyn Animatable> {
        self.text.clone()
    }

    pub fn text_enabled(&self) -> bool {
        self.text_enabled
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            style: self.blocker.style(),
            origin: self.blocker.origin(),
            panels: self
                .blocker
                .panels()
                .iter()
                .map(|p| PanelSnapshot {
                    scale_x: p.scale_x(),
                    translate_y: p.translate_y(),
                })
                .collect(),
            logo_opacity: self.logo.opacity(),
            signature: self.has_signature().then(|| SignatureSnapshot {
                length: self.signature.length(),
                stroke_dashoffset: self.signature.stroke_dashoffset(),
                fill: self.signature.fill(),
            }),
            text: self.text_enabled.then(|| self.text.text()),
            text_opacity: self.text.opacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocker_starts_covering() {
        let slide = Blocker::new(CoverStyle::Slide, 20);
        assert_eq!(slide.panels().len(), 1);
        assert!(slide.is_covering());

        let blocks = Blocker::new(CoverStyle::Blocks, 20);
        assert_eq!(blocks.panels().len(), 20);
        assert!(blocks.is_covering());
        assert!(!blocks.is_hidden());
    }

    #[test]
    fn test_slide_hidden_above_or_below() {
        let slide = Blocker::new(CoverStyle::Slide, 1);
        slide.panels()[0].set_property("translate_y", -100.0);
        assert!(slide.is_hidden());
        slide.panels()[0].set_property("translate_y", 100.0);
        assert!(slide.is_hidden());
    }

    #[test]
    fn test_signature_reset_and_ratio() {
        let path = SignaturePath::default();
        path.reset(1227.0);
        assert_eq!(path.drawn_ratio(), 0.0);
        path.set_property("stroke_dashoffset", 0.0);
        assert_eq!(path.drawn_ratio(), 1.0);
    }

    #[test]
    fn test_missing_signature_uses_null_target() {
        let visuals = OverlayVisuals::new(&TransitionConfig::default());
        visuals.attach_signature(None);
        assert!(visuals.signature_target().property_list().is_empty());
        assert!(visuals.snapshot().signature.is_none());

        visuals.attach_signature(Some(500.0));
        assert_eq!(visuals.signature_target().property_list(), &["stroke_dashoffset", "fill"]);
        assert_eq!(visuals.snapshot().signature.unwrap().stroke_dashoffset, 500.0);
    }

    #[test]
    fn test_text_show_and_prepare() {
        let text = TransitionText::new(ScrambleText::default());
        text.show("Innovation in Motion!");
        assert_eq!(text.text(), "Innovation in Motion!");

        text.prepare("Creating Digital Magic!", 9);
        text.set_property("progress", 0.0);
        assert_eq!(text.text(), "");
        text.set_property("progress", 1.0);
        assert_eq!(text.text(), "Creating Digital Magic!");
    }
}
