//! # Reveal 模块
//!
//! 挂载时的揭幕动画：遮罩从完全覆盖变为完全隐藏，
//! 是遮罩入场第一步的逆过程（相反的变换原点，相同的时长和错开）。

use tracing::{debug, warn};

use crate::animation::{Position, Timeline, TweenSpec};
use crate::config::{CoverConfig, CoverStyle, TransitionConfig};
use crate::visual::{OverlayVisuals, TransformOrigin};

/// 揭幕动画构建器
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    style: CoverStyle,
    cover: CoverConfig,
    fallback_path_length: Option<f32>,
}

impl RevealAnimator {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            style: config.style,
            cover: config.cover.clone(),
            fallback_path_length: config.logo.fallback_path_length,
        }
    }

    /// 挂载准备：确定签名路径长度并重置为未绘制，隐藏 logo
    ///
    /// 返回实际使用的路径长度（用于缓存）。
    pub fn prepare(&self, visuals: &OverlayVisuals, measured: Option<f32>) -> Option<f32> {
        let length = match measured {
            Some(length) if length.is_finite() && length > 0.0 => Some(length),
            Some(length) => {
                warn!(length = length, "签名路径长度无效，使用备用值");
                self.fallback_path_length
            }
            None => self.fallback_path_length,
        };

        visuals.attach_signature(length);
        visuals.logo.set_opacity(0.0);
        debug!(path_length = ?length, "揭幕准备完成");
        length
    }

    /// 构建揭幕时间轴
    pub fn build(&self, visuals: &OverlayVisuals) -> Timeline {
        visuals.blocker.set_origin(TransformOrigin::Right);
        let blockers = visuals.blocker.targets();

        match self.style {
            CoverStyle::Slide => Timeline::new()
                .set_all("reveal", &blockers, "translate_y", 0.0, Position::At(0.0))
                .to_staggered(
                    "reveal",
                    &blockers,
                    TweenSpec::new("translate_y", -100.0, self.cover.reveal_slide_duration)
                        .ease(self.cover.ease),
                    0.0,
                    Position::WithPrevious(0.0),
                ),
            CoverStyle::Blocks => Timeline::new()
                .set_all("reveal", &blockers, "scale_x", 1.0, Position::At(0.0))
                .to_staggered(
                    "reveal",
                    &blockers,
                    TweenSpec::new("scale_x", 0.0, self.cover.block_duration)
                        .ease(self.cover.ease),
                    self.cover.block_stagger,
                    Position::WithPrevious(0.0),
                ),
        }
    }
}
