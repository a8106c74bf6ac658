//! # Cover 模块
//!
//! 构建遮罩入场时间轴。
//!
//! Slide 样式的默认编排（毫秒）：
//!
//! ```text
//! overlay  ████████                      0 - 750   遮罩 100% → 0%
//! logo          ███                    550 - 800   logo 淡入
//! draw            ███████████████      700 - 2200  描边绘制
//! scramble             ████████████   1200 - 2400  乱码 → 目标文字
//! fill                      ████████  1700 - 2500  签名填充
//! ```
//!
//! 每一步都相对前一步末尾提前开始（`Position::Offset(-lead)`），
//! 只要求顺序和重叠关系，不要求精确到帧。

use tracing::debug;

use crate::animation::{Ease, Position, Timeline, TweenSpec};
use crate::config::{CoverConfig, CoverStyle, LogoConfig, TextConfig, TransitionConfig};
use crate::visual::{OverlayVisuals, TransformOrigin};

/// 遮罩动画构建器
#[derive(Debug, Clone)]
pub struct CoverAnimator {
    style: CoverStyle,
    cover: CoverConfig,
    logo: LogoConfig,
    text: TextConfig,
}

impl CoverAnimator {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            style: config.style,
            cover: config.cover.clone(),
            logo: config.logo.clone(),
            text: config.text.clone(),
        }
    }

    /// 构建入场时间轴
    ///
    /// 调用前应已通过 [`TransitionText::prepare`](crate::visual::TransitionText::prepare)
    /// 设置好目标文字。签名路径缺失时，描边和填充步骤作用在空目标上。
    pub fn build(&self, visuals: &OverlayVisuals) -> Timeline {
        visuals.blocker.set_origin(TransformOrigin::Left);
        let blockers = visuals.blocker.targets();

        // 1. 遮罩：隐藏 → 覆盖
        let mut timeline = match self.style {
            CoverStyle::Slide => Timeline::new()
                .set_all("overlay", &blockers, "translate_y", 100.0, Position::At(0.0))
                .to_staggered(
                    "overlay",
                    &blockers,
                    TweenSpec::new("translate_y", 0.0, self.cover.slide_duration)
                        .ease(self.cover.ease),
                    0.0,
                    Position::WithPrevious(0.0),
                ),
            CoverStyle::Blocks => Timeline::new()
                .set_all("overlay", &blockers, "scale_x", 0.0, Position::At(0.0))
                .to_staggered(
                    "overlay",
                    &blockers,
                    TweenSpec::new("scale_x", 1.0, self.cover.block_duration)
                        .ease(self.cover.ease),
                    self.cover.block_stagger,
                    Position::WithPrevious(0.0),
                ),
        };

        if visuals.text_enabled() {
            timeline = timeline
                .set("text", visuals.text_target(), "opacity", 1.0, Position::At(0.0))
                .set("text", visuals.text_target(), "progress", 0.0, Position::At(0.0));
        }

        // 2. logo 淡入
        timeline = timeline.to(
            "logo",
            visuals.logo_target(),
            TweenSpec::new("opacity", 1.0, self.logo.fade_in).ease(self.logo.ease),
            Position::Offset(-self.logo.fade_in_lead),
        );

        // 3. 描边从未绘制开始
        let signature = visuals.signature_target();
        let length = visuals.signature.length();
        timeline = timeline
            .set(
                "signature",
                signature.clone(),
                "stroke_dashoffset",
                length,
                Position::WithPrevious(0.0),
            )
            .set("signature", signature.clone(), "fill", 0.0, Position::WithPrevious(0.0))
            .to(
                "draw",
                signature.clone(),
                TweenSpec::new("stroke_dashoffset", 0.0, self.logo.draw_duration)
                    .ease(self.logo.ease),
                Position::Offset(-self.logo.draw_lead),
            );

        // 4. 乱码文字
        if visuals.text_enabled() {
            timeline = timeline.to(
                "scramble",
                visuals.text_target(),
                TweenSpec::new("progress", 1.0, self.text.duration).ease(Ease::Linear),
                Position::Offset(-self.text.lead),
            );
        }

        // 5. 填充
        timeline = timeline.to(
            "fill",
            signature,
            TweenSpec::new("fill", 1.0, self.logo.fill_duration).ease(self.logo.ease),
            Position::Offset(-self.logo.fill_lead),
        );

        debug!(
            style = ?self.style,
            duration = timeline.duration(),
            signature = visuals.has_signature(),
            "遮罩时间轴已构建"
        );
        timeline
    }

    /// 导航前的 logo 淡出
    pub fn dismiss(&self, visuals: &OverlayVisuals) -> Timeline {
        let timeline = Timeline::new().to(
            "dismiss",
            visuals.logo_target(),
            TweenSpec::new("opacity", 0.0, self.logo.dismiss_duration).ease(self.logo.ease),
            Position::At(0.0),
        );

        if visuals.text_enabled() {
            timeline.to(
                "dismiss",
                visuals.text_target(),
                TweenSpec::new("opacity", 0.0, self.logo.dismiss_duration).ease(self.logo.ease),
                Position::WithPrevious(0.0),
            )
        } else {
            timeline
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{Animatable, ScheduleEntry, TimelinePlayer};
    use insta::assert_snapshot;

    fn render(schedule: &[ScheduleEntry]) -> String {
        schedule
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}..{}",
                    entry.label,
                    entry.property,
                    (entry.start * 1000.0).round() as i64,
                    (entry.end * 1000.0).round() as i64
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn visuals(config: &TransitionConfig, length: Option<f32>) -> OverlayVisuals {
        let visuals = OverlayVisuals::new(config);
        visuals.attach_signature(length);
        visuals
    }

    #[test]
    fn test_slide_schedule() {
        let config = TransitionConfig::default();
        let visuals = visuals(&config, Some(1227.0));
        let timeline = CoverAnimator::new(&config).build(&visuals);

        assert_snapshot!(render(&timeline.schedule()), @r"
        overlay translate_y 0..0
        overlay translate_y 0..750
        text opacity 0..0
        text progress 0..0
        logo opacity 550..800
        signature stroke_dashoffset 550..550
        signature fill 550..550
        draw stroke_dashoffset 700..2200
        scramble progress 1200..2400
        fill fill 1700..2500
        ");
    }

    #[test]
    fn test_steps_overlap_in_order() {
        let config = TransitionConfig::default();
        let visuals = visuals(&config, Some(1227.0));
        let timeline = CoverAnimator::new(&config).build(&visuals);

        let overlay_end = timeline.end_of("overlay").unwrap();
        let logo_start = timeline.start_of("logo").unwrap();
        let logo_end = timeline.end_of("logo").unwrap();
        let draw_start = timeline.start_of("draw").unwrap();
        let draw_end = timeline.end_of("draw").unwrap();
        let scramble_start = timeline.start_of("scramble").unwrap();
        let fill_start = timeline.start_of("fill").unwrap();

        // 每一步都在前一步结束前开始
        assert!(logo_start < overlay_end);
        assert!(draw_start < logo_end);
        assert!(scramble_start > draw_start && scramble_start < draw_end);
        assert!(fill_start < draw_end);
        assert_eq!(timeline.end_of("fill"), Some(timeline.duration()));
    }

    #[test]
    fn test_blocks_stagger() {
        let config = TransitionConfig::preset(CoverStyle::Blocks);
        let visuals = visuals(&config, None);
        let timeline = CoverAnimator::new(&config).build(&visuals);

        let schedule = timeline.schedule();
        let tweens: Vec<&ScheduleEntry> = schedule
            .iter()
            .filter(|entry| entry.label == "overlay" && entry.end > entry.start)
            .collect();
        assert_eq!(tweens.len(), 20);
        assert!((tweens[19].start - 0.38).abs() < 1e-4);
        assert!(timeline.start_of("scramble").is_none());
        assert!(timeline.start_of("text").is_none());
    }

    #[test]
    fn test_play_draws_signature() {
        let config = TransitionConfig::default();
        let visuals = visuals(&config, Some(400.0));
        visuals.text.prepare("Hello there", 7);

        let mut player = TimelinePlayer::new(CoverAnimator::new(&config).build(&visuals));
        player.advance(0.6);
        assert_eq!(visuals.signature.stroke_dashoffset(), 400.0);
        assert_eq!(visuals.text.text(), "");

        player.finish();
        assert!(visuals.blocker.is_covering());
        assert_eq!(visuals.logo.opacity(), 1.0);
        assert_eq!(visuals.signature.stroke_dashoffset(), 0.0);
        assert_eq!(visuals.signature.fill(), 1.0);
        assert_eq!(visuals.text.text(), "Hello there");
    }

    #[test]
    fn test_missing_signature_is_noop() {
        let config = TransitionConfig::default();
        let visuals = visuals(&config, None);

        let mut player = TimelinePlayer::new(CoverAnimator::new(&config).build(&visuals));
        player.finish();
        assert!(visuals.snapshot().signature.is_none());
        assert_eq!(visuals.logo.opacity(), 1.0);
    }

    #[test]
    fn test_dismiss() {
        let config = TransitionConfig::default();
        let visuals = visuals(&config, Some(100.0));
        visuals.logo.set_property("opacity", 1.0);

        let animator = CoverAnimator::new(&config);
        let timeline = animator.dismiss(&visuals);
        assert!((timeline.duration() - config.logo.dismiss_duration).abs() < 1e-6);

        TimelinePlayer::new(timeline).finish();
        assert_eq!(visuals.logo.opacity(), 0.0);
        assert_eq!(visuals.text.opacity(), 0.0);
    }
}
