//! # Driver 模块
//!
//! 基于 tokio 定时器的帧驱动：按固定帧间隔推进 [`TimelinePlayer`]。

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::trace;

use crate::animation::{Timeline, TimelinePlayer};
use crate::host::TimelineDriver;

/// 帧驱动
#[derive(Debug, Clone, Copy)]
pub struct FrameDriver {
    frame: Duration,
}

impl FrameDriver {
    pub fn new(frame: Duration) -> Self {
        Self {
            frame: frame.max(Duration::from_millis(1)),
        }
    }

    pub fn frame(&self) -> Duration {
        self.frame
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

#[async_trait(?Send)]
impl TimelineDriver for FrameDriver {
    async fn play(&self, timeline: Timeline) {
        let mut player = TimelinePlayer::new(timeline);
        let mut ticker = tokio::time::interval(self.frame);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last = Instant::now();
        let mut frames = 0u32;
        loop {
            ticker.tick().await;
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            frames += 1;

            if !player.advance(dt) {
                break;
            }
        }
        trace!(frames = frames, duration = player.duration(), "时间轴播放完成");
    }
}
