//! # Easing 模块
//!
//! 缓动函数库。命名沿用前端动画库的写法（`power2.inOut` 等），
//! 方便直接在配置文件中书写。

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// 缓动函数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    /// 线性（匀速）
    #[serde(rename = "none")]
    Linear,
    /// 二次缓入
    #[serde(rename = "power1.in")]
    Power1In,
    /// 二次缓出
    #[serde(rename = "power1.out")]
    Power1Out,
    /// 二次缓入缓出
    #[serde(rename = "power1.inOut")]
    Power1InOut,
    /// 三次缓入
    #[serde(rename = "power2.in")]
    Power2In,
    /// 三次缓出
    #[serde(rename = "power2.out")]
    Power2Out,
    /// 三次缓入缓出（过渡动画默认使用）
    #[default]
    #[serde(rename = "power2.inOut")]
    Power2InOut,
    /// 正弦缓入缓出
    #[serde(rename = "sine.inOut")]
    SineInOut,
}

impl Ease {
    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度 (0.0 - 1.0)，超出范围会被限制
    ///
    /// # 返回
    /// - 缓动后的进度值 (0.0 - 1.0)
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Ease::Linear => t,
            Ease::Power1In => t * t,
            Ease::Power1Out => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::Power1InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Ease::Power2In => t * t * t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Ease::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}
