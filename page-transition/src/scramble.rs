//! # Scramble 模块
//!
//! 乱码文字效果：占位字符随时间逐字揭示为目标文案。
//!
//! 进度 `progress`（0.0 - 1.0）映射到时长 `duration` 内的时间 t：
//! - `progress <= 0`：空字符串
//! - `t < reveal_delay`：全部字符为乱码（空白保留）
//! - 之后目标文案从左到右逐字揭示，其余位置继续乱码
//! - `progress >= 1`：完整目标文案
//!
//! 乱码字符每 `refresh_interval` 秒换一批；同一种子、同一时刻的输出固定。
//! 文本长度始终等于目标长度。

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// 默认乱码字符集
pub const DEFAULT_SCRAMBLE_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// 乱码文字生成器
#[derive(Debug, Clone, PartialEq)]
pub struct ScrambleText {
    chars: Vec<char>,
    duration: f32,
    reveal_delay: f32,
    refresh_interval: f32,
    seed: u64,
}

impl ScrambleText {
    pub fn new(chars: &str, duration: f32, reveal_delay: f32, refresh_interval: f32) -> Self {
        Self {
            chars: chars.chars().collect(),
            duration: duration.max(0.0),
            reveal_delay: reveal_delay.clamp(0.0, duration.max(0.0)),
            refresh_interval: refresh_interval.max(f32::EPSILON),
            seed: 0,
        }
    }

    /// 设置随机种子
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    /// 已揭示的字符数
    pub fn revealed_count(&self, len: usize, progress: f32) -> usize {
        if progress >= 1.0 {
            return len;
        }
        let t = progress.max(0.0) * self.duration;
        if t <= self.reveal_delay {
            return 0;
        }
        let span = (self.duration - self.reveal_delay).max(f32::EPSILON);
        let ratio = ((t - self.reveal_delay) / span).min(1.0);
        ((ratio * len as f32).floor() as usize).min(len)
    }

    /// 渲染指定进度下的文字
    pub fn render(&self, target: &str, progress: f32) -> String {
        if progress <= 0.0 {
            return String::new();
        }
        if progress >= 1.0 {
            return target.to_string();
        }

        let chars: Vec<char> = target.chars().collect();
        let revealed = self.revealed_count(chars.len(), progress);

        let t = progress * self.duration;
        let frame = (t / self.refresh_interval).floor() as u64;
        let mut rng = StdRng::seed_from_u64(self.seed ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15));

        chars
            .iter()
            .enumerate()
            .map(|(index, c)| {
                if index < revealed || c.is_whitespace() {
                    *c
                } else {
                    self.chars.choose(&mut rng).copied().unwrap_or(*c)
                }
            })
            .collect()
    }
}

impl Default for ScrambleText {
    fn default() -> Self {
        Self::new(DEFAULT_SCRAMBLE_CHARS, 1.2, 0.3, 0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: &str = "Innovation in Motion!";

    #[test]
    fn test_endpoints() {
        let scramble = ScrambleText::default();
        assert_eq!(scramble.render(TARGET, 0.0), "");
        assert_eq!(scramble.render(TARGET, 1.0), TARGET);
    }

    #[test]
    fn test_before_reveal_delay_all_scrambled() {
        let scramble = ScrambleText::default().with_seed(3);
        // t = 0.12s < 0.3s
        let text = scramble.render(TARGET, 0.1);
        assert_eq!(text.chars().count(), TARGET.chars().count());
        for (rendered, original) in text.chars().zip(TARGET.chars()) {
            if original.is_whitespace() {
                assert_eq!(rendered, original);
            } else {
                assert!(DEFAULT_SCRAMBLE_CHARS.contains(rendered));
            }
        }
    }

    #[test]
    fn test_prefix_revealed_progressively() {
        let scramble = ScrambleText::default().with_seed(11);
        let len = TARGET.chars().count();

        let mut last = 0;
        for step in 1..10 {
            let progress = step as f32 / 10.0;
            let revealed = scramble.revealed_count(len, progress);
            assert!(revealed >= last);
            last = revealed;

            let text = scramble.render(TARGET, progress);
            let prefix: String = TARGET.chars().take(revealed).collect();
            assert!(text.starts_with(&prefix));
        }
        assert!(last > 0 && last < len);
    }

    #[test]
    fn test_deterministic_per_seed() {
        let a = ScrambleText::default().with_seed(5);
        let b = ScrambleText::default().with_seed(5);
        assert_eq!(a.render(TARGET, 0.2), b.render(TARGET, 0.2));
    }

    #[test]
    fn test_empty_charset_keeps_original() {
        let scramble = ScrambleText::new("", 1.0, 0.5, 0.1);
        assert_eq!(scramble.render("abc", 0.2), "abc");
    }
}
