//! # Phrases 模块
//!
//! 过渡文字候选文案与随机选取。

use rand::Rng;
use rand::seq::SliceRandom;

/// 默认候选文案
pub const DEFAULT_PHRASES: [&str; 10] = [
    "Breathing Life in Pixels!",
    "Crafting Digital Dreams!",
    "Where Creativity Meets Code!",
    "Pixel Perfect Experiences!",
    "Designing Tomorrow, Today!",
    "Innovation in Motion!",
    "Your Vision, Our Passion!",
    "Creating Digital Magic!",
    "Transforming Ideas into Reality!",
    "Building Beautiful Interfaces!",
];

/// 从候选列表中均匀随机选一条（跳过空白文案）
pub fn pick_phrase<'a, R: Rng + ?Sized>(phrases: &'a [String], rng: &mut R) -> Option<&'a str> {
    let candidates: Vec<&'a str> = phrases
        .iter()
        .map(String::as_str)
        .filter(|p| !p.trim().is_empty())
        .collect();
    candidates.choose(rng).copied()
}
