// Linear approximation over size, not a real tokenizer.

use crate::config::EstimateConfig;
use crate::record::FileRecord;
use serde::Serialize;

/// Roughly 3.57 bytes per token.
pub const TOKENS_PER_CHAR: f64 = 0.28;
pub const TOKEN_BUDGET: u64 = 100_000;
pub const WARN_THRESHOLD: u64 = 80_000;

const PPM: u128 = 1_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub count: usize,
    pub total_bytes: u64,
    pub tokens: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub chars: u64,
    pub tokens: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimator {
    // tokens per char in parts per million; keeps ceil() exact for round inputs
    tokens_per_char_ppm: u128,
    token_budget: u64,
    warn_threshold: u64,
}

impl Default for Estimator {
    fn default() -> Self {
        Self::new(TOKENS_PER_CHAR, TOKEN_BUDGET, WARN_THRESHOLD)
    }
}

impl Estimator {
    pub fn new(tokens_per_char: f64, token_budget: u64, warn_threshold: u64) -> Self {
        let ppm = (tokens_per_char.max(0.0) * PPM as f64).round() as u128;
        Self {
            tokens_per_char_ppm: ppm,
            token_budget,
            warn_threshold,
        }
    }

    pub fn from_config(config: &EstimateConfig) -> Self {
        Self::new(
            config.tokens_per_char,
            config.token_budget,
            config.warn_threshold,
        )
    }

    pub fn token_budget(&self) -> u64 {
        self.token_budget
    }

    /// `ceil(bytes * tokens_per_char)`.
    pub fn tokens_for(&self, bytes: u64) -> u64 {
        let scaled = (bytes as u128).saturating_mul(self.tokens_per_char_ppm);
        let tokens = scaled.div_ceil(PPM);
        u64::try_from(tokens).unwrap_or(u64::MAX)
    }

    pub fn estimate<'a>(&self, files: impl IntoIterator<Item = &'a FileRecord>) -> Stats {
        let (count, total_bytes) = files
            .into_iter()
            .fold((0usize, 0u64), |(n, bytes), f| {
                (n + 1, bytes.saturating_add(f.size))
            });
        Stats {
            count,
            total_bytes,
            tokens: self.tokens_for(total_bytes),
        }
    }

    /// Estimate for a finished document, counted in characters.
    pub fn estimate_text(&self, text: &str) -> TextStats {
        let chars = text.chars().count() as u64;
        TextStats {
            chars,
            tokens: self.tokens_for(chars),
        }
    }

    pub fn progress(&self, stats: &Stats) -> f64 {
        if self.token_budget == 0 {
            return 1.0;
        }
        (stats.tokens as f64 / self.token_budget as f64).min(1.0)
    }

    pub fn is_over_warning(&self, stats: &Stats) -> bool {
        stats.tokens > self.warn_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ContentRef;

    fn rec(path: &str, size: u64) -> FileRecord {
        FileRecord::new(path, size, ContentRef::new(path))
    }

    #[test]
    fn empty_selection_is_all_zero() {
        let est = Estimator::default();
        let stats = est.estimate(std::iter::empty());
        assert_eq!(stats, Stats::default());
        assert_eq!(est.progress(&stats), 0.0);
    }

    #[test]
    fn three_files_sum_to_ninety_eight_tokens() {
        let files = vec![
            rec("src/a.js", 100),
            rec("src/b.js", 200),
            rec("readme.md", 50),
        ];
        let stats = Estimator::default().estimate(&files);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.total_bytes, 350);
        assert_eq!(stats.tokens, 98);
    }

    #[test]
    fn tokens_round_up() {
        let est = Estimator::default();
        assert_eq!(est.tokens_for(1), 1);
        assert_eq!(est.tokens_for(25), 7);
        assert_eq!(est.tokens_for(0), 0);
    }

    #[test]
    fn progress_clamps_at_budget() {
        let est = Estimator::new(1.0, 100, 80);
        let over = Stats {
            count: 1,
            total_bytes: 500,
            tokens: 500,
        };
        assert_eq!(est.progress(&over), 1.0);
        assert!(est.is_over_warning(&over));

        let half = Stats {
            tokens: 50,
            ..over
        };
        assert_eq!(est.progress(&half), 0.5);
        assert!(!est.is_over_warning(&half));
    }

    #[test]
    fn huge_ratio_saturates_instead_of_overflowing() {
        let est = Estimator::new(1e33, TOKEN_BUDGET, WARN_THRESHOLD);
        assert_eq!(est.tokens_for(1_000), u64::MAX);
        assert_eq!(est.tokens_for(0), 0);
        assert_eq!(est.progress(&est.estimate(&[rec("big.txt", 1_000)])), 1.0);
    }

    #[test]
    fn configured_huge_ratio_does_not_panic() {
        let config = crate::Config::from_toml_str("[estimate]\ntokens_per_char = 1e33\n").unwrap();
        let est = Estimator::from_config(&config.estimate);
        assert_eq!(est.tokens_for(1_000), u64::MAX);
    }

    #[test]
    fn text_estimate_counts_chars_not_bytes() {
        let stats = Estimator::default().estimate_text("héllo");
        assert_eq!(stats.chars, 5);
        assert_eq!(stats.tokens, 2);
    }
}
