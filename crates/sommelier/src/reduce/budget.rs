//! Per-chunk output length budgeting.
//!
//! A short chunk should not be stretched to the caller's full maximum (the
//! model pads or invents detail), and a long chunk should compress toward
//! that maximum but never past it. The target therefore scales with the
//! chunk's token length and is clamped by the caller's bounds.

/// Fraction of the input length used as the uncapped output target.
pub const COMPRESSION_RATIO: f64 = 0.8;

/// Minimum headroom of the target maximum over the caller's minimum.
pub const MIN_HEADROOM: usize = 5;

/// Output length bounds for one summarization call, in tokens.
///
/// Invariant: `target_min <= target_max <= caller_max` whenever
/// `caller_min <= caller_max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBudget {
    pub target_max: usize,
    pub target_min: usize,
}

impl LengthBudget {
    /// Budget for a chunk of `input_tokens` tokens.
    ///
    /// `target_max = min(caller_max, max(caller_min + 5, round(input_tokens * 0.8)))`;
    /// `target_min` is `caller_min` unchanged.
    pub fn for_input(input_tokens: usize, caller_min: usize, caller_max: usize) -> Self {
        let scaled = (input_tokens as f64 * COMPRESSION_RATIO).round() as usize;
        let floor = caller_min.saturating_add(MIN_HEADROOM);
        Self {
            target_max: caller_max.min(floor.max(scaled)),
            target_min: caller_min,
        }
    }

    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!("length: {}..={} tokens", self.target_min, self.target_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_chunk_is_capped_at_caller_max() {
        let b = LengthBudget::for_input(400, 30, 80);
        assert_eq!(b.target_max, 80);
        assert_eq!(b.target_min, 30);
    }

    #[test]
    fn short_chunk_gets_headroom_over_min() {
        let b = LengthBudget::for_input(10, 30, 80);
        assert_eq!(b.target_max, 35);
    }

    #[test]
    fn mid_chunk_scales_with_input() {
        // round(60 * 0.8) = 48
        assert_eq!(LengthBudget::for_input(60, 30, 80).target_max, 48);
        // round(61 * 0.8) = round(48.8) = 49
        assert_eq!(LengthBudget::for_input(61, 30, 80).target_max, 49);
    }

    #[test]
    fn narrow_caller_range_clamps_to_max() {
        let b = LengthBudget::for_input(5, 30, 32);
        assert_eq!(b.target_max, 32);
        assert!(b.target_min <= b.target_max);
    }

    #[test]
    fn zero_input() {
        let b = LengthBudget::for_input(0, 30, 80);
        assert_eq!(b.target_max, 35);
    }

    #[test]
    fn target_max_is_monotone_and_bounded() {
        for (min, max) in [(30, 80), (0, 1), (10, 12), (50, 50), (5, 500)] {
            let lower = (min + MIN_HEADROOM).min(max);
            let mut prev = 0;
            for x in 0..2_000 {
                let b = LengthBudget::for_input(x, min, max);
                assert!(b.target_max >= prev, "non-decreasing at x={x}");
                assert!(b.target_max <= max);
                assert!(b.target_max >= lower);
                assert!(b.target_min <= b.target_max);
                prev = b.target_max;
            }
        }
    }

    #[test]
    fn log_string_format() {
        let s = LengthBudget::for_input(400, 30, 80).to_log_string();
        assert_eq!(s, "length: 30..=80 tokens");
    }
}
