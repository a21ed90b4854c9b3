//! Scoring module - pure functions for score calculation
//!
//! Each merge step in a cascade awards the merged block's new value; steps
//! after the first carry a 1.5x combo multiplier, floored to an integer.
//! All arithmetic saturates so a long session can never wrap the score.

use crate::types::{COMBO_DENOMINATOR, COMBO_NUMERATOR};

/// Score for a single merge step.
///
/// `combo_index` is 1-based: the first merge of a cascade is 1 and scores
/// the plain value, every later step scores value * 3 / 2 (floored).
pub fn merge_score(new_value: u32, combo_index: u32) -> u64 {
    let base = new_value as u64;
    if combo_index <= 1 {
        base
    } else {
        base.saturating_mul(COMBO_NUMERATOR as u64) / COMBO_DENOMINATOR as u64
    }
}

/// Total score of a whole cascade given the merged values in order.
pub fn cascade_score(new_values: &[u32]) -> u64 {
    new_values
        .iter()
        .enumerate()
        .map(|(i, &v)| merge_score(v, i as u32 + 1))
        .fold(0u64, |acc, s| acc.saturating_add(s))
}
