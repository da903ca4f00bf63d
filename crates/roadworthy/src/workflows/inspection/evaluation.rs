//! Verdict rules applied at finalization.
//!
//! The rules run in order and the first match wins: a single critical item
//! forces a recheck before the total is even considered, a high total passes,
//! a low total fails, and the middle band fails too.

use super::domain::Verdict;

/// An item scored below this is critical and fails the inspection outright.
pub const CRITICAL_SCORE_FLOOR: u8 = 5;
/// Totals at or above this pass, absent critical items.
pub const SAFE_TOTAL_THRESHOLD: u32 = 80;
/// Totals below this fail regardless of individual scores.
pub const RECHECK_TOTAL_CEILING: u32 = 40;

/// Maps a completed score set and its total to a verdict. Pure.
pub fn evaluate(total: u32, scores: &[u8]) -> Verdict {
    if scores.iter().any(|value| *value < CRITICAL_SCORE_FLOOR) {
        return Verdict::Recheck;
    }

    if total >= SAFE_TOTAL_THRESHOLD {
        return Verdict::Safe;
    }

    if total < RECHECK_TOTAL_CEILING {
        return Verdict::Recheck;
    }

    // Middle band, no critical items: still a recheck.
    Verdict::Recheck
}
