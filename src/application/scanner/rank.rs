//! Ranking and notification selection.

use crate::domain::ScoredResult;

/// Keep results scoring at least `min_score` and order them best first.
///
/// Score descending, then confidence, then signal count. The sort is stable,
/// so full ties keep their input order.
#[must_use]
pub fn rank(results: Vec<ScoredResult>, min_score: f64) -> Vec<ScoredResult> {
    let mut qualified: Vec<_> = results
        .into_iter()
        .filter(|r| r.score >= min_score)
        .collect();
    qualified.sort_by(ScoredResult::rank_cmp);
    qualified
}

/// Walk the ranking, skip symbols on cooldown and take up to `limit`.
#[must_use]
pub fn select_for_notification<F>(ranked: &[ScoredResult], limit: usize, on_cooldown: F) -> Vec<ScoredResult>
where
    F: Fn(&str) -> bool,
{
    ranked
        .iter()
        .filter(|r| !on_cooldown(&r.symbol))
        .take(limit)
        .cloned()
        .collect()
}
