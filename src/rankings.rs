use crate::scoring::MatchScore;

/// Order scored fixtures by score/probability, descending. The sort is
/// stable: ties keep their input order, so repeated runs over the same batch
/// reproduce the same listing.
pub fn rank_matches(rows: &mut [MatchScore]) {
    rows.sort_by(|a, b| b.value.total_cmp(&a.value));
}

/// Convenience wrapper that consumes the batch and returns it ranked.
pub fn ranked(mut rows: Vec<MatchScore>) -> Vec<MatchScore> {
    rank_matches(&mut rows);
    rows
}
