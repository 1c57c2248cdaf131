use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::{block_metrics, block_team_id, first_of, metric_label, num_value, team_id};

/// Derived first-half signal set for one team.
///
/// Recomputed fresh from the supplied fixture lists on every call; nothing
/// here is cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamFeatures {
    /// Fraction of recent matches with at least one goal before half-time.
    pub ht_goal_pct: f64,
    /// Mean estimated first-half shots (half the full-match count).
    pub avg_shots_ht: f64,
    /// Expected-goals proxy for the first half.
    pub xg_ht: f64,
}

/// Fraction of `fixtures` in which team `tid` scored before half-time.
///
/// An empty history yields exactly 0.0.
pub fn half_time_goal_pct(fixtures: &[Value], tid: i64) -> f64 {
    if fixtures.is_empty() {
        return 0.0;
    }
    let scored = fixtures
        .iter()
        .filter(|f| half_time_goals_for(f, tid) > 0.0)
        .count();
    (scored as f64 / fixtures.len() as f64).clamp(0.0, 1.0)
}

/// Half-time goal count for `tid` in one historical fixture record.
///
/// The score object is looked up under "score" then "goals", falling back to
/// the record itself; the half-time breakdown under "halftime" then "ht".
/// When the home-team id is missing or does not match, the team is read from
/// the away side. Missing counts are zero.
fn half_time_goals_for(fixture: &Value, tid: i64) -> f64 {
    let score = first_of(fixture, &["score", "goals"]).unwrap_or(fixture);
    let Some(halftime) = first_of(score, &["halftime", "ht"]) else {
        return 0.0;
    };
    let is_home = fixture
        .get("teams")
        .and_then(|t| t.get("home"))
        .and_then(|h| h.get("id"))
        .and_then(team_id)
        .is_some_and(|home_id| home_id == tid);
    let side = if is_home { "home" } else { "away" };
    halftime.get(side).and_then(num_value).unwrap_or(0.0)
}

/// Mean first-half shot proxy across the fixtures that embed statistics for
/// team `tid`. Fixtures without a usable shot metric are skipped entirely and
/// do not count toward the average; if none contribute the result is 0.0.
pub fn avg_shots_ht(fixtures: &[Value], tid: i64) -> f64 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for fixture in fixtures {
        let Some(blocks) = fixture.get("statistics").and_then(|s| s.as_array()) else {
            continue;
        };
        let Some(block) = blocks.iter().find(|b| block_team_id(b) == Some(tid)) else {
            continue;
        };
        let Some(metrics) = block_metrics(block) else {
            continue;
        };
        if let Some(shots) = first_metric(metrics, "shot") {
            sum += shots / 2.0;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        (sum / f64::from(count)).max(0.0)
    }
}

/// First metric whose label contains `needle` (case-insensitive) and carries
/// a numeric value. List order is the precedence rule: later qualifying
/// metrics in the same list are ignored.
pub fn first_metric(metrics: &[Value], needle: &str) -> Option<f64> {
    metrics.iter().find_map(|m| {
        let label = metric_label(m)?;
        if !label.contains(needle) {
            return None;
        }
        m.get("value").and_then(num_value)
    })
}

/// Per-fixture xG for both sides from a fixture-statistics payload (one
/// per-team block per side).
///
/// Pass one assigns any explicit "xg" metric to its side. Pass two fills only
/// a side still at zero with half its shot count, so a missing xG on one side
/// never blocks a real xG on the other. Sides not covered by any block stay
/// at 0.0.
pub fn resolve_fixture_xg(blocks: &[Value], home_id: i64, away_id: i64) -> (f64, f64) {
    let mut home_xg = 0.0_f64;
    let mut away_xg = 0.0_f64;

    for block in blocks {
        let Some(tid) = block_team_id(block) else {
            continue;
        };
        let Some(metrics) = block_metrics(block) else {
            continue;
        };
        if metrics.is_empty() {
            continue;
        }
        if let Some(xg) = first_metric(metrics, "xg") {
            if tid == home_id {
                home_xg = xg;
            }
            if tid == away_id {
                away_xg = xg;
            }
        }
    }

    for block in blocks {
        let Some(tid) = block_team_id(block) else {
            continue;
        };
        let Some(metrics) = block_metrics(block) else {
            continue;
        };
        if let Some(shots) = first_metric(metrics, "shot") {
            if tid == home_id && home_xg == 0.0 {
                home_xg = shots / 2.0;
            }
            if tid == away_id && away_xg == 0.0 {
                away_xg = shots / 2.0;
            }
        }
    }

    (home_xg.max(0.0), away_xg.max(0.0))
}
