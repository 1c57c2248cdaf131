use serde::{Deserialize, Serialize};

use crate::features::TeamFeatures;

const PASS_MAX_PCT: f64 = 0.25;
const PASS_TOTAL_SHOTS: f64 = 2.5;
const PASS_AVG_XG: f64 = 0.2;

const W_HT_PCT: f64 = 0.5;
const W_SHOTS: f64 = 0.25;
const W_XG: f64 = 0.25;

const RANGE_HT_PCT: (f64, f64) = (0.0, 0.6);
const RANGE_SHOTS: (f64, f64) = (0.0, 5.0);
const RANGE_XG: (f64, f64) = (0.0, 2.0);

/// Priors substituted by the probability policy when a caller omits a
/// feature. Non-zero on purpose: absent data is treated as a mild signal.
pub const DEFAULT_HOME: TeamFeatures = TeamFeatures {
    ht_goal_pct: 0.15,
    avg_shots_ht: 0.9,
    xg_ht: 0.25,
};
pub const DEFAULT_AWAY: TeamFeatures = TeamFeatures {
    ht_goal_pct: 0.12,
    avg_shots_ht: 0.8,
    xg_ht: 0.18,
};

/// Scoring strategy applied to a pair of team feature sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Composite score plus pass/fail against minimum-signal thresholds.
    #[default]
    ThresholdFilter,
    /// Normalized weighted sum mapped into [0,1] by a saturating transform.
    Probability,
}

/// Caller-supplied feature overrides for the probability policy. `None`
/// fields take the per-side priors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RawFeatures {
    pub ht_goal_pct: Option<f64>,
    pub avg_shots_ht: Option<f64>,
    pub xg_ht: Option<f64>,
}

impl RawFeatures {
    fn or_defaults(&self, d: &TeamFeatures) -> TeamFeatures {
        TeamFeatures {
            ht_goal_pct: self.ht_goal_pct.unwrap_or(d.ht_goal_pct),
            avg_shots_ht: self.avg_shots_ht.unwrap_or(d.avg_shots_ht),
            xg_ht: self.xg_ht.unwrap_or(d.xg_ht),
        }
    }
}

impl From<TeamFeatures> for RawFeatures {
    fn from(f: TeamFeatures) -> Self {
        Self {
            ht_goal_pct: Some(f.ht_goal_pct),
            avg_shots_ht: Some(f.avg_shots_ht),
            xg_ht: Some(f.xg_ht),
        }
    }
}

/// Intermediate quantities behind a threshold-filter verdict, kept on the
/// result for transparency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterBreakdown {
    pub max_pct: f64,
    pub total_shots: f64,
    pub avg_xg: f64,
    pub home_pct: f64,
    pub away_pct: f64,
    pub home_shots: f64,
    pub away_shots: f64,
    pub home_xg: f64,
    pub away_xg: f64,
}

/// Threshold-filter outcome for one fixture pairing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterVerdict {
    pub score: f64,
    pub pass: bool,
    pub reason: String,
    pub breakdown: FilterBreakdown,
}

/// Probability-policy outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub probability: f64,
    pub reason: String,
}

/// One scored fixture, ready for ranking and serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchScore {
    pub fixture_id: String,
    pub home_name: Option<String>,
    pub away_name: Option<String>,
    pub home: TeamFeatures,
    pub away: TeamFeatures,
    /// Composite score (threshold policy) or probability (probability
    /// policy). The two scales are not directly comparable.
    pub value: f64,
    pub pass: Option<bool>,
    pub reason: String,
    pub breakdown: Option<FilterBreakdown>,
}

impl Policy {
    /// Single evaluation contract shared by both strategies.
    pub fn evaluate(self, home: &TeamFeatures, away: &TeamFeatures) -> PolicyOutcome {
        match self {
            Policy::ThresholdFilter => {
                let v = filter_score(home, away);
                PolicyOutcome {
                    value: v.score,
                    pass: Some(v.pass),
                    reason: v.reason,
                    breakdown: Some(v.breakdown),
                }
            }
            Policy::Probability => {
                let est = probability_score(&RawFeatures::from(*home), &RawFeatures::from(*away));
                PolicyOutcome {
                    value: est.probability,
                    pass: None,
                    reason: est.reason,
                    breakdown: None,
                }
            }
        }
    }
}

/// What a policy produced for one pairing, before it is attached to the
/// fixture identity.
#[derive(Debug, Clone)]
pub struct PolicyOutcome {
    pub value: f64,
    pub pass: Option<bool>,
    pub reason: String,
    pub breakdown: Option<FilterBreakdown>,
}

pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Threshold-filter policy over two sides' features.
///
/// Each score term is rounded to two decimals before summing; downstream
/// consumers depend on that exact scale, so keep the term order.
pub fn filter_score(home: &TeamFeatures, away: &TeamFeatures) -> FilterVerdict {
    let max_pct = home.ht_goal_pct.max(away.ht_goal_pct);
    let total_shots = home.avg_shots_ht + away.avg_shots_ht;
    // Divisor drops to 1 when both sides report zero xG, keeping the
    // average at 0 instead of faulting.
    let divisor = if home.xg_ht != 0.0 || away.xg_ht != 0.0 {
        2.0
    } else {
        1.0
    };
    let avg_xg = (home.xg_ht + away.xg_ht) / divisor;

    let score = round2(max_pct * 100.0) + round2(avg_xg * 10.0) + round2(total_shots);
    let pass =
        max_pct >= PASS_MAX_PCT || (total_shots >= PASS_TOTAL_SHOTS && avg_xg >= PASS_AVG_XG);
    let reason = if pass {
        "meets criteria (ht% / xG / shots)"
    } else {
        "does not meet criteria"
    }
    .to_string();

    FilterVerdict {
        score,
        pass,
        reason,
        breakdown: FilterBreakdown {
            max_pct,
            total_shots,
            avg_xg,
            home_pct: home.ht_goal_pct,
            away_pct: away.ht_goal_pct,
            home_shots: home.avg_shots_ht,
            away_shots: away.avg_shots_ht,
            home_xg: home.xg_ht,
            away_xg: away.xg_ht,
        },
    }
}

/// Min-max scaling clamped to [0,1]. Non-finite input and zero-width ranges
/// collapse to 0.0 rather than propagating NaN.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let v = if value.is_finite() { value } else { 0.0 };
    let range = max - min;
    if range == 0.0 {
        return 0.0;
    }
    ((v - min) / range).clamp(0.0, 1.0)
}

fn weighted_side(f: &TeamFeatures) -> f64 {
    W_HT_PCT * normalize(f.ht_goal_pct, RANGE_HT_PCT.0, RANGE_HT_PCT.1)
        + W_SHOTS * normalize(f.avg_shots_ht, RANGE_SHOTS.0, RANGE_SHOTS.1)
        + W_XG * normalize(f.xg_ht, RANGE_XG.0, RANGE_XG.1)
}

/// Probability policy: normalize both sides against fixed reference ranges,
/// weight, add the two sides, and squash with `1 - e^-x` so any combined
/// score lands in [0,1].
pub fn probability_score(home: &RawFeatures, away: &RawFeatures) -> ProbabilityEstimate {
    let h = home.or_defaults(&DEFAULT_HOME);
    let a = away.or_defaults(&DEFAULT_AWAY);

    let combined = weighted_side(&h) + weighted_side(&a);
    let probability = (1.0 - (-combined).exp()).clamp(0.0, 1.0);
    let reason = format!(
        "home ht% {:.2} shots {:.1} xG {:.2}; away ht% {:.2} shots {:.1} xG {:.2}",
        h.ht_goal_pct, h.avg_shots_ht, h.xg_ht, a.ht_goal_pct, a.avg_shots_ht, a.xg_ht
    );

    ProbabilityEstimate {
        probability,
        reason,
    }
}
