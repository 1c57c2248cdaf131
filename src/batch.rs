use anyhow::{Context, Result};
use rayon::prelude::*;
use serde_json::Value;

use crate::features::{TeamFeatures, avg_shots_ht, half_time_goal_pct, resolve_fixture_xg};
use crate::payload::{first_of, team_id};
use crate::rankings::rank_matches;
use crate::scoring::{MatchScore, Policy, round2};

/// Everything the engine needs for one upcoming fixture. All payloads are
/// raw provider records; fetching them is the caller's problem.
#[derive(Debug, Clone, Default)]
pub struct FixtureInput {
    pub fixture_id: String,
    pub home_id: Option<i64>,
    pub away_id: Option<i64>,
    pub home_name: Option<String>,
    pub away_name: Option<String>,
    /// Recent fixture history, one raw record per match.
    pub home_history: Vec<Value>,
    pub away_history: Vec<Value>,
    /// Per-team statistics blocks for this fixture.
    pub fixture_stats: Vec<Value>,
}

/// Unwrap a provider list body: `{"response": [..]}`, `{"data": [..]}` or a
/// bare array. Empty and "null" bodies are empty lists, not errors.
fn parse_record_list(body: &str) -> Result<Vec<Value>> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid record list json")?;
    let list = first_of(&v, &["response", "data"])
        .and_then(|x| x.as_array())
        .cloned()
        .or_else(|| v.as_array().cloned())
        .unwrap_or_default();
    Ok(list)
}

/// Parse a raw team-fixture-history response body into fixture records.
pub fn parse_history_json(body: &str) -> Result<Vec<Value>> {
    parse_record_list(body).context("team history payload")
}

/// Parse a raw fixture-statistics response body into per-team blocks.
pub fn parse_fixture_stats_json(body: &str) -> Result<Vec<Value>> {
    parse_record_list(body).context("fixture statistics payload")
}

/// Header fields of a raw upcoming-fixture record. The id comes from
/// `fixture.id` then `id`, synthesized as `homeId-awayId` when absent; team
/// blocks from `teams.home`/`teams.away` then top-level `home`/`away`.
pub fn parse_fixture_header(raw: &Value) -> FixtureInput {
    let home = raw
        .get("teams")
        .and_then(|t| t.get("home"))
        .or_else(|| raw.get("home"));
    let away = raw
        .get("teams")
        .and_then(|t| t.get("away"))
        .or_else(|| raw.get("away"));
    let home_id = home.and_then(|h| h.get("id")).and_then(team_id);
    let away_id = away.and_then(|a| a.get("id")).and_then(team_id);

    let fixture_id = raw
        .get("fixture")
        .and_then(|f| f.get("id"))
        .or_else(|| raw.get("id"))
        .and_then(|v| match v {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("{}-{}", home_id.unwrap_or(0), away_id.unwrap_or(0)));

    let name_of = |side: Option<&Value>| {
        side.and_then(|t| t.get("name"))
            .and_then(|n| n.as_str())
            .map(str::to_string)
    };

    FixtureInput {
        fixture_id,
        home_id,
        away_id,
        home_name: name_of(home),
        away_name: name_of(away),
        ..Default::default()
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Derive both sides' feature sets for one fixture input. A side with no
/// usable team id keeps zero features.
pub fn extract_features(input: &FixtureInput) -> (TeamFeatures, TeamFeatures) {
    // Sentinel id that no statistics block can carry.
    const NO_TEAM: i64 = i64::MIN;
    let (home_xg, away_xg) = resolve_fixture_xg(
        &input.fixture_stats,
        input.home_id.unwrap_or(NO_TEAM),
        input.away_id.unwrap_or(NO_TEAM),
    );

    let side = |tid: Option<i64>, history: &[Value], xg: f64| {
        let Some(tid) = tid else {
            return TeamFeatures::default();
        };
        TeamFeatures {
            ht_goal_pct: round4(half_time_goal_pct(history, tid)),
            avg_shots_ht: round2(avg_shots_ht(history, tid)),
            xg_ht: round4(xg),
        }
    };

    (
        side(input.home_id, &input.home_history, home_xg),
        side(input.away_id, &input.away_history, away_xg),
    )
}

/// Feature extraction plus policy evaluation for a single fixture.
pub fn evaluate_fixture(input: &FixtureInput, policy: Policy) -> MatchScore {
    let (home, away) = extract_features(input);
    let outcome = policy.evaluate(&home, &away);
    MatchScore {
        fixture_id: input.fixture_id.clone(),
        home_name: input.home_name.clone(),
        away_name: input.away_name.clone(),
        home,
        away,
        value: outcome.value,
        pass: outcome.pass,
        reason: outcome.reason,
        breakdown: outcome.breakdown,
    }
}

/// Score a batch of fixtures under `policy` and return them ranked
/// descending. Fixtures are independent, so the batch is scored in parallel;
/// collection preserves input order before the stable sort.
pub fn evaluate_batch(inputs: &[FixtureInput], policy: Policy) -> Vec<MatchScore> {
    let mut rows: Vec<MatchScore> = inputs
        .par_iter()
        .map(|input| evaluate_fixture(input, policy))
        .collect();
    rank_matches(&mut rows);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_list_tolerates_null_and_empty() {
        assert!(parse_history_json("").unwrap().is_empty());
        assert!(parse_history_json("null").unwrap().is_empty());
        assert!(parse_fixture_stats_json(" null ").unwrap().is_empty());
    }

    #[test]
    fn record_list_unwraps_envelopes() {
        assert_eq!(parse_history_json(r#"{"response": [1, 2]}"#).unwrap().len(), 2);
        assert_eq!(parse_history_json(r#"{"data": [1]}"#).unwrap().len(), 1);
        assert_eq!(parse_history_json("[1, 2, 3]").unwrap().len(), 3);
        assert!(parse_history_json(r#"{"other": 1}"#).unwrap().is_empty());
    }

    #[test]
    fn record_list_rejects_garbage() {
        assert!(parse_history_json("{not json").is_err());
    }

    #[test]
    fn header_reads_nested_and_flat_layouts() {
        let nested = json!({
            "fixture": {"id": 9001},
            "teams": {"home": {"id": 10, "name": "Alfa FC"}, "away": {"id": 20, "name": "Beta SC"}},
        });
        let input = parse_fixture_header(&nested);
        assert_eq!(input.fixture_id, "9001");
        assert_eq!(input.home_id, Some(10));
        assert_eq!(input.away_name.as_deref(), Some("Beta SC"));

        let flat = json!({
            "home": {"id": 1, "name": "Gama"},
            "away": {"id": 2, "name": "Delta"},
        });
        let input = parse_fixture_header(&flat);
        assert_eq!(input.fixture_id, "1-2");
        assert_eq!(input.home_name.as_deref(), Some("Gama"));
    }

    #[test]
    fn fixture_without_ids_scores_zero() {
        let input = FixtureInput {
            fixture_id: "0-0".to_string(),
            ..Default::default()
        };
        let row = evaluate_fixture(&input, Policy::ThresholdFilter);
        assert_eq!(row.value, 0.0);
        assert_eq!(row.pass, Some(false));
    }
}
