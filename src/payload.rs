use serde_json::Value;

/// Return the first present, non-null value among `keys`, in order.
///
/// Provider records spell the same concept several ways ("score" vs "goals",
/// "halftime" vs "ht", "type" vs "name"), so every lookup goes through an
/// explicit candidate list instead of ad-hoc probing at each call site.
pub fn first_of<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    for key in keys {
        match v.get(*key) {
            Some(found) if !found.is_null() => return Some(found),
            _ => {}
        }
    }
    None
}

/// Numeric statistic value. Only JSON numbers count; nulls, strings and
/// everything else mean "metric not present".
pub fn num_value(v: &Value) -> Option<f64> {
    v.as_f64()
}

/// Team ids arrive as numbers or numeric strings depending on the feed.
pub fn team_id(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Owning team id of a per-team statistics block
/// (`{"team": {"id": ..}, "statistics": [..]}`).
pub fn block_team_id(block: &Value) -> Option<i64> {
    team_id(block.get("team")?.get("id")?)
}

/// Metric list of a per-team statistics block, if it carries one.
pub fn block_metrics(block: &Value) -> Option<&Vec<Value>> {
    block.get("statistics").and_then(|s| s.as_array())
}

/// Free-text metric label, trying "type" then "name", lowercased for
/// substring matching.
pub fn metric_label(entry: &Value) -> Option<String> {
    let raw = first_of(entry, &["type", "name"])?.as_str()?;
    Some(raw.to_ascii_lowercase())
}
