use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use filtro_ht::batch::{
    FixtureInput, evaluate_batch, parse_fixture_header, parse_fixture_stats_json,
    parse_history_json,
};
use filtro_ht::features::{TeamFeatures, half_time_goal_pct};
use filtro_ht::scoring::{Policy, RawFeatures, filter_score, probability_score};

fn sample_batch(copies: usize) -> Vec<FixtureInput> {
    let upcoming = parse_history_json(UPCOMING_JSON).expect("valid fixture json");
    let home_history = parse_history_json(HOME_HISTORY_JSON).expect("valid fixture json");
    let away_history = parse_history_json(AWAY_HISTORY_JSON).expect("valid fixture json");
    let fixture_stats = parse_fixture_stats_json(FIXTURE_STATS_JSON).expect("valid fixture json");

    let mut base = parse_fixture_header(&upcoming[0]);
    base.home_history = home_history;
    base.away_history = away_history;
    base.fixture_stats = fixture_stats;

    (0..copies)
        .map(|idx| {
            let mut input = base.clone();
            input.fixture_id = format!("bench-{idx}");
            input
        })
        .collect()
}

fn bench_history_parse(c: &mut Criterion) {
    c.bench_function("history_parse", |b| {
        b.iter(|| {
            let records = parse_history_json(black_box(HOME_HISTORY_JSON)).unwrap();
            black_box(records.len());
        })
    });
}

fn bench_ht_goal_pct(c: &mut Criterion) {
    let history = parse_history_json(HOME_HISTORY_JSON).expect("valid fixture json");
    c.bench_function("ht_goal_pct", |b| {
        b.iter(|| black_box(half_time_goal_pct(black_box(&history), 10)))
    });
}

fn bench_filter_score(c: &mut Criterion) {
    let home = TeamFeatures {
        ht_goal_pct: 0.3,
        avg_shots_ht: 1.5,
        xg_ht: 0.1,
    };
    let away = TeamFeatures {
        ht_goal_pct: 0.1,
        avg_shots_ht: 1.0,
        xg_ht: 0.05,
    };
    c.bench_function("filter_score", |b| {
        b.iter(|| black_box(filter_score(black_box(&home), black_box(&away)).score))
    });
}

fn bench_probability_score(c: &mut Criterion) {
    let defaults = RawFeatures::default();
    c.bench_function("probability_score", |b| {
        b.iter(|| {
            let est = probability_score(black_box(&defaults), black_box(&defaults));
            black_box(est.probability);
        })
    });
}

fn bench_batch_evaluate(c: &mut Criterion) {
    let batch = sample_batch(64);
    c.bench_function("batch_evaluate_64", |b| {
        b.iter(|| {
            let rows = evaluate_batch(black_box(&batch), Policy::ThresholdFilter);
            black_box(rows.len());
        })
    });
}

criterion_group!(
    perf,
    bench_history_parse,
    bench_ht_goal_pct,
    bench_filter_score,
    bench_probability_score,
    bench_batch_evaluate
);
criterion_main!(perf);

static UPCOMING_JSON: &str = include_str!("../tests/fixtures/upcoming_fixtures.json");
static HOME_HISTORY_JSON: &str = include_str!("../tests/fixtures/team_history_home.json");
static AWAY_HISTORY_JSON: &str = include_str!("../tests/fixtures/team_history_away.json");
static FIXTURE_STATS_JSON: &str = include_str!("../tests/fixtures/fixture_stats.json");
