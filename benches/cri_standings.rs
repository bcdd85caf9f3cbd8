use criterion::{criterion_group, criterion_main, Criterion};
use tinyrand::{Seeded, StdRand};

use puckcast::data::Fixture;
use puckcast::linear::Matrix;
use puckcast::predict::ScoreSheets;
use puckcast::random;
use puckcast::standings::{simulate_points, SHOOTOUT_PROB};

const FIXTURES: usize = 200;
const DRAWS: usize = 2_000;
const TEAMS: usize = 32;

fn criterion_benchmark(c: &mut Criterion) {
    let mut rand = StdRand::seed(42);
    let mut home_goals = Matrix::filled(FIXTURES, DRAWS, 0);
    let mut away_goals = Matrix::filled(FIXTURES, DRAWS, 0);
    let mut fixtures = Vec::with_capacity(FIXTURES);
    for fixture in 0..FIXTURES {
        fixtures.push(Fixture {
            home: fixture % TEAMS,
            away: (fixture + 7) % TEAMS,
        });
        for draw in 0..DRAWS {
            home_goals[(fixture, draw)] = random::poisson(3.0, &mut rand);
            away_goals[(fixture, draw)] = random::poisson(2.7, &mut rand);
        }
    }
    let sheets = ScoreSheets::new(home_goals, away_goals);
    let accrued = vec![40; TEAMS];

    // sanity check
    let totals = simulate_points(&sheets, &fixtures, &accrued, SHOOTOUT_PROB, 7);
    assert_eq!(TEAMS, totals.rows());
    assert_eq!(DRAWS, totals.cols());

    c.bench_function("cri_standings_grid", |b| {
        b.iter(|| simulate_points(&sheets, &fixtures, &accrued, SHOOTOUT_PROB, 7));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
