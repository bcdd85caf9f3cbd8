//! Posterior-predictive simulation of the remaining schedule: one scoreline per (fixture, draw)
//! pair, sampled from Poisson goal counts under that draw's parameters. Future games carry no
//! decay penalty. An unusable sample set yields an explicitly empty result — "no forecast
//! available" — never zero goals.

use tinyrand::{Seeded, StdRand};
use tracing::debug;

use crate::data::Fixture;
use crate::linear::Matrix;
use crate::model::SampleSet;
use crate::random;

/// Simulated goals for every (fixture, draw) pair. The draw count is carried explicitly so that
/// an empty fixture list (a valid forecast of nothing) remains distinguishable from an unusable
/// sample set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreSheets {
    home_goals: Matrix<u16>,
    away_goals: Matrix<u16>,
    draws: usize,
}
impl ScoreSheets {
    /// Pairs up per-fixture goal rows; the column count is the draw count.
    pub fn new(home_goals: Matrix<u16>, away_goals: Matrix<u16>) -> Self {
        assert_eq!(home_goals.rows(), away_goals.rows(), "fixture count mismatch");
        assert_eq!(home_goals.cols(), away_goals.cols(), "draw count mismatch");
        let draws = home_goals.cols();
        Self {
            home_goals,
            away_goals,
            draws,
        }
    }

    pub fn empty() -> Self {
        Self::new(Matrix::filled(0, 0, 0), Matrix::filled(0, 0, 0))
    }

    /// True when no usable posterior backed this prediction.
    pub fn is_empty(&self) -> bool {
        self.draws == 0
    }

    pub fn fixtures(&self) -> usize {
        self.home_goals.rows()
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn home_goals(&self, fixture: usize) -> &[u16] {
        self.home_goals.row_slice(fixture)
    }

    pub fn away_goals(&self, fixture: usize) -> &[u16] {
        self.away_goals.row_slice(fixture)
    }
}

/// Scores every remaining fixture once per posterior draw. Each fixture consumes its own derived
/// random substream, so fixture order never couples two games' goal sequences.
pub fn simulate_scorelines(samples: &SampleSet, fixtures: &[Fixture], seed: u64) -> ScoreSheets {
    if samples.is_empty() {
        debug!("no usable sample set; returning an empty prediction");
        return ScoreSheets::empty();
    }
    let draws = samples.len();
    let centered = samples
        .iter()
        .map(|params| params.centered())
        .collect::<Vec<_>>();
    let mut home_goals = Matrix::filled(fixtures.len(), draws, 0);
    let mut away_goals = Matrix::filled(fixtures.len(), draws, 0);
    for (index, fixture) in fixtures.iter().enumerate() {
        let mut rand = StdRand::seed(random::substream(seed, index as u64));
        let home_row = home_goals.row_slice_mut(index);
        let away_row = away_goals.row_slice_mut(index);
        for (draw, params) in centered.iter().enumerate() {
            let (home_rate, away_rate) = params.rates(fixture.home, fixture.away);
            home_row[draw] = random::poisson(home_rate, &mut rand);
            away_row[draw] = random::poisson(away_rate, &mut rand);
        }
    }
    debug!(
        "simulated {} fixtures over {draws} draws",
        fixtures.len()
    );
    ScoreSheets::new(home_goals, away_goals)
}
