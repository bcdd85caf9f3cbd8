//! Settles simulated scorelines under league rules and accumulates per-team point
//! distributions. A regulation winner takes 2 points and the loser none; a drawn scoreline is
//! extended — shootout with fixed probability, overtime otherwise — and a fair coin picks the
//! winner, who takes 2 points while the loser keeps 1. The fixtures × draws grid is settled in
//! parallel, with each fixture on its own random substream and the per-team totals merged
//! through an order-independent integer reduction.

use rayon::prelude::*;
use tinyrand::{Rand, Seeded, StdRand};

use crate::data::{Fixture, Side};
use crate::linear::Matrix;
use crate::predict::ScoreSheets;
use crate::random;

/// League-wide fraction of extended games that go to a shootout rather than overtime.
pub const SHOOTOUT_PROB: f64 = 0.344;

/// How a game ended and who won it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ruling {
    Regulation(Side),
    Overtime(Side),
    Shootout(Side),
}
impl Ruling {
    pub fn winner(&self) -> Side {
        match self {
            Ruling::Regulation(side) | Ruling::Overtime(side) | Ruling::Shootout(side) => *side,
        }
    }

    /// (home, away) points. Only a regulation loss scores zero.
    pub fn points(&self) -> (u8, u8) {
        match self {
            Ruling::Regulation(Side::Home) => (2, 0),
            Ruling::Regulation(Side::Away) => (0, 2),
            Ruling::Overtime(Side::Home) | Ruling::Shootout(Side::Home) => (2, 1),
            Ruling::Overtime(Side::Away) | Ruling::Shootout(Side::Away) => (1, 2),
        }
    }
}

/// Settles one simulated scoreline, consuming tie-break randomness only when the scoreline is
/// drawn.
pub fn settle(
    home_goals: u16,
    away_goals: u16,
    shootout_prob: f64,
    rand: &mut impl Rand,
) -> Ruling {
    if home_goals > away_goals {
        return Ruling::Regulation(Side::Home);
    }
    if away_goals > home_goals {
        return Ruling::Regulation(Side::Away);
    }
    let shootout = random::uniform(rand) < shootout_prob;
    let winner = if random::uniform(rand) < 0.5 {
        Side::Home
    } else {
        Side::Away
    };
    if shootout {
        Ruling::Shootout(winner)
    } else {
        Ruling::Overtime(winner)
    }
}

/// Full per-team point distributions: the settled fixtures × draws grid summed per team per
/// draw, plus each team's already-banked points. Returns a teams × draws matrix; empty sheets
/// (no usable posterior) produce a teams × 0 matrix — no forecast, not zero points.
pub fn simulate_points(
    sheets: &ScoreSheets,
    fixtures: &[Fixture],
    accrued: &[u32],
    shootout_prob: f64,
    seed: u64,
) -> Matrix<u32> {
    assert_eq!(
        fixtures.len(),
        sheets.fixtures(),
        "fixture list and score sheets disagree"
    );
    let teams = accrued.len();
    let draws = sheets.draws();
    if sheets.is_empty() {
        return Matrix::filled(teams, 0, 0);
    }

    let mut totals = fixtures
        .par_iter()
        .enumerate()
        .fold(
            || Matrix::filled(teams, draws, 0u32),
            |mut grid, (index, fixture)| {
                let mut rand = StdRand::seed(random::substream(seed, index as u64));
                let home_goals = sheets.home_goals(index);
                let away_goals = sheets.away_goals(index);
                for draw in 0..draws {
                    let (home_points, away_points) =
                        settle(home_goals[draw], away_goals[draw], shootout_prob, &mut rand)
                            .points();
                    grid[(fixture.home, draw)] += home_points as u32;
                    grid[(fixture.away, draw)] += away_points as u32;
                }
                grid
            },
        )
        .reduce(
            || Matrix::filled(teams, draws, 0u32),
            |mut left, right| {
                left += &right;
                left
            },
        );

    for team in 0..teams {
        let banked = accrued[team];
        for points in totals.row_slice_mut(team) {
            *points += banked;
        }
    }
    totals
}
