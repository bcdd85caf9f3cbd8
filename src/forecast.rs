//! End-to-end pipeline: screen the hand-off, fit the rating model, summarise ratings, simulate
//! the remaining schedule and accumulate point distributions. Stages run strictly in order; an
//! inference failure withholds the entire forecast rather than emitting partial output.

use std::time::Instant;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info};

use crate::codec;
use crate::data::{self, Fixture, GameRecord, TeamRegistry};
use crate::model::{RatingModel, SampleSet, ValidationError, DEFAULT_DECAY};
use crate::predict;
use crate::random;
use crate::sampler::{InferenceFailure, Langevin, Sampler, SamplerConfig};
use crate::standings::{self, SHOOTOUT_PROB};
use crate::summary::{self, TeamRating};

// Stage tags for deriving independent random substreams from the one run seed.
const SCORELINE_STREAM: u64 = 1;
const TIE_BREAK_STREAM: u64 = 2;

#[derive(Clone, Debug)]
pub struct Config {
    /// Season whose completed games seed the banked point totals.
    pub season: u16,
    pub decay: f64,
    pub shootout_prob: f64,
    pub warmup: usize,
    pub draws: usize,
    pub seed: u64,
}
impl Config {
    pub fn new(season: u16) -> Self {
        let sampler_defaults = SamplerConfig::default();
        Self {
            season,
            decay: DEFAULT_DECAY,
            shootout_prob: SHOOTOUT_PROB,
            warmup: sampler_defaults.warmup,
            draws: sampler_defaults.draws,
            seed: sampler_defaults.seed,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.decay.is_finite() && self.decay >= 0.0) {
            return Err(anyhow::anyhow!("decay constant ({}) must be non-negative", self.decay).into());
        }
        if !(0.0..=1.0).contains(&self.shootout_prob) {
            return Err(anyhow::anyhow!(
                "shootout probability ({}) outside of [0, 1]",
                self.shootout_prob
            )
            .into());
        }
        if self.draws == 0 {
            return Err(anyhow::anyhow!("draw count must be positive").into());
        }
        Ok(())
    }
}

/// The final artifacts: one ratings row and one point-projection row per team.
#[derive(Clone, Debug)]
pub struct Forecast {
    pub ratings: Vec<TeamRating>,
    pub projections: Vec<PointProjection>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointProjection {
    pub team: String,
    pub points: Vec<u32>,
    pub as_of: NaiveDate,
}
impl PointProjection {
    /// The bracketed-list form the persistence side stores verbatim.
    pub fn points_literal(&self) -> String {
        codec::format_points(&self.points)
    }
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("no forecast: {0}")]
    Inference(#[from] InferenceFailure),
}

pub fn run(
    history: &[GameRecord],
    fixtures: &[Fixture],
    registry: &TeamRegistry,
    as_of: NaiveDate,
    config: &Config,
) -> Result<Forecast, ForecastError> {
    config.validate()?;
    let start = Instant::now();

    let records = data::screen_records(history, registry);
    let remaining = data::screen_fixtures(fixtures, registry);
    debug!(
        "screened to {} of {} records and {} of {} fixtures",
        records.len(),
        history.len(),
        remaining.len(),
        fixtures.len()
    );

    let model = RatingModel::from_history(&records, registry.len(), config.decay);
    let sampler = Langevin::new(SamplerConfig {
        warmup: config.warmup,
        draws: config.draws,
        seed: config.seed,
        ..SamplerConfig::default()
    })?;
    let chain = sampler.infer(&model)?;
    let samples = SampleSet::new(
        chain
            .positions
            .iter()
            .map(|theta| model.param_set(theta))
            .collect(),
    );

    let ratings = summary::summarise(&samples, registry, as_of);
    let sheets = predict::simulate_scorelines(
        &samples,
        &remaining,
        random::substream(config.seed, SCORELINE_STREAM),
    );
    let accrued = data::accrued_points(&records, config.season, registry.len());
    let totals = standings::simulate_points(
        &sheets,
        &remaining,
        &accrued,
        config.shootout_prob,
        random::substream(config.seed, TIE_BREAK_STREAM),
    );
    let projections = (0..registry.len())
        .map(|team| PointProjection {
            team: registry.name_at(team).unwrap().to_string(),
            points: totals.row_slice(team).to_vec(),
            as_of,
        })
        .collect();

    info!(
        "forecast of {} teams over {} draws complete in {:?}",
        registry.len(),
        config.draws,
        start.elapsed()
    );
    Ok(Forecast {
        ratings,
        projections,
    })
}

#[cfg(test)]
mod tests;
