//! Posterior inference behind a narrow capability boundary: any gradient-based sampler that can
//! take a [`Target`] and return the requested number of draws conforms. The shipped
//! implementation is a Metropolis-adjusted Langevin walker with step-size adaptation during
//! warmup. Draws are retained in full and a fixed seed reproduces them bit for bit; a run that
//! cannot produce the requested draws fails loudly rather than truncating.

use std::time::Instant;

use thiserror::Error;
use tinyrand::{Seeded, StdRand};
use tracing::debug;

use crate::model::ValidationError;
use crate::random;

/// An unconstrained log-density with gradient, as seen by a sampler.
pub trait Target {
    fn dim(&self) -> usize;
    fn log_density(&self, theta: &[f64]) -> f64;
    fn gradient(&self, theta: &[f64], grad: &mut [f64]);
    fn initial(&self) -> Vec<f64>;
}

pub trait Sampler {
    fn infer(&self, target: &impl Target) -> Result<Chain, InferenceFailure>;
}

#[derive(Clone, Debug)]
pub struct SamplerConfig {
    pub warmup: usize,
    pub draws: usize,
    pub seed: u64,
    pub initial_step: f64,
}
impl SamplerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.draws == 0 {
            return Err(anyhow::anyhow!("draw count must be positive").into());
        }
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(anyhow::anyhow!("initial step must be positive").into());
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            warmup: 1_000,
            draws: 2_000,
            seed: 0,
            initial_step: 0.02,
        }
    }
}

/// The retained posterior positions plus sampling-phase diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    pub positions: Vec<Vec<f64>>,
    pub accepted: u64,
    pub step: f64,
}
impl Chain {
    pub fn acceptance_rate(&self) -> f64 {
        self.accepted as f64 / self.positions.len() as f64
    }
}

#[derive(Debug, Error)]
pub enum InferenceFailure {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("log-density or gradient is not usable at the initial point")]
    UnusableStart,

    #[error("non-finite log-density or gradient at iteration {iteration}")]
    NonFinite { iteration: usize },

    #[error("produced {produced} of {requested} requested draws")]
    Shortfall { produced: usize, requested: usize },
}

// MALA's optimal acceptance rate; the warmup phase steers towards it.
const TARGET_ACCEPTANCE: f64 = 0.574;
const ADAPT_RATE: f64 = 0.05;
const STEP_BOUNDS: (f64, f64) = (1e-5, 1.0);

/// Metropolis-adjusted Langevin sampler.
pub struct Langevin {
    config: SamplerConfig,
}
impl Langevin {
    pub fn new(config: SamplerConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }
}

impl Sampler for Langevin {
    fn infer(&self, target: &impl Target) -> Result<Chain, InferenceFailure> {
        let start = Instant::now();
        let SamplerConfig {
            warmup,
            draws,
            seed,
            initial_step,
        } = self.config.clone();
        let dim = target.dim();
        let mut rand = StdRand::seed(seed);

        let mut position = target.initial();
        let mut lp = target.log_density(&position);
        let mut grad = vec![0.0; dim];
        target.gradient(&position, &mut grad);
        if !lp.is_finite() || !all_finite(&grad) {
            return Err(InferenceFailure::UnusableStart);
        }

        let mut step = initial_step;
        let mut proposal = vec![0.0; dim];
        let mut proposal_grad = vec![0.0; dim];
        let mut positions = Vec::with_capacity(draws);
        let mut accepted = 0;
        for iteration in 0..warmup + draws {
            let half = 0.5 * step * step;
            for index in 0..dim {
                proposal[index] = position[index]
                    + half * grad[index]
                    + step * random::standard_normal(&mut rand);
            }
            let proposal_lp = target.log_density(&proposal);
            if proposal_lp.is_nan() {
                return Err(InferenceFailure::NonFinite { iteration });
            }

            let mut acceptance = 0.0;
            // a -inf proposal is rejected outright; only NaN is a failure
            if proposal_lp > f64::NEG_INFINITY {
                target.gradient(&proposal, &mut proposal_grad);
                if !all_finite(&proposal_grad) {
                    return Err(InferenceFailure::NonFinite { iteration });
                }
                let (mut forward, mut reverse) = (0.0, 0.0);
                for index in 0..dim {
                    let forward_drift = proposal[index] - position[index] - half * grad[index];
                    let reverse_drift =
                        position[index] - proposal[index] - half * proposal_grad[index];
                    forward += forward_drift * forward_drift;
                    reverse += reverse_drift * reverse_drift;
                }
                let log_alpha = proposal_lp - lp + (forward - reverse) / (2.0 * step * step);
                acceptance = log_alpha.exp().min(1.0);
                if random::uniform(&mut rand) < acceptance {
                    std::mem::swap(&mut position, &mut proposal);
                    std::mem::swap(&mut grad, &mut proposal_grad);
                    lp = proposal_lp;
                    if iteration >= warmup {
                        accepted += 1;
                    }
                }
            }

            if iteration < warmup {
                step = (step * (ADAPT_RATE * (acceptance - TARGET_ACCEPTANCE)).exp())
                    .clamp(STEP_BOUNDS.0, STEP_BOUNDS.1);
            } else {
                positions.push(position.clone());
            }
        }

        if positions.len() != draws {
            return Err(InferenceFailure::Shortfall {
                produced: positions.len(),
                requested: draws,
            });
        }
        let chain = Chain {
            positions,
            accepted,
            step,
        };
        debug!(
            "sampled {draws} draws over {dim} dimensions in {:?}, acceptance {:.3}, step {step:.5}",
            start.elapsed(),
            chain.acceptance_rate()
        );
        Ok(chain)
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

#[cfg(test)]
mod tests;
