//! The strength-rating model: a hierarchical Poisson/Bradley-Terry generative process over
//! completed games, exposed to the sampler as an unconstrained log-density with an analytic
//! gradient. Per-team attack/defence deviations are partially pooled through shared scale
//! hyperparameters and centered to sum to zero before entering the likelihood; each game's
//! contribution is weighted by a time-decay factor so recent results dominate the fit.

use std::error::Error;

use thiserror::Error;

use crate::data::GameRecord;
use crate::sampler::Target;

pub const DEFAULT_DECAY: f64 = 0.005;

// Home effect and intercept share a weakly informative prior near the scoring baseline.
const EFFECT_PRIOR_MEAN: f64 = 1.0;
const EFFECT_PRIOR_SCALE: f64 = 0.1;

// Gamma prior on the attack/defence deviation scales.
const SCALE_PRIOR_SHAPE: f64 = 0.1;
const SCALE_PRIOR_RATE: f64 = 0.1;

/// Influence multiplier of a game played `days_since` days before the most recent result.
#[inline]
pub fn decay_weight(decay: f64, days_since: i64) -> f64 {
    (-decay * days_since as f64).exp()
}

struct WeightedGame {
    home: usize,
    away: usize,
    home_goals: f64,
    away_goals: f64,
    weight: f64,
}

/// One complete draw of the latent parameters. The deviation vectors are stored as sampled
/// (uncentered); [`ParamSet::centered`] derives the identified form.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSet {
    pub home: f64,
    pub intercept: f64,
    pub attack: Vec<f64>,
    pub defense: Vec<f64>,
    pub tau_attack: f64,
    pub tau_defense: f64,
}
impl ParamSet {
    pub fn centered(&self) -> CenteredParams {
        CenteredParams {
            home: self.home,
            intercept: self.intercept,
            attack: center(&self.attack),
            defense: center(&self.defense),
        }
    }
}

/// A [`ParamSet`] with the zero-sum constraint applied, ready for rate evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct CenteredParams {
    pub home: f64,
    pub intercept: f64,
    pub attack: Vec<f64>,
    pub defense: Vec<f64>,
}
impl CenteredParams {
    /// Expected (home, away) goal rates for a pairing.
    #[inline]
    pub fn rates(&self, home: usize, away: usize) -> (f64, f64) {
        let home_rate =
            (self.intercept + self.home + self.attack[home] + self.defense[away]).exp();
        let away_rate = (self.intercept + self.attack[away] + self.defense[home]).exp();
        (home_rate, away_rate)
    }
}

fn center(values: &[f64]) -> Vec<f64> {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|value| value - mean).collect()
}

/// An ordered set of posterior draws, owned by the inference run that produced it.
#[derive(Clone, Debug)]
pub struct SampleSet {
    samples: Vec<ParamSet>,
}
impl SampleSet {
    pub fn new(samples: Vec<ParamSet>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParamSet> {
        self.samples.iter()
    }
}

/// Flat parameter layout: home, intercept, attack deviations, defence deviations, then the two
/// deviation scales on the log scale (keeping the whole vector unconstrained).
pub struct RatingModel {
    teams: usize,
    games: Vec<WeightedGame>,
}
impl RatingModel {
    /// Builds the training set from screened records. Decay weights are taken relative to the
    /// most recent result in the collection.
    pub fn from_history(records: &[GameRecord], teams: usize, decay: f64) -> Self {
        assert!(teams > 0, "team count must be positive");
        assert!(decay >= 0.0 && decay.is_finite(), "invalid decay {decay}");
        let latest = records.iter().map(|record| record.date).max();
        let games = records
            .iter()
            .map(|record| {
                let days_since = (latest.unwrap() - record.date).num_days();
                WeightedGame {
                    home: record.home,
                    away: record.away,
                    home_goals: record.home_goals as f64,
                    away_goals: record.away_goals as f64,
                    weight: decay_weight(decay, days_since),
                }
            })
            .collect();
        Self { teams, games }
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn games(&self) -> usize {
        self.games.len()
    }

    pub fn dim(&self) -> usize {
        2 * self.teams + 4
    }

    fn attack_offset(&self) -> usize {
        2
    }

    fn defense_offset(&self) -> usize {
        2 + self.teams
    }

    fn scale_offset(&self) -> usize {
        2 + 2 * self.teams
    }

    pub fn initial(&self) -> Vec<f64> {
        let mut theta = vec![0.0; self.dim()];
        theta[0] = EFFECT_PRIOR_MEAN;
        theta[1] = EFFECT_PRIOR_MEAN;
        theta
    }

    pub fn param_set(&self, theta: &[f64]) -> ParamSet {
        assert_eq!(self.dim(), theta.len(), "parameter length mismatch");
        let scales = self.scale_offset();
        ParamSet {
            home: theta[0],
            intercept: theta[1],
            attack: theta[self.attack_offset()..self.defense_offset()].to_vec(),
            defense: theta[self.defense_offset()..scales].to_vec(),
            tau_attack: theta[scales].exp(),
            tau_defense: theta[scales + 1].exp(),
        }
    }

    /// Joint log-density of priors and decay-weighted likelihood, up to an additive constant.
    pub fn log_density(&self, theta: &[f64]) -> f64 {
        assert_eq!(self.dim(), theta.len(), "parameter length mismatch");
        let (home, intercept) = (theta[0], theta[1]);
        let attack = &theta[self.attack_offset()..self.defense_offset()];
        let defense = &theta[self.defense_offset()..self.scale_offset()];
        let (log_tau_attack, log_tau_defense) =
            (theta[self.scale_offset()], theta[self.scale_offset() + 1]);
        let (tau_attack, tau_defense) = (log_tau_attack.exp(), log_tau_defense.exp());

        let mut lp = normal_lp(home) + normal_lp(intercept);
        // scale hyperpriors, log-transformed with the Jacobian folded in
        lp += SCALE_PRIOR_SHAPE * log_tau_attack - SCALE_PRIOR_RATE * tau_attack;
        lp += SCALE_PRIOR_SHAPE * log_tau_defense - SCALE_PRIOR_RATE * tau_defense;
        lp += deviation_lp(attack, tau_attack);
        lp += deviation_lp(defense, tau_defense);

        let attack_mean = attack.iter().sum::<f64>() / self.teams as f64;
        let defense_mean = defense.iter().sum::<f64>() / self.teams as f64;
        for game in &self.games {
            let eta_home = intercept
                + home
                + (attack[game.home] - attack_mean)
                + (defense[game.away] - defense_mean);
            let eta_away =
                intercept + (attack[game.away] - attack_mean) + (defense[game.home] - defense_mean);
            lp += game.weight
                * (game.home_goals * eta_home - eta_home.exp() + game.away_goals * eta_away
                    - eta_away.exp());
        }
        lp
    }

    /// Analytic gradient of [`Self::log_density`]; centering enters through the mean-subtracted
    /// per-team residuals.
    pub fn gradient(&self, theta: &[f64], grad: &mut [f64]) {
        assert_eq!(self.dim(), theta.len(), "parameter length mismatch");
        assert_eq!(self.dim(), grad.len(), "gradient length mismatch");
        let teams = self.teams as f64;
        let (home, intercept) = (theta[0], theta[1]);
        let attack = &theta[self.attack_offset()..self.defense_offset()];
        let defense = &theta[self.defense_offset()..self.scale_offset()];
        let (log_tau_attack, log_tau_defense) =
            (theta[self.scale_offset()], theta[self.scale_offset() + 1]);
        let (tau_attack, tau_defense) = (log_tau_attack.exp(), log_tau_defense.exp());

        let attack_mean = attack.iter().sum::<f64>() / teams;
        let defense_mean = defense.iter().sum::<f64>() / teams;

        let mut d_home = normal_lp_grad(home);
        let mut d_intercept = normal_lp_grad(intercept);
        let mut attack_residual = vec![0.0; self.teams];
        let mut defense_residual = vec![0.0; self.teams];
        for game in &self.games {
            let eta_home = intercept
                + home
                + (attack[game.home] - attack_mean)
                + (defense[game.away] - defense_mean);
            let eta_away =
                intercept + (attack[game.away] - attack_mean) + (defense[game.home] - defense_mean);
            let home_residual = game.weight * (game.home_goals - eta_home.exp());
            let away_residual = game.weight * (game.away_goals - eta_away.exp());
            d_home += home_residual;
            d_intercept += home_residual + away_residual;
            attack_residual[game.home] += home_residual;
            attack_residual[game.away] += away_residual;
            defense_residual[game.away] += home_residual;
            defense_residual[game.home] += away_residual;
        }

        grad[0] = d_home;
        grad[1] = d_intercept;
        let attack_residual_mean = attack_residual.iter().sum::<f64>() / teams;
        let defense_residual_mean = defense_residual.iter().sum::<f64>() / teams;
        let attack_sumsq = attack.iter().map(|value| value * value).sum::<f64>();
        let defense_sumsq = defense.iter().map(|value| value * value).sum::<f64>();
        for index in 0..self.teams {
            grad[self.attack_offset() + index] = attack_residual[index] - attack_residual_mean
                - attack[index] / (tau_attack * tau_attack);
            grad[self.defense_offset() + index] = defense_residual[index] - defense_residual_mean
                - defense[index] / (tau_defense * tau_defense);
        }
        grad[self.scale_offset()] = SCALE_PRIOR_SHAPE - SCALE_PRIOR_RATE * tau_attack - teams
            + attack_sumsq / (tau_attack * tau_attack);
        grad[self.scale_offset() + 1] = SCALE_PRIOR_SHAPE - SCALE_PRIOR_RATE * tau_defense - teams
            + defense_sumsq / (tau_defense * tau_defense);
    }
}

impl Target for RatingModel {
    fn dim(&self) -> usize {
        RatingModel::dim(self)
    }

    fn log_density(&self, theta: &[f64]) -> f64 {
        RatingModel::log_density(self, theta)
    }

    fn gradient(&self, theta: &[f64], grad: &mut [f64]) {
        RatingModel::gradient(self, theta, grad)
    }

    fn initial(&self) -> Vec<f64> {
        RatingModel::initial(self)
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(#[from] pub Box<dyn Error>);

impl From<anyhow::Error> for ValidationError {
    fn from(value: anyhow::Error) -> Self {
        ValidationError(value.into())
    }
}

#[inline]
fn normal_lp(value: f64) -> f64 {
    let standardized = (value - EFFECT_PRIOR_MEAN) / EFFECT_PRIOR_SCALE;
    -0.5 * standardized * standardized
}

#[inline]
fn normal_lp_grad(value: f64) -> f64 {
    -(value - EFFECT_PRIOR_MEAN) / (EFFECT_PRIOR_SCALE * EFFECT_PRIOR_SCALE)
}

#[inline]
fn deviation_lp(deviations: &[f64], tau: f64) -> f64 {
    let sumsq = deviations.iter().map(|value| value * value).sum::<f64>();
    -(deviations.len() as f64) * tau.ln() - sumsq / (2.0 * tau * tau)
}
