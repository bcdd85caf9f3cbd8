use super::*;
use chrono::NaiveDate;

use crate::data::GameRecord;
use crate::model::{RatingModel, DEFAULT_DECAY};

struct UnitNormal;
impl Target for UnitNormal {
    fn dim(&self) -> usize {
        1
    }

    fn log_density(&self, theta: &[f64]) -> f64 {
        -0.5 * theta[0] * theta[0]
    }

    fn gradient(&self, theta: &[f64], grad: &mut [f64]) {
        grad[0] = -theta[0];
    }

    fn initial(&self) -> Vec<f64> {
        vec![0.5]
    }
}

struct Degenerate;
impl Target for Degenerate {
    fn dim(&self) -> usize {
        1
    }

    fn log_density(&self, _: &[f64]) -> f64 {
        f64::NAN
    }

    fn gradient(&self, _: &[f64], grad: &mut [f64]) {
        grad[0] = 0.0;
    }

    fn initial(&self) -> Vec<f64> {
        vec![0.0]
    }
}

fn game(home: usize, away: usize, home_goals: u16, away_goals: u16, day: u32) -> GameRecord {
    GameRecord {
        home,
        away,
        home_goals,
        away_goals,
        date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        extra_time: false,
        season: 2024,
    }
}

fn small_model() -> RatingModel {
    let records = vec![
        game(0, 1, 3, 1, 30),
        game(1, 2, 2, 4, 22),
        game(2, 0, 1, 2, 14),
        game(0, 2, 4, 2, 8),
        game(1, 0, 2, 3, 2),
    ];
    RatingModel::from_history(&records, 3, DEFAULT_DECAY)
}

fn config(seed: u64) -> SamplerConfig {
    SamplerConfig {
        warmup: 200,
        draws: 100,
        seed,
        ..SamplerConfig::default()
    }
}

#[test]
fn produces_requested_draws() {
    let model = small_model();
    let sampler = Langevin::new(config(42)).unwrap();
    let chain = sampler.infer(&model).unwrap();
    assert_eq!(100, chain.positions.len());
    for position in &chain.positions {
        assert_eq!(model.dim(), position.len());
        assert!(position.iter().all(|value| value.is_finite()));
    }
    assert!((0.0..=1.0).contains(&chain.acceptance_rate()));
}

#[test]
fn identical_seed_reproduces_bit_for_bit() {
    let model = small_model();
    let sampler = Langevin::new(config(7)).unwrap();
    let first = sampler.infer(&model).unwrap();
    let second = sampler.infer(&model).unwrap();
    assert_eq!(first, second);
}

#[test]
fn different_seeds_diverge() {
    let model = small_model();
    let first = Langevin::new(config(1)).unwrap().infer(&model).unwrap();
    let second = Langevin::new(config(2)).unwrap().infer(&model).unwrap();
    assert_ne!(first.positions, second.positions);
}

#[test]
fn recovers_unit_normal_moments() {
    let sampler = Langevin::new(SamplerConfig {
        warmup: 500,
        draws: 2_000,
        seed: 3,
        ..SamplerConfig::default()
    })
    .unwrap();
    let chain = sampler.infer(&UnitNormal).unwrap();
    let draws = chain
        .positions
        .iter()
        .map(|position| position[0])
        .collect::<Vec<_>>();
    let mean = draws.iter().sum::<f64>() / draws.len() as f64;
    let variance =
        draws.iter().map(|draw| (draw - mean).powi(2)).sum::<f64>() / draws.len() as f64;
    assert!(mean.abs() < 0.5, "mean {mean}");
    assert!((0.3..3.0).contains(&variance), "variance {variance}");
    assert!(chain.acceptance_rate() > 0.1, "acceptance collapsed");
}

#[test]
fn nan_target_fails_loudly() {
    let sampler = Langevin::new(config(5)).unwrap();
    match sampler.infer(&Degenerate) {
        Err(InferenceFailure::UnusableStart) => {}
        other => panic!("expected UnusableStart, got {other:?}"),
    }
}

#[test]
fn zero_draws_rejected() {
    let rejected = Langevin::new(SamplerConfig {
        draws: 0,
        ..SamplerConfig::default()
    });
    assert!(rejected.is_err());
}
