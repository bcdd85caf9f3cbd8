//! Point-estimate team ratings for reporting: the posterior mean of each team's centered attack
//! and defence deviations.

use chrono::NaiveDate;

use crate::data::TeamRegistry;
use crate::model::SampleSet;

#[derive(Clone, Debug, PartialEq)]
pub struct TeamRating {
    pub team: String,
    pub attack: f64,
    pub defense: f64,
    pub as_of: NaiveDate,
}

/// Reduces the sample set to one row per team. Pure; the sample set is read only.
pub fn summarise(samples: &SampleSet, registry: &TeamRegistry, as_of: NaiveDate) -> Vec<TeamRating> {
    if samples.is_empty() {
        return vec![];
    }
    let teams = registry.len();
    let mut attack_totals = vec![0.0; teams];
    let mut defense_totals = vec![0.0; teams];
    for params in samples.iter() {
        let centered = params.centered();
        for team in 0..teams {
            attack_totals[team] += centered.attack[team];
            defense_totals[team] += centered.defense[team];
        }
    }
    let draws = samples.len() as f64;
    (0..teams)
        .map(|team| TeamRating {
            team: registry.name_at(team).unwrap().to_string(),
            attack: attack_totals[team] / draws,
            defense: defense_totals[team] / draws,
            as_of,
        })
        .collect()
}
