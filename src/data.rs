//! Domain types for the hand-off from the ingestion side: the team registry, completed game
//! records and unplayed fixtures, plus the per-record screening that keeps malformed data out of
//! the training set.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}
impl Side {
    pub fn flip(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// A completed game. Scores are post-adjustment: a shootout/overtime win has already been
/// normalized upstream to a one-goal margin with `extra_time` set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub home: usize,
    pub away: usize,
    pub home_goals: u16,
    pub away_goals: u16,
    pub date: NaiveDate,
    #[serde(default)]
    pub extra_time: bool,
    pub season: u16,
}
impl GameRecord {
    pub fn winner(&self) -> Option<Side> {
        if self.home_goals > self.away_goals {
            Some(Side::Home)
        } else if self.away_goals > self.home_goals {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn margin(&self) -> u16 {
        self.home_goals.abs_diff(self.away_goals)
    }
}

/// An unplayed game: team indices only, no score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub home: usize,
    pub away: usize,
}

/// Stable index ↔ display name mapping of fixed cardinality.
#[derive(Debug, Clone)]
pub struct TeamRegistry {
    index_by_name: FxHashMap<String, usize>,
    names: Vec<String>,
}
impl TeamRegistry {
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl From<Vec<String>> for TeamRegistry {
    fn from(names: Vec<String>) -> Self {
        let mut index_by_name =
            FxHashMap::with_capacity_and_hasher(names.len(), Default::default());
        for (index, name) in names.iter().enumerate() {
            if let Some(existing_index) = index_by_name.insert(name.clone(), index) {
                panic!("duplicate team {name} at index {index}, previously at {existing_index}");
            }
        }
        Self {
            index_by_name,
            names,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DataQuality {
    #[error("game of {date} between teams {home} and {away} is tied {home_goals}-{away_goals} with no extra-time resolution")]
    UnresolvedTie {
        date: NaiveDate,
        home: usize,
        away: usize,
        home_goals: u16,
        away_goals: u16,
    },

    #[error("extra-time game of {date} between teams {home} and {away} has a margin of {margin}; adjusted scores must differ by exactly one")]
    ExtraTimeMargin {
        date: NaiveDate,
        home: usize,
        away: usize,
        margin: u16,
    },
}

#[derive(Debug, Error, PartialEq)]
#[error("team index {index} is not in the registry of {teams} teams")]
pub struct SchemaMismatch {
    pub index: usize,
    pub teams: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("{0}")]
    Quality(#[from] DataQuality),

    #[error("{0}")]
    Schema(#[from] SchemaMismatch),
}

pub fn validate_record(record: &GameRecord, registry: &TeamRegistry) -> Result<(), Rejection> {
    validate_indices(record.home, record.away, registry)?;
    if record.winner().is_none() {
        return Err(DataQuality::UnresolvedTie {
            date: record.date,
            home: record.home,
            away: record.away,
            home_goals: record.home_goals,
            away_goals: record.away_goals,
        }
        .into());
    }
    if record.extra_time && record.margin() != 1 {
        return Err(DataQuality::ExtraTimeMargin {
            date: record.date,
            home: record.home,
            away: record.away,
            margin: record.margin(),
        }
        .into());
    }
    Ok(())
}

fn validate_indices(home: usize, away: usize, registry: &TeamRegistry) -> Result<(), Rejection> {
    for index in [home, away] {
        if !registry.contains(index) {
            return Err(SchemaMismatch {
                index,
                teams: registry.len(),
            }
            .into());
        }
    }
    Ok(())
}

/// Drops records that fail screening, warning on each rejection. A rejected record never aborts
/// the run and never has a winner guessed for it.
pub fn screen_records(records: &[GameRecord], registry: &TeamRegistry) -> Vec<GameRecord> {
    let mut retained = Vec::with_capacity(records.len());
    for record in records {
        match validate_record(record, registry) {
            Ok(()) => retained.push(record.clone()),
            Err(rejection) => warn!("excluding record: {rejection}"),
        }
    }
    retained
}

pub fn screen_fixtures(fixtures: &[Fixture], registry: &TeamRegistry) -> Vec<Fixture> {
    let mut retained = Vec::with_capacity(fixtures.len());
    for fixture in fixtures {
        match validate_indices(fixture.home, fixture.away, registry) {
            Ok(()) => retained.push(fixture.clone()),
            Err(rejection) => warn!("excluding fixture: {rejection}"),
        }
    }
    retained
}

/// Points already banked in the given season: 2 for any win, 1 for an extra-time loss, 0 for a
/// regulation loss. Expects screened records.
pub fn accrued_points(records: &[GameRecord], season: u16, teams: usize) -> Vec<u32> {
    let mut points = vec![0; teams];
    for record in records {
        if record.season != season {
            continue;
        }
        let Some(winner) = record.winner() else {
            continue;
        };
        let (winner_index, loser_index) = match winner {
            Side::Home => (record.home, record.away),
            Side::Away => (record.away, record.home),
        };
        points[winner_index] += 2;
        if record.extra_time {
            points[loser_index] += 1;
        }
    }
    points
}

/// The JSON hand-off produced by the ingestion side: registry order defines team indices.
#[derive(Debug, Deserialize)]
pub struct Snapshot {
    pub teams: Vec<String>,
    pub games: Vec<GameRecord>,
    pub fixtures: Vec<Fixture>,
}

pub fn read_from_file(path: impl AsRef<Path>) -> anyhow::Result<Snapshot> {
    let file = File::open(path)?;
    let snapshot = serde_json::from_reader(file)?;
    Ok(snapshot)
}
