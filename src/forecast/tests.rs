use super::*;
use crate::codec;

fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn game(
    home: usize,
    away: usize,
    home_goals: u16,
    away_goals: u16,
    day: u32,
    extra_time: bool,
) -> GameRecord {
    GameRecord {
        home,
        away,
        home_goals,
        away_goals,
        date: date(1, day),
        extra_time,
        season: 2024,
    }
}

fn registry() -> TeamRegistry {
    TeamRegistry::from(vec!["Aces".into(), "Bears".into(), "Comets".into()])
}

fn history() -> Vec<GameRecord> {
    vec![
        game(0, 1, 3, 1, 2, false),
        game(1, 2, 2, 3, 5, true),
        game(2, 0, 1, 4, 9, false),
        game(0, 2, 2, 1, 12, true),
        game(1, 0, 0, 2, 16, false),
        game(2, 1, 5, 2, 20, false),
    ]
}

fn fixtures() -> Vec<Fixture> {
    vec![Fixture { home: 0, away: 2 }, Fixture { home: 1, away: 0 }]
}

fn quick_config() -> Config {
    Config {
        warmup: 100,
        draws: 40,
        ..Config::new(2024)
    }
}

#[test]
fn produces_full_tables() {
    let registry = registry();
    let as_of = date(2, 1);
    let outcome = run(&history(), &fixtures(), &registry, as_of, &quick_config()).unwrap();

    assert_eq!(3, outcome.ratings.len());
    assert_eq!(3, outcome.projections.len());
    for (team, rating) in registry.names().iter().zip(&outcome.ratings) {
        assert_eq!(*team, rating.team);
        assert!(rating.attack.is_finite());
        assert!(rating.defense.is_finite());
        assert_eq!(as_of, rating.as_of);
    }
    for projection in &outcome.projections {
        assert_eq!(40, projection.points.len());
        assert_eq!(as_of, projection.as_of);
    }
}

#[test]
fn identical_seed_reproduces_byte_identical_distributions() {
    let registry = registry();
    let first = run(&history(), &fixtures(), &registry, date(2, 1), &quick_config()).unwrap();
    let second = run(&history(), &fixtures(), &registry, date(2, 1), &quick_config()).unwrap();
    assert_eq!(first.projections, second.projections);
    let first_literals = first
        .projections
        .iter()
        .map(PointProjection::points_literal)
        .collect::<Vec<_>>();
    let second_literals = second
        .projections
        .iter()
        .map(PointProjection::points_literal)
        .collect::<Vec<_>>();
    assert_eq!(first_literals, second_literals);
}

#[test]
fn different_seeds_change_the_forecast() {
    let registry = registry();
    let first = run(&history(), &fixtures(), &registry, date(2, 1), &quick_config()).unwrap();
    let reseeded = Config {
        seed: 99,
        ..quick_config()
    };
    let second = run(&history(), &fixtures(), &registry, date(2, 1), &reseeded).unwrap();
    assert_ne!(first.projections, second.projections);
}

#[test]
fn empty_schedule_projects_banked_points_only() {
    let registry = registry();
    let history = history();
    let outcome = run(&history, &[], &registry, date(2, 1), &quick_config()).unwrap();
    let accrued = data::accrued_points(&history, 2024, registry.len());
    for (team, projection) in outcome.projections.iter().enumerate() {
        assert_eq!(40, projection.points.len());
        assert!(projection
            .points
            .iter()
            .all(|&points| points == accrued[team]));
    }
}

#[test]
fn projection_literal_round_trips() {
    let registry = registry();
    let outcome = run(&history(), &fixtures(), &registry, date(2, 1), &quick_config()).unwrap();
    for projection in &outcome.projections {
        let literal = projection.points_literal();
        assert_eq!(projection.points, codec::parse_points(&literal).unwrap());
    }
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let registry = registry();
    let mut history = history();
    history.push(game(0, 1, 2, 2, 21, false)); // unresolved tie
    history.push(game(0, 7, 3, 1, 22, false)); // unknown team index
    let outcome = run(&history, &fixtures(), &registry, date(2, 1), &quick_config()).unwrap();
    assert_eq!(3, outcome.projections.len());
}

#[test]
fn invalid_config_is_rejected() {
    let registry = registry();
    let config = Config {
        decay: -0.1,
        ..Config::new(2024)
    };
    match run(&history(), &fixtures(), &registry, date(2, 1), &config) {
        Err(ForecastError::Validation(_)) => {}
        other => panic!("expected a validation error, got {other:?}"),
    }
}
