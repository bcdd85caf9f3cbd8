//! Console rendering of the output tables.

use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

use crate::forecast::PointProjection;
use crate::summary::TeamRating;

pub fn tabulate_ratings(ratings: &[TeamRating]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(10)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "Attack".into(),
                "Defence".into(),
                "As of".into(),
            ],
        ));
    for rating in ratings {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                rating.team.clone().into(),
                format!("{:+.3}", rating.attack).into(),
                format!("{:+.3}", rating.defense).into(),
                rating.as_of.to_string().into(),
            ],
        ));
    }
    table
}

/// Summarises each team's point distribution as its mean and central 90% band, best projected
/// team first.
pub fn tabulate_projections(projections: &[PointProjection]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "Team".into(),
                "Mean".into(),
                "5%".into(),
                "95%".into(),
            ],
        ));
    let mut ordered = projections.iter().collect::<Vec<_>>();
    ordered.sort_by(|first, second| mean(&second.points).total_cmp(&mean(&first.points)));
    for projection in ordered {
        let mut sorted = projection.points.clone();
        sorted.sort_unstable();
        table.push_row(Row::new(
            Styles::default(),
            vec![
                projection.team.clone().into(),
                format!("{:.1}", mean(&projection.points)).into(),
                percentile(&sorted, 0.05).to_string().into(),
                percentile(&sorted, 0.95).to_string().into(),
            ],
        ));
    }
    table
}

fn mean(points: &[u32]) -> f64 {
    if points.is_empty() {
        return f64::NAN;
    }
    points.iter().map(|&points| points as f64).sum::<f64>() / points.len() as f64
}

fn percentile(sorted: &[u32], quantile: f64) -> u32 {
    let index = ((sorted.len() - 1) as f64 * quantile).round() as usize;
    sorted[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stanza::renderer::console::Console;
    use stanza::renderer::Renderer;

    #[test]
    fn renders_both_tables() {
        let as_of = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let ratings = vec![TeamRating {
            team: "Aces".into(),
            attack: 0.125,
            defense: -0.043,
            as_of,
        }];
        let projections = vec![
            PointProjection {
                team: "Aces".into(),
                points: vec![80, 82, 84, 86],
                as_of,
            },
            PointProjection {
                team: "Bears".into(),
                points: vec![70, 71, 72, 73],
                as_of,
            },
        ];
        let rendered_ratings = Console::default().render(&tabulate_ratings(&ratings)).to_string();
        assert!(rendered_ratings.contains("Aces"));
        assert!(rendered_ratings.contains("+0.125"));
        let rendered_projections = Console::default()
            .render(&tabulate_projections(&projections))
            .to_string();
        assert!(rendered_projections.contains("83.0"));
        // best projection leads the table
        assert!(
            rendered_projections.find("Aces").unwrap() < rendered_projections.find("Bears").unwrap()
        );
    }
}
