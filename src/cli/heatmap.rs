use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::Parser;
use owo_colors::{OwoColorize, Rgb};
use revise::{
    ProblemStore,
    domain::{
        activity::{Day, HEATMAP_DAYS, activity_counts, calendar},
        schedule,
    },
};
use tracing::instrument;

use super::terminal::{Colorize, supports_color};

const ROW_LABELS: [&str; 7] = ["Sun", "", "Tue", "", "Thu", "", "Sat"];

// GitHub-style greens, lightest to darkest
const SHADES: [Rgb; 5] = [
    Rgb(235, 237, 240),
    Rgb(155, 233, 168),
    Rgb(64, 196, 99),
    Rgb(48, 161, 78),
    Rgb(33, 110, 57),
];
const GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];

#[derive(Debug, Parser)]
#[command(about = "Show practice activity over the last year")]
pub struct Heatmap {}

impl Heatmap {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let today = schedule::today();
        let counts = activity_counts(&directory.problems(), &Local);
        let weeks = calendar(&counts, today);
        let color = supports_color();

        let total: usize = weeks
            .iter()
            .flatten()
            .filter(|day| day.date <= today)
            .map(|day| day.count)
            .sum();
        let active_days = weeks
            .iter()
            .flatten()
            .filter(|day| day.count > 0 && day.date <= today)
            .count();

        println!("{}", month_header(&weeks));
        for (row, label) in ROW_LABELS.iter().enumerate() {
            let cells: String = weeks
                .iter()
                .map(|week| cell(&week[row], today, color))
                .collect();
            println!("{label:<4}{cells}");
        }

        println!();
        let legend: String = (0..5).map(|level| shade(level, color)).collect();
        println!("{}", format!("Less {legend} More").dim());
        println!(
            "{total} activities on {active_days} days in the last {HEATMAP_DAYS} days"
        );

        Ok(())
    }
}

fn shade(level: usize, color: bool) -> String {
    if color {
        "■".color(SHADES[level]).to_string()
    } else {
        GLYPHS[level].to_string()
    }
}

fn cell(day: &Day, today: chrono::NaiveDate, color: bool) -> String {
    if day.date > today {
        return " ".to_string();
    }
    shade(usize::from(day.intensity()), color)
}

/// Month names placed above the first week that starts in each month.
fn month_header(weeks: &[[Day; 7]]) -> String {
    let mut header = " ".repeat(4);
    let mut previous = None;
    let mut skip = 0;

    for week in weeks {
        if skip > 0 {
            skip -= 1;
            continue;
        }
        let month = week[0].date.month();
        if previous == Some(month) {
            header.push(' ');
        } else {
            let name = week[0].date.format("%b").to_string();
            skip = name.chars().count().saturating_sub(1);
            header.push_str(&name);
            previous = Some(month);
        }
    }

    header.chars().take(4 + weeks.len()).collect()
}
