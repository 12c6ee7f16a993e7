use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::Parser;
use revise::{CreateOutcome, Difficulty, Problem, ProblemStore, domain::schedule};
use tracing::instrument;

use super::terminal::Colorize;

const UNTITLED: &str = "Untitled Problem";

#[derive(Debug, Parser)]
#[command(about = "Track a new problem and schedule its revisions")]
pub struct Add {
    /// Link to the problem
    ///
    /// Titles are inferred from LeetCode, NeetCode and TakeUForward URLs.
    pub url: String,

    /// Title, overriding the one inferred from the URL
    #[arg(long, short)]
    pub title: Option<String>,

    /// Difficulty (easy, medium, hard)
    #[arg(long, short)]
    pub difficulty: Option<Difficulty>,

    /// Tag to apply (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Notes (markdown)
    #[arg(long, short)]
    pub notes: Option<String>,

    /// The day the problem was solved, as YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl Add {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut directory = super::open(root)?;

        let (url, parsed) = super::problem_url(&self.url)?;

        let title = self
            .title
            .or_else(|| parsed.as_ref().map(|p| p.title.clone()))
            .unwrap_or_else(|| UNTITLED.to_string());
        let difficulty = self
            .difficulty
            .or_else(|| parsed.as_ref().map(|p| p.difficulty))
            .unwrap_or_default();

        let start = self.date.unwrap_or_else(schedule::today);
        let added = self.date.map_or_else(Utc::now, start_of_day);

        let mut problem = Problem::new(title, url, difficulty, added, start);
        for tag in self.tag {
            problem.add_tag(tag);
        }
        problem.notes = self.notes.unwrap_or_default();

        let title = problem.title.clone();
        let id = super::short_id(&problem);
        let next = problem.active_revision().map(|r| r.scheduled);

        match directory.create(problem)? {
            CreateOutcome::Created => {
                println!("{}", format!("✅ Added {title} ({id})").success());
                if let Some(next) = next {
                    println!("{}", format!("First revision on {next}").dim());
                }
            }
            CreateOutcome::Duplicate { existing } => {
                println!(
                    "{}",
                    format!("⚠️  Already tracking this problem ({existing})").warning()
                );
            }
        }

        Ok(())
    }
}

/// Midnight at the start of `date` in the local time zone.
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
        .map_or_else(
            || date.and_time(NaiveTime::MIN).and_utc(),
            |local| local.with_timezone(&Utc),
        )
}
