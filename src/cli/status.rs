use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use revise::{
    Problem, ProblemStore, RevisionStatus,
    domain::schedule::{self, revision_status},
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show totals of due, overdue and upcoming revisions")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Counts of problems by the state of their active revision.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
struct Totals {
    problems: usize,
    overdue: usize,
    due: usize,
    locked: usize,
    finished: usize,
    archived: usize,
}

impl Totals {
    fn count(problems: &[Problem], today: NaiveDate) -> Self {
        let mut totals = Self::default();
        for problem in problems {
            if problem.archived {
                totals.archived += 1;
                continue;
            }
            totals.problems += 1;
            match problem.active_revision().map(|r| revision_status(r, today)) {
                None | Some(RevisionStatus::Completed) => totals.finished += 1,
                Some(RevisionStatus::Overdue) => totals.overdue += 1,
                Some(RevisionStatus::Due) => totals.due += 1,
                Some(RevisionStatus::Locked) => totals.locked += 1,
            }
        }
        totals
    }
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let totals = Totals::count(&directory.problems(), schedule::today());

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            }
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&totals);
                } else if totals.problems + totals.archived == 0 {
                    println!("No problems found yet. Add one with 'revise add <url>'.");
                } else {
                    Self::output_table(&totals);
                }
            }
        }

        Ok(())
    }

    fn output_quiet(totals: &Totals) {
        println!(
            "total={} overdue={} due={} locked={} finished={}",
            totals.problems, totals.overdue, totals.due, totals.locked, totals.finished
        );
    }

    fn output_table(totals: &Totals) {
        println!("Revision status");
        println!("{}", "───────────────".dim());

        let rows = [
            ("Overdue", totals.overdue.to_string().danger()),
            ("Due", totals.due.to_string().warning()),
            ("Upcoming", totals.locked.to_string()),
            ("Finished", totals.finished.to_string().success()),
        ];

        if is_narrow() {
            for (label, value) in &rows {
                println!("{label}: {value}");
            }
        } else {
            for (label, value) in &rows {
                println!("{label:<10} {value}");
            }
        }
        println!("Total      {}", totals.problems);
        if totals.archived > 0 {
            println!("{}", format!("({} archived)", totals.archived).dim());
        }

        println!();
        if totals.overdue + totals.due == 0 {
            println!("Nothing to revise today ✅");
        } else {
            println!(
                "{}",
                "Run 'revise today' to see what needs revising.".dim()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use revise::Difficulty;

    use super::*;

    fn problem(slug: &str) -> Problem {
        Problem::new(
            slug.to_string(),
            format!("https://leetcode.com/problems/{slug}/"),
            Difficulty::Medium,
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        )
    }

    #[test]
    fn counts_by_active_revision() {
        let overdue = problem("a");
        let mut due = problem("b");
        due.complete_active_revision(Utc.with_ymd_and_hms(2024, 1, 6, 9, 0, 0).unwrap());
        let mut locked = problem("c");
        locked.complete_active_revision(Utc.with_ymd_and_hms(2024, 1, 6, 9, 0, 0).unwrap());
        locked.complete_active_revision(Utc.with_ymd_and_hms(2024, 1, 7, 9, 0, 0).unwrap());
        let mut finished = problem("d");
        while finished.complete_active_revision(Utc::now()).is_some() {}
        let mut archived = problem("e");
        archived.archived = true;

        let totals = Totals::count(
            &[overdue, due, locked, finished, archived],
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        );

        assert_eq!(
            totals,
            Totals {
                problems: 4,
                overdue: 1,
                due: 1,
                locked: 1,
                finished: 1,
                archived: 1,
            }
        );
    }
}
