use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use regex::Regex;
use revise::{
    Problem, ProblemStore,
    domain::{
        library::{Query, SortOrder},
        schedule::{self, local_date, revision_status},
    },
};
use serde::Serialize;
use tracing::instrument;

use super::terminal::{Colorize, is_narrow, status_icon, terminal_width, truncate};

const MIN_TITLE_WIDTH: usize = 16;

/// Command arguments for `revise list`.
#[derive(Debug, Parser)]
#[command(about = "List problems in the library")]
pub struct List {
    /// Case-insensitive substring the title must contain.
    #[arg(long, short)]
    search: Option<String>,

    /// Regular expression the title must match.
    #[arg(long)]
    regex: Option<Regex>,

    /// Only problems carrying this tag (case-insensitive).
    #[arg(long)]
    tag: Option<String>,

    /// Sort order (date, difficulty).
    #[arg(long, default_value_t)]
    sort: SortOrder,

    /// Include archived problems.
    #[arg(long)]
    archived: bool,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    id: String,
    title: &'a str,
    url: &'a str,
    difficulty: &'static str,
    tags: &'a [String],
    archived: bool,
    practiced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_practiced: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_revision: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_revision_number: Option<u32>,
    status: String,
}

impl<'a> Row<'a> {
    fn new(problem: &'a Problem, today: chrono::NaiveDate) -> Self {
        let next = problem.active_revision();
        let last_practiced = problem.last_practiced();
        Self {
            id: problem.id.to_string(),
            title: &problem.title,
            url: &problem.url,
            difficulty: problem.difficulty.as_str(),
            tags: &problem.tags,
            archived: problem.archived,
            practiced: last_practiced.is_some(),
            last_practiced: last_practiced.map(|t| local_date(t).to_string()),
            next_revision: next.map(|r| r.scheduled.to_string()),
            next_revision_number: next.map(|r| r.number),
            status: next.map_or_else(
                || "finished".to_string(),
                |r| revision_status(r, today).to_string(),
            ),
        }
    }
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let problems = directory.problems();
        let today = schedule::today();

        let query = Query {
            search: self.search,
            pattern: self.regex,
            tag: self.tag,
            include_archived: self.archived,
            sort: self.sort,
        };
        let selected = query.apply(&problems);

        match self.output {
            OutputFormat::Json => {
                let rows: Vec<_> = selected.iter().map(|p| Row::new(p, today)).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Table => {
                if selected.is_empty() {
                    if problems.is_empty() {
                        println!("No problems yet. Add one with 'revise add <url>'.");
                    } else {
                        println!("No problems match.");
                    }
                    return Ok(());
                }
                render_table(&selected, today);
            }
        }

        Ok(())
    }
}

fn render_table(problems: &[&Problem], today: chrono::NaiveDate) {
    let narrow = is_narrow();
    // id, difficulty, two dates and the separators between them
    let fixed = 2 + 9 + 7 + 11 + 14 + 5;
    let title_width = terminal_width()
        .map_or(40, |w| usize::from(w).saturating_sub(fixed))
        .max(MIN_TITLE_WIDTH);

    if !narrow {
        println!(
            "   {:<8} {:<title_width$} {:<6} {:<10} {}",
            "ID", "Title", "Level", "Practiced", "Next revision"
        );
        println!("{}", "─".repeat(fixed + title_width).dim());
    }

    for problem in problems {
        let (icon, next) = match problem.active_revision() {
            Some(revision) => {
                let status = revision_status(revision, today);
                (
                    status_icon(status),
                    format!("#{} {}", revision.number, revision.scheduled).status(status),
                )
            }
            None => ("🏁", "finished".success()),
        };
        let practiced = problem
            .last_practiced()
            .map_or_else(|| "never".to_string(), |t| local_date(t).to_string());
        let title = if problem.archived {
            format!("{} (archived)", problem.title)
        } else {
            problem.title.clone()
        };

        if narrow {
            println!("{icon} {} {}", problem.title, super::short_id(problem).dim());
            println!("   {} · {next}", problem.difficulty);
        } else {
            println!(
                "{icon} {} {:<title_width$} {:<6} {:<10} {next}",
                super::short_id(problem).dim(),
                truncate(&title, title_width),
                problem.difficulty.as_str(),
                practiced,
            );
        }
    }
}
