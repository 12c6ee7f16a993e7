use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use revise::{
    Difficulty, ProblemStore,
    domain::Confidence,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Change the details of a problem")]
pub struct Edit {
    /// Identifier, identifier prefix, or URL of the problem
    pub reference: String,

    /// New title
    #[arg(long, short)]
    pub title: Option<String>,

    /// New URL
    #[arg(long)]
    pub url: Option<String>,

    /// New difficulty (easy, medium, hard)
    #[arg(long, short)]
    pub difficulty: Option<Difficulty>,

    /// Replace the tags (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,

    /// Replace the notes
    #[arg(long, short)]
    pub notes: Option<String>,

    /// Hide the problem from listings and reminders
    #[arg(long, conflicts_with = "unarchive")]
    pub archive: bool,

    /// Restore an archived problem
    #[arg(long)]
    pub unarchive: bool,

    /// Record a confidence rating, from 1 (low) to 5 (high)
    #[arg(long, short)]
    pub confidence: Option<Confidence>,
}

impl Edit {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut directory = super::open(root)?;
        let mut problem = super::find(&directory, &self.reference)?;

        if let Some(title) = self.title {
            problem.set_title(&title);
        }
        if let Some(url) = self.url {
            let (url, _) = super::problem_url(&url)?;
            problem.url = url;
        }
        if let Some(difficulty) = self.difficulty {
            problem.difficulty = difficulty;
        }
        if !self.tag.is_empty() {
            problem.tags.clear();
            for tag in self.tag {
                problem.add_tag(tag);
            }
        }
        if let Some(notes) = self.notes {
            problem.notes = notes;
        }
        if self.archive {
            problem.archived = true;
        }
        if self.unarchive {
            problem.archived = false;
        }
        if let Some(level) = self.confidence {
            problem.record_confidence(level, Utc::now());
        }

        let title = problem.title.clone();
        if !directory.update(problem)? {
            anyhow::bail!("Problem {title} no longer exists");
        }

        println!("{}", format!("✅ Updated {title}").success());
        Ok(())
    }
}
