use std::path::PathBuf;

use clap::Parser;
use revise::{
    Problem,
    domain::schedule::{self, local_date, revision_status},
};
use serde_json::json;
use tracing::instrument;

use super::terminal::{Colorize, status_icon};

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a problem")]
pub struct Show {
    /// Identifier, identifier prefix, or URL of the problem
    reference: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let problem = super::find(&directory, &self.reference)?;
        let today = schedule::today();

        match self.output {
            OutputFormat::Pretty => output_pretty(&problem, today),
            OutputFormat::Json => output_json(&problem, today)?,
        }

        Ok(())
    }
}

fn output_pretty(problem: &Problem, today: chrono::NaiveDate) {
    println!("# {}", problem.title);
    println!("{}\n", problem.url.info());

    println!("{}", "Metadata".dim());
    println!("  ID:         {}", problem.id);
    println!("  Difficulty: {}", problem.difficulty);
    println!("  Added:      {}", local_date(problem.added));
    if let Some(practiced) = problem.last_practiced() {
        println!("  Practiced:  {}", local_date(practiced));
    }
    if let Some(confidence) = problem.current_confidence() {
        println!("  Confidence: {confidence}");
    }
    if problem.archived {
        println!("  Archived:   {}", "yes".warning());
    }

    if !problem.tags.is_empty() {
        println!("\n{}", "Tags".dim());
        for tag in &problem.tags {
            println!("  • {tag}");
        }
    }

    println!("\n{}", "Revisions".dim());
    for revision in &problem.revisions {
        let status = revision_status(revision, today);
        let completed = revision
            .completed
            .map(|t| format!(" (done {})", local_date(t)))
            .unwrap_or_default();
        println!(
            "  {} #{} {} {}{}",
            status_icon(status),
            revision.number,
            revision.scheduled,
            status.to_string().status(status),
            completed.dim()
        );
    }

    if problem.confidence.len() > 1 {
        println!("\n{}", "Confidence history".dim());
        for entry in &problem.confidence {
            println!("  {} {}", local_date(entry.date), entry.level);
        }
    }

    if !problem.notes.trim().is_empty() {
        println!("\n{}", "Notes".dim());
        println!("{}", problem.notes.trim_end());
    }
}

fn output_json(problem: &Problem, today: chrono::NaiveDate) -> anyhow::Result<()> {
    let revisions: Vec<_> = problem
        .revisions
        .iter()
        .map(|revision| {
            json!({
                "number": revision.number,
                "scheduled": revision.scheduled,
                "completed": revision.completed,
                "status": revision_status(revision, today),
            })
        })
        .collect();

    let confidence: Vec<_> = problem
        .confidence
        .iter()
        .map(|entry| json!({ "date": entry.date, "level": entry.level }))
        .collect();

    let output = json!({
        "id": problem.id,
        "title": problem.title,
        "url": problem.url,
        "difficulty": problem.difficulty,
        "tags": problem.tags,
        "added": problem.added,
        "archived": problem.archived,
        "notes": problem.notes,
        "revisions": revisions,
        "confidence": confidence,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
