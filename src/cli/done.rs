use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use revise::{ProblemStore, domain::Confidence};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Complete the active revision of a problem")]
pub struct Done {
    /// Identifier, identifier prefix, or URL of the problem
    pub reference: String,

    /// How confident you feel about the problem, from 1 (low) to 5 (high)
    #[arg(long, short)]
    pub confidence: Option<Confidence>,
}

impl Done {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut directory = super::open(root)?;
        let mut problem = super::find(&directory, &self.reference)?;
        let now = Utc::now();

        let completed = problem.complete_active_revision(now);
        if let Some(level) = self.confidence {
            problem.record_confidence(level, now);
        }

        if completed.is_none() && self.confidence.is_none() {
            println!(
                "{}",
                format!("Every revision of {} is already complete.", problem.title).dim()
            );
            return Ok(());
        }

        directory.update(problem.clone())?;

        match completed {
            Some(number) => {
                println!(
                    "{}",
                    format!("✅ Completed revision #{number} of {}", problem.title).success()
                );
                match problem.active_revision() {
                    Some(next) => println!(
                        "{}",
                        format!("Next revision #{} on {}", next.number, next.scheduled).dim()
                    ),
                    None => println!("{}", "🏁 All revisions complete".success()),
                }
            }
            None => println!(
                "{}",
                format!("Every revision of {} is already complete.", problem.title).dim()
            ),
        }

        if let Some(level) = self.confidence {
            println!("{}", format!("Confidence recorded: {level}").dim());
        }

        Ok(())
    }
}
