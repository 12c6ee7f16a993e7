use std::path::PathBuf;

use clap::Parser;
use revise::{
    ProblemStore, RevisionStatus,
    domain::schedule::{self, due_items},
};
use tracing::instrument;

use super::terminal::{Colorize, status_icon};

#[derive(Debug, Parser)]
#[command(about = "List the revisions due today, overdue first")]
pub struct Today {}

impl Today {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let problems = directory.problems();
        let today = schedule::today();
        let items = due_items(&problems, today);

        if items.is_empty() {
            println!("{}", "Nothing due today 🎉".success());
            return Ok(());
        }

        println!("Today's focus ({today})");
        println!("{}", "──────────────────────────".dim());

        for item in &items {
            let when = match item.status {
                RevisionStatus::Overdue => {
                    let days = (today - item.revision.scheduled).num_days();
                    let plural = if days == 1 { "" } else { "s" };
                    format!("overdue by {days} day{plural}").danger()
                }
                _ => "due today".warning(),
            };
            println!(
                "{} {} (Rev #{}) {} {}",
                status_icon(item.status),
                item.problem.title,
                item.revision.number,
                when,
                super::short_id(item.problem).dim()
            );
        }

        println!();
        println!(
            "{}",
            "Mark a revision done with 'revise done <id>'.".dim()
        );

        Ok(())
    }
}
