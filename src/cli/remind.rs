use std::path::PathBuf;

use clap::Parser;
use revise::{
    ProblemStore,
    domain::schedule,
    notify::{self, NotificationKind, ResendMailer, ZenQuotes},
};
use tracing::instrument;

use super::terminal::{Colorize, spinner};

#[derive(Debug, Parser)]
#[command(about = "Email a reminder of due revisions, or an all-clear")]
pub struct Remind {
    /// Print the email instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Send a fixed test email to check delivery settings
    #[arg(long, conflicts_with = "dry_run")]
    test: bool,
}

impl Remind {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let directory = super::open(root)?;
        let config = directory.config().clone();

        if self.test {
            let mailer = ResendMailer::from_env(&config.email.endpoint)?;
            let progress = spinner("Sending test email...");
            let result = notify::send_test(&mailer, &config.email);
            progress.finish_and_clear();
            let id = result?;
            println!("{}", format!("✅ Test email sent ({id})").success());
            return Ok(());
        }

        let problems = directory.problems();
        let today = schedule::today();
        let quotes = ZenQuotes::new(&config.quotes.endpoint)?;

        if self.dry_run {
            let notification = notify::compose(&problems, today, &quotes);
            println!("Subject: {}\n", notification.subject);
            println!("{}", notification.text);
            return Ok(());
        }

        let mailer = ResendMailer::from_env(&config.email.endpoint)?;
        let progress = spinner("Sending reminder...");
        let result = notify::notify(&problems, today, &mailer, &quotes, &config.email);
        progress.finish_and_clear();
        let notification = result?;

        let summary = match notification.kind {
            NotificationKind::Reminder { due, overdue } => {
                format!("✅ Reminder sent: {due} due, {overdue} overdue")
            }
            NotificationKind::AllClear { .. } => "✅ All-clear sent".to_string(),
        };
        println!("{}", summary.success());

        Ok(())
    }
}
