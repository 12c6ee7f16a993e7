use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use revise::sync::{LeetCodeClient, sync};
use tracing::instrument;

use super::terminal::{Colorize, spinner};

#[derive(Debug, Parser)]
#[command(about = "Import accepted LeetCode submissions from the trailing window")]
pub struct Sync {}

impl Sync {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut directory = super::open(root)?;
        let config = directory.config().sync.clone();

        if config.username.trim().is_empty() {
            anyhow::bail!("No LeetCode username configured. Set sync.username in config.toml.");
        }

        let client = LeetCodeClient::new(&config.endpoint)?;

        let progress = spinner("Fetching recent submissions...");
        let report = sync(&mut directory, &client, &config, Utc::now());
        progress.finish_and_clear();

        let summary = report.to_string();
        if report.failed > 0 {
            println!("{}", summary.warning());
        } else {
            println!("{}", summary.success());
        }

        Ok(())
    }
}
