use std::path::{Path, PathBuf};

mod add;
mod done;
mod edit;
mod heatmap;
mod list;
mod remind;
mod show;
mod status;
mod sync;
mod terminal;
mod today;

use add::Add;
use anyhow::Context;
use clap::ArgAction;
use done::Done;
use edit::Edit;
use heatmap::Heatmap;
use list::List;
use remind::Remind;
use revise::{
    Directory, ParsedProblem, Problem, ProblemStore, domain::Config, parse_problem_url,
    storage::directory::CONFIG_FILE,
};
use show::Show;
use status::Status;
use sync::Sync;
use today::Today;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the directory holding the problems
    #[arg(short, long, default_value = ".", global = true, env = "REVISE_ROOT")]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show totals of due, overdue and upcoming revisions (default)
    Status(Status),

    /// Initialize a new problem directory
    Init,

    /// Track a new problem
    Add(Add),

    /// List the revisions due today
    Today(Today),

    /// List problems in the library
    List(List),

    /// Show detailed information about a problem
    Show(Show),

    /// Complete the active revision of a problem
    Done(Done),

    /// Change the details of a problem
    Edit(Edit),

    /// Delete a problem
    Delete(Delete),

    /// Show practice activity over the last year
    Heatmap(Heatmap),

    /// Import accepted submissions from LeetCode
    ///
    /// Intended to be run periodically by an external scheduler.
    Sync(Sync),

    /// Email a reminder of due revisions
    ///
    /// Intended to be run daily by an external scheduler.
    Remind(Remind),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Add(command) => command.run(root)?,
            Self::Today(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Done(command) => command.run(root)?,
            Self::Edit(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Heatmap(command) => command.run(root)?,
            Self::Sync(command) => command.run(root)?,
            Self::Remind(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Open the problem directory at `root`.
fn open(root: PathBuf) -> anyhow::Result<Directory> {
    let display = root.display().to_string();
    Directory::open(root).with_context(|| format!("failed to load problems from {display}"))
}

/// Find the problem a user supplied reference points to.
fn find(directory: &Directory, reference: &str) -> anyhow::Result<Problem> {
    directory
        .resolve(reference)?
        .ok_or_else(|| anyhow::anyhow!("No problem matches '{reference}'"))
}

/// The URL to store for a user supplied link.
///
/// Links to recognised sites are stored in their canonical form, so that a
/// problem entered by hand and one imported by sync share a URL. Anything
/// else must be an absolute URL and is stored as given.
fn problem_url(input: &str) -> anyhow::Result<(String, Option<ParsedProblem>)> {
    if let Some(parsed) = parse_problem_url(input) {
        return Ok((parsed.url.clone(), Some(parsed)));
    }

    let url = url::Url::parse(input.trim())
        .map_err(|e| anyhow::anyhow!("Invalid URL '{input}': {e}"))?;
    tracing::debug!("Unrecognised problem site. Falling back to manual entry.");
    Ok((url.to_string(), None))
}

/// The first eight characters of an identifier, enough to refer to it.
fn short_id(problem: &Problem) -> String {
    problem.id.simple().to_string()[..8].to_string()
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!(
                "Directory already initialized (found existing {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create {}", root.display()))?;

        Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        println!("Initialized problem directory in {}", root.display());
        println!("  Created: {CONFIG_FILE}");
        println!();
        println!("Next steps:");
        println!("  revise add https://leetcode.com/problems/two-sum/");
        println!("  set sync.username in {CONFIG_FILE} to import LeetCode submissions");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// Identifier, identifier prefix, or URL of the problem
    reference: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut directory = open(root)?;
        let problem = find(&directory, &self.reference)?;

        if !self.yes {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete '{}' and its revision history?", problem.title))
                .default(false)
                .interact()?;
            if !confirmed {
                println!("Cancelled");
                return Ok(());
            }
        }

        directory.delete(problem.id)?;

        println!("{}", format!("✅ Deleted {}", problem.title).success());
        Ok(())
    }
}
