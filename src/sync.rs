//! Import accepted submissions from LeetCode.
//!
//! A sync run fetches the user's most recent submissions and, for every
//! accepted one inside the trailing window, either advances the matching
//! problem's schedule or imports it as a new problem.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::{
    domain::{Difficulty, Problem, SyncConfig, schedule},
    parser,
    storage::{CreateOutcome, ProblemStore, StoreError},
};

mod leetcode;
pub use leetcode::LeetCodeClient;

/// Tags applied to problems imported by sync.
pub const IMPORT_TAGS: [&str; 2] = ["LeetCode", "Auto-Import"];

/// A single submission as reported by LeetCode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Problem title.
    pub title: String,
    /// Problem slug, as used in its URL.
    pub title_slug: String,
    /// Unix timestamp in seconds, encoded as a string.
    pub timestamp: String,
    /// Verdict, e.g. `Accepted` or `Wrong Answer`.
    pub status_display: String,
    /// Submission language.
    pub lang: String,
}

impl Submission {
    /// Whether the submission passed.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status_display == "Accepted"
    }

    /// When the submission was made, if the timestamp is valid.
    #[must_use]
    pub fn solved_at(&self) -> Option<DateTime<Utc>> {
        let seconds = self.timestamp.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

/// Somewhere recent submissions can be fetched from.
pub trait SubmissionSource {
    /// Fetch up to `limit` of the user's most recent submissions, newest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns an error if the submissions cannot be fetched or decoded.
    fn recent_submissions(&self, username: &str, limit: u32) -> Result<Vec<Submission>, SyncError>;
}

/// Errors raised while fetching submissions.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request failed or the response could not be decoded.
    #[error("request failed")]
    Request(#[from] reqwest::Error),

    /// The API answered with errors.
    #[error("LeetCode returned errors: {0}")]
    Api(String),
}

/// What a sync run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Accepted submissions inside the window.
    pub considered: usize,
    /// Existing problems whose active revision was completed.
    pub completed: usize,
    /// Existing, fully revised problems given a fresh schedule.
    pub reset: usize,
    /// New problems created.
    pub imported: usize,
    /// Submissions already accounted for.
    pub skipped: usize,
    /// Submissions that could not be processed.
    pub failed: usize,
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} accepted: {} completed, {} reset, {} imported, {} skipped, {} failed",
            self.considered, self.completed, self.reset, self.imported, self.skipped, self.failed
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed(u32),
    Reset,
    Imported,
    Skipped,
}

/// Run one sync pass at time `now`.
///
/// Submissions are processed in the order the source returns them. A
/// submission whose solve time is not later than the problem's recorded
/// activity is skipped, so overlapping runs do not advance a schedule twice.
///
/// Failures never abort the run: a fetch failure is logged and treated as
/// no submissions, and a failure on one submission is logged and counted.
pub fn sync<S>(
    store: &mut S,
    source: &dyn SubmissionSource,
    config: &SyncConfig,
    now: DateTime<Utc>,
) -> SyncReport
where
    S: ProblemStore + ?Sized,
{
    let mut report = SyncReport::default();

    if config.username.trim().is_empty() {
        tracing::warn!("No LeetCode username configured. Nothing to sync.");
        return report;
    }

    let submissions = source
        .recent_submissions(&config.username, config.limit)
        .unwrap_or_else(|e| {
            tracing::error!("Error fetching LeetCode submissions: {e}");
            Vec::new()
        });

    let cutoff = window_start(now, config.window_hours);

    let accepted: Vec<_> = submissions
        .iter()
        .filter(|submission| submission.is_accepted())
        .filter_map(|submission| match submission.solved_at() {
            Some(solved_at) => Some((submission, solved_at)),
            None => {
                tracing::warn!(
                    "Invalid timestamp '{}' on submission of {}",
                    submission.timestamp,
                    submission.title
                );
                report.failed += 1;
                None
            }
        })
        .filter(|(_, solved_at)| *solved_at > cutoff)
        .collect();

    tracing::info!("Found {} new accepted submissions.", accepted.len());
    report.considered = accepted.len();

    for (submission, solved_at) in accepted {
        match apply(store, submission, solved_at) {
            Ok(Outcome::Completed(number)) => {
                tracing::info!(
                    "Marked revision #{number} as complete for {}",
                    submission.title
                );
                report.completed += 1;
            }
            Ok(Outcome::Reset) => {
                tracing::info!(
                    "All revisions complete for {}. Reset schedule.",
                    submission.title
                );
                report.reset += 1;
            }
            Ok(Outcome::Imported) => {
                tracing::info!("Imported new problem: {}", submission.title);
                report.imported += 1;
            }
            Ok(Outcome::Skipped) => {
                tracing::debug!("Submission of {} already recorded", submission.title);
                report.skipped += 1;
            }
            Err(e) => {
                tracing::error!("Error processing {}: {e}", submission.title);
                report.failed += 1;
            }
        }
    }

    report
}

/// The earliest solve time inside the trailing window. A window reaching
/// past the representable range covers everything.
fn window_start(now: DateTime<Utc>, window_hours: u32) -> DateTime<Utc> {
    Duration::try_hours(i64::from(window_hours))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn apply<S>(
    store: &mut S,
    submission: &Submission,
    solved_at: DateTime<Utc>,
) -> Result<Outcome, StoreError>
where
    S: ProblemStore + ?Sized,
{
    let url = parser::leetcode_url(&submission.title_slug);
    let solved_on = schedule::local_date(solved_at);

    let Some(mut existing) = store.find_by_url(&url) else {
        let mut problem = Problem::new(
            submission.title.clone(),
            url,
            Difficulty::Medium,
            solved_at,
            solved_on,
        );
        for tag in IMPORT_TAGS {
            problem.add_tag(tag.to_string());
        }
        problem.notes = format!("Auto-imported from LeetCode. Language: {}", submission.lang);

        return Ok(match store.create(problem)? {
            CreateOutcome::Created => Outcome::Imported,
            CreateOutcome::Duplicate { .. } => Outcome::Skipped,
        });
    };

    if existing.latest_activity() >= solved_at {
        return Ok(Outcome::Skipped);
    }

    if let Some(number) = existing.complete_active_revision(solved_at) {
        store.update_schedule(existing.id, existing.added, existing.revisions)?;
        Ok(Outcome::Completed(number))
    } else {
        existing.reset_schedule(solved_at, solved_on);
        store.update_schedule(existing.id, existing.added, existing.revisions)?;
        Ok(Outcome::Reset)
    }
}
