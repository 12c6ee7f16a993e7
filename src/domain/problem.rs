use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::schedule;

/// A practice problem tracked for spaced revision.
///
/// Problems own an ordered schedule of [`Revision`]s. The first revision
/// without a completion timestamp is the *active* revision; it is the one
/// shown as due, and the one advanced when the problem is solved again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// Globally unique, perpetually stable identifier.
    pub id: Uuid,
    /// Human readable title, on a single line.
    pub title: String,
    /// Link to the problem on its source site.
    ///
    /// The store treats this as a natural key: two problems never share a
    /// URL.
    pub url: String,
    /// Difficulty rating.
    pub difficulty: Difficulty,
    /// Free-form tags, in insertion order without duplicates.
    pub tags: Vec<String>,
    /// When the problem was added, or when its schedule was last reset.
    pub added: DateTime<Utc>,
    /// Free-text notes (markdown).
    pub notes: String,
    /// Revision schedule, ordered by number.
    pub revisions: Vec<Revision>,
    /// Self-assessed confidence ratings, oldest first.
    pub confidence: Vec<ConfidenceEntry>,
    /// Archived problems are hidden from listings and reminders.
    pub archived: bool,
}

impl Problem {
    /// Construct a new [`Problem`] with a fresh schedule starting from
    /// `start`.
    ///
    /// A new UUID is automatically generated.
    #[must_use]
    pub fn new(
        title: String,
        url: String,
        difficulty: Difficulty,
        added: DateTime<Utc>,
        start: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: single_line(&title),
            url,
            difficulty,
            tags: Vec::new(),
            added,
            notes: String::new(),
            revisions: schedule::generate_revisions(start),
            confidence: Vec::new(),
            archived: false,
        }
    }

    /// Replace the title, folding any line breaks into single spaces.
    pub fn set_title(&mut self, title: &str) {
        self.title = single_line(title);
    }

    /// The revision currently awaiting completion, if any.
    #[must_use]
    pub fn active_revision(&self) -> Option<&Revision> {
        schedule::next_revision(&self.revisions)
    }

    fn active_revision_mut(&mut self) -> Option<&mut Revision> {
        self.revisions.iter_mut().find(|r| r.completed.is_none())
    }

    /// Mark the active revision as completed at the given time.
    ///
    /// Returns the number of the revision that was completed, or `None` if
    /// every revision was already complete.
    pub fn complete_active_revision(&mut self, at: DateTime<Utc>) -> Option<u32> {
        let revision = self.active_revision_mut()?;
        revision.completed = Some(at);
        Some(revision.number)
    }

    /// Discard the current schedule and generate a new one from `start`.
    ///
    /// The added timestamp is moved to `solved_at`.
    pub fn reset_schedule(&mut self, solved_at: DateTime<Utc>, start: NaiveDate) {
        self.added = solved_at;
        self.revisions = schedule::generate_revisions(start);
    }

    /// Whether every revision in the schedule has been completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.active_revision().is_none()
    }

    /// The most recent revision completion, if any.
    #[must_use]
    pub fn last_practiced(&self) -> Option<DateTime<Utc>> {
        self.revisions.iter().filter_map(|r| r.completed).max()
    }

    /// The latest recorded activity: the most recent completion, or the
    /// added timestamp if that is later.
    #[must_use]
    pub fn latest_activity(&self) -> DateTime<Utc> {
        self.last_practiced()
            .map_or(self.added, |practiced| practiced.max(self.added))
    }

    /// Add a tag to the problem.
    ///
    /// Returns `true` if the tag was inserted, or `false` if it was already
    /// present.
    pub fn add_tag(&mut self, tag: String) -> bool {
        if self.tags.contains(&tag) {
            false
        } else {
            self.tags.push(tag);
            true
        }
    }

    /// Append a confidence rating to the history.
    pub fn record_confidence(&mut self, level: Confidence, date: DateTime<Utc>) {
        self.confidence.push(ConfidenceEntry { date, level });
    }

    /// The most recent confidence rating, if any.
    #[must_use]
    pub fn current_confidence(&self) -> Option<Confidence> {
        self.confidence.last().map(|entry| entry.level)
    }
}

/// A scheduled review of a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Position in the schedule, starting at 1.
    pub number: u32,
    /// The calendar day the review falls due.
    pub scheduled: NaiveDate,
    /// When the review was completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<DateTime<Utc>>,
}

impl Revision {
    /// Whether the revision has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed.is_some()
    }
}

/// How hard a problem is.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Difficulty {
    /// Easy
    Easy,
    /// Medium (the default for imported problems)
    #[default]
    Medium,
    /// Hard
    Hard,
}

impl Difficulty {
    /// The canonical name of the difficulty.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(DifficultyError(s.to_string())),
        }
    }
}

/// The string is not a recognised difficulty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
pub struct DifficultyError(String);

/// A self-assessed confidence level between 1 (low) and 5 (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    /// The lowest confidence level.
    pub const MIN: u8 = 1;
    /// The highest confidence level.
    pub const MAX: u8 = 5;

    /// Create a confidence level.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is outside `1..=5`.
    pub const fn new(level: u8) -> Result<Self, ConfidenceError> {
        if level >= Self::MIN && level <= Self::MAX {
            Ok(Self(level))
        } else {
            Err(ConfidenceError(level))
        }
    }

    /// The numeric level.
    #[must_use]
    pub const fn level(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = ConfidenceError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl FromStr for Confidence {
    type Err = ConfidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = s.trim().parse::<u8>().map_err(|_| ConfidenceError(0))?;
        Self::new(level)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// The confidence level is out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("confidence must be between 1 and 5 (got {0})")]
pub struct ConfidenceError(u8);

/// A confidence rating recorded at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceEntry {
    /// When the rating was given.
    pub date: DateTime<Utc>,
    /// The rating.
    pub level: Confidence,
}

/// Collapse runs of whitespace, including line breaks, into single spaces.
#[must_use]
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_sum() -> Problem {
        Problem::new(
            "Two Sum".to_string(),
            "https://leetcode.com/problems/two-sum/".to_string(),
            Difficulty::Easy,
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            date(2024, 1, 5),
        )
    }

    #[test]
    fn new_problem_has_pending_schedule() {
        let problem = two_sum();
        assert_eq!(problem.revisions.len(), 5);
        assert_eq!(problem.active_revision().unwrap().number, 1);
        assert!(!problem.is_finished());
        assert_eq!(problem.last_practiced(), None);
    }

    #[test]
    fn completing_advances_active_revision() {
        let mut problem = two_sum();
        let at = Utc.with_ymd_and_hms(2024, 1, 6, 20, 0, 0).unwrap();

        assert_eq!(problem.complete_active_revision(at), Some(1));
        assert_eq!(problem.active_revision().unwrap().number, 2);
        assert_eq!(problem.last_practiced(), Some(at));
        assert_eq!(problem.latest_activity(), at);
    }

    #[test]
    fn completing_a_finished_problem_is_a_no_op() {
        let mut problem = two_sum();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        for _ in 0..problem.revisions.len() {
            problem.complete_active_revision(at);
        }

        assert!(problem.is_finished());
        assert_eq!(problem.complete_active_revision(at), None);
    }

    #[test]
    fn reset_replaces_schedule_and_added() {
        let mut problem = two_sum();
        problem.complete_active_revision(Utc::now());
        let solved = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

        problem.reset_schedule(solved, date(2024, 6, 1));

        assert_eq!(problem.added, solved);
        assert!(problem.revisions.iter().all(|r| r.completed.is_none()));
        assert_eq!(problem.revisions[0].scheduled, date(2024, 6, 2));
    }

    #[test]
    fn tags_are_deduplicated() {
        let mut problem = two_sum();
        assert!(problem.add_tag("array".to_string()));
        assert!(!problem.add_tag("array".to_string()));
        assert_eq!(problem.tags, vec!["array".to_string()]);
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(" easy ".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_orders_easy_to_hard() {
        assert!(Difficulty::Easy < Difficulty::Medium);
        assert!(Difficulty::Medium < Difficulty::Hard);
    }

    #[test]
    fn confidence_rejects_out_of_range() {
        assert!(Confidence::new(0).is_err());
        assert!(Confidence::new(6).is_err());
        assert_eq!(Confidence::new(3).unwrap().level(), 3);
        assert!("x".parse::<Confidence>().is_err());
    }

    #[test]
    fn confidence_history_tracks_latest() {
        let mut problem = two_sum();
        problem.record_confidence(Confidence::new(2).unwrap(), Utc::now());
        problem.record_confidence(Confidence::new(4).unwrap(), Utc::now());
        assert_eq!(problem.current_confidence().unwrap().level(), 4);
    }

    #[test]
    fn titles_are_kept_on_one_line() {
        let mut problem = Problem::new(
            "Two Sum\nhash map".to_string(),
            "https://leetcode.com/problems/two-sum/".to_string(),
            Difficulty::Easy,
            Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap(),
            date(2024, 1, 5),
        );
        assert_eq!(problem.title, "Two Sum hash map");

        problem.set_title("  Two\r\n Sum ");
        assert_eq!(problem.title, "Two Sum");
    }
}
