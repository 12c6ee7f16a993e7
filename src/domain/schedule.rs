//! Revision scheduling rules.
//!
//! A problem solved on day `D` is reviewed on a fixed sequence of dates:
//!
//! 1. the next day (retention check),
//! 2. the next Sunday after `D` (weekly consolidation),
//! 3. the Sunday after that (second weekly pass),
//! 4. the end of `D`'s month, or the end of the following month if that would
//!    not fall after step 3 (monthly retention),
//! 5. the end of the month after step 4 (final monthly pass).
//!
//! Dates that coincide are merged, so a schedule has four or five entries.
//! Everything here is pure calendar arithmetic; "today" is always passed in.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};
use serde::Serialize;

use crate::domain::{Problem, Revision};

/// Generate the revision schedule for a problem solved on `start`.
///
/// The returned revisions are in strictly ascending date order and numbered
/// contiguously from 1.
#[must_use]
pub fn generate_revisions(start: NaiveDate) -> Vec<Revision> {
    let next_day = add_days(start, 1);
    let first_sunday = next_sunday(start);
    let second_sunday = add_days(first_sunday, 7);

    let mut month_end = end_of_month(start);
    if month_end <= second_sunday {
        month_end = end_of_month(add_days(month_end, 1));
    }
    let following_month_end = end_of_month(add_days(month_end, 1));

    let dates: BTreeSet<NaiveDate> = [
        next_day,
        first_sunday,
        second_sunday,
        month_end,
        following_month_end,
    ]
    .into_iter()
    .collect();

    dates
        .into_iter()
        .zip(1..)
        .map(|(scheduled, number)| Revision {
            number,
            scheduled,
            completed: None,
        })
        .collect()
}

/// Where a revision stands relative to the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionStatus {
    /// Scheduled for a future day.
    Locked,
    /// Scheduled for today.
    Due,
    /// Scheduled for a past day and not yet completed.
    Overdue,
    /// Already completed.
    Completed,
}

impl RevisionStatus {
    /// Whether the revision needs attention today.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Due | Self::Overdue)
    }
}

impl fmt::Display for RevisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Locked => "locked",
            Self::Due => "due",
            Self::Overdue => "overdue",
            Self::Completed => "completed",
        })
    }
}

/// Classify a revision relative to `today`.
///
/// A completed revision is always [`RevisionStatus::Completed`], regardless
/// of its scheduled date.
#[must_use]
pub fn revision_status(revision: &Revision, today: NaiveDate) -> RevisionStatus {
    if revision.is_completed() {
        return RevisionStatus::Completed;
    }

    match revision.scheduled.cmp(&today) {
        std::cmp::Ordering::Less => RevisionStatus::Overdue,
        std::cmp::Ordering::Equal => RevisionStatus::Due,
        std::cmp::Ordering::Greater => RevisionStatus::Locked,
    }
}

/// The first revision (by stored order) that has not been completed.
#[must_use]
pub fn next_revision(revisions: &[Revision]) -> Option<&Revision> {
    revisions.iter().find(|r| !r.is_completed())
}

/// A problem whose active revision needs attention today.
#[derive(Debug, Clone, Copy)]
pub struct DueItem<'a> {
    /// The problem to review.
    pub problem: &'a Problem,
    /// Its active revision.
    pub revision: &'a Revision,
    /// Either [`RevisionStatus::Due`] or [`RevisionStatus::Overdue`].
    pub status: RevisionStatus,
}

/// Collect every unarchived problem whose active revision is due or overdue.
///
/// Overdue items come first; within each group items are ordered by
/// scheduled date.
#[must_use]
pub fn due_items(problems: &[Problem], today: NaiveDate) -> Vec<DueItem<'_>> {
    let mut items: Vec<_> = problems
        .iter()
        .filter(|problem| !problem.archived)
        .filter_map(|problem| {
            let revision = problem.active_revision()?;
            let status = revision_status(revision, today);
            status.is_pending().then_some(DueItem {
                problem,
                revision,
                status,
            })
        })
        .collect();

    items.sort_by_key(|item| (item.status != RevisionStatus::Overdue, item.revision.scheduled));
    items
}

/// The calendar day of a timestamp in the local time zone.
#[must_use]
pub fn local_date(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.with_timezone(&Local).date_naive()
}

/// The current local calendar day.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days))
        .unwrap_or(NaiveDate::MAX)
}

/// The first Sunday strictly after `date`.
fn next_sunday(date: NaiveDate) -> NaiveDate {
    let offset = 7 - u64::from(date.weekday().num_days_from_sunday());
    add_days(date, offset)
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Weekday};
    use test_case::test_case;

    use super::*;
    use crate::domain::Difficulty;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scheduled(revisions: &[Revision]) -> Vec<NaiveDate> {
        revisions.iter().map(|r| r.scheduled).collect()
    }

    #[test]
    fn friday_in_leap_year() {
        let revisions = generate_revisions(date(2024, 1, 5));
        assert_eq!(
            scheduled(&revisions),
            vec![
                date(2024, 1, 6),
                date(2024, 1, 7),
                date(2024, 1, 14),
                date(2024, 1, 31),
                date(2024, 2, 29),
            ]
        );
        assert_eq!(
            revisions.iter().map(|r| r.number).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn saturday_merges_next_day_and_sunday() {
        let revisions = generate_revisions(date(2024, 1, 6));
        assert_eq!(
            scheduled(&revisions),
            vec![
                date(2024, 1, 7),
                date(2024, 1, 14),
                date(2024, 1, 31),
                date(2024, 2, 29),
            ]
        );
        assert_eq!(revisions.last().unwrap().number, 4);
    }

    #[test]
    fn sunday_start_skips_to_following_sunday() {
        let revisions = generate_revisions(date(2024, 1, 7));
        assert_eq!(revisions[0].scheduled, date(2024, 1, 8));
        assert_eq!(revisions[1].scheduled, date(2024, 1, 14));
        assert_eq!(revisions[2].scheduled, date(2024, 1, 21));
    }

    #[test]
    fn late_in_month_rolls_monthly_pass_forward() {
        // The second Sunday (Feb 4) is after Jan 31, so the monthly pass
        // moves to the end of February.
        let revisions = generate_revisions(date(2024, 1, 25));
        assert_eq!(
            scheduled(&revisions),
            vec![
                date(2024, 1, 26),
                date(2024, 1, 28),
                date(2024, 2, 4),
                date(2024, 2, 29),
                date(2024, 3, 31),
            ]
        );
    }

    #[test]
    fn month_end_equal_to_second_sunday_rolls_forward() {
        // 2024-03-17 is a Sunday: next Sunday is Mar 24, second is Mar 31,
        // which coincides with the end of March.
        let revisions = generate_revisions(date(2024, 3, 17));
        assert_eq!(
            scheduled(&revisions),
            vec![
                date(2024, 3, 18),
                date(2024, 3, 24),
                date(2024, 3, 31),
                date(2024, 4, 30),
                date(2024, 5, 31),
            ]
        );
    }

    #[test]
    fn december_wraps_year() {
        let revisions = generate_revisions(date(2023, 12, 28));
        assert_eq!(
            scheduled(&revisions),
            vec![
                date(2023, 12, 29),
                date(2023, 12, 31),
                date(2024, 1, 7),
                date(2024, 1, 31),
                date(2024, 2, 29),
            ]
        );
    }

    #[test_case(date(2024, 1, 1) ; "monday")]
    #[test_case(date(2024, 2, 29) ; "leap day")]
    #[test_case(date(2023, 2, 28) ; "end of february")]
    #[test_case(date(2024, 6, 15) ; "saturday")]
    #[test_case(date(2024, 6, 16) ; "sunday")]
    #[test_case(date(2024, 12, 31) ; "new years eve")]
    fn schedule_invariants(start: NaiveDate) {
        let revisions = generate_revisions(start);

        assert!(revisions.len() == 4 || revisions.len() == 5);
        assert!(revisions.windows(2).all(|w| w[0].scheduled < w[1].scheduled));
        assert!(revisions.iter().zip(1..).all(|(r, n)| r.number == n));
        assert!(revisions.iter().all(|r| r.scheduled > start));
        assert_eq!(revisions[0].scheduled, start + Days::new(1));

        let first_sunday = revisions
            .iter()
            .find(|r| r.scheduled.weekday() == Weekday::Sun)
            .unwrap();
        assert!(first_sunday.scheduled > start);
        assert!(first_sunday.scheduled <= start + Days::new(7));

        let last = revisions.last().unwrap().scheduled;
        assert_eq!(end_of_month(last), last);
    }

    #[test_case(date(2024, 1, 9), RevisionStatus::Locked ; "future")]
    #[test_case(date(2024, 1, 10), RevisionStatus::Due ; "today")]
    #[test_case(date(2024, 1, 11), RevisionStatus::Overdue ; "past")]
    fn status_relative_to_today(today: NaiveDate, expected: RevisionStatus) {
        let revision = Revision {
            number: 1,
            scheduled: date(2024, 1, 10),
            completed: None,
        };
        assert_eq!(revision_status(&revision, today), expected);
    }

    #[test]
    fn completed_wins_over_schedule() {
        let revision = Revision {
            number: 1,
            scheduled: date(2030, 1, 1),
            completed: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        };
        assert_eq!(
            revision_status(&revision, date(2024, 1, 1)),
            RevisionStatus::Completed
        );
    }

    #[test]
    fn next_revision_is_first_incomplete() {
        let mut revisions = generate_revisions(date(2024, 1, 5));
        assert_eq!(next_revision(&revisions).unwrap().number, 1);

        revisions[0].completed = Some(Utc::now());
        revisions[1].completed = Some(Utc::now());
        assert_eq!(next_revision(&revisions).unwrap().number, 3);

        for revision in &mut revisions {
            revision.completed = Some(Utc::now());
        }
        assert!(next_revision(&revisions).is_none());
    }

    fn problem(title: &str, start: NaiveDate) -> Problem {
        Problem::new(
            title.to_string(),
            format!("https://example.com/{title}"),
            Difficulty::Medium,
            Utc::now(),
            start,
        )
    }

    #[test]
    fn due_items_puts_overdue_first() {
        let today = date(2024, 1, 10);
        let due_today = problem("due", date(2024, 1, 9));
        let overdue = problem("overdue", date(2024, 1, 2));
        let locked = problem("locked", date(2024, 1, 10));
        let mut archived = problem("archived", date(2024, 1, 2));
        archived.archived = true;

        let problems = vec![due_today, overdue, locked, archived];
        let items = due_items(&problems, today);

        let titles: Vec<_> = items.iter().map(|i| i.problem.title.as_str()).collect();
        assert_eq!(titles, vec!["overdue", "due"]);
        assert_eq!(items[0].status, RevisionStatus::Overdue);
        assert_eq!(items[1].status, RevisionStatus::Due);
    }

    #[test]
    fn due_items_ignores_finished_problems() {
        let mut finished = problem("finished", date(2024, 1, 2));
        for revision in &mut finished.revisions {
            revision.completed = Some(Utc::now());
        }
        assert!(due_items(&[finished], date(2024, 6, 1)).is_empty());
    }
}
