//! Daily practice activity, as shown by the heatmap.
//!
//! Every revision completion counts as one unit of activity on the day it
//! happened, and so does adding a problem.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, TimeZone};

use crate::domain::Problem;

/// Number of days covered by the heatmap, ending today.
pub const HEATMAP_DAYS: u64 = 365;

/// Activity counts keyed by calendar day in the given time zone.
#[must_use]
pub fn activity_counts<Tz: TimeZone>(problems: &[Problem], tz: &Tz) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for problem in problems {
        let completions = problem.revisions.iter().filter_map(|r| r.completed);
        for timestamp in completions.chain(std::iter::once(problem.added)) {
            *counts
                .entry(timestamp.with_timezone(tz).date_naive())
                .or_insert(0) += 1;
        }
    }
    counts
}

/// One cell of the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Day {
    /// The calendar day.
    pub date: NaiveDate,
    /// Activity on that day.
    pub count: usize,
}

impl Day {
    /// Bucket the count into one of five shades (0 = none, 4 = busiest).
    #[must_use]
    pub const fn intensity(&self) -> u8 {
        match self.count {
            0 => 0,
            1 => 1,
            2..=3 => 2,
            4..=5 => 3,
            _ => 4,
        }
    }
}

/// Lay out the last [`HEATMAP_DAYS`] days as whole weeks, Sunday to
/// Saturday.
///
/// The first week starts on the Sunday on or before the first covered day,
/// and the last week ends on the Saturday on or after `today`, so every week
/// has exactly seven days.
#[must_use]
pub fn calendar(counts: &BTreeMap<NaiveDate, usize>, today: NaiveDate) -> Vec<[Day; 7]> {
    let first = today - Days::new(HEATMAP_DAYS - 1);
    let start = first - Days::new(u64::from(first.weekday().num_days_from_sunday()));
    let end = today + Days::new(6 - u64::from(today.weekday().num_days_from_sunday()));

    let days: Vec<Day> = start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| Day {
            date,
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect();

    days.chunks_exact(7)
        .filter_map(|week| <[Day; 7]>::try_from(week).ok())
        .collect()
}
