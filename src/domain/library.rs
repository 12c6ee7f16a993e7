//! Queries over the whole problem collection.

use std::{cmp::Reverse, fmt, str::FromStr};

use regex::Regex;

use crate::domain::Problem;

/// Ordering applied to library listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most recently added first.
    #[default]
    Date,
    /// Easiest first; ties keep the most recently added first.
    Difficulty,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "difficulty" => Ok(Self::Difficulty),
            _ => Err(format!("unknown sort order: {s}")),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Date => "date",
            Self::Difficulty => "difficulty",
        })
    }
}

/// Filters applied to a library listing.
#[derive(Debug, Clone, Default)]
pub struct Query {
    /// Case-insensitive substring the title must contain.
    pub search: Option<String>,
    /// Regular expression the title must match.
    pub pattern: Option<Regex>,
    /// Tag the problem must carry (case-insensitive).
    pub tag: Option<String>,
    /// Include archived problems.
    pub include_archived: bool,
    /// Result ordering.
    pub sort: SortOrder,
}

impl Query {
    /// Whether a single problem passes the filters.
    #[must_use]
    pub fn matches(&self, problem: &Problem) -> bool {
        if problem.archived && !self.include_archived {
            return false;
        }

        if let Some(search) = &self.search {
            if !problem
                .title
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }

        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&problem.title) {
                return false;
            }
        }

        if let Some(tag) = &self.tag {
            if !problem.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }

        true
    }

    /// Filter and sort a collection of problems.
    #[must_use]
    pub fn apply<'a>(&self, problems: &'a [Problem]) -> Vec<&'a Problem> {
        let mut selected: Vec<_> = problems.iter().filter(|p| self.matches(p)).collect();

        selected.sort_by_key(|p| Reverse(p.added));
        if self.sort == SortOrder::Difficulty {
            selected.sort_by_key(|p| p.difficulty);
        }

        selected
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};

    use super::*;
    use crate::domain::Difficulty;

    fn library() -> Vec<Problem> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let now = Utc::now();
        let mut problems = Vec::new();
        for (offset, (title, difficulty)) in [
            ("Two Sum", Difficulty::Easy),
            ("Word Ladder", Difficulty::Hard),
            ("Valid Anagram", Difficulty::Easy),
            ("Coin Change", Difficulty::Medium),
        ]
        .into_iter()
        .enumerate()
        {
            let mut problem = Problem::new(
                title.to_string(),
                format!("https://leetcode.com/problems/{offset}/"),
                difficulty,
                now - Duration::days(i64::try_from(offset).unwrap()),
                start,
            );
            problem.add_tag(if offset % 2 == 0 { "Array" } else { "Graph" }.to_string());
            problems.push(problem);
        }
        problems
    }

    fn titles(problems: &[&Problem]) -> Vec<String> {
        problems.iter().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn default_sorts_by_most_recent() {
        let problems = library();
        let result = Query::default().apply(&problems);
        assert_eq!(
            titles(&result),
            vec!["Two Sum", "Word Ladder", "Valid Anagram", "Coin Change"]
        );
    }

    #[test]
    fn difficulty_sort_is_stable_on_recency() {
        let problems = library();
        let query = Query {
            sort: SortOrder::Difficulty,
            ..Query::default()
        };
        assert_eq!(
            titles(&query.apply(&problems)),
            vec!["Two Sum", "Valid Anagram", "Coin Change", "Word Ladder"]
        );
    }

    #[test]
    fn search_is_case_insensitive() {
        let problems = library();
        let query = Query {
            search: Some("ANA".to_string()),
            ..Query::default()
        };
        assert_eq!(titles(&query.apply(&problems)), vec!["Valid Anagram"]);
    }

    #[test]
    fn regex_and_tag_filters_combine() {
        let problems = library();
        let query = Query {
            pattern: Some(Regex::new("^(Two|Word)").unwrap()),
            tag: Some("graph".to_string()),
            ..Query::default()
        };
        assert_eq!(titles(&query.apply(&problems)), vec!["Word Ladder"]);
    }

    #[test]
    fn archived_hidden_by_default() {
        let mut problems = library();
        problems[0].archived = true;

        assert_eq!(Query::default().apply(&problems).len(), 3);

        let query = Query {
            include_archived: true,
            ..Query::default()
        };
        assert_eq!(query.apply(&problems).len(), 4);
    }

    #[test]
    fn sort_order_parses() {
        assert_eq!("Date".parse::<SortOrder>().unwrap(), SortOrder::Date);
        assert_eq!(
            "difficulty".parse::<SortOrder>().unwrap(),
            SortOrder::Difficulty
        );
        assert!("title".parse::<SortOrder>().is_err());
    }
}
