//! Recognise problem URLs from known practice sites.

use std::fmt;

use url::Url;

use crate::domain::Difficulty;

/// A practice site whose URLs can be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// leetcode.com
    LeetCode,
    /// neetcode.io
    NeetCode,
    /// takeuforward.org
    TakeUForward,
}

impl Source {
    const ALL: [Self; 3] = [Self::LeetCode, Self::NeetCode, Self::TakeUForward];

    const fn host(self) -> &'static str {
        match self {
            Self::LeetCode => "leetcode.com",
            Self::NeetCode => "neetcode.io",
            Self::TakeUForward => "takeuforward.org",
        }
    }

    fn from_host(host: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|source| host.contains(source.host()))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LeetCode => "LeetCode",
            Self::NeetCode => "NeetCode",
            Self::TakeUForward => "TakeUForward",
        })
    }
}

/// The details that can be inferred from a problem URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedProblem {
    /// The slug, title-cased.
    pub title: String,
    /// The URL to store.
    pub url: String,
    /// Always [`Difficulty::Medium`]; the URL carries no difficulty.
    pub difficulty: Difficulty,
    /// The path segment naming the problem.
    pub slug: String,
    /// The site the URL belongs to.
    pub source: Source,
}

/// The canonical URL of a LeetCode problem.
#[must_use]
pub fn leetcode_url(slug: &str) -> String {
    format!("https://leetcode.com/problems/{slug}/")
}

/// Parse a problem URL from one of the recognised sites.
///
/// The slug is the path segment following `problems`. Returns `None` if the
/// URL cannot be parsed, the host is not recognised, or there is no slug.
#[must_use]
pub fn parse_problem_url(input: &str) -> Option<ParsedProblem> {
    let url = match Url::parse(input.trim()) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Failed to parse URL '{input}': {e}");
            return None;
        }
    };

    let source = Source::from_host(url.host_str()?)?;

    let slug = url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .skip_while(|segment| *segment != "problems")
        .nth(1)?
        .to_string();

    let url = match source {
        Source::LeetCode => leetcode_url(&slug),
        Source::NeetCode | Source::TakeUForward => url.to_string(),
    };

    Some(ParsedProblem {
        title: title_from_slug(&slug),
        url,
        difficulty: Difficulty::Medium,
        slug,
        source,
    })
}

/// Title-case a slug word by word, splitting on `-`.
#[must_use]
pub fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
