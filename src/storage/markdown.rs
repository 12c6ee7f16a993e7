use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ConfidenceEntry, Difficulty, Problem, Revision, problem::single_line};

/// A problem serialized in markdown format with YAML frontmatter.
///
/// ```text
/// ---
/// _version: '1'
/// id: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
/// url: https://leetcode.com/problems/two-sum/
/// difficulty: Easy
/// added: 2024-01-05T09:00:00Z
/// revisions:
/// - number: 1
///   scheduled: 2024-01-06
/// ---
/// # Two Sum
///
/// Notes go here.
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownProblem {
    frontmatter: FrontMatter,
    title: String,
    notes: String,
}

impl MarkdownProblem {
    fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let frontmatter = serde_yaml::to_string(&self.frontmatter).map_err(io::Error::other)?;

        let heading = format!("# {}", single_line(&self.title));

        let result = if self.notes.is_empty() {
            format!("---\n{frontmatter}---\n{heading}\n")
        } else {
            format!("---\n{frontmatter}---\n{heading}\n\n{}\n", self.notes)
        };

        writer.write_all(result.as_bytes())
    }

    pub(crate) fn read<R: BufRead>(reader: &mut R) -> Result<Self, LoadError> {
        let mut lines = reader.lines();

        let first_line = lines
            .next()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "Empty input"))??;

        if first_line.trim() != "---" {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Expected frontmatter starting with '---'",
            )
            .into());
        }

        // Collect lines until the closing '---'
        let mut closed = false;
        let mut frontmatter_lines = Vec::new();
        for line in lines.by_ref() {
            let line = line?;
            if line.trim() == "---" {
                closed = true;
                break;
            }
            frontmatter_lines.push(line);
        }

        if !closed {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Frontmatter is not terminated by '---'",
            )
            .into());
        }

        let content = lines.collect::<Result<Vec<_>, _>>()?.join("\n");

        let frontmatter: FrontMatter = serde_yaml::from_str(&frontmatter_lines.join("\n"))?;
        let (title, notes) = parse_content(&content)?;

        Ok(Self {
            frontmatter,
            title,
            notes,
        })
    }

    /// Writes the problem to a specific file path.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_path(&self, file_path: &Path) -> io::Result<()> {
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(file_path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()
    }

    /// Reads a problem from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, cannot be read, or is not
    /// a valid problem document.
    pub fn load_from_path(file_path: &Path) -> Result<Self, LoadError> {
        let file = File::open(file_path).map_err(|io_error| match io_error.kind() {
            io::ErrorKind::NotFound => LoadError::NotFound,
            _ => LoadError::Io(io_error),
        })?;

        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// The identifier recorded in the frontmatter.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.frontmatter.id
    }
}

/// Splits markdown content into the title (first heading) and notes
/// (everything after it, less the blank line separating them).
fn parse_content(content: &str) -> Result<(String, String), LoadError> {
    let (heading_line_idx, line) = content
        .lines()
        .enumerate()
        .find(|(_, line)| line.trim().starts_with('#'))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "No heading found in content - the title must be the first heading",
            )
        })?;

    let title = line.trim().trim_start_matches('#').trim().to_string();

    let mut body = content.split('\n').skip(heading_line_idx + 1).peekable();
    body.next_if(|line| line.trim().is_empty());
    let notes = body.collect::<Vec<_>>().join("\n");

    Ok((title, notes))
}

/// Errors that can occur when loading a problem from markdown.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The problem file was not found.
    #[error("problem file not found")]
    NotFound,
    /// An I/O error occurred.
    #[error("failed to read problem file")]
    Io(#[from] io::Error),
    /// The YAML frontmatter could not be parsed.
    #[error("invalid frontmatter")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "FrontMatterVersion")]
#[serde(into = "FrontMatterVersion")]
struct FrontMatter {
    id: Uuid,
    url: String,
    difficulty: Difficulty,
    added: DateTime<Utc>,
    tags: Vec<String>,
    archived: bool,
    revisions: Vec<Revision>,
    confidence: Vec<ConfidenceEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum FrontMatterVersion {
    #[serde(rename = "1")]
    V1 {
        id: Uuid,
        url: String,
        #[serde(default)]
        difficulty: Difficulty,
        added: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        archived: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        revisions: Vec<Revision>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        confidence: Vec<ConfidenceEntry>,
    },
}

impl From<FrontMatterVersion> for FrontMatter {
    fn from(version: FrontMatterVersion) -> Self {
        match version {
            FrontMatterVersion::V1 {
                id,
                url,
                difficulty,
                added,
                tags,
                archived,
                revisions,
                confidence,
            } => Self {
                id,
                url,
                difficulty,
                added,
                tags,
                archived,
                revisions,
                confidence,
            },
        }
    }
}

impl From<FrontMatter> for FrontMatterVersion {
    fn from(front_matter: FrontMatter) -> Self {
        let FrontMatter {
            id,
            url,
            difficulty,
            added,
            tags,
            archived,
            revisions,
            confidence,
        } = front_matter;
        Self::V1 {
            id,
            url,
            difficulty,
            added,
            tags,
            archived,
            revisions,
            confidence,
        }
    }
}

impl From<Problem> for MarkdownProblem {
    fn from(problem: Problem) -> Self {
        let Problem {
            id,
            title,
            url,
            difficulty,
            tags,
            added,
            notes,
            revisions,
            confidence,
            archived,
        } = problem;

        Self {
            frontmatter: FrontMatter {
                id,
                url,
                difficulty,
                added,
                tags,
                archived,
                revisions,
                confidence,
            },
            title,
            notes,
        }
    }
}

impl From<MarkdownProblem> for Problem {
    fn from(markdown: MarkdownProblem) -> Self {
        let MarkdownProblem {
            frontmatter:
                FrontMatter {
                    id,
                    url,
                    difficulty,
                    added,
                    tags,
                    archived,
                    revisions,
                    confidence,
                },
            title,
            notes,
        } = markdown;

        Self {
            id,
            title,
            url,
            difficulty,
            tags,
            added,
            notes,
            revisions,
            confidence,
            archived,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use chrono::{NaiveDate, TimeZone};
    use tempfile::TempDir;

    use super::*;
    use crate::domain::Confidence;

    const FULL: &str = r"---
_version: '1'
id: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
url: https://leetcode.com/problems/two-sum/
difficulty: Easy
added: 2024-01-05T09:00:00Z
tags:
- array
- hash-table
archived: true
revisions:
- number: 1
  scheduled: 2024-01-06
  completed: 2024-01-06T18:30:00Z
- number: 2
  scheduled: 2024-01-07
confidence:
- date: 2024-01-06T18:31:00Z
  level: 4
---
# Two Sum

Use a hash map of complements.
";

    fn read(input: &str) -> Result<MarkdownProblem, LoadError> {
        MarkdownProblem::read(&mut Cursor::new(input))
    }

    #[test]
    fn reads_all_fields() {
        let problem = Problem::from(read(FULL).unwrap());

        assert_eq!(
            problem.id,
            Uuid::parse_str("12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53").unwrap()
        );
        assert_eq!(problem.title, "Two Sum");
        assert_eq!(problem.url, "https://leetcode.com/problems/two-sum/");
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert_eq!(problem.added, Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap());
        assert_eq!(problem.tags, vec!["array", "hash-table"]);
        assert!(problem.archived);
        assert_eq!(problem.notes, "Use a hash map of complements.");
        assert_eq!(problem.revisions.len(), 2);
        assert_eq!(
            problem.revisions[1].scheduled,
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
        );
        assert!(problem.revisions[0].completed.is_some());
        assert_eq!(problem.active_revision().unwrap().number, 2);
        assert_eq!(problem.current_confidence(), Some(Confidence::new(4).unwrap()));
    }

    #[test]
    fn write_then_read_preserves_problem() {
        let original = Problem::from(read(FULL).unwrap());

        let mut bytes = Vec::new();
        MarkdownProblem::from(original.clone())
            .write(&mut bytes)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("---\n_version: '1'\n"));
        assert!(text.contains("\n# Two Sum\n"));
        assert_eq!(Problem::from(read(&text).unwrap()), original);
    }

    #[test]
    fn notes_keep_surrounding_whitespace() {
        let original = Problem {
            notes: "    indented code\n\nmore\n".to_string(),
            ..Problem::from(read(FULL).unwrap())
        };

        let mut bytes = Vec::new();
        MarkdownProblem::from(original.clone())
            .write(&mut bytes)
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(Problem::from(read(&text).unwrap()), original);
    }

    #[test]
    fn multiline_title_is_written_as_one_heading() {
        let problem = Problem {
            title: "Two Sum\nhash map".to_string(),
            notes: "    indented code".to_string(),
            ..Problem::from(read(FULL).unwrap())
        };

        let mut bytes = Vec::new();
        MarkdownProblem::from(problem).write(&mut bytes).unwrap();
        let reloaded = Problem::from(read(&String::from_utf8(bytes).unwrap()).unwrap());

        assert_eq!(reloaded.title, "Two Sum hash map");
        assert_eq!(reloaded.notes, "    indented code");
    }

    #[test]
    fn minimal_document_uses_defaults() {
        let input = r"---
_version: '1'
id: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
url: https://neetcode.io/problems/maximum-subarray
added: 2024-01-05T09:00:00Z
---
# Maximum Subarray
";
        let problem = Problem::from(read(input).unwrap());

        assert_eq!(problem.difficulty, Difficulty::Medium);
        assert!(problem.tags.is_empty());
        assert!(!problem.archived);
        assert!(problem.revisions.is_empty());
        assert!(problem.confidence.is_empty());
        assert_eq!(problem.notes, "");
    }

    #[test]
    fn defaults_are_not_written() {
        let problem = Problem {
            tags: Vec::new(),
            archived: false,
            confidence: Vec::new(),
            ..Problem::from(read(FULL).unwrap())
        };

        let mut bytes = Vec::new();
        MarkdownProblem::from(problem).write(&mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(!text.contains("tags:"));
        assert!(!text.contains("archived:"));
        assert!(!text.contains("confidence:"));
    }

    #[test]
    fn notes_may_contain_triple_dashes() {
        let input = r"---
_version: '1'
id: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
url: https://leetcode.com/problems/two-sum/
added: 2024-01-05T09:00:00Z
---
# Two Sum

first
---
second
";
        let problem = Problem::from(read(input).unwrap());
        assert_eq!(problem.notes, "first\n---\nsecond");
    }

    #[test]
    fn invalid_frontmatter_start() {
        assert!(matches!(read("# Two Sum"), Err(LoadError::Io(_))));
    }

    #[test]
    fn missing_frontmatter_end() {
        let input = "---\nid: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53\n# Two Sum\n";
        assert!(matches!(read(input), Err(LoadError::Io(_))));
    }

    #[test]
    fn invalid_yaml() {
        let input = "---\ninvalid: yaml: structure:\n---\n# Two Sum\n";
        assert!(matches!(read(input), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let input = FULL.replace("level: 4", "level: 9");
        assert!(matches!(read(&input), Err(LoadError::Yaml(_))));
    }

    #[test]
    fn no_heading_in_content() {
        let input = r"---
_version: '1'
id: 12b3f5c5-b1a8-4aa8-a882-20ff1c2aab53
url: https://leetcode.com/problems/two-sum/
added: 2024-01-05T09:00:00Z
---
Just plain text without a heading
";
        assert!(matches!(read(input), Err(LoadError::Io(_))));
    }

    #[test]
    fn empty_input() {
        assert!(read("").is_err());
    }

    #[test]
    fn save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("problem.md");
        let original = Problem::from(read(FULL).unwrap());

        MarkdownProblem::from(original.clone())
            .save_to_path(&path)
            .unwrap();
        let loaded = MarkdownProblem::load_from_path(&path).unwrap();

        assert_eq!(loaded.id(), original.id);
        assert_eq!(Problem::from(loaded), original);
    }

    #[test]
    fn load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = MarkdownProblem::load_from_path(&temp_dir.path().join("missing.md"));
        assert!(matches!(result, Err(LoadError::NotFound)));
    }
}
