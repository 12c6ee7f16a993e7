//! Spaced-repetition tracking for coding interview practice
//!
//! Problems are markdown documents stored in a directory. Each carries a
//! schedule of revisions generated from the day it was solved; a revision is
//! due on its scheduled day and overdue after it, until it is completed.

pub mod domain;
pub use domain::{Config, Difficulty, DueItem, Problem, Revision, RevisionStatus};

/// Filesystem storage for problems.
pub mod storage;
pub use storage::{CreateOutcome, Directory, ProblemStore};

pub mod parser;
pub use parser::{ParsedProblem, parse_problem_url};

pub mod sync;

pub mod notify;
