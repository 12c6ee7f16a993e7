use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Problem, Revision};

/// Persistent storage for problems.
///
/// Lookups that find nothing return `None` (or `false` for mutations) rather
/// than an error. Errors are reserved for failures of the backing storage.
pub trait ProblemStore {
    /// All problems, most recently added first.
    fn problems(&self) -> Vec<Problem>;

    /// Look up a problem by identifier.
    fn get(&self, id: Uuid) -> Option<Problem>;

    /// Look up a problem by its URL.
    fn find_by_url(&self, url: &str) -> Option<Problem>;

    /// Insert a new problem.
    ///
    /// Creation is idempotent by URL: if a problem with the same URL already
    /// exists the store is left unchanged and [`CreateOutcome::Duplicate`] is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem cannot be persisted.
    fn create(&mut self, problem: Problem) -> Result<CreateOutcome, StoreError>;

    /// Overwrite a problem in full.
    ///
    /// Returns `false` if no problem with that identifier exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the new URL belongs to a different problem, or if
    /// the problem cannot be persisted.
    fn update(&mut self, problem: Problem) -> Result<bool, StoreError>;

    /// Replace only the added timestamp and revision schedule of a problem.
    ///
    /// Returns `false` if no problem with that identifier exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the problem cannot be persisted.
    fn update_schedule(
        &mut self,
        id: Uuid,
        added: DateTime<Utc>,
        revisions: Vec<Revision>,
    ) -> Result<bool, StoreError>;

    /// Remove a problem.
    ///
    /// Returns `false` if no problem with that identifier exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be modified.
    fn delete(&mut self, id: Uuid) -> Result<bool, StoreError>;

    /// Find a problem from a user supplied reference.
    ///
    /// The reference may be a full identifier, a unique prefix of one, or the
    /// problem's URL.
    ///
    /// # Errors
    ///
    /// Returns an error if a prefix matches more than one problem.
    fn resolve(&self, reference: &str) -> Result<Option<Problem>, AmbiguousReference> {
        let reference = reference.trim();

        if let Ok(id) = Uuid::parse_str(reference) {
            return Ok(self.get(id));
        }

        if let Some(problem) = self.find_by_url(reference) {
            return Ok(Some(problem));
        }

        let prefix = reference.to_ascii_lowercase();
        if prefix.is_empty() {
            return Ok(None);
        }

        let mut matches: Vec<_> = self
            .problems()
            .into_iter()
            .filter(|p| p.id.to_string().starts_with(&prefix))
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(AmbiguousReference {
                reference: reference.to_string(),
                candidates: matches.into_iter().map(|p| p.id).collect(),
            }),
        }
    }
}

/// The result of [`ProblemStore::create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The problem was stored.
    Created,
    /// A problem with the same URL already exists; nothing was stored.
    Duplicate {
        /// The identifier of the existing problem.
        existing: Uuid,
    },
}

/// Errors raised by the backing storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A problem file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A problem file could not be removed.
    #[error("failed to remove {}", path.display())]
    Remove {
        /// The file being removed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The URL is already used by another problem.
    #[error("another problem ({existing}) already uses the URL {url}")]
    DuplicateUrl {
        /// The contested URL.
        url: String,
        /// The problem that owns it.
        existing: Uuid,
    },
}

/// A reference matched more than one problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{reference}' matches {} problems", candidates.len())]
pub struct AmbiguousReference {
    /// The reference as given.
    pub reference: String,
    /// Identifiers of the matching problems.
    pub candidates: Vec<Uuid>,
}
