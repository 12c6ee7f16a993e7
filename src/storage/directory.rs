//! A filesystem backed store of problems
//!
//! Each problem lives in its own markdown file named after its identifier,
//! alongside a `config.toml` holding the store [`Config`].

use std::{
    collections::HashMap,
    ffi::OsStr,
    fmt, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use uuid::Uuid;
use walkdir::WalkDir;

use crate::{
    domain::{Config, Problem, Revision},
    storage::{
        markdown::MarkdownProblem,
        store::{CreateOutcome, ProblemStore, StoreError},
    },
};

/// The name of the configuration file in the store root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone)]
struct Entry {
    problem: Problem,
    path: PathBuf,
}

/// A filesystem backed store of problems.
///
/// All problems are read into memory when the directory is opened. Every
/// mutation is written through to disk before it is applied in memory, so a
/// failed write leaves both unchanged.
#[derive(Debug)]
pub struct Directory {
    /// The root of the directory problems are stored in.
    root: PathBuf,
    config: Config,
    entries: HashMap<Uuid, Entry>,
}

impl Directory {
    /// Open a store rooted at the given path and load every problem in it.
    ///
    /// A missing root directory is treated as an empty store; it is created
    /// on the first write.
    ///
    /// # Errors
    ///
    /// If `allow_unrecognised` is `false` in the configuration (the default),
    /// any markdown file in the root that cannot be parsed as a problem
    /// causes an error. Otherwise such files are skipped.
    pub fn open(root: PathBuf) -> Result<Self, DirectoryLoadError> {
        let config = load_config(&root);
        let md_paths = collect_markdown_paths(&root);

        let (loaded, unrecognised): (Vec<_>, Vec<_>) = md_paths
            .par_iter()
            .map(|path| try_load_problem(path))
            .partition(Result::is_ok);

        let loaded: Vec<Entry> = loaded.into_iter().filter_map(Result::ok).collect();
        let unrecognised: Vec<PathBuf> = unrecognised.into_iter().filter_map(Result::err).collect();

        if !config.allow_unrecognised && !unrecognised.is_empty() {
            return Err(DirectoryLoadError::UnrecognisedFiles(unrecognised));
        }

        let mut entries = HashMap::with_capacity(loaded.len());
        for entry in loaded {
            if let Some(previous) = entries.insert(entry.problem.id, entry) {
                tracing::warn!(
                    "Duplicate problem id {} in {}",
                    previous.problem.id,
                    previous.path.display()
                );
            }
        }

        tracing::debug!("Loaded {} problems from {}", entries.len(), root.display());

        Ok(Self {
            root,
            config,
            entries,
        })
    }

    /// The root of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The store configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The number of problems in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no problems.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }

    fn id_for_url(&self, url: &str) -> Option<Uuid> {
        self.entries
            .values()
            .find(|entry| entry.problem.url == url)
            .map(|entry| entry.problem.id)
    }

    fn write(path: &Path, problem: &Problem) -> Result<(), StoreError> {
        MarkdownProblem::from(problem.clone())
            .save_to_path(path)
            .map_err(|source| StoreError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl ProblemStore for Directory {
    fn problems(&self) -> Vec<Problem> {
        let mut problems: Vec<_> = self.entries.values().map(|e| e.problem.clone()).collect();
        problems.sort_by(|a, b| b.added.cmp(&a.added).then_with(|| a.title.cmp(&b.title)));
        problems
    }

    fn get(&self, id: Uuid) -> Option<Problem> {
        self.entries.get(&id).map(|entry| entry.problem.clone())
    }

    fn find_by_url(&self, url: &str) -> Option<Problem> {
        self.id_for_url(url).and_then(|id| self.get(id))
    }

    fn create(&mut self, problem: Problem) -> Result<CreateOutcome, StoreError> {
        if let Some(existing) = self.id_for_url(&problem.url) {
            tracing::info!(
                "Problem with URL {} already exists. Skipping.",
                problem.url
            );
            return Ok(CreateOutcome::Duplicate { existing });
        }

        let path = self.path_for(problem.id);
        Self::write(&path, &problem)?;

        tracing::info!("Added problem: {} ({})", problem.title, problem.id);
        self.entries.insert(problem.id, Entry { problem, path });

        Ok(CreateOutcome::Created)
    }

    fn update(&mut self, problem: Problem) -> Result<bool, StoreError> {
        if let Some(existing) = self.id_for_url(&problem.url) {
            if existing != problem.id {
                return Err(StoreError::DuplicateUrl {
                    url: problem.url,
                    existing,
                });
            }
        }

        let Some(entry) = self.entries.get_mut(&problem.id) else {
            tracing::debug!("No problem with id {} to update", problem.id);
            return Ok(false);
        };

        Self::write(&entry.path, &problem)?;
        tracing::info!("Updated problem: {} ({})", problem.title, problem.id);
        entry.problem = problem;

        Ok(true)
    }

    fn update_schedule(
        &mut self,
        id: Uuid,
        added: DateTime<Utc>,
        revisions: Vec<Revision>,
    ) -> Result<bool, StoreError> {
        let Some(entry) = self.entries.get_mut(&id) else {
            tracing::debug!("No problem with id {id} to reschedule");
            return Ok(false);
        };

        let updated = Problem {
            added,
            revisions,
            ..entry.problem.clone()
        };
        Self::write(&entry.path, &updated)?;
        tracing::info!("Updated schedule for {} ({id})", updated.title);
        entry.problem = updated;

        Ok(true)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let Some(entry) = self.entries.get(&id) else {
            tracing::debug!("No problem with id {id} to delete");
            return Ok(false);
        };

        match std::fs::remove_file(&entry.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} was already removed", entry.path.display());
            }
            Err(source) => {
                return Err(StoreError::Remove {
                    path: entry.path.clone(),
                    source,
                });
            }
        }

        if let Some(entry) = self.entries.remove(&id) {
            tracing::info!("Deleted problem: {} ({id})", entry.problem.title);
        }

        Ok(true)
    }
}

/// The store could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    /// Markdown files that are not valid problem documents.
    UnrecognisedFiles(Vec<PathBuf>),
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognisedFiles(paths) => {
                write!(f, "Unrecognised files: ")?;
                for (i, path) in paths.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", path.display())?;
                }
                Ok(())
            }
        }
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    Config::load(&path).unwrap_or_else(|e| {
        tracing::debug!("Failed to load config: {e}");
        Config::default()
    })
}

fn collect_markdown_paths(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension() == Some(OsStr::new("md")))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn try_load_problem(path: &Path) -> Result<Entry, PathBuf> {
    match MarkdownProblem::load_from_path(path) {
        Ok(markdown) => Ok(Entry {
            problem: Problem::from(markdown),
            path: path.to_path_buf(),
        }),
        Err(e) => {
            tracing::debug!("Failed to load problem from {}: {:?}", path.display(), e);
            Err(path.to_path_buf())
        }
    }
}
