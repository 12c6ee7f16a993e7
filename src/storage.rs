/// A filesystem backed problem store.
pub mod directory;
/// Markdown serialization for problems.
pub mod markdown;
mod store;

pub use directory::{Directory, DirectoryLoadError};
pub use markdown::{LoadError, MarkdownProblem};
pub use store::{AmbiguousReference, CreateOutcome, ProblemStore, StoreError};
