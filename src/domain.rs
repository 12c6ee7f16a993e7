//! Domain models for revision tracking.
//!
//! This module contains the core domain types: problems and their revisions,
//! the scheduling rules that drive them, and configuration.

/// Problem domain model.
pub mod problem;
pub use problem::{Confidence, ConfidenceEntry, Difficulty, Problem, Revision};

/// The revision scheduling engine.
pub mod schedule;
pub use schedule::{DueItem, RevisionStatus};

/// Searching, sorting and summarising the problem library.
pub mod library;

/// Daily activity counts for the heatmap view.
pub mod activity;

mod config;
pub use config::{Config, EmailConfig, QuoteConfig, SyncConfig};
