//! Bump semantic version strings embedded in text files.
//!
//! [`version::Version`] holds the parse/mutate/render logic,
//! [`pipeline::Pipeline`] describes what to do with each version found, and
//! [`rewrite`] finds versions inside comment and property contexts and
//! writes the bumped text back through a [`storage::Storage`].

/// `bump.toml` loading and command-line overrides.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// Operations replayed against every version found.
pub mod pipeline;
/// Context scanning and file rewriting.
pub mod rewrite;
/// Whole-file read/write backends.
pub mod storage;
/// Semantic version value and its mutations.
pub mod version;

pub use pipeline::{Operation, Pipeline};
pub use rewrite::{BumpError, BumpReport, BumpTask, Context};
pub use version::{Component, PreRelease, Stage, Version, VersionError};
