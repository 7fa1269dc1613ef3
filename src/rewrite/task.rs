use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{BumpError, Context, rewrite_file};
use crate::pipeline::Pipeline;
use crate::storage::Storage;

/// A configured bump over a list of files.
#[derive(Debug, Clone)]
pub struct BumpTask {
    files: Vec<PathBuf>,
    contexts: Vec<Context>,
    pipeline: Pipeline,
}

/// Outcome for one processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    pub substitutions: usize,
}

/// Files processed by [`BumpTask::run`], in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpReport {
    pub files: Vec<FileReport>,
}

impl BumpReport {
    pub fn total_substitutions(&self) -> usize {
        self.files.iter().map(|file| file.substitutions).sum()
    }
}

impl BumpTask {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            files: Vec::new(),
            contexts: Vec::new(),
            pipeline,
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Restrict replacements to `context`. Without any, the defaults apply.
    pub fn with_context(mut self, context: Context) -> Self {
        self.contexts.push(context);
        self
    }

    pub fn with_contexts(mut self, contexts: impl IntoIterator<Item = Context>) -> Self {
        self.contexts.extend(contexts);
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn contexts(&self) -> &[Context] {
        &self.contexts
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Bump every file once, in order. The first failure stops the run;
    /// files after it are not read.
    pub fn run<S>(&self, storage: &S) -> Result<BumpReport, BumpError>
    where
        S: Storage + ?Sized,
    {
        let files = unique_paths(&self.files);
        if files.is_empty() {
            tracing::warn!("No files configured; nothing to bump");
        }
        let mut report = BumpReport::default();
        for path in files {
            let substitutions = rewrite_file(storage, path, &self.contexts, &self.pipeline)
                .inspect_err(|err| tracing::error!("{err}"))?;
            tracing::info!("Bumped {substitutions} version(s) in {}", path.display());
            report.files.push(FileReport {
                path: path.to_path_buf(),
                substitutions,
            });
        }
        Ok(report)
    }
}

fn unique_paths(paths: &[PathBuf]) -> Vec<&Path> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .map(PathBuf::as_path)
        .filter(|path| seen.insert(*path))
        .collect()
}
