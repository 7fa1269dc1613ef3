//! Locate versions inside context regions and substitute bumped ones.
//!
//! Each context is applied as its own pass over the output of the previous
//! pass. Inside every region only the first version-shaped substring is
//! replaced; text outside all regions is never touched.

mod context;
mod task;

use std::path::{Path, PathBuf};

pub use context::{Context, ContextError};
pub use task::{BumpReport, BumpTask, FileReport};

use crate::pipeline::Pipeline;
use crate::storage::Storage;
use crate::version::{VersionError, find_version};

/// Failure while bumping a single file.
#[derive(Debug, thiserror::Error)]
pub enum BumpError {
    /// The file could not be read or is not UTF-8 text.
    #[error("Cannot open file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The bumped content could not be written back.
    #[error("Cannot write file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A version found in the file could not be bumped.
    #[error("Cannot bump version in {path}: {source}")]
    Version {
        path: PathBuf,
        source: VersionError,
    },
}

impl BumpError {
    /// File the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            BumpError::Read { path, .. }
            | BumpError::Write { path, .. }
            | BumpError::Version { path, .. } => path,
        }
    }
}

/// Rewritten text plus how many versions were substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub content: String,
    pub substitutions: usize,
}

/// Apply `pipeline` to the first version in every context region of
/// `content`. An empty `contexts` slice selects [`Context::defaults`].
pub fn rewrite_content(
    content: &str,
    contexts: &[Context],
    pipeline: &Pipeline,
) -> Result<Rewritten, VersionError> {
    let defaults;
    let contexts = if contexts.is_empty() {
        defaults = Context::defaults();
        &defaults[..]
    } else {
        contexts
    };

    let mut current = content.to_string();
    let mut substitutions = 0;
    for context in contexts {
        let (next, replaced) = rewrite_regions(&current, context, pipeline)?;
        if replaced > 0 {
            tracing::debug!("Context {} replaced {replaced} version(s)", context.name());
        }
        current = next;
        substitutions += replaced;
    }
    Ok(Rewritten {
        content: current,
        substitutions,
    })
}

/// Read `path`, bump it and write it back once. Returns the substitution
/// count.
pub fn rewrite_file<S>(
    storage: &S,
    path: &Path,
    contexts: &[Context],
    pipeline: &Pipeline,
) -> Result<usize, BumpError>
where
    S: Storage + ?Sized,
{
    let bytes = storage.read_all(path).map_err(|source| BumpError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|err| BumpError::Read {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
    })?;
    let rewritten =
        rewrite_content(&content, contexts, pipeline).map_err(|source| BumpError::Version {
            path: path.to_path_buf(),
            source,
        })?;
    storage
        .write_all(path, rewritten.content.as_bytes())
        .map_err(|source| BumpError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(rewritten.substitutions)
}

fn rewrite_regions(
    content: &str,
    context: &Context,
    pipeline: &Pipeline,
) -> Result<(String, usize), VersionError> {
    let mut output = String::with_capacity(content.len());
    let mut cursor = 0;
    let mut replaced = 0;
    for region in context.regions(content) {
        let Some(found) = find_version(region.as_str()) else {
            continue;
        };
        let start = region.start() + found.start();
        let end = region.start() + found.end();
        let replacement = pipeline.apply(found.as_str())?;
        tracing::debug!("{} -> {replacement}", found.as_str());
        output.push_str(&content[cursor..start]);
        output.push_str(&replacement);
        cursor = end;
        replaced += 1;
    }
    output.push_str(&content[cursor..]);
    Ok((output, replaced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Operation;
    use crate::storage::{MemoryStorage, Storage};
    use std::io;

    /// Serves reads from memory and rejects every write.
    #[derive(Default)]
    struct ReadOnlyStorage(MemoryStorage);

    impl Storage for ReadOnlyStorage {
        fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.0.read_all(path)
        }

        fn write_all(&self, _path: &Path, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            ))
        }
    }

    const HEADER: &str = "/**\n * Library v1.0.0\n * Copyright 2011-2016 Acme Inc \n */\n";

    #[test]
    fn fixed_target_in_block_comment() {
        let rewritten = rewrite_content(
            "/**\n * Library v1.0.0\n */",
            &[],
            &Pipeline::fixed("1.2.3"),
        )
        .unwrap();
        assert_eq!(rewritten.content, "/**\n * Library v1.2.3\n */");
        assert_eq!(rewritten.substitutions, 1);
    }

    #[test]
    fn relative_bump_in_block_comment() {
        let pipeline = Pipeline::steps(
            ["major", "minor", "patch", "rc:2"]
                .into_iter()
                .map(|step| step.parse::<Operation>().unwrap()),
        );
        let rewritten = rewrite_content(HEADER, &[], &pipeline).unwrap();
        assert_eq!(
            rewritten.content,
            "/**\n * Library v2.1.1-rc2\n * Copyright 2011-2016 Acme Inc \n */\n"
        );
    }

    #[test]
    fn only_first_version_in_region_changes() {
        let content = "/** v1.0.0 requires 5.4.0 */";
        let rewritten = rewrite_content(content, &[], &Pipeline::fixed("9.9.9")).unwrap();
        assert_eq!(rewritten.content, "/** v9.9.9 requires 5.4.0 */");
    }

    #[test]
    fn versions_outside_contexts_are_untouched() {
        let content = format!("{HEADER}\n$v = '1.0.0';\nreturn [\n    'version' => '1.0.0'\n];\n");
        let rewritten =
            rewrite_content(&content, &[Context::block_comment()], &Pipeline::fixed("1.2.3"))
                .unwrap();
        assert_eq!(
            rewritten.content,
            content.replacen("v1.0.0", "v1.2.3", 1),
        );
    }

    #[test]
    fn later_contexts_see_earlier_results() {
        let content = "// version: '1.0.0'\n";
        let pipeline = Pipeline::steps([Operation::Increase(crate::version::Component::Patch)]);
        let rewritten = rewrite_content(
            content,
            &[Context::line_comment(), Context::property()],
            &pipeline,
        )
        .unwrap();
        assert_eq!(rewritten.content, "// version: '1.0.2'\n");
        assert_eq!(rewritten.substitutions, 2);
    }

    #[test]
    fn regions_without_versions_are_skipped() {
        let content = "/** no version here */\n// nor here\n";
        let rewritten = rewrite_content(content, &[], &Pipeline::fixed("1.0.0")).unwrap();
        assert_eq!(rewritten.content, content);
        assert_eq!(rewritten.substitutions, 0);
    }

    #[test]
    fn rewrite_file_writes_bumped_content() {
        let storage = MemoryStorage::new();
        storage.insert("lib.js", "// v0.9.0\nconst x = '0.9.0';\n");
        let count = rewrite_file(
            &storage,
            Path::new("lib.js"),
            &[],
            &Pipeline::steps([Operation::Increase(crate::version::Component::Minor)]),
        )
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(
            storage.get_string(Path::new("lib.js")).unwrap(),
            "// v0.10.0\nconst x = '0.9.0';\n"
        );
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let storage = MemoryStorage::new();
        let err = rewrite_file(&storage, Path::new("gone.php"), &[], &Pipeline::fixed("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, BumpError::Read { .. }));
        assert_eq!(err.path(), Path::new("gone.php"));
        assert!(storage.get(Path::new("gone.php")).is_none());
    }

    #[test]
    fn non_utf8_content_is_a_read_error() {
        let storage = MemoryStorage::new();
        storage.insert("blob.bin", vec![0xff, 0xfe, 0x00]);
        let err = rewrite_file(&storage, Path::new("blob.bin"), &[], &Pipeline::fixed("1.0.0"))
            .unwrap_err();
        assert!(matches!(err, BumpError::Read { .. }));
    }

    #[test]
    fn failed_write_is_reported_with_path() {
        let storage = ReadOnlyStorage::default();
        storage.0.insert("lib.php", "// v1.0.0\n");
        let err = rewrite_file(&storage, Path::new("lib.php"), &[], &Pipeline::fixed("1.0.1"))
            .unwrap_err();
        assert!(matches!(err, BumpError::Write { .. }));
        assert_eq!(err.path(), Path::new("lib.php"));
        assert_eq!(
            storage.0.get_string(Path::new("lib.php")).as_deref(),
            Some("// v1.0.0\n")
        );
    }

    #[test]
    fn build_metadata_keeps_surrounding_punctuation() {
        let rewritten =
            rewrite_content("/** Library (v1.0.0+7) */", &[], &Pipeline::fixed("2.0.0")).unwrap();
        assert_eq!(rewritten.content, "/** Library (v2.0.0) */");

        let patch = Pipeline::steps([Operation::Increase(crate::version::Component::Patch)]);
        let rewritten =
            rewrite_content("// Library v1.0.0+12, built daily\n", &[], &patch).unwrap();
        assert_eq!(rewritten.content, "// Library v1.0.1+12, built daily\n");
        let rewritten = rewrite_content("// since 1.0.0+3; see docs\n", &[], &patch).unwrap();
        assert_eq!(rewritten.content, "// since 1.0.1+3; see docs\n");
    }
}
