use crate::source::SourceFile;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::{Pattern, glob};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub path: Utf8PathBuf,
    /// Path relative to the root the targets were resolved against (best effort).
    pub display_path: String,
    pub source: Result<SourceFile, SourceLoadError>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceLoadError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("not valid UTF-8: {message}")]
    Utf8 { message: String },
}

/// Resolves `targets` against `root` and reads every matching file.
///
/// A target is a file, a directory (scanned for `**/*.rb`) or a glob pattern. Files matching
/// any `exclude` pattern (relative to `root`) are skipped. Unreadable files are returned with
/// an error instead of failing the whole load.
pub fn load_sources(
    root: &Utf8Path,
    targets: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<LoadedSource>> {
    let excludes = exclude
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid exclude pattern '{p}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut paths = BTreeSet::new();
    for target in targets {
        let joined = root.join(target);
        if joined.is_file() {
            paths.insert(joined);
            continue;
        }
        let pattern = if joined.is_dir() {
            joined.join("**/*.rb")
        } else {
            joined
        };
        debug!(pattern = %pattern, "scanning for sources");
        for entry in glob(pattern.as_str()).with_context(|| format!("glob {pattern}"))? {
            let path = entry.map_err(|e| anyhow::anyhow!("glob error: {e}"))?;
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                warn!("skipping non UTF-8 path");
                continue;
            };
            if path.is_file() {
                paths.insert(path);
            }
        }
    }

    let mut out = Vec::new();
    for path in paths {
        let display_path = path
            .strip_prefix(root)
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|_| path.as_str().to_string());
        if excludes.iter().any(|p| p.matches(&display_path)) {
            debug!(path = %display_path, "excluded");
            continue;
        }

        let source = match fs::read(&path) {
            Ok(bytes) => String::from_utf8(bytes)
                .map(SourceFile::new)
                .map_err(|e| SourceLoadError::Utf8 {
                    message: e.to_string(),
                }),
            Err(e) => Err(SourceLoadError::Io {
                message: e.to_string(),
            }),
        };

        out.push(LoadedSource {
            path,
            display_path,
            source,
        });
    }

    debug!(files = out.len(), "loaded sources");
    Ok(out)
}
