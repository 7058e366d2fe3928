/*
 * project.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Loading a project's source files from disk.
 */

//! Loading a project's source files from disk.

use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CompileError, Result};
use crate::request::SourceFile;

/// Read every regular file under `root` as a [`SourceFile`].
///
/// Paths are relative to `root` and `/`-separated. Walking skips:
/// - hidden entries (names starting with `.`)
/// - build leftovers from a previous local compile (`output.*`)
///
/// Files are returned sorted by path.
pub fn load_source_dir(root: &Path) -> Result<Vec<SourceFile>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_ignored(e));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            CompileError::Io(e.into_io_error().unwrap_or_else(|| {
                std::io::Error::other(format!("cannot walk {}", root.display()))
            }))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let content = std::fs::read(entry.path())?;
        debug!(%path, bytes = content.len(), "loaded source file");
        files.push(SourceFile::new(path, content));
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn is_ignored(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return true;
    }
    entry.depth() == 1 && entry.file_type().is_file() && name.starts_with("output.")
}
