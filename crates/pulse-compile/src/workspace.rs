/*
 * workspace.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Isolated working directory for one compile request.
 */

//! Isolated working directory for one compile request.
//!
//! Every request gets a fresh temporary directory. All source files are
//! written before any compiler runs, and the directory is removed when the
//! [`WorkDir`] is dropped, on every exit path.

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::engine::{LatexEngine, with_suffix};
use crate::request::SourceFile;

/// Prefix for per-request working directories.
const WORKDIR_PREFIX: &str = "pulse-tex-";

/// A per-request working directory, removed on drop.
#[derive(Debug)]
pub(crate) struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create a fresh, empty working directory.
    pub fn create() -> io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(WORKDIR_PREFIX).tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write every source file, creating parent directories as needed.
    pub fn materialize(&self, files: &[SourceFile]) -> io::Result<()> {
        for file in files {
            let target = self.path().join(&file.path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&target, &file.content)?;
        }
        tracing::debug!(
            files = files.len(),
            dir = %self.path().display(),
            "materialized sources"
        );
        Ok(())
    }
}

/// Where an engine leaves the artifacts of interest for a main file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildArtifacts {
    pub pdf: PathBuf,
    pub synctex_gz: PathBuf,
    pub synctex: PathBuf,
}

impl BuildArtifacts {
    pub fn locate(cwd: &Path, engine: LatexEngine, main_file: &str) -> Self {
        let stem = cwd.join(engine.output_stem(main_file));
        Self {
            pdf: with_suffix(&stem, "pdf"),
            synctex_gz: with_suffix(&stem, "synctex.gz"),
            synctex: with_suffix(&stem, "synctex"),
        }
    }

    /// The SyncTeX artifact actually written, preferring the compressed one.
    pub fn existing_synctex(&self) -> Option<&Path> {
        [&self.synctex_gz, &self.synctex]
            .into_iter()
            .find(|p| p.is_file())
            .map(PathBuf::as_path)
    }
}
