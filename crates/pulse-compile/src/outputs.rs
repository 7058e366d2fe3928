/*
 * outputs.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Per-project output store.
 */

//! Per-project output store.
//!
//! Each project keeps its latest document and SyncTeX artifact under
//! `<projects_dir>/<project_id>/`:
//!
//! ```text
//! projects/
//! └── thesis/
//!     ├── output.pdf
//!     └── output.synctex.gz   (or output.synctex)
//! ```
//!
//! Concurrent compiles of the same project race on this directory; callers
//! serialise per project.

use std::io;
use std::path::{Path, PathBuf};

use pulse_synctex::{GZ_SUFFIX, LazySyncMap, SyncPosition, SyncTexError};

use crate::error::{CompileError, Result};
use crate::request::is_safe_relative_path;

const PDF_FILE: &str = "output.pdf";
const SYNCTEX_FILE: &str = "output.synctex";
const SYNCTEX_GZ_FILE: &str = "output.synctex.gz";

/// Output directory of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutputs {
    dir: PathBuf,
}

impl ProjectOutputs {
    /// Outputs stored directly in `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Outputs of `project_id` under `projects_dir`.
    ///
    /// # Errors
    ///
    /// [`CompileError::UnsafePath`] if the id is empty, absolute, nested, or
    /// refers to a parent directory.
    pub fn for_project(projects_dir: &Path, project_id: &str) -> Result<Self> {
        let single_component = !project_id.contains(['/', '\\']);
        if !single_component || !is_safe_relative_path(project_id) {
            return Err(CompileError::UnsafePath(project_id.to_string()));
        }
        Ok(Self::new(projects_dir.join(project_id)))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the published document lives.
    pub fn pdf_path(&self) -> PathBuf {
        self.dir.join(PDF_FILE)
    }

    /// Base path of the published SyncTeX artifact.
    ///
    /// The compressed variant is found through the parser's `.gz` fallback.
    pub fn synctex_path(&self) -> PathBuf {
        self.dir.join(SYNCTEX_FILE)
    }

    pub fn has_pdf(&self) -> bool {
        self.pdf_path().is_file()
    }

    /// Whether either SyncTeX variant has been published.
    pub fn has_synctex(&self) -> bool {
        pulse_synctex::resolve_artifact_path(&self.synctex_path()).is_some()
    }

    /// Copy a freshly built document (and SyncTeX artifact) into the store.
    ///
    /// A `.gz` artifact is stored as `output.synctex.gz`, anything else as
    /// `output.synctex`. Both old artifact variants are removed before the
    /// document is replaced, so a failed copy leaves the store without an
    /// artifact rather than pairing one document with another's artifact.
    ///
    /// Returns the published document and artifact paths.
    pub fn publish(
        &self,
        pdf: &Path,
        synctex: Option<&Path>,
    ) -> io::Result<(PathBuf, Option<PathBuf>)> {
        std::fs::create_dir_all(&self.dir)?;
        remove_if_present(&self.dir.join(SYNCTEX_FILE))?;
        remove_if_present(&self.dir.join(SYNCTEX_GZ_FILE))?;

        let pdf_target = self.pdf_path();
        std::fs::copy(pdf, &pdf_target)?;

        let synctex_target = match synctex {
            Some(source) => {
                let name = if source.to_string_lossy().ends_with(GZ_SUFFIX) {
                    SYNCTEX_GZ_FILE
                } else {
                    SYNCTEX_FILE
                };
                let target = self.dir.join(name);
                std::fs::copy(source, &target)?;
                Some(target)
            }
            None => None,
        };

        tracing::info!(
            dir = %self.dir.display(),
            synctex = synctex_target.is_some(),
            "published outputs"
        );
        Ok((pdf_target, synctex_target))
    }

    /// A lazily parsed view of the published SyncTeX artifact.
    ///
    /// Create a new one after every compile; handles never refresh.
    pub fn sync_map(&self) -> LazySyncMap {
        LazySyncMap::new(self.synctex_path())
    }

    /// Where `line` of the source ends up in the document.
    ///
    /// `file` names the source file the editor is showing. Anchors are not
    /// tagged by input, so it is only logged.
    pub fn forward(
        &self,
        file: Option<&str>,
        line: u32,
    ) -> std::result::Result<Option<SyncPosition>, SyncTexError> {
        let map = self.sync_map();
        if !self.usable(&map)? {
            return Ok(None);
        }
        let position = map.position_for_line(line)?;
        tracing::debug!(file, line, found = position.is_some(), "forward sync");
        Ok(position)
    }

    /// Which source line produced the content at `(page, x, y)`.
    pub fn reverse(
        &self,
        page: u32,
        x: f64,
        y: f64,
    ) -> std::result::Result<Option<u32>, SyncTexError> {
        let map = self.sync_map();
        if !self.usable(&map)? {
            return Ok(None);
        }
        let line = map.line_for_position(page, x, y)?;
        tracing::debug!(page, x, y, line, "reverse sync");
        Ok(line)
    }

    fn usable(&self, map: &LazySyncMap) -> std::result::Result<bool, SyncTexError> {
        if !self.has_synctex() {
            tracing::warn!(dir = %self.dir.display(), "no SyncTeX data for project");
            return Ok(false);
        }
        if !map.is_valid()? {
            tracing::warn!(dir = %self.dir.display(), "SyncTeX data has no anchors");
            return Ok(false);
        }
        Ok(true)
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
