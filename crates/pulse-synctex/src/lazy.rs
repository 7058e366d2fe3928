/*
 * lazy.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Deferred parsing of a SyncTeX artifact.
 */

//! Deferred parsing of a SyncTeX artifact.
//!
//! A [`LazySyncMap`] is created right after a compile, but nothing is read
//! until the first position query. The parsed map is memoised; a failed read
//! is not, so a later query retries. After a recompilation, create a new
//! handle rather than reusing the old one.

use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;

use crate::error::Result;
use crate::map::ParsedSyncMap;
use crate::types::SyncPosition;

/// A SyncTeX artifact that is parsed on first use.
#[derive(Debug)]
pub struct LazySyncMap {
    path: PathBuf,
    map: OnceCell<ParsedSyncMap>,
}

impl LazySyncMap {
    /// Create a handle for the artifact at `path` (the `.gz` sibling is also tried).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            map: OnceCell::new(),
        }
    }

    /// The artifact path this handle was created for.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the artifact has been parsed yet.
    pub fn is_loaded(&self) -> bool {
        self.map.get().is_some()
    }

    /// Parse the artifact if needed and return the map.
    pub fn get(&self) -> Result<&ParsedSyncMap> {
        self.map
            .get_or_try_init(|| ParsedSyncMap::from_path(&self.path))
    }

    /// Whether the artifact contains any anchors.
    pub fn is_valid(&self) -> Result<bool> {
        Ok(self.get()?.is_valid())
    }

    /// See [`ParsedSyncMap::page_for_line`].
    pub fn page_for_line(&self, line: u32) -> Result<Option<u32>> {
        Ok(self.get()?.page_for_line(line))
    }

    /// See [`ParsedSyncMap::position_for_line`].
    pub fn position_for_line(&self, line: u32) -> Result<Option<SyncPosition>> {
        Ok(self.get()?.position_for_line(line))
    }

    /// See [`ParsedSyncMap::line_for_position`].
    pub fn line_for_position(&self, page: u32, x: f64, y: f64) -> Result<Option<u32>> {
        Ok(self.get()?.line_for_position(page, x, y))
    }
}
