/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for SyncTeX artifact reading.
 */

//! Error types for SyncTeX artifact reading.
//!
//! Only a corrupt or unreadable artifact is an error. A missing artifact and
//! malformed record lines both resolve to an empty (or partial) map instead.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a SyncTeX artifact.
#[derive(Debug, Error)]
pub enum SyncTexError {
    /// The artifact exists but could not be read or inflated.
    #[error("Failed to read SyncTeX artifact {}: {source}", path.display())]
    Read {
        /// The resolved artifact path
        path: PathBuf,
        /// The underlying IO (or gzip) error
        #[source]
        source: std::io::Error,
    },
}

impl SyncTexError {
    /// Create a read error for the given artifact path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// The artifact path involved in this error.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncTexError>;
