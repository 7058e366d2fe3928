/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for compile requests and configuration.
 */

//! Error types for compile requests and configuration.
//!
//! These cover problems detected *before* any compiler runs. Failures of
//! the compiler passes themselves are not errors; they are reported in a
//! [`CompilationResult`](crate::CompilationResult).

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a compile request or loading configuration.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The request contains no source files.
    #[error("No files in project")]
    NoFiles,

    /// The main file is not among the request's files (or is empty).
    #[error("Main file '{0}' not found")]
    MainFileMissing(String),

    /// A file path or project id would escape its directory.
    #[error("Unsafe path: {0}")]
    UnsafePath(String),

    /// Unrecognised TeX engine name.
    #[error("Unknown LaTeX engine: {0} (expected tectonic, pdflatex, xelatex or lualatex)")]
    UnknownEngine(String),

    /// Unrecognised bibliography resolver name.
    #[error("Unknown bibliography engine: {0} (expected biber or bibtex)")]
    UnknownBibEngine(String),

    /// Invalid configuration file or value.
    #[error("Invalid configuration in {}: {message}", path.display())]
    Config {
        /// Where the bad value came from (file path or environment variable)
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// IO error while loading sources or configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Create a configuration error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
