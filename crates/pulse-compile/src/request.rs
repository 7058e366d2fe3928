/*
 * request.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile requests, pass logs and results.
 */

//! Compile requests, pass logs and results.

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::engine::{BibEngine, LatexEngine};
use crate::error::{CompileError, Result};

/// Main file used when a project does not name one.
pub const DEFAULT_MAIN_FILE: &str = "main.tex";

/// Error message reported when the passes leave no document behind.
pub const DOCUMENT_NOT_GENERATED: &str = "document not generated";

/// One project file to materialise before compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Project-relative path, `/`-separated
    pub path: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl SourceFile {
    /// Create a source file from raw bytes.
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Create a source file from text.
    pub fn text(path: impl Into<String>, content: &str) -> Self {
        Self::new(path, content.as_bytes())
    }
}

/// Everything needed to compile one project.
#[derive(Debug, Clone)]
pub struct CompilationRequest {
    engine: LatexEngine,
    bib_engine: BibEngine,
    main_file: String,
    files: Vec<SourceFile>,
}

impl CompilationRequest {
    /// Build a request, validating the file set.
    ///
    /// # Errors
    ///
    /// - [`CompileError::NoFiles`] if `files` is empty
    /// - [`CompileError::UnsafePath`] if any path is absolute or uses `..`
    /// - [`CompileError::MainFileMissing`] if `main_file` is absent or empty
    pub fn new(
        engine: LatexEngine,
        bib_engine: BibEngine,
        main_file: impl Into<String>,
        files: Vec<SourceFile>,
    ) -> Result<Self> {
        let main_file = main_file.into();

        if files.is_empty() {
            return Err(CompileError::NoFiles);
        }

        if let Some(bad) = files.iter().find(|f| !is_safe_relative_path(&f.path)) {
            return Err(CompileError::UnsafePath(bad.path.clone()));
        }

        let has_main = files
            .iter()
            .any(|f| f.path == main_file && !f.content.is_empty());
        if !has_main {
            return Err(CompileError::MainFileMissing(main_file));
        }

        Ok(Self {
            engine,
            bib_engine,
            main_file,
            files,
        })
    }

    /// The TeX engine to run.
    pub fn engine(&self) -> LatexEngine {
        self.engine
    }

    /// The configured bibliography resolver.
    pub fn bib_engine(&self) -> BibEngine {
        self.bib_engine
    }

    /// The project-relative main file.
    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    /// All files to materialise.
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }
}

/// True if `path` is non-empty, relative, and never steps outside its root.
pub fn is_safe_relative_path(path: &str) -> bool {
    let path = Path::new(path);
    let mut has_normal = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    has_normal
}

/// Log of one subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassRecord {
    /// Section label, e.g. `First pdflatex pass`
    pub label: String,
    /// Whether the invocation exited with code 0
    pub success: bool,
    /// Captured output or diagnostic line
    pub output: String,
}

/// Ordered log of every pass run for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassLog {
    records: Vec<PassRecord>,
}

impl PassLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass.
    pub fn push(&mut self, label: impl Into<String>, success: bool, output: impl Into<String>) {
        self.records.push(PassRecord {
            label: label.into(),
            success,
            output: output.into(),
        });
    }

    /// The recorded passes, in invocation order.
    pub fn records(&self) -> &[PassRecord] {
        &self.records
    }

    /// Labels of the recorded passes, in invocation order.
    pub fn labels(&self) -> Vec<String> {
        self.records.iter().map(|r| r.label.clone()).collect()
    }

    /// The combined, section-labelled log text.
    pub fn combined(&self) -> String {
        self.records
            .iter()
            .map(|r| format!("=== {} ===\n{}\n\n", r.label, r.output))
            .collect()
    }
}

/// Outcome of a compile request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilationResult {
    /// Whether a document was produced and published
    pub success: bool,
    /// Combined output of every pass
    pub log: String,
    /// Labels of the passes that ran, in order
    pub passes: Vec<String>,
    /// Published document, on success
    pub pdf_path: Option<PathBuf>,
    /// Published SyncTeX artifact, if the engine wrote one
    pub synctex_path: Option<PathBuf>,
    /// Explanation when no document could be published
    pub error_message: Option<String>,
}

impl CompilationResult {
    /// A successful, published compile.
    pub fn published(log: &PassLog, pdf_path: PathBuf, synctex_path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            log: log.combined(),
            passes: log.labels(),
            pdf_path: Some(pdf_path),
            synctex_path,
            error_message: None,
        }
    }

    /// A failed compile.
    pub fn failed(log: &PassLog, error_message: Option<String>) -> Self {
        Self {
            success: false,
            log: log.combined(),
            passes: log.labels(),
            pdf_path: None,
            synctex_path: None,
            error_message,
        }
    }
}
