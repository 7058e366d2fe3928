/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Layered service configuration.
 */

//! Layered service configuration.
//!
//! Values are resolved in this order, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file
//! 3. `PULSE_TEX_*` environment variables
//! 4. command-line flags (applied by the binary)
//!
//! ```toml
//! projects_dir = "/srv/pulse/projects"
//! latex_engine = "pdflatex"
//! bibtex_engine = "bibtex"
//! pass_timeout_secs = 120
//! tectonic_timeout_secs = 180
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::{
    BibEngine, DEFAULT_PASS_TIMEOUT, EXTENDED_PASS_TIMEOUT, LatexEngine, PassTimeouts,
};
use crate::error::{CompileError, Result};

pub const ENV_PROJECTS_DIR: &str = "PULSE_TEX_PROJECTS_DIR";
pub const ENV_LATEX_ENGINE: &str = "PULSE_TEX_LATEX_ENGINE";
pub const ENV_BIBTEX_ENGINE: &str = "PULSE_TEX_BIBTEX_ENGINE";

/// Service configuration, built once at startup and passed by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PulseConfig {
    /// Root of the per-project output directories
    pub projects_dir: PathBuf,
    /// Engine used when a request does not choose one
    pub latex_engine: LatexEngine,
    /// Bibliography resolver used when a request does not choose one
    pub bibtex_engine: BibEngine,
    /// Budget for each traditional engine or resolver pass
    pub pass_timeout_secs: u64,
    /// Budget for a tectonic run
    pub tectonic_timeout_secs: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            projects_dir: PathBuf::from("./projects"),
            latex_engine: LatexEngine::default(),
            bibtex_engine: BibEngine::default(),
            pass_timeout_secs: DEFAULT_PASS_TIMEOUT.as_secs(),
            tectonic_timeout_secs: EXTENDED_PASS_TIMEOUT.as_secs(),
        }
    }
}

impl PulseConfig {
    /// Defaults, overlaid with `file` (if given) and the process environment.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML file. Keys it omits keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content).map_err(|e| match e {
            CompileError::Config { message, .. } => CompileError::config(path, message),
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CompileError::config("<toml>", e.message()))
    }

    /// Overlay `PULSE_TEX_*` variables, as returned by `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_PROJECTS_DIR) {
            self.projects_dir = PathBuf::from(dir);
        }
        if let Some(name) = get(ENV_LATEX_ENGINE) {
            self.latex_engine = LatexEngine::try_from(name.as_str())
                .map_err(|e| CompileError::config(ENV_LATEX_ENGINE, e.to_string()))?;
        }
        if let Some(name) = get(ENV_BIBTEX_ENGINE) {
            self.bibtex_engine = BibEngine::try_from(name.as_str())
                .map_err(|e| CompileError::config(ENV_BIBTEX_ENGINE, e.to_string()))?;
        }
        Ok(())
    }

    /// Per-pass time budgets.
    pub fn timeouts(&self) -> PassTimeouts {
        PassTimeouts {
            default: Duration::from_secs(self.pass_timeout_secs),
            extended: Duration::from_secs(self.tectonic_timeout_secs),
        }
    }
}
