/*
 * engine.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * TeX engines and bibliography resolvers.
 */

//! TeX engines and bibliography resolvers.
//!
//! Engines fall into two families:
//!
//! - **self-resolving** (`tectonic`): fetches its own dependencies and
//!   settles cross-references internally, so one invocation is enough
//! - **traditional** (`pdflatex`, `xelatex`, `lualatex`): needs an installed
//!   TeX distribution and explicit multi-pass orchestration with a
//!   bibliography resolver between passes

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::runner::Invocation;

/// Default timeout for a single compiler or resolver invocation.
pub const DEFAULT_PASS_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout for the self-resolving engine, which may download packages.
pub const EXTENDED_PASS_TIMEOUT: Duration = Duration::from_secs(180);

/// A TeX engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatexEngine {
    /// Tectonic (self-resolving)
    #[default]
    Tectonic,
    /// pdfLaTeX
    Pdflatex,
    /// XeLaTeX
    Xelatex,
    /// LuaLaTeX
    Lualatex,
}

impl LatexEngine {
    /// All known engines.
    pub const ALL: [LatexEngine; 4] = [
        LatexEngine::Tectonic,
        LatexEngine::Pdflatex,
        LatexEngine::Xelatex,
        LatexEngine::Lualatex,
    ];

    /// Executable / configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LatexEngine::Tectonic => "tectonic",
            LatexEngine::Pdflatex => "pdflatex",
            LatexEngine::Xelatex => "xelatex",
            LatexEngine::Lualatex => "lualatex",
        }
    }

    /// Whether this engine resolves its own dependencies in a single run.
    pub fn is_self_resolving(&self) -> bool {
        matches!(self, LatexEngine::Tectonic)
    }

    /// Build the invocation that compiles `main_file` with SyncTeX output.
    pub fn invocation(&self, main_file: &str, timeouts: &PassTimeouts) -> Invocation {
        if self.is_self_resolving() {
            Invocation::new(
                self.as_str(),
                [main_file, "--synctex"],
                timeouts.extended,
            )
        } else {
            Invocation::new(
                self.as_str(),
                ["-interaction=nonstopmode", "-synctex=1", main_file],
                timeouts.default,
            )
        }
    }

    /// Path (relative to the working directory, without extension) under
    /// which this engine writes `main_file`'s outputs.
    ///
    /// Tectonic writes next to the input; the traditional engines write
    /// into the working directory using the job name.
    pub fn output_stem(&self, main_file: &str) -> PathBuf {
        let main = Path::new(main_file);
        let job = job_name(main_file);
        if self.is_self_resolving() {
            match main.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.join(job),
                _ => PathBuf::from(job),
            }
        } else {
            PathBuf::from(job)
        }
    }
}

impl std::fmt::Display for LatexEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for LatexEngine {
    type Error = CompileError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "tectonic" => Ok(LatexEngine::Tectonic),
            "pdflatex" => Ok(LatexEngine::Pdflatex),
            "xelatex" => Ok(LatexEngine::Xelatex),
            "lualatex" => Ok(LatexEngine::Lualatex),
            _ => Err(CompileError::UnknownEngine(s.to_string())),
        }
    }
}

impl std::str::FromStr for LatexEngine {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A bibliography resolver run between compiler passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BibEngine {
    /// Biber (modern, biblatex)
    #[default]
    Biber,
    /// BibTeX (legacy)
    Bibtex,
}

impl BibEngine {
    /// All known resolvers.
    pub const ALL: [BibEngine; 2] = [BibEngine::Biber, BibEngine::Bibtex];

    /// Executable / configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BibEngine::Biber => "biber",
            BibEngine::Bibtex => "bibtex",
        }
    }

    /// Log section label for this resolver's pass.
    pub fn pass_label(&self) -> &'static str {
        match self {
            BibEngine::Biber => "Biber pass",
            BibEngine::Bibtex => "Bibtex pass",
        }
    }

    /// Build the invocation that resolves citations for `job`.
    pub fn invocation(&self, job: &str, timeouts: &PassTimeouts) -> Invocation {
        Invocation::new(self.as_str(), [job], timeouts.default)
    }
}

impl std::fmt::Display for BibEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for BibEngine {
    type Error = CompileError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "biber" => Ok(BibEngine::Biber),
            "bibtex" => Ok(BibEngine::Bibtex),
            _ => Err(CompileError::UnknownBibEngine(s.to_string())),
        }
    }
}

impl std::str::FromStr for BibEngine {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// Per-invocation time budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTimeouts {
    /// Budget for traditional engine and resolver passes
    pub default: Duration,
    /// Budget for the self-resolving engine
    pub extended: Duration,
}

impl Default for PassTimeouts {
    fn default() -> Self {
        Self {
            default: DEFAULT_PASS_TIMEOUT,
            extended: EXTENDED_PASS_TIMEOUT,
        }
    }
}

/// The TeX job name for a main file: its file name without `.tex`.
pub fn job_name(main_file: &str) -> String {
    let file_name = Path::new(main_file).file_name().map_or_else(
        || main_file.to_string(),
        |n| n.to_string_lossy().into_owned(),
    );
    match file_name.strip_suffix(".tex") {
        Some(stem) => stem.to_string(),
        None => file_name,
    }
}

/// `stem` with `.{ext}` appended (job names may themselves contain dots).
pub fn with_suffix(stem: &Path, ext: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_round_trip_names() {
        for engine in LatexEngine::ALL {
            assert_eq!(LatexEngine::try_from(engine.as_str()).unwrap(), engine);
        }
        for bib in BibEngine::ALL {
            assert_eq!(BibEngine::try_from(bib.as_str()).unwrap(), bib);
        }
    }

    #[test]
    fn test_engine_parse_is_case_insensitive() {
        assert_eq!(
            LatexEngine::try_from("XeLaTeX").unwrap(),
            LatexEngine::Xelatex
        );
        assert_eq!(" BibTeX ".parse::<BibEngine>().unwrap(), BibEngine::Bibtex);
    }

    #[test]
    fn test_unknown_engine_rejected() {
        let err = LatexEngine::try_from("context").unwrap_err();
        assert!(matches!(err, CompileError::UnknownEngine(ref name) if name == "context"));
        assert!(BibEngine::try_from("natbib").is_err());
    }

    #[test]
    fn test_tectonic_invocation() {
        let timeouts = PassTimeouts::default();
        let inv = LatexEngine::Tectonic.invocation("main.tex", &timeouts);
        assert_eq!(inv.program, "tectonic");
        assert_eq!(inv.args, vec!["main.tex", "--synctex"]);
        assert_eq!(inv.timeout, EXTENDED_PASS_TIMEOUT);
    }

    #[test]
    fn test_traditional_invocation() {
        let timeouts = PassTimeouts::default();
        let inv = LatexEngine::Lualatex.invocation("paper.tex", &timeouts);
        assert_eq!(inv.program, "lualatex");
        assert_eq!(
            inv.args,
            vec!["-interaction=nonstopmode", "-synctex=1", "paper.tex"]
        );
        assert_eq!(inv.timeout, DEFAULT_PASS_TIMEOUT);
    }

    #[test]
    fn test_bib_invocation_uses_job_name() {
        let timeouts = PassTimeouts::default();
        let inv = BibEngine::Bibtex.invocation("paper", &timeouts);
        assert_eq!(inv.program, "bibtex");
        assert_eq!(inv.args, vec!["paper"]);
    }

    #[test]
    fn test_job_name() {
        assert_eq!(job_name("main.tex"), "main");
        assert_eq!(job_name("chapters/thesis.tex"), "thesis");
        assert_eq!(job_name("notes"), "notes");
        assert_eq!(job_name("v1.tex.bak"), "v1.tex.bak");
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(
            LatexEngine::Pdflatex.output_stem("src/main.tex"),
            PathBuf::from("main")
        );
        assert_eq!(
            LatexEngine::Tectonic.output_stem("src/main.tex"),
            PathBuf::from("src/main")
        );
        assert_eq!(
            LatexEngine::Tectonic.output_stem("main.tex"),
            PathBuf::from("main")
        );
    }

    #[test]
    fn test_with_suffix_keeps_dotted_job_names() {
        assert_eq!(
            with_suffix(Path::new("report.v2"), "aux"),
            PathBuf::from("report.v2.aux")
        );
        assert_eq!(
            with_suffix(Path::new("src/main"), "synctex.gz"),
            PathBuf::from("src/main.synctex.gz")
        );
    }

    #[test]
    fn test_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            engine: LatexEngine,
            bib: BibEngine,
        }
        let w: Wrapper = toml::from_str("engine = \"xelatex\"\nbib = \"bibtex\"").unwrap();
        assert_eq!(w.engine, LatexEngine::Xelatex);
        assert_eq!(w.bib, BibEngine::Bibtex);
    }
}
