/*
 * passes.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compiler pass selection and sequencing.
 */

//! Compiler pass selection and sequencing.
//!
//! Each request walks a small state machine. Passes are strictly
//! sequential because every pass reads the files the previous one wrote.
//!
//! ```text
//! self-resolving:  Single ─────────────────────────────────────────────→ Done
//!
//! traditional:     First ──fail──────────────────────────────────────→ Done
//!                    │ ok
//!                    ▼
//!                  BibCheck ──no citations, no .bcf──────────────────→ Done
//!                    │
//!                    ▼
//!                  Bibliography ─→ Second ──fail─────────────────────→ Done
//!                                    │ ok
//!                                    ▼
//!                                  Third ────────────────────────────→ Done
//! ```
//!
//! The reported success is that of the first pass when no bibliography
//! work was needed, and of the second pass otherwise. The third pass only
//! settles cross-references; its status is logged but never reported.

use std::path::Path;

use crate::engine::{BibEngine, LatexEngine, PassTimeouts, job_name, with_suffix};
use crate::request::PassLog;
use crate::runner::{CommandRunner, Invocation};

/// Markers in an `.aux` file that mean a bibliography pass is needed.
const CITATION_MARKERS: [&str; 2] = ["\\citation{", "\\bibdata{"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Single,
    First,
    BibCheck,
    Bibliography(BibEngine),
    Second,
    Third,
    Done,
}

/// What a request needs to run its passes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PassPlan<'a> {
    pub engine: LatexEngine,
    pub bib_engine: BibEngine,
    pub main_file: &'a str,
    pub timeouts: PassTimeouts,
}

/// Run every pass `plan` calls for, in `cwd`.
///
/// Returns the reported success flag and the log of every pass that ran.
pub(crate) async fn run_passes(
    runner: &dyn CommandRunner,
    cwd: &Path,
    plan: &PassPlan<'_>,
) -> (bool, PassLog) {
    let engine = plan.engine;
    let compile = engine.invocation(plan.main_file, &plan.timeouts);
    let stem = cwd.join(engine.output_stem(plan.main_file));

    let mut log = PassLog::new();
    let mut success = false;
    let mut stage = if engine.is_self_resolving() {
        Stage::Single
    } else {
        Stage::First
    };

    loop {
        stage = match stage {
            Stage::Single => {
                success = run_pass(runner, cwd, &compile, "Tectonic pass", &mut log).await;
                Stage::Done
            }
            Stage::First => {
                let label = format!("First {} pass", engine);
                success = run_pass(runner, cwd, &compile, &label, &mut log).await;
                if success { Stage::BibCheck } else { Stage::Done }
            }
            Stage::BibCheck => {
                let needs_bibtex = aux_has_citations(&with_suffix(&stem, "aux"));
                let needs_biber = with_suffix(&stem, "bcf").is_file();
                tracing::debug!(needs_bibtex, needs_biber, "bibliography check");
                match select_resolver(needs_bibtex, needs_biber, plan.bib_engine) {
                    Some(resolver) => Stage::Bibliography(resolver),
                    None => Stage::Done,
                }
            }
            Stage::Bibliography(resolver) => {
                let job = job_name(plan.main_file);
                let invocation = resolver.invocation(&job, &plan.timeouts);
                // A failed resolver still leaves the second pass to report on.
                run_pass(runner, cwd, &invocation, resolver.pass_label(), &mut log).await;
                Stage::Second
            }
            Stage::Second => {
                let label = format!("Second {} pass", engine);
                success = run_pass(runner, cwd, &compile, &label, &mut log).await;
                if success { Stage::Third } else { Stage::Done }
            }
            Stage::Third => {
                let label = format!("Third {} pass", engine);
                run_pass(runner, cwd, &compile, &label, &mut log).await;
                Stage::Done
            }
            Stage::Done => break,
        };
    }

    (success, log)
}

async fn run_pass(
    runner: &dyn CommandRunner,
    cwd: &Path,
    invocation: &Invocation,
    label: &str,
    log: &mut PassLog,
) -> bool {
    let output = runner.run(invocation, cwd).await;
    let success = output.success();
    if success {
        tracing::info!(pass = label, "pass succeeded");
    } else {
        tracing::warn!(pass = label, status = ?output.status, "pass failed");
    }
    log.push(label, success, output.output);
    success
}

/// Pick the bibliography resolver, if any is needed.
///
/// A `.bcf` control file means biblatex wrote its data for Biber, so Biber
/// runs whatever resolver was configured. Otherwise citation markers in the
/// `.aux` file trigger the configured resolver.
pub(crate) fn select_resolver(
    needs_bibtex: bool,
    needs_biber: bool,
    configured: BibEngine,
) -> Option<BibEngine> {
    if needs_biber {
        Some(BibEngine::Biber)
    } else if needs_bibtex {
        Some(configured)
    } else {
        None
    }
}

/// Whether an `.aux` file records citations or a bibliography database.
///
/// A missing or unreadable file counts as "no citations".
pub(crate) fn aux_has_citations(aux: &Path) -> bool {
    match std::fs::read(aux) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            CITATION_MARKERS.iter().any(|m| content.contains(m))
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_resolver_table() {
        use BibEngine::*;
        assert_eq!(select_resolver(false, false, Biber), None);
        assert_eq!(select_resolver(false, false, Bibtex), None);
        assert_eq!(select_resolver(true, false, Biber), Some(Biber));
        assert_eq!(select_resolver(true, false, Bibtex), Some(Bibtex));
        assert_eq!(select_resolver(false, true, Bibtex), Some(Biber));
        assert_eq!(select_resolver(true, true, Bibtex), Some(Biber));
    }

    #[test]
    fn test_aux_has_citations() {
        let dir = tempfile::tempdir().unwrap();
        let aux = dir.path().join("main.aux");

        assert!(!aux_has_citations(&aux));

        std::fs::write(&aux, "\\relax\n\\@writefile{toc}{}\n").unwrap();
        assert!(!aux_has_citations(&aux));

        std::fs::write(&aux, "\\relax\n\\citation{knuth1984}\n").unwrap();
        assert!(aux_has_citations(&aux));

        std::fs::write(&aux, b"\\bibdata{refs}\n\xff\xfe").unwrap();
        assert!(aux_has_citations(&aux));
    }
}
