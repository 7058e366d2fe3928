/*
 * orchestrator.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile requests end to end.
 */

//! Compile requests end to end.
//!
//! [`Orchestrator::compile`] materialises the request into a fresh working
//! directory, runs the passes the engine needs, checks that a document was
//! produced and publishes it to the project's output store.

use std::sync::Arc;

use crate::config::PulseConfig;
use crate::engine::PassTimeouts;
use crate::outputs::ProjectOutputs;
use crate::passes::{PassPlan, run_passes};
use crate::request::{CompilationRequest, CompilationResult, DOCUMENT_NOT_GENERATED, PassLog};
use crate::runner::CommandRunner;
use crate::workspace::{BuildArtifacts, WorkDir};

/// Runs compile requests.
///
/// Holds no per-request state, so one orchestrator can serve concurrent
/// requests for different projects.
#[derive(Clone)]
pub struct Orchestrator {
    runner: Arc<dyn CommandRunner>,
    timeouts: PassTimeouts,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(runner: Arc<dyn CommandRunner>, timeouts: PassTimeouts) -> Self {
        Self { runner, timeouts }
    }

    /// An orchestrator using the configured time budgets.
    pub fn from_config(runner: Arc<dyn CommandRunner>, config: &PulseConfig) -> Self {
        Self::new(runner, config.timeouts())
    }

    pub fn timeouts(&self) -> PassTimeouts {
        self.timeouts
    }

    /// Compile `request` and publish the result into `outputs`.
    ///
    /// Never fails: every problem is reported in the returned result.
    pub async fn compile(
        &self,
        request: &CompilationRequest,
        outputs: &ProjectOutputs,
    ) -> CompilationResult {
        tracing::info!(
            engine = %request.engine(),
            main = request.main_file(),
            files = request.files().len(),
            "compiling"
        );

        let work = match WorkDir::create() {
            Ok(work) => work,
            Err(e) => return io_failure(&PassLog::new(), e),
        };
        if let Err(e) = work.materialize(request.files()) {
            return io_failure(&PassLog::new(), e);
        }

        let plan = PassPlan {
            engine: request.engine(),
            bib_engine: request.bib_engine(),
            main_file: request.main_file(),
            timeouts: self.timeouts,
        };
        let (passes_ok, log) = run_passes(self.runner.as_ref(), work.path(), &plan).await;

        let artifacts = BuildArtifacts::locate(work.path(), request.engine(), request.main_file());
        if !artifacts.pdf.is_file() {
            tracing::warn!(passes_ok, "no document produced");
            return CompilationResult::failed(&log, Some(DOCUMENT_NOT_GENERATED.to_string()));
        }
        if !passes_ok {
            tracing::warn!("passes failed; document not published");
            return CompilationResult::failed(&log, None);
        }

        match outputs.publish(&artifacts.pdf, artifacts.existing_synctex()) {
            Ok((pdf_path, synctex_path)) => {
                CompilationResult::published(&log, pdf_path, synctex_path)
            }
            Err(e) => io_failure(&log, e),
        }
    }
}

fn io_failure(log: &PassLog, error: std::io::Error) -> CompilationResult {
    tracing::error!(%error, "compile aborted");
    CompilationResult::failed(log, Some(error.to_string()))
}
