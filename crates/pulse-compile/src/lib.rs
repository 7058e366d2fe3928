/*
 * pulse-compile
 * Copyright (c) 2025 Posit, PBC
 *
 * LaTeX compilation orchestration for pulse-tex.
 */

//! LaTeX compilation orchestration for pulse-tex.
//!
//! A [`CompilationRequest`] carries a project's files, its main file and
//! the engines to use. The [`Orchestrator`] turns it into a document:
//!
//! 1. every file is written into a fresh temporary directory
//! 2. the engine's passes run in order, each through the injected
//!    [`CommandRunner`]: one run for tectonic, up to four (engine,
//!    bibliography, engine, engine) for the traditional engines
//! 3. the document and SyncTeX artifact are copied into the project's
//!    [`ProjectOutputs`], where forward and reverse sync queries read them
//!
//! Compiler failures never surface as `Err`: they come back in the
//! [`CompilationResult`] together with the labelled log of every pass.

pub mod config;
pub mod engine;
pub mod error;
pub mod orchestrator;
pub mod outputs;
mod passes;
pub mod project;
pub mod request;
pub mod runner;
mod workspace;

pub use config::PulseConfig;
pub use engine::{BibEngine, LatexEngine, PassTimeouts};
pub use error::{CompileError, Result};
pub use orchestrator::Orchestrator;
pub use outputs::ProjectOutputs;
pub use project::load_source_dir;
pub use request::{
    CompilationRequest, CompilationResult, DEFAULT_MAIN_FILE, DOCUMENT_NOT_GENERATED, PassLog,
    PassRecord, SourceFile,
};
pub use runner::{CommandRunner, Invocation, NativeRunner, PassOutput, PassStatus, ToolLocator};
