/*
 * compile.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Compile command implementation
 */

//! Compile command implementation.
//!
//! Loads every file of a project directory, compiles it with the requested
//! engine and publishes the document and SyncTeX data under
//! `<projects_dir>/<id>/`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use pulse_compile::{
    BibEngine, CompilationRequest, CompilationResult, LatexEngine, NativeRunner, Orchestrator,
    ProjectOutputs, PulseConfig, load_source_dir,
};

/// Arguments for the compile command
#[derive(Debug)]
pub struct CompileArgs {
    /// Project source directory
    pub dir: PathBuf,
    /// Project id; defaults to the directory name
    pub id: Option<String>,
    /// Main file, relative to `dir`
    pub main: String,
    /// Engine override
    pub engine: Option<LatexEngine>,
    /// Bibliography resolver override
    pub bib: Option<BibEngine>,
    /// Emit JSON instead of a summary
    pub json: bool,
}

/// Execute the compile command
pub fn execute(config: &PulseConfig, args: CompileArgs) -> Result<()> {
    let project_id = match args.id {
        Some(id) => id,
        None => project_id_for(&args.dir)?,
    };
    let outputs = ProjectOutputs::for_project(&config.projects_dir, &project_id)?;

    let files = load_source_dir(&args.dir)
        .with_context(|| format!("Failed to read project {}", args.dir.display()))?;
    let request = CompilationRequest::new(
        args.engine.unwrap_or(config.latex_engine),
        args.bib.unwrap_or(config.bibtex_engine),
        args.main,
        files,
    )?;

    info!(project = %project_id, engine = %request.engine(), "Starting compile");

    let orchestrator = Orchestrator::from_config(Arc::new(NativeRunner::new()), config);
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(orchestrator.compile(&request, &outputs));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&project_id, &result);
    }

    if !result.success {
        anyhow::bail!("Compilation of {} failed", project_id);
    }
    Ok(())
}

fn project_id_for(dir: &std::path::Path) -> Result<String> {
    let canonical = dir
        .canonicalize()
        .with_context(|| format!("Project directory not found: {}", dir.display()))?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .context("Cannot derive a project id; pass --id")
}

fn print_summary(project_id: &str, result: &CompilationResult) {
    print!("{}", result.log);
    if result.success {
        println!("Compiled {} ({} passes)", project_id, result.passes.len());
        if let Some(pdf) = &result.pdf_path {
            println!("  document: {}", pdf.display());
        }
        match &result.synctex_path {
            Some(synctex) => println!("  synctex:  {}", synctex.display()),
            None => println!("  synctex:  none"),
        }
    } else {
        println!("Failed to compile {}", project_id);
        if let Some(message) = &result.error_message {
            println!("  error: {}", message);
        }
    }
}
