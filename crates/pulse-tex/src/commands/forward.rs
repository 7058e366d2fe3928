/*
 * forward.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Forward sync command
 */

//! Forward sync: source line to document position.

use anyhow::{Context, Result};

use pulse_compile::{ProjectOutputs, PulseConfig};

/// Arguments for the forward command
#[derive(Debug)]
pub struct ForwardArgs {
    pub project_id: String,
    pub line: u32,
    pub file: Option<String>,
    pub json: bool,
}

/// Execute the forward command
pub fn execute(config: &PulseConfig, args: ForwardArgs) -> Result<()> {
    let outputs = ProjectOutputs::for_project(&config.projects_dir, &args.project_id)?;
    let position = outputs
        .forward(args.file.as_deref(), args.line)
        .with_context(|| format!("Failed to read SyncTeX data for {}", args.project_id))?;

    match (position, args.json) {
        (Some(pos), true) => println!("{}", serde_json::to_string(&pos)?),
        (Some(pos), false) => println!("{} {} {}", pos.page, pos.x, pos.y),
        (None, true) => println!("null"),
        (None, false) => println!("not found"),
    }
    Ok(())
}
