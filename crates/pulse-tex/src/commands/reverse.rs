/*
 * reverse.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reverse sync command
 */

//! Reverse sync: document position to source line.

use anyhow::{Context, Result};

use pulse_compile::{ProjectOutputs, PulseConfig};

/// Arguments for the reverse command
#[derive(Debug)]
pub struct ReverseArgs {
    pub project_id: String,
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

/// Execute the reverse command
pub fn execute(config: &PulseConfig, args: ReverseArgs) -> Result<()> {
    let outputs = ProjectOutputs::for_project(&config.projects_dir, &args.project_id)?;
    let line = outputs
        .reverse(args.page, args.x, args.y)
        .with_context(|| format!("Failed to read SyncTeX data for {}", args.project_id))?;

    match line {
        Some(line) => println!("{}", line),
        None => println!("not found"),
    }
    Ok(())
}
