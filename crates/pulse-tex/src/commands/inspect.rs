/*
 * inspect.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * SyncTeX inspection command
 */

//! Print what a SyncTeX file contains: its inputs and anchors per page.

use std::path::Path;

use anyhow::{Context, Result};

use pulse_synctex::{ParsedSyncMap, resolve_artifact_path};

/// Execute the inspect command
pub fn execute(path: &Path) -> Result<()> {
    let Some(resolved) = resolve_artifact_path(path) else {
        anyhow::bail!("SyncTeX file not found: {}", path.display());
    };
    let map = ParsedSyncMap::from_path(path)
        .with_context(|| format!("Failed to parse {}", resolved.display()))?;

    println!("file:    {}", resolved.display());
    println!("inputs:  {}", map.inputs().len());
    for input in map.inputs() {
        println!("  {}", input);
    }
    println!("pages:   {}", map.pages().len());
    for (page, anchors) in map.pages() {
        println!("  page {:>4}: {} anchors", page, anchors.len());
    }
    println!("anchors: {}", map.anchor_count());
    if !map.is_valid() {
        println!("(no anchors; forward and reverse queries will find nothing)");
    }
    Ok(())
}
