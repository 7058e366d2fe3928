/*
 * tools.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tools command
 */

//! List the external tools compiles depend on and where they resolve.

use anyhow::Result;

use pulse_compile::{BibEngine, LatexEngine, ToolLocator};

/// Execute the tools command
pub fn execute() -> Result<()> {
    let tools = ToolLocator::new();
    let names = LatexEngine::ALL
        .iter()
        .map(LatexEngine::as_str)
        .chain(BibEngine::ALL.iter().map(BibEngine::as_str));

    for name in names {
        match tools.lookup(name) {
            Some(path) => println!("{:<10} {}", name, path.display()),
            None => println!(
                "{:<10} not found (install it or set {})",
                name,
                ToolLocator::env_var(name)
            ),
        }
    }
    Ok(())
}
