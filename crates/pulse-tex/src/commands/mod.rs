/*
 * mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * CLI command implementations.
 */

//! Command implementations for the pulse-tex CLI
//!
//! Each command module handles the CLI interface and delegates to
//! pulse-compile and pulse-synctex for the actual work.

pub mod compile;
pub mod forward;
pub mod inspect;
pub mod reverse;
pub mod tools;
