/*
 * pulse-synctex
 * Copyright (c) 2025 Posit, PBC
 *
 * SyncTeX artifact parsing and bidirectional position mapping.
 */

//! SyncTeX position mapping for pulse-tex.
//!
//! A TeX engine run with `-synctex=1` (or `tectonic --synctex`) writes a
//! side file, `<stem>.synctex.gz`, that ties source lines to positions on
//! rendered pages. This crate decodes that artifact into an in-memory index
//! and answers queries in both directions:
//!
//! - **forward**: source line → `(page, x, y)`
//! - **reverse**: `(page, x, y)` → source line
//!
//! # Overview
//!
//! - [`ParsedSyncMap`]: the parsed artifact (input paths plus a per-page
//!   index of [`SyncAnchor`]s) and the query methods
//! - [`LazySyncMap`]: a handle that defers parsing until the first query
//! - [`SyncTexError`]: read failures (missing files are *not* errors)
//!
//! # Example
//!
//! ```rust
//! use pulse_synctex::ParsedSyncMap;
//!
//! let map = ParsedSyncMap::parse_str("Input:main.tex\n{1\n[12,0,72.0,140.5,300.0]\n");
//! assert!(map.is_valid());
//!
//! let pos = map.position_for_line(12).unwrap();
//! assert_eq!(pos.page, 1);
//! assert_eq!(map.line_for_position(1, 0.0, 139.0), Some(12));
//! ```

pub mod error;
pub mod lazy;
pub mod map;
pub mod parser;
pub mod types;

pub use error::{Result, SyncTexError};
pub use lazy::LazySyncMap;
pub use map::ParsedSyncMap;
pub use parser::{GZ_SUFFIX, resolve_artifact_path};
pub use types::{PageIndex, SyncAnchor, SyncPosition};
