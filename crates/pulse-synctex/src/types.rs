/*
 * types.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Anchor and position types.
 */

//! Core types for SyncTeX position mapping

use indexmap::IndexMap;
use serde::Serialize;

/// One recorded correspondence between a source position and a page position.
///
/// Several anchors may share a `line` when one source element is split
/// across output fragments; all of them are kept, in artifact order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyncAnchor {
    /// Source line number (1-based)
    pub line: u32,
    /// Source column (0 when the record carries none)
    pub column: i64,
    /// Horizontal offset on the page
    pub h: f64,
    /// Vertical offset on the page
    pub v: f64,
    /// Extent of the anchored element (advisory)
    pub width: f64,
}

/// Result of a forward (source → page) query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SyncPosition {
    /// Page number (1-based)
    pub page: u32,
    /// Horizontal position (the anchor's `h`)
    pub x: f64,
    /// Vertical position (the anchor's `v`)
    pub y: f64,
}

/// Page number → anchors, iterated in the order pages first appeared.
pub type PageIndex = IndexMap<u32, Vec<SyncAnchor>>;
