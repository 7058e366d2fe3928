/*
 * map.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Parsed SyncTeX map and position queries.
 */

//! Parsed SyncTeX map and position queries.
//!
//! Artifacts are small, so every query is a full scan of the page index;
//! no secondary index is kept.

use std::path::Path;

use crate::error::Result;
use crate::parser::{read_artifact, resolve_artifact_path, scan};
use crate::types::{PageIndex, SyncAnchor, SyncPosition};

/// An immutable, fully parsed SyncTeX artifact.
#[derive(Debug, Clone, Default)]
pub struct ParsedSyncMap {
    pub(crate) inputs: Vec<String>,
    pub(crate) pages: PageIndex,
}

impl ParsedSyncMap {
    /// Parse the artifact at `path` (or `path.gz`).
    ///
    /// A missing artifact yields an empty map; check [`is_valid`](Self::is_valid)
    /// before relying on query results. Read and gzip failures are errors.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let Some(resolved) = resolve_artifact_path(path) else {
            tracing::debug!(path = %path.display(), "no SyncTeX artifact found");
            return Ok(Self::default());
        };

        tracing::debug!(path = %resolved.display(), "reading SyncTeX artifact");
        let text = read_artifact(&resolved)?;
        Ok(scan(&text))
    }

    /// Parse already-decoded artifact text.
    pub fn parse_str(text: &str) -> Self {
        scan(text)
    }

    /// Input file paths referenced by the engine, in artifact order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// The per-page anchor index.
    pub fn pages(&self) -> &PageIndex {
        &self.pages
    }

    /// Anchors recorded for `page`, if the page was seen.
    pub fn anchors(&self, page: u32) -> Option<&[SyncAnchor]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    /// Total number of anchors across all pages.
    pub fn anchor_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    /// True iff at least one page has at least one anchor.
    pub fn is_valid(&self) -> bool {
        self.pages.values().any(|anchors| !anchors.is_empty())
    }

    /// First page (in insertion order) holding an anchor for `line`.
    pub fn page_for_line(&self, line: u32) -> Option<u32> {
        self.pages
            .iter()
            .find(|(_, anchors)| anchors.iter().any(|a| a.line == line))
            .map(|(page, _)| *page)
    }

    /// Forward lookup: the first anchor whose line matches exactly.
    ///
    /// There is no nearest-line fallback.
    pub fn position_for_line(&self, line: u32) -> Option<SyncPosition> {
        self.pages.iter().find_map(|(page, anchors)| {
            anchors
                .iter()
                .find(|a| a.line == line)
                .map(|a| SyncPosition {
                    page: *page,
                    x: a.h,
                    y: a.v,
                })
        })
    }

    /// Reverse lookup: the line of the anchor on `page` vertically closest to `y`.
    ///
    /// Only the vertical distance is measured; `x` is accepted so the call
    /// mirrors [`position_for_line`](Self::position_for_line). Ties go to the
    /// anchor that appears first in the artifact.
    pub fn line_for_position(&self, page: u32, _x: f64, y: f64) -> Option<u32> {
        let anchors = self.pages.get(&page)?;

        // Strict `<` against an infinite seed: ties keep the first anchor and
        // a NaN distance never wins.
        let mut best = f64::INFINITY;
        let mut closest = None;
        for anchor in anchors {
            let dist = (anchor.v - y).abs();
            if dist < best {
                best = dist;
                closest = Some(anchor.line);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_line(line: u32, v: f64) -> String {
        format!("[{line},0,10.0,{v},100.0]")
    }

    #[test]
    fn test_empty_text_is_invalid() {
        let map = ParsedSyncMap::parse_str("");
        assert!(!map.is_valid());
        assert!(map.inputs().is_empty());
        assert_eq!(map.position_for_line(1), None);
    }

    #[test]
    fn test_page_without_anchors_is_invalid() {
        let map = ParsedSyncMap::parse_str("Input:main.tex\n{1\n{2\n");
        assert_eq!(map.pages().len(), 2);
        assert!(!map.is_valid());
    }

    #[test]
    fn test_inputs_are_collected_in_order() {
        let map = ParsedSyncMap::parse_str("Input: main.tex \nInput:1:chapters/intro.tex\n");
        assert_eq!(map.inputs(), ["main.tex", "1:chapters/intro.tex"]);
    }

    #[test]
    fn test_position_for_line_returns_anchor_coordinates() {
        let map = ParsedSyncMap::parse_str("{7\n[42,3,71.5,288.0,12.0]\n");
        assert_eq!(
            map.position_for_line(42),
            Some(SyncPosition {
                page: 7,
                x: 71.5,
                y: 288.0
            })
        );
    }

    #[test]
    fn test_position_for_line_exact_match_only() {
        let map = ParsedSyncMap::parse_str("{1\n[10,0,1,1,1]\n[12,0,1,1,1]\n");
        assert_eq!(map.position_for_line(11), None);
        assert_eq!(map.page_for_line(11), None);
    }

    #[test]
    fn test_reopened_page_appends_anchors() {
        let text = "{3\n[1,0,0,1,0]\n[2,0,0,2,0]\n{4\n[9,0,0,9,0]\n{3\n[3,0,0,3,0]\n";
        let map = ParsedSyncMap::parse_str(text);

        let lines: Vec<u32> = map.anchors(3).unwrap().iter().map(|a| a.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert_eq!(map.anchors(4).unwrap().len(), 1);
    }

    #[test]
    fn test_pages_iterate_in_insertion_order() {
        let map = ParsedSyncMap::parse_str("{5\n[1,0,0,50,0]\n{2\n[1,0,0,20,0]\n");
        // Line 1 lives on both pages; page 5 was seen first.
        assert_eq!(map.page_for_line(1), Some(5));
        assert_eq!(map.position_for_line(1).unwrap().page, 5);
    }

    #[test]
    fn test_duplicate_lines_are_retained() {
        let map = ParsedSyncMap::parse_str("{1\n[8,0,1,100,1]\n[8,0,1,200,1]\n");
        assert_eq!(map.anchor_count(), 2);
        assert_eq!(map.position_for_line(8).unwrap().y, 100.0);
    }

    #[test]
    fn test_malformed_anchor_is_skipped() {
        let map = ParsedSyncMap::parse_str("{1\n[1,2,3,4,5]\n[bad]\n[6,7,8,9,10]\n");
        assert_eq!(map.anchor_count(), 2);
        assert_eq!(map.position_for_line(6).unwrap().x, 8.0);
    }

    #[test]
    fn test_line_for_position_nearest_vertical() {
        let text = format!(
            "{{1\n{}\n{}\n{}\n",
            anchor_line(1, 10.0),
            anchor_line(2, 50.0),
            anchor_line(3, 100.0)
        );
        let map = ParsedSyncMap::parse_str(&text);
        assert_eq!(map.line_for_position(1, 0.0, 48.0), Some(2));
        assert_eq!(map.line_for_position(1, 0.0, 0.0), Some(1));
        assert_eq!(map.line_for_position(1, 0.0, 1000.0), Some(3));
    }

    #[test]
    fn test_line_for_position_ignores_x() {
        let map = ParsedSyncMap::parse_str("{1\n[1,0,0,10,0]\n[2,0,500,60,0]\n");
        assert_eq!(map.line_for_position(1, 500.0, 20.0), Some(1));
    }

    #[test]
    fn test_line_for_position_tie_keeps_first() {
        let map = ParsedSyncMap::parse_str("{1\n[4,0,0,40,0]\n[6,0,0,60,0]\n");
        assert_eq!(map.line_for_position(1, 0.0, 50.0), Some(4));
    }

    #[test]
    fn test_line_for_position_skips_non_finite_anchor() {
        let map = ParsedSyncMap::parse_str("{1\n[1,0,0,10,0]\n[2,0,0,500,0]\n[3,0,0,nan,0]\n");
        assert_eq!(map.anchor_count(), 2);
        assert_eq!(map.line_for_position(1, 0.0, 12.0), Some(1));
    }

    #[test]
    fn test_line_for_position_nan_query_finds_nothing() {
        let map = ParsedSyncMap::parse_str("{1\n[1,0,0,10,0]\n[2,0,0,500,0]\n");
        assert_eq!(map.line_for_position(1, 0.0, f64::NAN), None);
    }

    #[test]
    fn test_line_for_position_nan_anchor_never_wins() {
        let mut map = ParsedSyncMap::parse_str("{1\n[1,0,0,10,0]\n[2,0,0,500,0]\n");
        map.pages.get_mut(&1).unwrap().push(SyncAnchor {
            line: 3,
            column: 0,
            h: 0.0,
            v: f64::NAN,
            width: 0.0,
        });
        assert_eq!(map.line_for_position(1, 0.0, 12.0), Some(1));
    }

    #[test]
    fn test_line_for_position_unknown_page() {
        let map = ParsedSyncMap::parse_str("{1\n[4,0,0,40,0]\n{2\n");
        assert_eq!(map.line_for_position(9, 0.0, 50.0), None);
        assert_eq!(map.line_for_position(2, 0.0, 50.0), None);
    }

    #[test]
    fn test_from_path_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = ParsedSyncMap::from_path(dir.path().join("missing.synctex")).unwrap();
        assert!(!map.is_valid());
        assert!(map.inputs().is_empty());
    }
}
