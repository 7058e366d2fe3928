/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Reading and line scanning of SyncTeX artifacts.
 */

//! Reading and line scanning of SyncTeX artifacts.
//!
//! # Artifact location
//!
//! Engines may or may not compress the artifact, so a lookup for
//! `output.synctex` also tries `output.synctex.gz`. Compression is decided
//! by the resolved file name, not by sniffing content.
//!
//! # Encoding
//!
//! The artifact embeds filesystem paths with arbitrary bytes, so it is
//! decoded as Latin-1: every byte maps to the code point of the same value
//! and decoding can never fail.
//!
//! # Line grammar
//!
//! Each line is classified on its own; the only state carried between lines
//! is the currently open page.
//!
//! ```text
//! Input:<anything>        → appended (trimmed) to the input list
//! {<digits>...            → opens page <digits>
//! [l,c,h,v,w...           → anchor on the open page
//! anything else           → ignored
//! ```

use std::ffi::OsString;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use crate::error::{Result, SyncTexError};
use crate::map::ParsedSyncMap;
use crate::types::SyncAnchor;

/// Suffix used by engines for compressed artifacts.
pub const GZ_SUFFIX: &str = ".gz";

/// Minimum number of comma-separated fields in an anchor record.
const ANCHOR_FIELDS: usize = 5;

/// Find the artifact on disk, falling back to the `.gz` sibling.
///
/// Returns `None` when neither `path` nor `path.gz` is a file.
pub fn resolve_artifact_path(path: &Path) -> Option<PathBuf> {
    if path.is_file() {
        return Some(path.to_path_buf());
    }

    let mut compressed = OsString::from(path.as_os_str());
    compressed.push(GZ_SUFFIX);
    let compressed = PathBuf::from(compressed);
    compressed.is_file().then_some(compressed)
}

/// Read and decode an artifact, inflating it if the name ends in `.gz`.
pub(crate) fn read_artifact(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| SyncTexError::read(path, e))?;

    let mut bytes = Vec::new();
    if is_compressed(path) {
        GzDecoder::new(file)
            .read_to_end(&mut bytes)
            .map_err(|e| SyncTexError::read(path, e))?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)
            .map_err(|e| SyncTexError::read(path, e))?;
    }

    Ok(decode_latin1(&bytes))
}

fn is_compressed(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(GZ_SUFFIX)
}

/// Decode single-byte Latin-1 text.
pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

/// Scan artifact text into a map.
pub(crate) fn scan(text: &str) -> ParsedSyncMap {
    let mut map = ParsedSyncMap::default();
    let mut current_page: Option<u32> = None;
    let mut skipped = 0usize;

    for line in text.lines() {
        if let Some(input) = line.strip_prefix("Input:") {
            map.inputs.push(input.trim().to_string());
        } else if let Some(rest) = line.strip_prefix('{') {
            match parse_page_open(rest) {
                PageOpen::Page(page) => {
                    map.pages.entry(page).or_default();
                    current_page = Some(page);
                }
                // Anchors after `{0` or an out-of-range page have no valid home.
                PageOpen::Invalid => current_page = None,
                PageOpen::NotAPage => {}
            }
        } else if let Some(record) = line.strip_prefix('[') {
            let Some(page) = current_page else {
                continue;
            };
            match parse_anchor(record) {
                Some(anchor) => map.pages.entry(page).or_default().push(anchor),
                None => {
                    skipped += 1;
                    tracing::trace!(line, "skipping malformed anchor record");
                }
            }
        }
    }

    tracing::debug!(
        inputs = map.inputs.len(),
        pages = map.pages.len(),
        anchors = map.anchor_count(),
        skipped,
        "scanned SyncTeX artifact"
    );

    map
}

enum PageOpen {
    Page(u32),
    /// Page `0` (pages are 1-based) or a number too large for a page
    Invalid,
    NotAPage,
}

fn parse_page_open(rest: &str) -> PageOpen {
    let digits_len = rest
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits_len == 0 {
        return PageOpen::NotAPage;
    }

    match rest[..digits_len].parse::<u32>() {
        Ok(0) | Err(_) => PageOpen::Invalid,
        Ok(page) => PageOpen::Page(page),
    }
}

/// Parse the body of an anchor record (everything after the `[`).
///
/// Returns `None` for records with too few fields, unparseable numbers or
/// non-finite coordinates.
fn parse_anchor(record: &str) -> Option<SyncAnchor> {
    let record = record.trim_end();
    let record = record.strip_suffix(']').unwrap_or(record);

    let fields: Vec<&str> = record.split(',').map(str::trim).collect();
    if fields.len() < ANCHOR_FIELDS {
        return None;
    }

    let line: u32 = fields[0].parse().ok()?;
    if line == 0 {
        return None;
    }

    Some(SyncAnchor {
        line,
        column: fields[1].parse().ok()?,
        h: parse_coordinate(fields[2])?,
        v: parse_coordinate(fields[3])?,
        width: parse_coordinate(fields[4])?,
    })
}

/// A finite coordinate; `nan` and `inf` parse as floats but are malformed here.
fn parse_coordinate(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}
