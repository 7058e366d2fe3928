/*
 * tests/artifact_files.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for reading SyncTeX artifacts from disk.
 */

//! Integration tests for reading SyncTeX artifacts from disk.

use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use pulse_synctex::{ParsedSyncMap, SyncPosition, SyncTexError};

const SAMPLE: &[u8] = b"SyncTeX Version:1\n\
Input:1:/home/user/proj/main.tex\n\
Input:2:/home/user/proj/chapters/r\xe9sum\xe9.tex\n\
Output:pdf\n\
Content:\n\
{1\n\
[3,0,72.0,100.0,450.0]\n\
[4,2,72.0,112.0,450.0]\n\
}1\n\
{2\n\
[20,0,72.0,90.0,450.0]\n\
[21,0,90.5,300.0,120.0]\n\
}2\n\
Postamble:\n";

fn write_gz(path: &Path, bytes: &[u8]) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    std::fs::write(path, encoder.finish().unwrap()).unwrap();
}

#[test]
fn test_plain_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.synctex");
    std::fs::write(&path, SAMPLE).unwrap();

    let map = ParsedSyncMap::from_path(&path).unwrap();
    assert!(map.is_valid());
    assert_eq!(map.pages().len(), 2);
    assert_eq!(map.anchor_count(), 4);
}

#[test]
fn test_gz_sibling_matches_direct_parse() {
    let dir = tempfile::tempdir().unwrap();
    let gz_path = dir.path().join("main.synctex.gz");
    write_gz(&gz_path, SAMPLE);

    let via_sibling = ParsedSyncMap::from_path(dir.path().join("main.synctex")).unwrap();
    let direct = ParsedSyncMap::from_path(&gz_path).unwrap();

    assert!(via_sibling.is_valid());
    assert_eq!(via_sibling.inputs(), direct.inputs());
    assert_eq!(via_sibling.pages(), direct.pages());
}

#[test]
fn test_latin1_input_paths_survive_decoding() {
    let dir = tempfile::tempdir().unwrap();
    let gz_path = dir.path().join("main.synctex.gz");
    write_gz(&gz_path, SAMPLE);

    let map = ParsedSyncMap::from_path(&gz_path).unwrap();
    assert_eq!(
        map.inputs(),
        [
            "1:/home/user/proj/main.tex",
            "2:/home/user/proj/chapters/résumé.tex"
        ]
    );
}

#[test]
fn test_forward_and_reverse_on_gz_artifact() {
    let dir = tempfile::tempdir().unwrap();
    write_gz(&dir.path().join("main.synctex.gz"), SAMPLE);

    let map = ParsedSyncMap::from_path(dir.path().join("main.synctex")).unwrap();
    assert_eq!(
        map.position_for_line(21),
        Some(SyncPosition {
            page: 2,
            x: 90.5,
            y: 300.0
        })
    );
    assert_eq!(map.line_for_position(1, 0.0, 110.0), Some(4));
    assert_eq!(map.line_for_position(2, 0.0, 95.0), Some(20));
}

#[test]
fn test_every_anchor_is_reachable_forward() {
    let mut text = String::new();
    let mut expected = Vec::new();
    for page in 1..=4u32 {
        text.push_str(&format!("{{{page}\n"));
        for i in 0..5u32 {
            let line = page * 100 + i;
            let (h, v) = (f64::from(i) * 7.5, f64::from(line) / 2.0);
            text.push_str(&format!("[{line},{i},{h},{v},10]\n"));
            expected.push((line, SyncPosition { page, x: h, y: v }));
        }
    }

    let map = ParsedSyncMap::parse_str(&text);
    for (line, position) in expected {
        assert_eq!(map.position_for_line(line), Some(position), "line {line}");
    }
}

#[test]
fn test_corrupt_gzip_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let gz_path = dir.path().join("main.synctex.gz");
    std::fs::write(&gz_path, b"\x1f\x8b\x08\x00garbage").unwrap();

    let err = ParsedSyncMap::from_path(dir.path().join("main.synctex")).unwrap_err();
    let SyncTexError::Read { path, .. } = err;
    assert_eq!(path, gz_path);
}

#[test]
fn test_missing_artifact_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let map = ParsedSyncMap::from_path(dir.path().join("main.synctex")).unwrap();
    assert!(!map.is_valid());
    assert_eq!(map.anchor_count(), 0);
}
