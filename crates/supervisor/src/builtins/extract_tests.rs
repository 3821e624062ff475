// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the extraction boundary

use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use super::*;

#[yare::parameterized(
    zip = { "tool.zip", true },
    tar = { "tool.tar", true },
    gz = { "tool.gz", true },
    tgz = { "tool.tar.gz", true },
    seven_z = { "tool.7z", true },
    rar = { "tool.rar", true },
    upper = { "tool.ZIP", true },
    binary = { "tool.bin", false },
    none = { "tool", false },
)]
fn archive_extension_detection(filename: &str, expected: bool) {
    assert_eq!(is_archive(filename), expected);
}

fn write_zip(path: &Path) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("inner.txt", zip::write::SimpleFileOptions::default()).unwrap();
    zip.write_all(b"zipped contents").unwrap();
    zip.finish().unwrap();
}

fn write_tar(path: &Path) {
    let file = File::create(path).unwrap();
    let mut tar = tar::Builder::new(file);
    let data = b"tarred contents";
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, "inner.txt", &data[..]).unwrap();
    tar.finish().unwrap();
}

#[test]
fn extracts_zip_into_destination() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("tool.zip");
    write_zip(&archive);

    let dest = dir.path().join("tool");
    extract(&archive, &dest).unwrap();

    let contents = std::fs::read_to_string(dest.join("inner.txt")).unwrap();
    assert_eq!(contents, "zipped contents");
}

#[test]
fn extracts_tar_into_destination() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("tool.tar");
    write_tar(&archive);

    let dest = dir.path().join("tool");
    extract(&archive, &dest).unwrap();

    let contents = std::fs::read_to_string(dest.join("inner.txt")).unwrap();
    assert_eq!(contents, "tarred contents");
}

#[test]
fn extracts_tar_gz_through_the_decoder() {
    let dir = TempDir::new().unwrap();
    let tarball = dir.path().join("tool.tar");
    write_tar(&tarball);

    let archive = dir.path().join("tool.tar.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        File::create(&archive).unwrap(),
        flate2::Compression::default(),
    );
    encoder.write_all(&std::fs::read(&tarball).unwrap()).unwrap();
    encoder.finish().unwrap();

    let dest = dir.path().join("out");
    extract(&archive, &dest).unwrap();
    assert!(dest.join("inner.txt").exists());
}

#[test]
fn decompresses_single_file_gzip() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("notes.txt.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        File::create(&archive).unwrap(),
        flate2::Compression::default(),
    );
    encoder.write_all(b"plain text").unwrap();
    encoder.finish().unwrap();

    let dest = dir.path().join("out");
    extract(&archive, &dest).unwrap();
    assert_eq!(std::fs::read_to_string(dest.join("notes.txt")).unwrap(), "plain text");
}

#[yare::parameterized(
    seven_z = { "tool.7z" },
    rar = { "tool.rar" },
)]
fn formats_without_an_extractor_surface_a_typed_error(name: &str) {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join(name);
    std::fs::write(&archive, b"not really an archive").unwrap();

    let err = extract(&archive, &dir.path().join("out")).unwrap_err();
    assert!(matches!(err, BuiltinError::UnsupportedArchive(p) if p == PathBuf::from(&archive)));
}
