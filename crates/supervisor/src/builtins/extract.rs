// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archive extraction boundary for the pull built-in.

use std::fs::File;
use std::path::Path;

use crate::error::BuiltinError;

/// Extensions that trigger extraction after a download.
pub(crate) const ARCHIVE_EXTS: &[&str] = &["7z", "rar", "zip", "tar", "gz"];

/// True when the filename carries one of the archive extensions.
pub(crate) fn is_archive(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ARCHIVE_EXTS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

/// Extract `archive` into `dest`, creating it.
///
/// Handles zip, tar, tar.gz, and single-file gzip. The 7z and rar
/// formats have no extractor in this stack and surface a typed error.
pub(crate) fn extract(archive: &Path, dest: &Path) -> Result<(), BuiltinError> {
    let ext = archive
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let open = || {
        File::open(archive)
            .map_err(|source| BuiltinError::Io { path: archive.to_path_buf(), source })
    };
    let extract_err = |message: String| BuiltinError::Extract {
        archive: archive.to_path_buf(),
        message,
    };

    std::fs::create_dir_all(dest)
        .map_err(|source| BuiltinError::Io { path: dest.to_path_buf(), source })?;

    match ext.as_str() {
        "zip" => {
            let mut zip = zip::ZipArchive::new(open()?).map_err(|e| extract_err(e.to_string()))?;
            zip.extract(dest).map_err(|e| extract_err(e.to_string()))
        }
        "tar" => {
            tar::Archive::new(open()?).unpack(dest).map_err(|e| extract_err(e.to_string()))
        }
        "gz" => {
            let decoder = flate2::read::GzDecoder::new(open()?);
            if is_tarball(archive) {
                tar::Archive::new(decoder).unpack(dest).map_err(|e| extract_err(e.to_string()))
            } else {
                let name = archive.file_stem().map(Path::new).unwrap_or(Path::new("out"));
                let target = dest.join(name);
                let mut out = File::create(&target)
                    .map_err(|source| BuiltinError::Io { path: target.clone(), source })?;
                let mut decoder = decoder;
                std::io::copy(&mut decoder, &mut out)
                    .map(|_| ())
                    .map_err(|e| extract_err(e.to_string()))
            }
        }
        _ => Err(BuiltinError::UnsupportedArchive(archive.to_path_buf())),
    }
}

/// `foo.tar.gz` and `foo.tgz`-style names hide a tar stream.
fn is_tarball(archive: &Path) -> bool {
    archive
        .file_stem()
        .and_then(|s| Path::new(s).extension())
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tar"))
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
