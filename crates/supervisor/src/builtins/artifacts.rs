// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pull and prune built-ins.

use std::path::{Path, PathBuf};

use gpm_core::{platform_matches, Download, Flags, PruneFile};

use crate::error::BuiltinError;
use crate::logger::Logger;

use super::download::{sha256_file, Fetch};
use super::extract;

/// When a downloaded archive is extracted relative to the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// Extract before the next download begins (default for the built-in).
    Immediately,
    /// Collect jobs and extract after every download finished.
    AfterAll,
    /// Download only.
    Never,
}

/// A deferred extraction.
struct ArchiveJob {
    archive: PathBuf,
    dest: PathBuf,
}

impl ExtractionMode {
    /// Pull every matching artifact, extracting per the mode.
    pub async fn download(
        self,
        logger: &Logger,
        downloads: &[Download],
        flags: &Flags,
    ) -> Result<(), BuiltinError> {
        let mut jobs = Vec::new();

        for dl in downloads {
            if !platform_matches(&dl.platforms) {
                continue;
            }
            if dl.optional && !flags.optionals {
                continue;
            }

            match self.download_one(logger, dl).await {
                Ok(Some(job)) => jobs.push(job),
                Ok(None) => {}
                Err(err) => {
                    logger.info(format!("Failed to download {}: {err}", dl.url)).await;
                    return Err(err);
                }
            }
        }

        if self == ExtractionMode::AfterAll {
            for job in jobs {
                extract_logged(logger, &job.archive, &job.dest).await?;
            }
        }

        Ok(())
    }

    async fn download_one(
        self,
        logger: &Logger,
        dl: &Download,
    ) -> Result<Option<ArchiveJob>, BuiltinError> {
        let filename =
            if dl.filename.is_empty() { url_filename(&dl.url)? } else { dl.filename.clone() };

        let fetch = Fetch {
            url: dl.url.clone(),
            dir: PathBuf::from(&dl.dir),
            filename: filename.clone(),
            sha256: dl.sha256.clone(),
        };
        fetch.run(logger).await?;

        if !extract::is_archive(&filename) && !dl.force {
            return Ok(None);
        }

        let root = if dl.extract.is_empty() { &dl.dir } else { &dl.extract };
        let dest = Path::new(root).join(basename_no_ext(&filename));
        if dest.exists() {
            return Ok(None);
        }

        let archive = Path::new(&dl.dir).join(&filename);
        match self {
            ExtractionMode::Immediately => {
                extract_logged(logger, &archive, &dest).await?;
                Ok(None)
            }
            ExtractionMode::AfterAll => Ok(Some(ArchiveJob { archive, dest })),
            ExtractionMode::Never => Ok(None),
        }
    }
}

/// Remove pruneable files, gated on their expected hash when given.
pub(crate) async fn prune(logger: &Logger, files: &[PruneFile]) -> Result<(), BuiltinError> {
    let cwd = std::env::current_dir()
        .map_err(|source| BuiltinError::Io { path: PathBuf::from("."), source })?;

    for file in files {
        let path = cwd.join(&file.name);
        if !path.exists() {
            continue;
        }

        if !file.sha256.is_empty() {
            let sum = sha256_file(&path).await?;
            if !sum.eq_ignore_ascii_case(&file.sha256) {
                continue;
            }
        }

        logger.info(format!("Removing: {}", path.display())).await;

        let removed = if path.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        if removed.is_err() {
            logger.info(format!("Failed to remove file: {}", path.display())).await;
        }
    }

    Ok(())
}

/// Last path segment of the URL, without query or fragment.
pub(crate) fn url_filename(url: &str) -> Result<String, BuiltinError> {
    let trimmed = url.split(['?', '#']).next().unwrap_or(url);
    let name = trimmed.rsplit('/').next().unwrap_or_default();
    if name.is_empty() || !trimmed.contains('/') {
        return Err(BuiltinError::NoFilename(url.to_string()));
    }
    Ok(name.to_string())
}

/// `tools.zip` -> `tools`; used as the extraction directory name.
pub(crate) fn basename_no_ext(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}

async fn extract_logged(logger: &Logger, archive: &Path, dest: &Path) -> Result<(), BuiltinError> {
    logger.info(format!("Extracting {} to {}", archive.display(), dest.display())).await;

    let archive = archive.to_path_buf();
    let dest = dest.to_path_buf();
    let job_archive = archive.clone();
    tokio::task::spawn_blocking(move || extract::extract(&archive, &dest))
        .await
        .map_err(|e| BuiltinError::Extract { archive: job_archive, message: e.to_string() })?
}

#[cfg(test)]
#[path = "artifacts_tests.rs"]
mod tests;
