// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-artifact download with retry and streamed hashing.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::BuiltinError;
use crate::logger::Logger;

/// Attempts before the last error is surfaced.
const RETRY_ATTEMPTS: u32 = 5;

/// One download target.
pub(crate) struct Fetch {
    pub url: String,
    pub dir: PathBuf,
    pub filename: String,
    pub sha256: String,
}

impl Fetch {
    /// Download to `<dir>/<filename>`, retrying on failure.
    ///
    /// A cached file whose hash matches short-circuits the attempt. Data
    /// streams through the hasher into `<filename>.tmp`, which is renamed
    /// into place only after the hash checks out.
    pub async fn run(&self, logger: &Logger) -> Result<(), BuiltinError> {
        self.validate()?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| BuiltinError::Io { path: self.dir.clone(), source })?;

        let path = self.dir.join(&self.filename);
        let mut attempt = 0;
        loop {
            match self.attempt(&path, logger).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    attempt += 1;
                    if attempt >= RETRY_ATTEMPTS {
                        return Err(err);
                    }
                    logger.info(format!("Retry {attempt}: {err}")).await;
                }
            }
        }
    }

    fn validate(&self) -> Result<(), BuiltinError> {
        if self.url.is_empty() {
            return Err(BuiltinError::UrlEmpty);
        }
        if self.dir.as_os_str().is_empty() || self.filename.is_empty() {
            return Err(BuiltinError::PathEmpty);
        }
        Ok(())
    }

    async fn attempt(&self, path: &Path, logger: &Logger) -> Result<(), BuiltinError> {
        if self.cached(path).await? {
            logger.info(format!("Ok: {}", self.filename)).await;
            return Ok(());
        }

        logger.info(format!("Downloading: {}", self.filename)).await;

        let tmp = path.with_file_name(format!("{}.tmp", self.filename));
        let result = self.fetch_to(&tmp, path).await;
        if result.is_err() {
            let _ = tokio::fs::remove_file(&tmp).await;
        }
        result
    }

    /// True when the final file exists and the expected hash (if any) matches.
    async fn cached(&self, path: &Path) -> Result<bool, BuiltinError> {
        if !path.exists() {
            return Ok(false);
        }
        if self.sha256.is_empty() {
            return Ok(true);
        }
        let sum = sha256_file(path).await?;
        Ok(sum.eq_ignore_ascii_case(&self.sha256))
    }

    async fn fetch_to(&self, tmp: &Path, path: &Path) -> Result<(), BuiltinError> {
        let http_err =
            |source| BuiltinError::Http { url: self.url.clone(), source };
        let response =
            reqwest::get(&self.url).await.map_err(http_err)?.error_for_status().map_err(http_err)?;

        let mut file = tokio::fs::File::create(tmp)
            .await
            .map_err(|source| BuiltinError::Io { path: tmp.to_path_buf(), source })?;

        let mut hasher = Sha256::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(http_err)?;
            file.write_all(&chunk)
                .await
                .map_err(|source| BuiltinError::Io { path: tmp.to_path_buf(), source })?;
            hasher.update(&chunk);
        }
        file.flush()
            .await
            .map_err(|source| BuiltinError::Io { path: tmp.to_path_buf(), source })?;
        drop(file);

        if !self.sha256.is_empty() {
            let actual = format!("{:x}", hasher.finalize());
            if !actual.eq_ignore_ascii_case(&self.sha256) {
                return Err(BuiltinError::HashMismatch {
                    filename: self.filename.clone(),
                    expected: self.sha256.to_lowercase(),
                    actual,
                });
            }
        }

        tokio::fs::rename(tmp, path)
            .await
            .map_err(|source| BuiltinError::Io { path: path.to_path_buf(), source })
    }
}

/// Streamed SHA-256 of a file on disk, lowercase hex.
pub(crate) async fn sha256_file(path: &Path) -> Result<String, BuiltinError> {
    use tokio::io::AsyncReadExt;

    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|source| BuiltinError::Io { path: path.to_path_buf(), source })?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1 << 20];
    loop {
        let n = file
            .read(&mut buf)
            .await
            .map_err(|source| BuiltinError::Io { path: path.to_path_buf(), source })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;
