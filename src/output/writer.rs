// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 ciconf contributors

//! Writing rendered documents to disk

use async_trait::async_trait;
use std::path::Path;

use crate::errors::{ConfigError, ConfigResult};

/// Persists rendered text at a resolved path
#[async_trait]
pub trait OutputWriter: Send + Sync {
    /// Create or overwrite `path`, blocking until done
    fn write_sync(&self, path: &Path, contents: &str) -> ConfigResult<()>;

    /// Create or overwrite `path`
    async fn write(&self, path: &Path, contents: &str) -> ConfigResult<()>;
}

/// Writes to the local filesystem, creating missing parent directories
#[derive(Debug, Clone, Copy)]
pub struct FileWriter {
    create_parents: bool,
}

impl Default for FileWriter {
    fn default() -> Self {
        Self {
            create_parents: true,
        }
    }
}

impl FileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail instead of creating missing parent directories
    pub fn without_parents() -> Self {
        Self {
            create_parents: false,
        }
    }

    fn write_error(path: &Path, e: std::io::Error) -> ConfigError {
        ConfigError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
    }
}

#[async_trait]
impl OutputWriter for FileWriter {
    fn write_sync(&self, path: &Path, contents: &str) -> ConfigResult<()> {
        if self.create_parents {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| Self::write_error(parent, e))?;
            }
        }

        std::fs::write(path, contents).map_err(|e| Self::write_error(path, e))?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote configuration");
        Ok(())
    }

    async fn write(&self, path: &Path, contents: &str) -> ConfigResult<()> {
        if self.create_parents {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| Self::write_error(parent, e))?;
            }
        }

        tokio::fs::write(path, contents)
            .await
            .map_err(|e| Self::write_error(path, e))?;
        tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_sync_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yml");
        let writer = FileWriter::new();

        writer.write_sync(&path, "first").unwrap();
        writer.write_sync(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_async_write_via_block_on() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.yml");

        tokio_test::block_on(FileWriter::new().write(&path, "version: '2'\n")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "version: '2'\n");
    }

    #[test]
    fn test_missing_parent_without_creation_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("config.yml");

        let err = FileWriter::without_parents()
            .write_sync(&path, "x")
            .unwrap_err();
        match err {
            ConfigError::FileWriteError { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("Expected FileWriteError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_async_error_propagates() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("config.yml");

        let result = FileWriter::without_parents().write(&path, "x").await;
        assert!(matches!(result, Err(ConfigError::FileWriteError { .. })));
    }
}
