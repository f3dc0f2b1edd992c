// Local filesystem adapter - File system operations

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new filesystem adapter
    pub fn new() -> Self {
        Self
    }

    /// Files directly inside `dir_path` named `<prefix>*.<extension>`, sorted
    fn matching_files(dir_path: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>, DomainError> {
        if !dir_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir_path).min_depth(1).max_depth(1) {
            let entry = entry
                .map_err(|e| DomainError::FsFail(format!("Failed to list {}: {}", dir_path.display(), e)))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name_matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with(prefix))
                .unwrap_or(false);
            let extension_matches = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(extension))
                .unwrap_or(false);

            if name_matches && extension_matches {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }
}

impl Default for FsLocalAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        Ok(file_path.is_file())
    }

    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError> {
        fs::create_dir_all(dir_path).map_err(|e| {
            DomainError::FsFail(format!("Failed to create directory {}: {}", dir_path.display(), e))
        })
    }

    async fn list_files(
        &self,
        dir_path: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<Vec<PathBuf>, DomainError> {
        Self::matching_files(dir_path, prefix, extension)
    }

    async fn remove_files(
        &self,
        dir_path: &Path,
        prefix: &str,
        extension: &str,
    ) -> Result<usize, DomainError> {
        let files = Self::matching_files(dir_path, prefix, extension)?;
        for file in &files {
            fs::remove_file(file).map_err(|e| {
                DomainError::FsFail(format!("Failed to delete {}: {}", file.display(), e))
            })?;
        }
        Ok(files.len())
    }
}
