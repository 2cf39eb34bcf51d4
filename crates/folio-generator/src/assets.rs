//! Static asset copying.
//!
//! Everything under the static directory (cover images in `head/`, fonts,
//! icons) is mirrored into the output directory unchanged.

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Asset processing errors.
#[derive(Debug, Error)]
pub enum AssetError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// Invalid asset path.
    #[error("invalid asset path: {}", .0.display())]
    InvalidPath(PathBuf),
}

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Copies static assets into the output tree.
#[derive(Debug, Default)]
pub struct AssetProcessor;

impl AssetProcessor {
    /// Create a new asset processor.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Copy every file from `source_dir` into `dest_dir`, preserving relative
    /// paths. Hidden entries are skipped. Returns the number of files copied.
    pub fn process(&self, source_dir: &Path, dest_dir: &Path) -> Result<usize> {
        info!(
            source = %source_dir.display(),
            dest = %dest_dir.display(),
            "copying assets"
        );

        if !source_dir.exists() {
            debug!("source directory does not exist, skipping");
            return Ok(0);
        }

        let mut count = 0;
        let walker = WalkDir::new(source_dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(source_dir)
                .map_err(|_| AssetError::InvalidPath(entry.path().to_path_buf()))?;
            let dest_path = dest_dir.join(relative);

            Self::copy_file(entry.path(), &dest_path)?;
            debug!(src = %entry.path().display(), dest = %dest_path.display(), "copied asset");
            count += 1;
        }

        info!(count, "assets copied");
        Ok(count)
    }

    /// Copy a single file, creating parent directories as needed.
    pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_process_assets() {
        let source = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();

        fs::create_dir_all(source.path().join("head")).unwrap();
        fs::write(source.path().join("head/hello-world.png"), b"\x89PNG").unwrap();
        fs::write(source.path().join("favicon.ico"), b"ico").unwrap();
        fs::write(source.path().join(".DS_Store"), b"junk").unwrap();

        let count = AssetProcessor::new()
            .process(source.path(), dest.path())
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            fs::read(dest.path().join("head/hello-world.png")).unwrap(),
            b"\x89PNG"
        );
        assert!(dest.path().join("favicon.ico").exists());
        assert!(!dest.path().join(".DS_Store").exists());
    }

    #[test]
    fn test_missing_source_dir() {
        let dir = TempDir::new().unwrap();
        let count = AssetProcessor::new()
            .process(&dir.path().join("static"), &dir.path().join("public"))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_copy_file_creates_parents() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("a.txt");
        fs::write(&source, "a").unwrap();

        let dest = dir.path().join("x/y/a.txt");
        AssetProcessor::copy_file(&source, &dest).unwrap();
        assert!(dest.exists());
    }
}
