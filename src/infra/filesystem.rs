//! Filesystem operations
//!
//! Handles file and directory operations.

use std::path::{Path, PathBuf};

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Copy a file to an explicit destination path
pub fn copy_file(from: &Path, to: &Path) -> Result<(), FilesystemError> {
    std::fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| FilesystemError::CopyFile {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            error: e.to_string(),
        })
}

/// Copy a file into `dir`, keeping its file name
///
/// Returns the destination path.
pub fn copy_into_dir(from: &Path, dir: &Path) -> Result<PathBuf, FilesystemError> {
    let name = from.file_name().ok_or_else(|| FilesystemError::ReadFile {
        path: from.to_path_buf(),
        error: "path has no file name".to_string(),
    })?;
    let to = dir.join(name);
    copy_file(from, &to)?;
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_into_dir_keeps_name() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("msvcp140.dll");
        std::fs::write(&src, b"runtime").unwrap();
        let dest_dir = temp.path().join("bin");
        create_dir_all(&dest_dir).unwrap();

        let copied = copy_into_dir(&src, &dest_dir).unwrap();
        assert_eq!(copied, dest_dir.join("msvcp140.dll"));
        assert_eq!(std::fs::read(copied).unwrap(), b"runtime");
    }

    #[test]
    fn test_copy_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let result = copy_file(&temp.path().join("missing"), &temp.path().join("out"));
        assert!(matches!(result, Err(FilesystemError::CopyFile { .. })));
    }
}
