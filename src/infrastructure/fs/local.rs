//! Local File System Implementation
//!
//! Implements the FileSystem port for local disk operations.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};
use crate::domain::value_objects::ContentHash;

/// Local file system implementation
///
/// Provides atomic writes and streaming content hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    /// Create a new LocalFs instance
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        std::fs::read_to_string(path).map_err(|e| FsError::from_io(e, path))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        atomic_write(path, content.as_bytes()).map_err(|e| FsError::from_io(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn hash(&self, path: &Path) -> FsResult<ContentHash> {
        let mut file = File::open(path).map_err(|e| FsError::from_io(e, path))?;
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = file.read(&mut buf).map_err(|e| FsError::from_io(e, path))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(ContentHash::from_hasher(hasher))
    }

    fn list_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(dir).map_err(|e| FsError::from_io(e, dir))?;
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(e, dir))?;
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                files.push(entry.path());
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

/// Write via a temporary file in the same directory, then rename over `path`.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn local_fs_write_and_read() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("test.txt");
        let fs = LocalFs::new();

        fs.write(&file, "hello world").unwrap();
        let content = fs.read(&file).unwrap();

        assert_eq!(content, "hello world");
    }

    #[test]
    fn local_fs_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("nested").join("dir").join("test.txt");
        let fs = LocalFs::new();

        fs.write(&file, "content").unwrap();

        assert!(file.exists());
    }

    #[test]
    fn local_fs_exists_ignores_directories() {
        let dir = tempdir().unwrap();
        let fs = LocalFs::new();

        assert!(!fs.exists(dir.path()));
        assert!(!fs.exists(&dir.path().join("missing.html")));
    }

    #[test]
    fn local_fs_hash_matches_in_memory_hash() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("report.html");
        std::fs::write(&file, "<html>1001</html>").unwrap();

        let hash = LocalFs::new().hash(&file).unwrap();
        assert_eq!(hash, ContentHash::from_bytes(b"<html>1001</html>"));
    }

    #[test]
    fn local_fs_hash_missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let err = LocalFs::new().hash(&dir.path().join("gone.html")).unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));
    }

    #[test]
    fn list_files_is_sorted_and_skips_dirs() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.html"), "b").unwrap();
        std::fs::write(dir.path().join("a.html"), "a").unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();

        let files = LocalFs::new().list_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }
}
