//! The input-file contract (spec.md §3 "File entry", §6 input contract).
//!
//! Discovering *which* files go into a torrent and in what order is the
//! file-picker's job (an external collaborator, per spec.md §1's Non-goals)
//! — this module only defines the shape the pipeline consumes. `walk_directory`
//! is provided as a convenience for tests, the demo binary, and any caller
//! that doesn't already have its own picker, grounded on bip_metainfo's
//! `accessor::FileAccessor`, but it is never called by the pipeline itself.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

/// One file to be hashed into the torrent. `path` is the ordered sequence
/// of non-empty path segments the metainfo will record; `open` re-opens a
/// fresh, independent byte stream each time it is called (the pipeline opens
/// it once, but `verify::check` opens it again later).
#[derive(Clone)]
pub struct FileEntry {
    pub path: Vec<String>,
    pub size: u64,
    open: Arc<dyn Fn() -> io::Result<Box<dyn Read + Send>> + Send + Sync>,
}

impl FileEntry {
    /// Builds an entry backed by a real filesystem file.
    ///
    /// `path` is the sequence of path segments to record in the metainfo;
    /// `absolute_path` is where to actually read the bytes from.
    pub fn from_file(path: Vec<String>, absolute_path: impl Into<PathBuf>) -> io::Result<Self> {
        let absolute_path = absolute_path.into();
        let size = std::fs::metadata(&absolute_path)?.len();

        Ok(FileEntry {
            path,
            size,
            open: Arc::new(move || {
                let file = File::open(&absolute_path)?;
                Ok(Box::new(file) as Box<dyn Read + Send>)
            }),
        })
    }

    /// Builds an entry backed by an in-memory buffer — used by tests and by
    /// callers (e.g. a browser/WASM front end) that already hold file
    /// contents rather than a filesystem path.
    pub fn in_memory(path: Vec<String>, contents: Vec<u8>) -> Self {
        let size = contents.len() as u64;
        let contents = Arc::new(contents);

        FileEntry {
            path,
            size,
            open: Arc::new(move || Ok(Box::new(Cursor::new((*contents).clone())) as Box<dyn Read + Send>)),
        }
    }

    pub fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        (self.open)()
    }

    /// The last path segment — the file's own name, used as the default
    /// torrent name in single-file mode.
    pub fn file_name(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }
}

/// Walks `root` recursively and returns its files as [`FileEntry`] values in
/// a stable, deterministic order (sorted by path), the way a real picker
/// should hand files to the pipeline — permuting this order changes the
/// piece table and hence the info-hash, per spec.md §3's invariants, so
/// determinism here matters even though this helper isn't part of the core.
pub fn walk_directory(root: impl AsRef<Path>) -> io::Result<Vec<FileEntry>> {
    let root = root.as_ref();
    let mut paths: Vec<PathBuf> = Vec::new();

    if root.is_file() {
        paths.push(root.to_path_buf());
    } else {
        for entry in WalkDir::new(root) {
            let entry = entry?;
            if entry.file_type().is_file() {
                paths.push(entry.path().to_path_buf());
            }
        }
        paths.sort();
    }

    paths
        .into_iter()
        .map(|absolute| {
            let relative = if root.is_file() {
                vec![file_name_lossy(&absolute)]
            } else {
                absolute
                    .strip_prefix(root)
                    .unwrap_or(&absolute)
                    .iter()
                    .map(|segment| segment.to_string_lossy().into_owned())
                    .collect()
            };

            FileEntry::from_file(relative, absolute)
        })
        .collect()
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read as _;

    #[test]
    fn in_memory_entry_reports_its_size() {
        let entry = FileEntry::in_memory(vec!["a.txt".to_owned()], b"hello".to_vec());
        assert_eq!(entry.size, 5);
        assert_eq!(entry.file_name(), Some("a.txt"));
    }

    #[test]
    fn in_memory_entry_can_be_opened_more_than_once() {
        let entry = FileEntry::in_memory(vec!["a.txt".to_owned()], b"hello".to_vec());

        let mut first = Vec::new();
        entry.open().unwrap().read_to_end(&mut first).unwrap();
        let mut second = Vec::new();
        entry.open().unwrap().read_to_end(&mut second).unwrap();

        assert_eq!(first, b"hello");
        assert_eq!(second, b"hello");
    }

    #[test]
    fn walk_directory_sorts_paths_for_determinism() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), b"b").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let entries = walk_directory(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.file_name().unwrap()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn walk_directory_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solo.txt");
        std::fs::write(&path, b"contents").unwrap();

        let entries = walk_directory(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, vec!["solo.txt".to_owned()]);
        assert_eq!(entries[0].size, 8);
    }
}
