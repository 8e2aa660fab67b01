//! File access for shell-variable documents
//!
//! Thin wrapper over the filesystem: open-and-read with a size cap, and
//! truncate-and-rewrite over a descriptor held open since the read. The
//! rest of the crate never touches `std::fs` directly.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest file the reader will load, to bound memory.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("could not access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file '{path}' is larger than {limit} bytes")]
    TooLarge { path: PathBuf, limit: u64 },

    #[error("file '{path}' is not valid UTF-8")]
    NotUtf8 { path: PathBuf },
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of opening a document's backing file.
#[derive(Debug)]
pub(crate) struct OpenedFile {
    /// Held only when the file was opened read-write; a read-only
    /// descriptor is closed right after reading since it cannot be
    /// written through anyway.
    pub file: Option<File>,
    pub content: String,
}

/// Opens `path` and reads it whole.
///
/// With `create`, a read-write descriptor is preferred (and kept for the
/// eventual rewrite) and an unopenable file yields `Ok(None)` instead of
/// an error, so the caller can start from an empty document.
pub(crate) fn open_and_read(path: &Path, create: bool) -> Result<Option<OpenedFile>, FileError> {
    let mut file = None;
    if create {
        file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .ok()
            .map(|f| (f, true));
    }
    if file.is_none() {
        match OpenOptions::new().read(true).open(path) {
            Ok(f) => file = Some((f, false)),
            Err(e) => {
                if create {
                    return Ok(None);
                }
                return Err(FileError::io(path, e));
            }
        }
    }

    let (mut f, writable) = file.expect("file opened above");
    let content = read_capped(&mut f, path)?;
    Ok(Some(OpenedFile {
        file: writable.then_some(f),
        content,
    }))
}

/// Opens `path` for writing, creating it with `mode` if missing.
pub(crate) fn open_for_write(path: &Path, mode: u32) -> Result<File, FileError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    options.open(path).map_err(|e| FileError::io(path, e))
}

/// Truncates the file and writes `content` from the start.
pub(crate) fn rewrite(file: &mut File, path: &Path, content: &str) -> Result<(), FileError> {
    file.set_len(0).map_err(|e| FileError::io(path, e))?;
    file.seek(SeekFrom::Start(0))
        .map_err(|e| FileError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| FileError::io(path, e))?;
    file.flush().map_err(|e| FileError::io(path, e))
}

fn read_capped(file: &mut File, path: &Path) -> Result<String, FileError> {
    let len = file.metadata().map_err(|e| FileError::io(path, e))?.len();
    if len > MAX_FILE_SIZE {
        return Err(FileError::TooLarge {
            path: path.to_path_buf(),
            limit: MAX_FILE_SIZE,
        });
    }

    let mut bytes = Vec::with_capacity(len as usize);
    file.read_to_end(&mut bytes)
        .map_err(|e| FileError::io(path, e))?;

    String::from_utf8(bytes).map_err(|_| FileError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn reads_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ifcfg-eth0");
        fs::write(&path, "DEVICE=eth0\n").unwrap();

        let opened = open_and_read(&path, false).unwrap().unwrap();
        assert_eq!(opened.content, "DEVICE=eth0\n");
        // Read-only open does not keep a descriptor.
        assert!(opened.file.is_none());
    }

    #[test]
    fn create_mode_keeps_writable_descriptor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ifcfg-eth0");
        fs::write(&path, "DEVICE=eth0\n").unwrap();

        let opened = open_and_read(&path, true).unwrap().unwrap();
        assert!(opened.file.is_some());
    }

    #[test]
    fn missing_file_errors_without_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");

        let err = open_and_read(&path, false).unwrap_err();
        assert!(matches!(err, FileError::Io { .. }), "got {err:?}");
    }

    #[test]
    fn missing_file_is_none_with_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");

        assert!(open_and_read(&path, true).unwrap().is_none());
    }

    #[test]
    fn rejects_non_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary");
        fs::write(&path, b"FOO=\xff\xfe\n").unwrap();

        let err = open_and_read(&path, false).unwrap_err();
        assert!(matches!(err, FileError::NotUtf8 { .. }), "got {err:?}");
    }

    #[test]
    fn rejects_oversized_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("huge");
        let file = File::create(&path).unwrap();
        file.set_len(MAX_FILE_SIZE + 1).unwrap();

        let err = open_and_read(&path, false).unwrap_err();
        assert!(matches!(err, FileError::TooLarge { .. }), "got {err:?}");
    }

    #[test]
    fn rewrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, "a much longer original content\n").unwrap();

        let mut file = open_and_read(&path, true).unwrap().unwrap().file.unwrap();
        rewrite(&mut file, &path, "short\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
    }
}
