#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fail_safe_files::{CoreError, EntryKind, FileSystem, RealFileSystem};
use tracing::Level;

/// In-memory log sink shared between a subscriber and the test.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber that records every event at `TRACE` and
/// above, and returns what was logged next to `f`'s result.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, logs.contents())
}

/// Real filesystem that fails reads, writes, removals and listings of
/// chosen paths, and optionally the type lookup of chosen entries. Useful
/// where the tests may run as root and real permissions cannot be relied on.
#[derive(Clone, Default)]
pub struct DenyingFileSystem {
    failures: HashMap<PathBuf, io::ErrorKind>,
    entry_failures: HashMap<PathBuf, io::ErrorKind>,
}

impl DenyingFileSystem {
    pub fn deny(self, path: impl Into<PathBuf>) -> Self {
        self.fail(path, io::ErrorKind::PermissionDenied)
    }

    pub fn fail(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.failures.insert(path.into(), kind);
        self
    }

    /// Makes looking up the entry itself (`lstat`) fail.
    pub fn fail_entry(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
        self.entry_failures.insert(path.into(), kind);
        self
    }

    fn check(&self, path: &Path) -> fail_safe_files::Result<()> {
        check_in(&self.failures, path)
    }
}

fn check_in(
    failures: &HashMap<PathBuf, io::ErrorKind>,
    path: &Path,
) -> fail_safe_files::Result<()> {
    match failures.get(path) {
        Some(kind) => Err(CoreError::io(path, io::Error::new(*kind, "injected failure"))),
        None => Ok(()),
    }
}

impl FileSystem for DenyingFileSystem {
    fn symlink_kind(&self, path: &Path) -> fail_safe_files::Result<EntryKind> {
        check_in(&self.entry_failures, path)?;
        RealFileSystem.symlink_kind(path)
    }

    fn kind(&self, path: &Path) -> fail_safe_files::Result<EntryKind> {
        RealFileSystem.kind(path)
    }

    fn exists(&self, path: &Path) -> bool {
        RealFileSystem.exists(path)
    }

    fn read(&self, path: &Path) -> fail_safe_files::Result<Vec<u8>> {
        self.check(path)?;
        RealFileSystem.read(path)
    }

    fn read_link(&self, path: &Path) -> fail_safe_files::Result<PathBuf> {
        RealFileSystem.read_link(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> fail_safe_files::Result<()> {
        self.check(path)?;
        RealFileSystem.write(path, data)
    }

    fn create_dir_all(&self, path: &Path) -> fail_safe_files::Result<()> {
        RealFileSystem.create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> fail_safe_files::Result<()> {
        self.check(path)?;
        RealFileSystem.remove_file(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> fail_safe_files::Result<()> {
        RealFileSystem.symlink(original, link)
    }

    fn list_dir(&self, path: &Path) -> fail_safe_files::Result<Vec<PathBuf>> {
        self.check(path)?;
        RealFileSystem.list_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> fail_safe_files::Result<PathBuf> {
        RealFileSystem.canonicalize(path)
    }
}
