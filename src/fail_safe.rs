//! Fail-safe file operations.
//!
//! Every operation here logs environmental failures through `tracing` and
//! hands back a sentinel (empty bytes, empty list, no-op) instead of an
//! error. The one exception is [`write_binary_to_file`] with both
//! `overwrite` and `file_copy` set, which is a caller mistake and is
//! rejected before the filesystem is touched.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::models::{EntryKind, FileContent, RglobOptions, WriteOptions};
use crate::rglob::SafeRglob;

/// Directory returned by [`get_dir_of_file`] when resolution fails.
pub const FALLBACK_DIR: &str = "/";

/// Fail-safe operations over a [`FileSystem`].
///
/// The crate-level free functions use `FailSafe::default()`, i.e. the real
/// filesystem.
#[derive(Debug, Default, Clone)]
pub struct FailSafe<F = RealFileSystem> {
    fs: F,
}

impl<F: FileSystem> FailSafe<F> {
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn file_system(&self) -> &F {
        &self.fs
    }

    /// Reads a whole file. A symbolic link is not followed; its stored
    /// target comes back as [`FileContent::SymbolicLink`].
    pub fn read(&self, path: impl AsRef<Path>) -> FileContent {
        let path = path.as_ref();
        self.try_read(path).unwrap_or_else(|err| {
            error!(path = %path.display(), error = %err, "could not read file");
            FileContent::empty()
        })
    }

    fn try_read(&self, path: &Path) -> Result<FileContent> {
        if self.fs.symlink_kind(path)? == EntryKind::Symlink {
            return Ok(FileContent::SymbolicLink(self.fs.read_link(path)?));
        }
        Ok(FileContent::Binary(self.fs.read(path)?))
    }

    /// Reads a file as text lines.
    ///
    /// Invalid UTF-8 is replaced, carriage returns are dropped and the text
    /// is split on every `\n`, so a trailing newline yields a trailing empty
    /// line and a failed read yields `[""]`.
    pub fn read_lines(&self, path: impl AsRef<Path>) -> Vec<String> {
        let raw = self.read(path).into_bytes();
        String::from_utf8_lossy(&raw)
            .replace('\r', "")
            .split('\n')
            .map(str::to_owned)
            .collect()
    }

    /// Writes `data` to `path`, creating missing parent directories.
    ///
    /// An existing destination is rewritten with `overwrite`, copied next to
    /// with `file_copy` and otherwise left untouched. I/O failures are logged;
    /// the only error returned is [`crate::CoreError::ConflictingWriteFlags`].
    pub fn write(
        &self,
        data: impl AsRef<[u8]>,
        path: impl AsRef<Path>,
        options: WriteOptions,
    ) -> Result<()> {
        options.validate()?;
        let path = path.as_ref();
        if let Err(err) = self.try_write(data.as_ref(), path, options) {
            error!(path = %path.display(), error = %err, "could not write file");
        }
        Ok(())
    }

    fn try_write(&self, data: &[u8], path: &Path, options: WriteOptions) -> Result<()> {
        if !self.fs.exists(path) {
            self.fs.create_dir_for_file(path)?;
            return self.fs.write(path, data);
        }

        if options.overwrite {
            self.fs.write(path, data)
        } else if options.file_copy {
            let copy = self.next_free_path(path);
            debug!(path = %path.display(), copy = %copy.display(), "file exists, writing copy");
            self.fs.write(&copy, data)
        } else {
            debug!(path = %path.display(), "file exists, write skipped");
            Ok(())
        }
    }

    fn next_free_path(&self, path: &Path) -> PathBuf {
        let mut candidate = get_counted_file_path(path);
        while self.fs.exists(&candidate) {
            candidate = get_counted_file_path(&candidate);
        }
        candidate
    }

    /// Removes a file or link. Missing files are fine.
    pub fn delete(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match self.fs.remove_file(path) {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                debug!(path = %path.display(), error = %err, "file to delete does not exist");
            }
            Err(err) => {
                error!(path = %path.display(), error = %err, "could not delete file");
            }
        }
    }

    /// Creates a symbolic link at `link` pointing at `source`, creating the
    /// link's parent directories first. `source` is stored as given and need
    /// not exist. An existing `link` is left alone.
    pub fn symlink(&self, source: impl AsRef<Path>, link: impl AsRef<Path>) {
        let (source, link) = (source.as_ref(), link.as_ref());
        if let Err(err) = self.fs.create_dir_for_file(link) {
            error!(link = %link.display(), error = %err, "could not create link directory");
            return;
        }
        match self.fs.symlink(source, link) {
            Ok(()) => {}
            Err(err) if err.is_already_exists() => {
                debug!(link = %link.display(), error = %err, "could not create link: file exists");
            }
            Err(err) => {
                error!(
                    link = %link.display(),
                    source = %source.display(),
                    error = %err,
                    "could not create link"
                );
            }
        }
    }

    /// Absolute paths of every non-directory entry below `directory`.
    ///
    /// Real subdirectories are walked; linked directories are neither
    /// reported nor entered. Links to files and broken links are reported
    /// like files. Order is unspecified.
    pub fn files_in_dir(&self, directory: impl AsRef<Path>) -> Vec<PathBuf> {
        let directory = directory.as_ref();
        self.try_files_in_dir(directory).unwrap_or_else(|err| {
            error!(path = %directory.display(), error = %err, "could not get files");
            Vec::new()
        })
    }

    fn try_files_in_dir(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        let root = self.fs.absolute(directory)?;
        let mut files = Vec::new();
        let mut pending = Vec::new();
        self.split_children(self.fs.list_dir(&root)?, &mut files, &mut pending);

        while let Some(current) = pending.pop() {
            match self.fs.list_dir(&current) {
                Ok(children) => self.split_children(children, &mut files, &mut pending),
                Err(err) => {
                    warn!(path = %current.display(), error = %err, "skipping unreadable directory");
                }
            }
        }
        Ok(files)
    }

    fn split_children(
        &self,
        children: Vec<PathBuf>,
        files: &mut Vec<PathBuf>,
        dirs: &mut Vec<PathBuf>,
    ) {
        for child in children {
            if !matches!(self.fs.kind(&child), Ok(EntryKind::Dir)) {
                files.push(child);
            } else if !matches!(self.fs.symlink_kind(&child), Ok(EntryKind::Symlink)) {
                dirs.push(child);
            }
        }
    }

    /// Resolved absolute paths of the first-level subdirectories of
    /// `directory`. Links to directories count and are resolved.
    pub fn dirs_in_dir(&self, directory: impl AsRef<Path>) -> Vec<PathBuf> {
        let directory = directory.as_ref();
        let children = match self.fs.list_dir(directory) {
            Ok(children) => children,
            Err(err) => {
                error!(path = %directory.display(), error = %err, "could not get directories");
                return Vec::new();
            }
        };

        children
            .into_iter()
            .filter(|child| matches!(self.fs.kind(child), Ok(EntryKind::Dir)))
            .filter_map(|child| match self.fs.canonicalize(&child) {
                Ok(resolved) => Some(resolved),
                Err(err) => {
                    warn!(path = %child.display(), error = %err, "could not resolve directory");
                    None
                }
            })
            .collect()
    }

    /// Absolute, resolved directory containing `path`, which may be relative
    /// and may not exist. Falls back to [`FALLBACK_DIR`].
    ///
    /// Superseded by `std::path`; kept for existing callers.
    pub fn dir_of_file(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match self.fs.resolve(path) {
            Ok(resolved) => match resolved.parent() {
                Some(parent) => parent.to_path_buf(),
                None => resolved,
            },
            Err(err) => {
                error!(path = %path.display(), error = %err, "could not get directory path");
                PathBuf::from(FALLBACK_DIR)
            }
        }
    }

    /// Lazy walk below `root`; see [`SafeRglob`].
    pub fn rglob(&self, root: impl AsRef<Path>, options: RglobOptions) -> SafeRglob<F>
    where
        F: Clone,
    {
        SafeRglob::new(self.fs.clone(), root.as_ref(), options)
    }
}

/// Next name in the `name`, `name-1`, `name-2`, ... sequence.
///
/// Only a `-<digits>` run at the very end of the whole path counts, so
/// `foo-34/bar` becomes `foo-34/bar-1`.
pub fn get_counted_file_path(path: &Path) -> PathBuf {
    if let Some(counted) = increment_path(path) {
        return counted;
    }
    let mut counted = OsString::from(path.as_os_str());
    counted.push("-1");
    PathBuf::from(counted)
}

#[cfg(unix)]
fn increment_path(path: &Path) -> Option<PathBuf> {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    increment_suffix(path.as_os_str().as_bytes())
        .map(|counted| PathBuf::from(OsString::from_vec(counted)))
}

#[cfg(not(unix))]
fn increment_path(path: &Path) -> Option<PathBuf> {
    let counted = increment_suffix(path.to_str()?.as_bytes())?;
    String::from_utf8(counted).ok().map(PathBuf::from)
}

fn increment_suffix(bytes: &[u8]) -> Option<Vec<u8>> {
    let digits = bytes.iter().rev().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let (stem, run) = bytes.split_at(bytes.len() - digits);
    let prefix = stem.strip_suffix(b"-")?;

    let mut counted = prefix.to_vec();
    counted.push(b'-');
    counted.extend(increment_decimal(run));
    Some(counted)
}

/// Adds one to an arbitrarily long run of ASCII digits and drops leading
/// zeros.
fn increment_decimal(digits: &[u8]) -> Vec<u8> {
    let mut out = digits.to_vec();
    let mut carry = true;
    for digit in out.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            carry = false;
            break;
        }
    }
    if carry {
        out.insert(0, b'1');
    }
    let zeros = out.iter().take_while(|&&digit| digit == b'0').count();
    out.split_off(zeros)
}

/// See [`FailSafe::read`].
pub fn get_binary_from_file(path: impl AsRef<Path>) -> FileContent {
    FailSafe::<RealFileSystem>::default().read(path)
}

/// See [`FailSafe::read_lines`].
pub fn get_string_list_from_file(path: impl AsRef<Path>) -> Vec<String> {
    FailSafe::<RealFileSystem>::default().read_lines(path)
}

/// See [`FailSafe::write`].
pub fn write_binary_to_file(
    data: impl AsRef<[u8]>,
    path: impl AsRef<Path>,
    overwrite: bool,
    file_copy: bool,
) -> Result<()> {
    let options = WriteOptions::new().overwrite(overwrite).file_copy(file_copy);
    FailSafe::<RealFileSystem>::default().write(data, path, options)
}

/// See [`FailSafe::delete`].
pub fn delete_file(path: impl AsRef<Path>) {
    FailSafe::<RealFileSystem>::default().delete(path)
}

/// See [`FailSafe::symlink`].
pub fn create_symlink(source: impl AsRef<Path>, link: impl AsRef<Path>) {
    FailSafe::<RealFileSystem>::default().symlink(source, link)
}

/// See [`FailSafe::files_in_dir`].
pub fn get_files_in_dir(directory: impl AsRef<Path>) -> Vec<PathBuf> {
    FailSafe::<RealFileSystem>::default().files_in_dir(directory)
}

/// See [`FailSafe::dirs_in_dir`].
pub fn get_dirs_in_dir(directory: impl AsRef<Path>) -> Vec<PathBuf> {
    FailSafe::<RealFileSystem>::default().dirs_in_dir(directory)
}

/// See [`FailSafe::dir_of_file`].
#[deprecated(note = "use `std::path::Path::parent` on a resolved path instead")]
pub fn get_dir_of_file(path: impl AsRef<Path>) -> PathBuf {
    FailSafe::<RealFileSystem>::default().dir_of_file(path)
}

/// Walks `root` with [`RglobOptions`] built from the two flags. See
/// [`SafeRglob`].
pub fn safe_rglob(
    root: impl AsRef<Path>,
    include_symlinks: bool,
    include_directories: bool,
) -> SafeRglob {
    FailSafe::<RealFileSystem>::default().rglob(
        root,
        RglobOptions::new(include_symlinks, include_directories),
    )
}
