use std::fmt;
use std::fs::FileType;
use std::path::PathBuf;

use crate::errors::{CoreError, Result};

/// Prefix of the text returned instead of file bytes when reading a link.
pub const SYMLINK_MARKER_PREFIX: &str = "symbolic link -> ";

/// Type of a file-system entry, as seen with or without following links.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// Sockets, FIFOs, device nodes and the like.
    Other,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Dir => "directory",
            Self::Symlink => "symbolic link",
            Self::Other => "other",
        }
    }
}

impl From<FileType> for EntryKind {
    fn from(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Dir
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a fail-safe read hands back.
///
/// Links are never followed: their stored target is reported instead, so
/// callers can tell file bytes apart from the descriptive marker.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FileContent {
    Binary(Vec<u8>),
    SymbolicLink(PathBuf),
}

impl FileContent {
    /// The sentinel returned when a read fails.
    pub fn empty() -> Self {
        Self::Binary(Vec::new())
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self, Self::SymbolicLink(_))
    }

    /// Raw bytes, or `None` for a link.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes.as_slice()),
            Self::SymbolicLink(_) => None,
        }
    }

    /// `"symbolic link -> <target>"` for a link, `None` for file bytes.
    pub fn marker(&self) -> Option<String> {
        match self {
            Self::Binary(_) => None,
            Self::SymbolicLink(target) => {
                Some(format!("{SYMLINK_MARKER_PREFIX}{}", target.display()))
            }
        }
    }

    /// Raw bytes for a file, the marker text encoded as UTF-8 for a link.
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Binary(bytes) => bytes,
            Self::SymbolicLink(target) => {
                format!("{SYMLINK_MARKER_PREFIX}{}", target.display()).into_bytes()
            }
        }
    }
}

impl fmt::Display for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary(bytes) => write!(f, "{}", String::from_utf8_lossy(bytes)),
            Self::SymbolicLink(target) => write!(f, "{SYMLINK_MARKER_PREFIX}{}", target.display()),
        }
    }
}

impl PartialEq<[u8]> for FileContent {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == Some(other)
    }
}

impl PartialEq<&[u8]> for FileContent {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_bytes() == Some(*other)
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for FileContent {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.as_bytes() == Some(other.as_slice())
    }
}

/// How an existing destination is treated by a fail-safe write.
///
/// With neither flag set an existing file is left alone and the write is
/// skipped.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct WriteOptions {
    /// Truncate and rewrite an existing file.
    pub overwrite: bool,
    /// Write next to an existing file under a counted name (`name-1`, ...).
    pub file_copy: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn file_copy(mut self, file_copy: bool) -> Self {
        self.file_copy = file_copy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.overwrite && self.file_copy {
            return Err(CoreError::ConflictingWriteFlags);
        }
        Ok(())
    }
}

/// Which entry types a [`crate::SafeRglob`] reports. Regular files are
/// always reported.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RglobOptions {
    pub include_symlinks: bool,
    pub include_directories: bool,
}

impl Default for RglobOptions {
    fn default() -> Self {
        Self {
            include_symlinks: true,
            include_directories: true,
        }
    }
}

impl RglobOptions {
    pub fn new(include_symlinks: bool, include_directories: bool) -> Self {
        Self {
            include_symlinks,
            include_directories,
        }
    }
}
