use std::{io, path::PathBuf};

/// Shared error type for every fallible operation in the crate.
///
/// The fail-safe functions never hand these back to callers except for
/// [`CoreError::ConflictingWriteFlags`]; everything else is logged at the
/// boundary and replaced by a sentinel value.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    /// File system I/O failure.
    #[error("I/O error while accessing {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] io::Error),

    /// `overwrite` and `file_copy` were requested together.
    #[error("the arguments overwrite and file_copy cannot both be true")]
    ConflictingWriteFlags,

    /// A path is invalid for the current operation.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An external command ran but reported failure.
    #[error("command `{command}` failed with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// Platform-specific behavior not available in this environment.
    #[error("unsupported platform behavior: {0}")]
    UnsupportedPlatform(String),
}

impl CoreError {
    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }

    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath(message.into())
    }

    /// Kind of the underlying I/O error, if this is one.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io(_, err) => Some(err.kind()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }

    pub fn is_permission_denied(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::PermissionDenied)
    }

    pub fn is_already_exists(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::AlreadyExists)
    }
}

/// Shared result alias for the crate.
pub type Result<T> = std::result::Result<T, CoreError>;
