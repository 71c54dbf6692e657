use crate::errors::CoreError;
use crate::models::EntryKind;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Filesystem abstraction boundary for the fail-safe operations.
///
/// Every method reports failures as [`CoreError`]; deciding whether a failure
/// becomes a sentinel value is left to the caller. Keeping the trait narrow
/// makes it easy to decorate the real filesystem in tests, e.g. to simulate
/// permission errors.
pub trait FileSystem: Send + Sync {
    /// Type of the entry itself, without following a final symbolic link.
    fn symlink_kind(&self, path: &Path) -> crate::Result<EntryKind>;

    /// Type of whatever the path points to, following symbolic links.
    fn kind(&self, path: &Path) -> crate::Result<EntryKind>;

    /// Returns true when path exists. Broken links do not exist.
    fn exists(&self, path: &Path) -> bool;

    /// Reads the whole file.
    fn read(&self, path: &Path) -> crate::Result<Vec<u8>>;

    /// Reads the stored target of a symbolic link.
    fn read_link(&self, path: &Path) -> crate::Result<PathBuf>;

    /// Writes raw bytes (create or truncate).
    fn write(&self, path: &Path, data: &[u8]) -> crate::Result<()>;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Removes a file or a symbolic link.
    fn remove_file(&self, path: &Path) -> crate::Result<()>;

    /// Creates `link` pointing at `original`, which is stored verbatim.
    fn symlink(&self, original: &Path, link: &Path) -> crate::Result<()>;

    /// Lists directory children as concrete paths, in directory order.
    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>>;

    /// Strict resolution: every component must exist.
    fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf>;

    /// Joins a relative path onto the current working directory.
    fn absolute(&self, path: &Path) -> crate::Result<PathBuf> {
        std::path::absolute(path).map_err(|err| CoreError::io(path, err))
    }

    /// Non-strict resolution.
    ///
    /// The longest existing ancestor is canonicalized and the remaining
    /// components are applied lexically, so paths that do not exist yet
    /// still resolve to an absolute, link-free location.
    fn resolve(&self, path: &Path) -> crate::Result<PathBuf> {
        let path = if path.as_os_str().is_empty() {
            Path::new(".")
        } else {
            path
        };
        let absolute = self.absolute(path)?;
        let components: Vec<Component<'_>> = absolute.components().collect();

        for split in (1..=components.len()).rev() {
            let prefix: PathBuf = components[..split].iter().collect();
            let Ok(mut resolved) = self.canonicalize(&prefix) else {
                continue;
            };
            for component in &components[split..] {
                match component {
                    Component::ParentDir => {
                        resolved.pop();
                    }
                    Component::CurDir => {}
                    other => resolved.push(other.as_os_str()),
                }
            }
            return Ok(resolved);
        }

        Err(CoreError::invalid_path(format!(
            "no existing ancestor for {}",
            path.display()
        )))
    }

    /// Creates every missing directory above `path`. The path itself may
    /// name a file that does not exist yet.
    fn create_dir_for_file(&self, path: &Path) -> crate::Result<()> {
        let parent = match path.parent() {
            Some(parent) if parent.as_os_str().is_empty() => Path::new("."),
            Some(parent) => parent,
            None => path,
        };
        let directory = self.resolve(parent)?;
        self.create_dir_all(&directory)
    }
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn symlink_kind(&self, path: &Path) -> crate::Result<EntryKind> {
        fs::symlink_metadata(path)
            .map(|meta| EntryKind::from(meta.file_type()))
            .map_err(|err| CoreError::io(path, err))
    }

    fn kind(&self, path: &Path) -> crate::Result<EntryKind> {
        fs::metadata(path)
            .map(|meta| EntryKind::from(meta.file_type()))
            .map_err(|err| CoreError::io(path, err))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> crate::Result<Vec<u8>> {
        fs::read(path).map_err(|err| CoreError::io(path, err))
    }

    fn read_link(&self, path: &Path) -> crate::Result<PathBuf> {
        fs::read_link(path).map_err(|err| CoreError::io(path, err))
    }

    fn write(&self, path: &Path, data: &[u8]) -> crate::Result<()> {
        fs::write(path, data).map_err(|err| CoreError::io(path, err))
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        fs::create_dir_all(path).map_err(|err| CoreError::io(path, err))
    }

    fn remove_file(&self, path: &Path) -> crate::Result<()> {
        fs::remove_file(path).map_err(|err| CoreError::io(path, err))
    }

    fn symlink(&self, original: &Path, link: &Path) -> crate::Result<()> {
        create_symlink(original, link).map_err(|err| CoreError::io(link, err))
    }

    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .map_err(|err| CoreError::io(path, err))?
            .map(|entry| entry.map(|v| v.path()))
            .collect::<Result<Vec<PathBuf>, io::Error>>()
            .map_err(|err| CoreError::io(path, err))
    }

    fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf> {
        fs::canonicalize(path).map_err(|err| CoreError::io(path, err))
    }
}

#[cfg(unix)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(original, link)
}

#[cfg(windows)]
fn create_symlink(original: &Path, link: &Path) -> io::Result<()> {
    // Windows needs to know the target type up front; relative targets are
    // looked up next to the link.
    let target = match link.parent() {
        Some(parent) if original.is_relative() => parent.join(original),
        _ => original.to_path_buf(),
    };
    if target.is_dir() {
        std::os::windows::fs::symlink_dir(original, link)
    } else {
        std::os::windows::fs::symlink_file(original, link)
    }
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_original: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        CoreError::UnsupportedPlatform("symbolic links".to_string()),
    ))
}
