//! Recursive directory listing that survives hostile trees.
//!
//! Broken links, links that point at themselves and directories the process
//! may not read are all things a naive recursive listing trips over. Here
//! they are logged and skipped, and the walk carries on with the siblings.
//! Symbolic links are reported but never descended into, so link cycles
//! cannot make the walk revisit a path.

use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use tracing::{debug, error, trace, warn};

use crate::errors::CoreError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::models::{EntryKind, RglobOptions};

enum Step {
    /// Classify a path and maybe yield it.
    Visit(PathBuf),
    /// List a directory that was already yielded (or skipped) and queue its
    /// children.
    Expand(PathBuf),
}

/// Lazy depth-first walk below a root directory.
///
/// Created by [`crate::safe_rglob`] or [`crate::FailSafe::rglob`]. The root
/// itself is never yielded. Each call to `next` does only the work needed
/// to find the next path, so stopping early skips the rest of the tree.
pub struct SafeRglob<F = RealFileSystem> {
    fs: F,
    options: RglobOptions,
    pending: Vec<Step>,
}

impl<F: FileSystem> SafeRglob<F> {
    pub fn new(fs: F, root: &Path, options: RglobOptions) -> Self {
        // `link/` would make lstat follow the link, so drop trailing separators.
        let root: PathBuf = root.components().collect();
        let mut pending = Vec::new();
        match fs.symlink_kind(&root) {
            Ok(EntryKind::Dir) => pending.push(Step::Expand(root)),
            Ok(kind) => {
                debug!(path = %root.display(), kind = %kind, "not a directory, nothing to walk");
            }
            Err(err) => {
                debug!(path = %root.display(), error = %err, "walk root is not accessible");
            }
        }
        Self {
            fs,
            options,
            pending,
        }
    }

    fn visit(&mut self, path: PathBuf) -> Option<PathBuf> {
        match self.fs.symlink_kind(&path) {
            Ok(EntryKind::Symlink) => {
                (self.options.include_symlinks && self.link_resolves(&path)).then_some(path)
            }
            Ok(EntryKind::File) => Some(path),
            Ok(EntryKind::Dir) => {
                self.pending.push(Step::Expand(path.clone()));
                self.options.include_directories.then_some(path)
            }
            Ok(EntryKind::Other) => None,
            Err(err) => {
                self.report(&path, &err);
                None
            }
        }
    }

    fn expand(&mut self, directory: &Path) {
        match self.fs.list_dir(directory) {
            Ok(children) => self
                .pending
                .extend(children.into_iter().rev().map(Step::Visit)),
            Err(err) => self.report(directory, &err),
        }
    }

    fn link_resolves(&self, path: &Path) -> bool {
        match self.fs.kind(path) {
            Ok(EntryKind::File | EntryKind::Dir) => true,
            Ok(_) => false,
            Err(err) => {
                trace!(path = %path.display(), error = %err, "skipping unresolvable link");
                false
            }
        }
    }

    fn report(&self, path: &Path, err: &CoreError) {
        let shown = self
            .fs
            .absolute(path)
            .unwrap_or_else(|_| path.to_path_buf());
        if err.is_permission_denied() {
            error!(
                path = %shown.display(),
                error = %err,
                "permission error: could not access path"
            );
        } else {
            warn!(path = %shown.display(), error = %err, "possible broken symlink");
        }
    }
}

impl<F: FileSystem> Iterator for SafeRglob<F> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(step) = self.pending.pop() {
            match step {
                Step::Visit(path) => {
                    if let Some(found) = self.visit(path) {
                        return Some(found);
                    }
                }
                Step::Expand(directory) => self.expand(&directory),
            }
        }
        None
    }
}

impl<F: FileSystem> FusedIterator for SafeRglob<F> {}
