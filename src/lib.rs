//! Fail-safe file-system helpers.
//! Reads, writes, deletes, link creation and directory walks that log
//! environmental failures through `tracing` and return a sentinel value
//! instead of an error, plus a handful of small path and size helpers.

pub mod errors;
pub mod fail_safe;
pub mod fs;
pub mod git;
pub mod helpers;
pub mod logging;
pub mod models;
pub mod rglob;

pub use errors::{CoreError, Result};
#[allow(deprecated)]
pub use fail_safe::{
    create_symlink,
    delete_file,
    get_binary_from_file,
    get_counted_file_path,
    get_dir_of_file,
    get_dirs_in_dir,
    get_files_in_dir,
    get_string_list_from_file,
    safe_rglob,
    write_binary_to_file,
    FailSafe,
    FALLBACK_DIR,
};
pub use fs::{FileSystem, RealFileSystem};
pub use git::get_version_string_from_git;
pub use helpers::{
    create_dir_for_file,
    get_directory_for_filename,
    get_safe_name,
    get_safe_name_with,
    human_readable_file_size,
    read_in_chunks,
    Chunks,
    DEFAULT_CHUNK_SIZE,
    DEFAULT_MAX_NAME_SIZE,
    DEFAULT_VALID_CHARACTERS,
};
pub use models::{EntryKind, FileContent, RglobOptions, WriteOptions, SYMLINK_MARKER_PREFIX};
pub use rglob::SafeRglob;

/// Re-export a small stable API surface for callers.
pub mod prelude {
    pub use crate::{
        errors::{CoreError, Result},
        fail_safe::*,
        fs::{FileSystem, RealFileSystem},
        helpers::*,
        models::*,
        rglob::SafeRglob,
    };
}
