//! Small helpers that sit next to the fail-safe operations: name
//! sanitizing, size formatting, chunked reads and the directory ensurer.
//! Unlike the fail-safe operations, the path helpers here return errors.

use std::collections::HashSet;
use std::io::{self, Read};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use crate::fs::{FileSystem, RealFileSystem};

/// Longest name [`get_safe_name`] returns, in characters.
pub const DEFAULT_MAX_NAME_SIZE: usize = 200;

/// Characters [`get_safe_name`] keeps.
pub const DEFAULT_VALID_CHARACTERS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_+. ";

/// Block size used by [`read_in_chunks`] callers that have no preference.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Binary unit names, smallest first.
const SIZE_UNITS: [&str; 7] = ["Byte", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Strips a file name down to [`DEFAULT_VALID_CHARACTERS`], turns spaces into
/// underscores and cuts it to [`DEFAULT_MAX_NAME_SIZE`] characters.
pub fn get_safe_name(name: &str) -> String {
    get_safe_name_with(name, DEFAULT_MAX_NAME_SIZE, DEFAULT_VALID_CHARACTERS)
}

/// [`get_safe_name`] with a custom length limit and character set.
/// Characters outside `valid_characters` are dropped, not replaced.
pub fn get_safe_name_with(name: &str, max_size: usize, valid_characters: &str) -> String {
    let allowed: HashSet<char> = valid_characters.chars().collect();
    name.chars()
        .filter(|c| allowed.contains(c))
        .map(|c| if c == ' ' { '_' } else { c })
        .take(max_size)
        .collect()
}

/// Human readable size with the best fitting binary prefix and two
/// decimals, e.g. `1.00 KiB`. Sizes below 1024 stay in `Byte`.
pub fn human_readable_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut idx = 0usize;

    while value >= 1024.0 && idx < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }

    format!("{:.2} {}", value, SIZE_UNITS[idx])
}

/// Iterator over fixed-size blocks of a reader. See [`read_in_chunks`].
#[derive(Debug)]
pub struct Chunks<R> {
    reader: R,
    chunk_size: usize,
    done: bool,
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut buffer = Vec::with_capacity(self.chunk_size);
        match self
            .reader
            .by_ref()
            .take(self.chunk_size as u64)
            .read_to_end(&mut buffer)
        {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => Some(Ok(buffer)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> FusedIterator for Chunks<R> {}

/// Reads a large source piece by piece. Every chunk but the last holds
/// exactly `chunk_size` bytes; a read error ends the iteration after being
/// yielded once.
///
/// ```
/// use fail_safe_files::read_in_chunks;
///
/// let data = b"this is a test".as_slice();
/// let chunks: Vec<Vec<u8>> = read_in_chunks(data, 4).collect::<Result<_, _>>().unwrap();
/// assert_eq!(chunks.len(), 4);
/// assert_eq!(chunks.concat(), b"this is a test");
/// ```
pub fn read_in_chunks<R: Read>(reader: R, chunk_size: usize) -> Chunks<R> {
    Chunks {
        reader,
        chunk_size,
        done: false,
    }
}

/// Absolute, resolved directory containing `path`.
///
/// Superseded by `std::path`; unlike [`crate::get_dir_of_file`] this
/// reports failures instead of falling back to `/`.
pub fn get_directory_for_filename(path: impl AsRef<Path>) -> crate::Result<PathBuf> {
    let resolved = RealFileSystem.resolve(path.as_ref())?;
    Ok(match resolved.parent() {
        Some(parent) => parent.to_path_buf(),
        None => resolved,
    })
}

/// Creates all directories above `path`; `path` itself may be a file name.
pub fn create_dir_for_file(path: impl AsRef<Path>) -> crate::Result<()> {
    RealFileSystem.create_dir_for_file(path.as_ref())
}
