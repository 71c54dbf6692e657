use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::errors::{CoreError, Result};

const GIT_DESCRIBE: [&str; 2] = ["describe", "--always"];

/// Short version string (`git describe --always`) of the working tree at
/// `directory`.
///
/// Not fail-safe: a missing `git`, a directory outside any repository or a
/// failing command is reported to the caller.
pub fn get_version_string_from_git(directory: impl AsRef<Path>) -> Result<String> {
    let directory = directory.as_ref();
    if !directory.is_dir() {
        return Err(CoreError::invalid_path(format!(
            "{} is not a directory",
            directory.display()
        )));
    }

    let output = Command::new("git")
        .args(GIT_DESCRIBE)
        .current_dir(directory)
        .output()
        .map_err(|err| CoreError::io(directory, err))?;

    if !output.status.success() {
        return Err(CoreError::Command {
            command: format!("git {}", GIT_DESCRIBE.join(" ")),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    debug!(path = %directory.display(), version = %version, "read version from git");
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_an_error() {
        let err = get_version_string_from_git("/none_existing/dir").unwrap_err();
        assert!(matches!(err, CoreError::InvalidPath(_)));
    }

    #[test]
    fn directory_outside_a_repository_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        // Either git is missing (Io) or it refuses to describe (Command).
        let err = get_version_string_from_git(tmp.path()).unwrap_err();
        assert!(matches!(err, CoreError::Io(..) | CoreError::Command { .. }));
    }
}
