mod common;

use std::fs;

use common::{with_captured_logs, DenyingFileSystem};
use fail_safe_files::{
    create_symlink, delete_file, get_binary_from_file, get_string_list_from_file,
    write_binary_to_file, CoreError, FailSafe, FileContent, WriteOptions,
};
use tempfile::TempDir;

#[test]
fn read_returns_file_bytes() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("read_test");
    fs::write(&path, b"this is a test").unwrap();

    assert_eq!(get_binary_from_file(&path), b"this is a test");
}

#[test]
fn read_missing_file_returns_empty_bytes_and_logs() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("none_existing_file");

    let (content, logs) = with_captured_logs(|| get_binary_from_file(&path));

    assert_eq!(content, FileContent::Binary(Vec::new()));
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("could not read file"), "{logs}");
    assert!(logs.contains("none_existing_file"), "{logs}");
}

#[cfg(unix)]
#[test]
fn read_symlink_returns_marker_with_stored_target() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("read_test"), b"this is a test").unwrap();
    let link = tmp.path().join("link_test");
    std::os::unix::fs::symlink("read_test", &link).unwrap();

    let content = get_binary_from_file(&link);

    assert!(content.is_symlink());
    assert_eq!(content.marker().as_deref(), Some("symbolic link -> read_test"));
}

#[cfg(unix)]
#[test]
fn read_dangling_symlink_still_returns_marker() {
    let tmp = TempDir::new().unwrap();
    let link = tmp.path().join("broken_link");
    std::os::unix::fs::symlink("nonexistent", &link).unwrap();

    assert_eq!(
        get_binary_from_file(&link).to_string(),
        "symbolic link -> nonexistent"
    );
}

#[test]
fn read_lines_replaces_invalid_utf8_and_keeps_empty_lines() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("multiline_test.txt");
    fs::write(&path, b"first line\r\nsecond line\nth\xffrd line\n\nfirst line").unwrap();

    assert_eq!(
        get_string_list_from_file(&path),
        vec!["first line", "second line", "th\u{fffd}rd line", "", "first line"]
    );
}

#[test]
fn read_lines_keeps_trailing_empty_segment() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("trailing");
    fs::write(&path, b"a\r\nb\r\n").unwrap();

    let lines = get_string_list_from_file(&path);

    assert_eq!(lines, vec!["a", "b", ""]);
    assert!(lines.iter().all(|line| !line.contains('\r')));
}

#[test]
fn read_lines_of_missing_file_is_single_empty_line() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(get_string_list_from_file(tmp.path().join("missing")), vec![""]);
}

#[cfg(unix)]
#[test]
fn read_lines_of_symlink_decodes_marker() {
    let tmp = TempDir::new().unwrap();
    let link = tmp.path().join("link");
    std::os::unix::fs::symlink("target", &link).unwrap();

    assert_eq!(get_string_list_from_file(&link), vec!["symbolic link -> target"]);
}

#[test]
fn write_creates_directories_and_round_trips() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test_folder").join("test_file");

    write_binary_to_file(b"this is a test", &path, false, false).unwrap();

    assert!(path.exists());
    assert_eq!(get_binary_from_file(&path), b"this is a test");
}

#[test]
fn write_without_flags_keeps_existing_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test_file");
    write_binary_to_file(b"this is a test", &path, false, false).unwrap();

    write_binary_to_file(b"do not overwrite", &path, false, false).unwrap();

    assert_eq!(get_binary_from_file(&path), b"this is a test");
}

#[test]
fn write_with_overwrite_replaces_content() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test_file");
    write_binary_to_file(b"this is a longer first version", &path, false, false).unwrap();

    write_binary_to_file(b"overwrite", &path, true, false).unwrap();

    assert_eq!(get_binary_from_file(&path), b"overwrite");
}

#[test]
fn write_with_file_copy_leaves_original_untouched() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test_file");
    write_binary_to_file(b"overwrite", &path, false, false).unwrap();

    write_binary_to_file(b"second_overwrite", &path, false, true).unwrap();

    assert_eq!(get_binary_from_file(&path), b"overwrite");
    assert_eq!(
        get_binary_from_file(tmp.path().join("test_file-1")),
        b"second_overwrite"
    );
    assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 2);
}

#[test]
fn write_with_file_copy_skips_taken_suffixes() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("report");
    for content in [b"one", b"two", b"six"] {
        write_binary_to_file(content, &path, false, true).unwrap();
    }

    assert_eq!(get_binary_from_file(&path), b"one");
    assert_eq!(get_binary_from_file(tmp.path().join("report-1")), b"two");
    assert_eq!(get_binary_from_file(tmp.path().join("report-2")), b"six");
}

#[test]
fn write_with_both_flags_fails_before_touching_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("new_dir").join("file");

    let err = write_binary_to_file(b"data", &path, true, true).unwrap_err();

    assert!(matches!(err, CoreError::ConflictingWriteFlags));
    assert!(!tmp.path().join("new_dir").exists());
}

#[test]
fn write_failure_is_logged_not_returned() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("locked");
    fs::write(&path, b"old").unwrap();
    let ops = FailSafe::new(DenyingFileSystem::default().deny(&path));

    let (result, logs) = with_captured_logs(|| {
        ops.write(b"new", &path, WriteOptions::new().overwrite(true))
    });

    assert!(result.is_ok());
    assert_eq!(fs::read(&path).unwrap(), b"old");
    assert!(logs.contains("could not write file"), "{logs}");
}

#[test]
fn delete_removes_file_and_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("test_folder").join("test_file");
    write_binary_to_file(b"this is a test", &path, false, false).unwrap();

    delete_file(&path);
    assert!(!path.exists());

    let (_, logs) = with_captured_logs(|| delete_file(&path));
    assert!(!path.exists());
    assert!(logs.contains("does not exist"), "{logs}");
    assert!(!logs.contains("ERROR"), "{logs}");
}

#[test]
fn delete_failure_is_logged_as_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("keep");
    fs::write(&path, b"x").unwrap();
    let ops = FailSafe::new(DenyingFileSystem::default().deny(&path));

    let (_, logs) = with_captured_logs(|| ops.delete(&path));

    assert!(path.exists());
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("could not delete file"), "{logs}");
}

#[cfg(unix)]
#[test]
fn create_symlink_stores_source_verbatim() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("test_folder").join("test_file");
    let link = tmp.path().join("test_symlink");

    create_symlink(&source, &link);

    assert_eq!(fs::read_link(&link).unwrap(), source);
}

#[cfg(unix)]
#[test]
fn create_symlink_creates_missing_parent() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("test_folder").join("test_file");
    let link = tmp.path().join("some_dir").join("test_symlink");

    create_symlink(&source, &link);

    assert_eq!(fs::read_link(&link).unwrap(), source);
}

#[cfg(unix)]
#[test]
fn create_symlink_under_regular_file_logs_error() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();
    let link = blocker.join("test_symlink");

    let (_, logs) = with_captured_logs(|| create_symlink("target", &link));

    assert!(fs::symlink_metadata(&link).is_err());
    assert_eq!(fs::read(&blocker).unwrap(), b"not a directory");
    assert!(logs.contains("ERROR"), "{logs}");
    assert!(logs.contains("could not create link"), "{logs}");
}

#[cfg(unix)]
#[test]
fn create_symlink_over_existing_link_logs_debug() {
    let tmp = TempDir::new().unwrap();
    let link = tmp.path().join("test_symlink");
    create_symlink("first", &link);

    let (_, logs) = with_captured_logs(|| create_symlink("second", &link));

    assert_eq!(fs::read_link(&link).unwrap(), std::path::PathBuf::from("first"));
    assert!(logs.contains("DEBUG"), "{logs}");
    assert!(logs.contains("file exists"), "{logs}");
    assert!(!logs.contains("ERROR"), "{logs}");
}
