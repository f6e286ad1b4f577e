//! End-to-end tests for the operation layer and path resolution.

use ledgerfs::clock::FixedClock;
use ledgerfs::error::FsError;
use ledgerfs::vfs::VirtualFs;
use std::sync::Arc;

#[test]
fn mkdir_creates_a_directory() {
    let mut fs = VirtualFs::new();
    fs.mkdir("test").unwrap();

    let entries = fs.list_dir("").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "test");
    assert!(entries[0].is_dir);
}

#[test]
fn create_write_and_read_back() {
    let mut fs = VirtualFs::new();
    fs.create_file("file.txt").unwrap();
    fs.write_file("file.txt", "Hello, VirtualFS!").unwrap();
    assert_eq!(fs.read_file("file.txt").unwrap(), "Hello, VirtualFS!");
}

#[test]
fn list_dir_returns_all_children() {
    let mut fs = VirtualFs::new();
    fs.mkdir("dir1").unwrap();
    fs.create_file("file1.txt").unwrap();

    let mut names: Vec<String> = fs
        .list_dir(".")
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["dir1", "file1.txt"]);
}

#[test]
fn removed_nodes_are_forgotten() {
    let mut fs = VirtualFs::new();
    fs.create_file("file.txt").unwrap();
    fs.remove("file.txt").unwrap();
    assert!(matches!(
        fs.read_file("file.txt"),
        Err(FsError::NotFound(_))
    ));

    fs.mkdir("dir1").unwrap();
    fs.remove("dir1").unwrap();
    assert!(matches!(fs.list_dir("dir1"), Err(FsError::NotFound(_))));
}

#[test]
fn change_dir_updates_working_dir() {
    let mut fs = VirtualFs::new();
    fs.mkdir("a").unwrap();
    fs.change_dir("a").unwrap();
    fs.mkdir("b").unwrap();
    fs.change_dir("b").unwrap();
    assert_eq!(fs.working_dir(), "/a/b");
}

#[test]
fn dotdot_moves_to_parent() {
    let mut fs = VirtualFs::new();
    fs.mkdir("a").unwrap();
    fs.change_dir("a").unwrap();
    fs.mkdir("b").unwrap();
    fs.change_dir("b").unwrap();
    fs.change_dir("..").unwrap();
    assert_eq!(fs.working_dir(), "/a");
}

#[test]
fn listing_a_file_fails() {
    let mut fs = VirtualFs::new();
    fs.create_file("file.txt").unwrap();
    assert!(matches!(
        fs.list_dir("file.txt"),
        Err(FsError::NotADirectory(_))
    ));
}

#[test]
fn reading_a_directory_fails() {
    let mut fs = VirtualFs::new();
    fs.mkdir("dir1").unwrap();
    assert!(matches!(
        fs.read_file("dir1"),
        Err(FsError::IsADirectory(_))
    ));
}

#[test]
fn writing_to_a_directory_fails() {
    let mut fs = VirtualFs::new();
    fs.mkdir("dir1").unwrap();
    assert!(matches!(
        fs.write_file("dir1", "nope"),
        Err(FsError::IsADirectory(_))
    ));
}

#[test]
fn changing_into_a_file_fails() {
    let mut fs = VirtualFs::new();
    fs.create_file("file.txt").unwrap();
    assert!(matches!(
        fs.change_dir("file.txt"),
        Err(FsError::NotADirectory(_))
    ));
}

#[test]
fn create_file_with_absolute_path_from_subdirectory() {
    let mut fs = VirtualFs::new();
    fs.mkdir("foo").unwrap();
    fs.change_dir("foo").unwrap();
    fs.create_file("/foo/bar.txt").unwrap();
    assert_eq!(fs.read_file("/foo/bar.txt").unwrap(), "");
}

#[test]
fn create_file_with_relative_path_lands_in_cwd() {
    let mut fs = VirtualFs::new();
    fs.mkdir("foo").unwrap();
    fs.change_dir("foo").unwrap();
    fs.create_file("bar.txt").unwrap();
    assert_eq!(fs.read_file("/foo/bar.txt").unwrap(), "");
}

#[test]
fn duplicate_create_fails_without_side_effects() {
    let mut fs = VirtualFs::new();
    fs.mkdir("a").unwrap();
    let events_before = fs.log().len();
    let children_before = fs.list_dir("").unwrap().len();

    assert!(matches!(fs.mkdir("a"), Err(FsError::AlreadyExists(_))));
    assert!(matches!(
        fs.create_file("a"),
        Err(FsError::AlreadyExists(_))
    ));

    assert_eq!(fs.log().len(), events_before);
    assert_eq!(fs.list_dir("").unwrap().len(), children_before);
}

#[test]
fn root_is_never_removable() {
    let mut fs = VirtualFs::new();
    assert!(matches!(
        fs.remove("/"),
        Err(FsError::RootRemovalForbidden)
    ));

    fs.mkdir("a").unwrap();
    fs.change_dir("a").unwrap();
    assert!(matches!(
        fs.remove("/"),
        Err(FsError::RootRemovalForbidden)
    ));
    assert!(matches!(
        fs.remove(".."),
        Err(FsError::RootRemovalForbidden)
    ));
}

#[test]
fn remove_requires_empty_directory() {
    let mut fs = VirtualFs::new();
    fs.mkdir("dir").unwrap();
    fs.create_file("dir/inner.txt").unwrap();

    assert!(matches!(
        fs.remove("dir"),
        Err(FsError::DirectoryNotEmpty(_))
    ));

    fs.remove("dir/inner.txt").unwrap();
    fs.remove("dir").unwrap();
    assert!(matches!(fs.list_dir("dir"), Err(FsError::NotFound(_))));
}

#[test]
fn absolute_path_composed_with_resolve_is_identity() {
    let mut fs = VirtualFs::new();
    fs.mkdir("a").unwrap();
    fs.change_dir("a").unwrap();
    fs.write_file("f.txt", "payload").unwrap();

    let abs = fs.absolute_path("f.txt");
    assert_eq!(abs, "/a/f.txt");
    assert_eq!(fs.read_file(&abs).unwrap(), fs.read_file("f.txt").unwrap());

    // The absolute form reaches the same node from any working directory.
    fs.change_dir("/").unwrap();
    assert_eq!(fs.read_file(&abs).unwrap(), "payload");
}

#[test]
fn timestamps_come_from_the_injected_clock() {
    let clock = FixedClock::at_unix(1_700_000_000);
    let mut fs = VirtualFs::with_clock(Arc::new(clock));
    fs.mkdir("a").unwrap();
    fs.write_file("a/f.txt", "x").unwrap();

    let entries = fs.list_dir("a").unwrap();
    assert_eq!(entries[0].created, clock.0);
    assert_eq!(entries[0].modified, clock.0);

    let events = fs.log().events();
    assert!(events.iter().all(|e| e.timestamp == clock.0));
}

#[test]
fn read_is_pure_and_logs_nothing() {
    let mut fs = VirtualFs::new();
    fs.write_file("f.txt", "content").unwrap();
    let before = fs.log().len();
    fs.read_file("f.txt").unwrap();
    fs.list_dir("").unwrap();
    fs.working_dir();
    assert_eq!(fs.log().len(), before);
}

#[test]
fn change_dir_logs_nothing() {
    let mut fs = VirtualFs::new();
    fs.mkdir("a").unwrap();
    let before = fs.log().len();
    fs.change_dir("a").unwrap();
    fs.change_dir("..").unwrap();
    assert_eq!(fs.log().len(), before);
}
