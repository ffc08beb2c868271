// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Tests for the local disk backend against a temporary host directory.

use super::*;
use tempfile::TempDir;

fn create_test_tree() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    fs::write(dir.path().join("hello.txt"), b"Hello, World!").unwrap();
    fs::create_dir(dir.path().join("subdir")).unwrap();
    fs::write(dir.path().join("subdir/nested.txt"), b"nested content").unwrap();
    dir
}

fn p(s: &str) -> Path {
    Path::parse(s).unwrap()
}

#[test]
fn test_new_rejects_missing_root() {
    assert!(LocalBackend::new("/nonexistent/path/foo").is_err());
}

#[test]
fn test_new_rejects_file_root() {
    let dir = create_test_tree();
    assert!(LocalBackend::new(dir.path().join("hello.txt")).is_err());
}

#[test]
fn test_host_path_mapping() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();
    let root = backend.host_root().to_path_buf();
    assert_eq!(backend.host_path(&Path::root()), root);
    assert_eq!(backend.host_path(&p("/subdir/nested.txt")), root.join("subdir/nested.txt"));
}

#[test]
fn test_kinds_and_sizes() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();

    assert!(backend.is_file(&p("/hello.txt"), true));
    assert!(backend.is_directory(&p("/subdir"), true));
    assert!(!backend.is_special_file(&p("/hello.txt"), true));
    assert_eq!(backend.file_size(&p("/hello.txt"), true).unwrap(), 13);
    assert!(!backend.exists(&p("/missing"), true));
    assert!(backend.file_size(&p("/missing"), true).unwrap_err().is_not_found());
}

#[test]
fn test_not_a_directory_component_is_not_found() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();
    let err = backend.last_modified_time(&p("/hello.txt/child"), true).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_symlinks_stay_inside_root() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();

    backend
        .create_symbolic_link(&p("/abs"), &PathFragment::new("/subdir/nested.txt"))
        .unwrap();
    backend
        .create_symbolic_link(&p("/rel"), &PathFragment::new("subdir"))
        .unwrap();

    assert_eq!(
        backend.read_symbolic_link(&p("/abs")).unwrap(),
        PathFragment::new("/subdir/nested.txt")
    );
    assert_eq!(
        backend.read_symbolic_link(&p("/rel")).unwrap(),
        PathFragment::new("subdir")
    );
    assert!(backend.is_file(&p("/abs"), true));
    assert!(backend.is_symbolic_link(&p("/abs")));
    assert!(matches!(
        backend.read_symbolic_link(&p("/hello.txt")),
        Err(Error::NotASymlink(_))
    ));
}

#[test]
fn test_resolve_one_link_outcomes() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();
    backend
        .create_symbolic_link(&p("/dangling"), &PathFragment::new("nowhere"))
        .unwrap();

    assert_eq!(backend.resolve_one_link(&p("/hello.txt")).unwrap(), None);
    assert_eq!(
        backend.resolve_one_link(&p("/dangling")).unwrap(),
        Some(PathFragment::new("nowhere"))
    );
    assert!(backend.resolve_one_link(&p("/absent")).unwrap_err().is_not_found());
}

#[test]
fn test_directory_operations() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();

    assert!(backend.create_directory(&p("/new")).unwrap());
    assert!(!backend.create_directory(&p("/new")).unwrap());
    assert!(matches!(
        backend.create_directory(&p("/hello.txt")),
        Err(Error::AlreadyExists(_))
    ));

    let mut names = backend.directory_entries(&Path::root()).unwrap();
    names.sort();
    assert_eq!(names, vec!["hello.txt", "new", "subdir"]);

    let err = backend.directory_entries(&p("/hello.txt")).unwrap_err();
    assert!(err.is_io_failure());

    assert!(backend.delete(&p("/subdir")).is_err());
    assert!(backend.delete(&p("/new")).unwrap());
    assert!(!backend.delete(&p("/new")).unwrap());
}

#[test]
fn test_streams() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();

    let mut w = backend.output_stream(&p("/out.txt"), false).unwrap();
    w.write_all(b"first").unwrap();
    drop(w);
    let mut w = backend.output_stream(&p("/out.txt"), true).unwrap();
    w.write_all(b" second").unwrap();
    drop(w);

    let mut content = String::new();
    _ = backend
        .input_stream(&p("/out.txt"))
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "first second");

    assert!(backend.input_stream(&p("/subdir")).is_err());
}

#[test]
fn test_mtime_round_trip() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();

    backend
        .set_last_modified_time(&p("/hello.txt"), 1_500_000_123_456)
        .unwrap();
    assert_eq!(
        backend.last_modified_time(&p("/hello.txt"), true).unwrap(),
        1_500_000_123_456
    );
}

#[test]
fn test_owner_permission_bits() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();
    let f = p("/hello.txt");

    backend.set_executable(&f, true).unwrap();
    assert!(backend.is_executable(&f).unwrap());
    backend.set_executable(&f, false).unwrap();
    assert!(!backend.is_executable(&f).unwrap());

    backend.set_writable(&f, false).unwrap();
    assert!(!backend.is_writable(&f).unwrap());
    let mode = fs::metadata(dir.path().join("hello.txt"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o200, 0);
}

#[test]
fn test_rename_and_hard_link() {
    let dir = create_test_tree();
    let backend = LocalBackend::new(dir.path()).unwrap();

    backend.rename(&p("/hello.txt"), &p("/renamed.txt")).unwrap();
    assert!(!backend.exists(&p("/hello.txt"), false));

    backend
        .create_fs_dependent_hard_link(&p("/linked.txt"), &p("/renamed.txt"))
        .unwrap();
    assert_eq!(backend.file_size(&p("/linked.txt"), true).unwrap(), 13);
}
