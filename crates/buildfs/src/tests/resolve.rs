// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use super::*;
use crate::memory::new_fs;
use crate::{Error, MAX_SYMLINK_HOPS};

#[test]
fn test_root_is_canonical() {
    let fs = new_fs();
    assert_eq!(fs.resolve_symbolic_links(fs.root()).unwrap(), Path::root());
}

#[test]
fn test_path_rejects_relative_names() {
    let fs = new_fs();
    assert!(matches!(fs.path("a/b"), Err(Error::NotAbsolute(_))));
    assert_eq!(fs.path("/a/./b//c/..").unwrap(), p("/a/b"));
}

#[test]
fn test_child_names_must_be_plain_segments() {
    let fs = new_fs();
    let dir = p("/a");
    assert_eq!(fs.child(&dir, "b").unwrap(), p("/a/b"));
    for bad in ["..", ".", "", "b/c"] {
        assert!(matches!(fs.child(&dir, bad), Err(Error::InvalidSegment(_))));
    }
}

#[test]
fn test_plain_path_resolves_to_itself() {
    let fs = new_fs();
    mkdir(&fs, "/a");
    write_file(&fs, "/a/f", b"");
    assert_eq!(fs.resolve_symbolic_links(&p("/a/f")).unwrap(), p("/a/f"));
}

#[test]
fn test_intermediate_and_final_links() {
    let fs = new_fs();
    mkdir(&fs, "/real");
    mkdir(&fs, "/real/b");
    write_file(&fs, "/real/b/c", b"");
    symlink(&fs, "/alias", "/real");
    symlink(&fs, "/real/b/to_c", "c");

    assert_eq!(
        fs.resolve_symbolic_links(&p("/alias/b/c")).unwrap(),
        p("/real/b/c")
    );
    assert_eq!(
        fs.resolve_symbolic_links(&p("/alias/b/to_c")).unwrap(),
        p("/real/b/c")
    );
}

#[test]
fn test_relative_target_with_dotdot() {
    let fs = new_fs();
    mkdir(&fs, "/real");
    mkdir(&fs, "/d");
    symlink(&fs, "/d/up", "../real");
    assert_eq!(fs.resolve_symbolic_links(&p("/d/up")).unwrap(), p("/real"));
}

#[test]
fn test_dotdot_above_root_stays_at_root() {
    let fs = new_fs();
    write_file(&fs, "/x", b"");
    symlink(&fs, "/up", "../../../x");
    assert_eq!(fs.resolve_symbolic_links(&p("/up")).unwrap(), p("/x"));

    symlink(&fs, "/top", "..");
    assert_eq!(fs.resolve_symbolic_links(&p("/top")).unwrap(), Path::root());
}

#[test]
fn test_dot_and_empty_target_segments() {
    let fs = new_fs();
    mkdir(&fs, "/d");
    write_file(&fs, "/d/f", b"");
    symlink(&fs, "/d/same", "./f");
    assert_eq!(fs.resolve_symbolic_links(&p("/d/same")).unwrap(), p("/d/f"));
}

#[test]
fn test_canonical_is_idempotent_and_link_free() {
    let fs = new_fs();
    mkdir(&fs, "/real");
    mkdir(&fs, "/real/sub");
    write_file(&fs, "/real/sub/f", b"");
    symlink(&fs, "/a", "real");
    symlink(&fs, "/real/s", "sub");

    let canonical = fs.resolve_symbolic_links(&p("/a/s/f")).unwrap();
    assert_eq!(canonical, p("/real/sub/f"));
    assert_eq!(fs.resolve_symbolic_links(&canonical).unwrap(), canonical);

    let mut prefix = Path::root();
    for segment in canonical.segments() {
        prefix = prefix.child(segment);
        assert!(!fs.is_symbolic_link(&prefix), "{prefix} is a link");
    }
}

#[test]
fn test_chain_within_budget_succeeds() {
    let fs = new_fs();
    let start = link_chain(&fs, "/chain", MAX_SYMLINK_HOPS as usize);
    assert_eq!(
        fs.resolve_symbolic_links(&start).unwrap(),
        p("/chain/target")
    );
}

#[test]
fn test_chain_over_budget_fails() {
    let fs = new_fs();
    let start = link_chain(&fs, "/chain", MAX_SYMLINK_HOPS as usize + 1);
    let err = fs.resolve_symbolic_links(&start).unwrap_err();
    assert!(matches!(err, Error::TooManyLinks(_)));
    assert!(err.is_io_failure());
}

#[test]
fn test_each_segment_gets_a_fresh_budget() {
    let fs = new_fs();
    mkdir(&fs, "/c");
    mkdir(&fs, "/c/dir");
    write_file(&fs, "/c/dir/leaf", b"");
    for i in 0..30 {
        let next = if i == 29 { "dir".to_string() } else { format!("m{}", i + 1) };
        symlink(&fs, &format!("/c/m{i}"), &next);
        let next = if i == 29 { "leaf".to_string() } else { format!("n{}", i + 1) };
        symlink(&fs, &format!("/c/dir/n{i}"), &next);
    }

    assert_eq!(
        fs.resolve_symbolic_links(&p("/c/m0/n0")).unwrap(),
        p("/c/dir/leaf")
    );
}

#[test]
fn test_sibling_expansions_have_separate_budgets() {
    let fs = new_fs();
    mkdir(&fs, "/x");
    write_file(&fs, "/x/file", b"");
    for i in 0..20 {
        let next = if i == 19 { "/x".to_string() } else { format!("a{}", i + 1) };
        symlink(&fs, &format!("/a{i}"), &next);
    }
    for i in 0..20 {
        let next = if i == 19 { "file".to_string() } else { format!("b{}", i + 1) };
        symlink(&fs, &format!("/x/b{i}"), &next);
    }

    assert_eq!(
        fs.resolve_symbolic_links(&p("/a0/b0")).unwrap(),
        p("/x/file")
    );

    // Forty hops below one link, but never more than twenty deep.
    symlink(&fs, "/top", "a0/b0");
    assert_eq!(
        fs.resolve_symbolic_links(&p("/top")).unwrap(),
        p("/x/file")
    );
}

#[test]
fn test_link_resolves_like_its_spelled_out_target() {
    let fs = new_fs();
    symlink(&fs, "/s", ".");
    let target = vec!["s"; MAX_SYMLINK_HOPS as usize + 1].join("/");
    symlink(&fs, "/x", &target);

    assert_eq!(
        fs.resolve_symbolic_links(&p(&format!("/{target}"))).unwrap(),
        Path::root()
    );
    assert_eq!(fs.resolve_symbolic_links(&p("/x")).unwrap(), Path::root());
}

#[test]
fn test_nesting_deeper_than_budget_fails() {
    let fs = new_fs();
    mkdir(&fs, "/d");
    write_file(&fs, "/d/f", b"");
    // Each link's target starts with the next link: depth, not breadth.
    for i in 0..=MAX_SYMLINK_HOPS {
        let next = if i == MAX_SYMLINK_HOPS { "d".to_string() } else { format!("n{}", i + 1) };
        symlink(&fs, &format!("/n{i}"), &format!("{next}/."));
    }
    assert!(matches!(
        fs.resolve_symbolic_links(&p("/n0/f")),
        Err(Error::TooManyLinks(_))
    ));
    assert_eq!(fs.resolve_symbolic_links(&p("/n1/f")).unwrap(), p("/d/f"));
}

#[test]
fn test_loop_fails() {
    let fs = new_fs();
    symlink(&fs, "/a", "b");
    symlink(&fs, "/b", "a");
    assert!(matches!(
        fs.resolve_symbolic_links(&p("/a")),
        Err(Error::TooManyLinks(_))
    ));

    symlink(&fs, "/self", "self");
    assert!(matches!(
        fs.resolve_symbolic_links(&p("/self/child")),
        Err(Error::TooManyLinks(_))
    ));
}

#[test]
fn test_missing_paths_are_not_found() {
    let fs = new_fs();
    mkdir(&fs, "/d");
    symlink(&fs, "/d/dangling", "nowhere");

    assert!(fs.resolve_symbolic_links(&p("/missing")).unwrap_err().is_not_found());
    assert!(fs.resolve_symbolic_links(&p("/missing/child")).unwrap_err().is_not_found());
    assert!(fs.resolve_symbolic_links(&p("/d/dangling")).unwrap_err().is_not_found());
}

#[test]
fn test_resolution_uses_the_two_step_probe() {
    let (fs, backend) = instrumented(FsConfig::default());
    mkdir(&fs, "/d");
    write_file(&fs, "/d/f", b"");
    backend.reset_calls();

    assert_eq!(fs.resolve_symbolic_links(&p("/d/f")).unwrap(), p("/d/f"));
    assert_eq!(backend.calls("read_symbolic_link"), 2);
    assert_eq!(backend.calls("exists"), 2);
}
