use super::*;
use crate::tests::FakeFs;
use std::fs;

#[test]
fn dirname_follows_posix() {
    let cases: &[(&[u8], &[u8])] = &[
        (b"", b"."),
        (b"file", b"."),
        (b"./file", b"."),
        (b"/file", b"/"),
        (b"/", b"/"),
        (b"//", b"/"),
        (b"a/b", b"a"),
        (b"a/b/", b"a"),
        (b"a//b", b"a"),
        (b"/srv/data/sub", b"/srv/data"),
        (b"/srv/data/sub///", b"/srv/data"),
        (b"../up", b".."),
    ];
    for (input, expected) in cases {
        assert_eq!(
            dirname(input),
            *expected,
            "dirname({:?})",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn existing_canonical_path_resolves_to_itself() {
    let td = tempfile::tempdir().unwrap();
    let canonical = td.path().canonicalize().unwrap();
    let backend = FakeFs::host_with_cwd(&canonical);

    let resolved = resolve(&backend, &canonical).unwrap();
    assert_eq!(resolved.path, canonical);
    assert!(resolved.existing);
}

#[test]
fn symlinks_and_dot_components_are_resolved() {
    let td = tempfile::tempdir().unwrap();
    let base = td.path().canonicalize().unwrap();
    fs::create_dir_all(base.join("data/inner")).unwrap();
    std::os::unix::fs::symlink(base.join("data"), base.join("alias")).unwrap();
    let backend = FakeFs::host_with_cwd(&base);

    let resolved = resolve(&backend, &base.join("alias/./inner/..")).unwrap();
    assert_eq!(resolved.path, base.join("data"));
    assert!(resolved.existing);
}

#[test]
fn missing_tail_resolves_to_deepest_existing_ancestor() {
    let td = tempfile::tempdir().unwrap();
    let base = td.path().canonicalize().unwrap();
    fs::create_dir(base.join("present")).unwrap();
    let backend = FakeFs::host_with_cwd(&base);

    let resolved = resolve(&backend, &base.join("present/newdir/newfile")).unwrap();
    assert_eq!(resolved.path, base.join("present"));
    assert!(!resolved.existing);
}

#[test]
fn ancestor_behind_a_symlink_resolves_to_its_target() {
    let td = tempfile::tempdir().unwrap();
    let base = td.path().canonicalize().unwrap();
    let outside = tempfile::tempdir().unwrap();
    let outside = outside.path().canonicalize().unwrap();
    std::os::unix::fs::symlink(&outside, base.join("escape")).unwrap();
    let backend = FakeFs::host_with_cwd(&base);

    let resolved = resolve(&backend, &base.join("escape/created/file")).unwrap();
    assert_eq!(resolved.path, outside);
    assert!(!resolved.existing);
}

#[test]
fn relative_input_is_resolved_against_the_working_directory() {
    let backend = FakeFs::new("/srv/data", &["/srv/data/docs"]);

    let resolved = resolve(&backend, Path::new("docs")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data/docs"));
    assert!(resolved.existing);

    let resolved = resolve(&backend, Path::new("docs/new/file")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data/docs"));
    assert!(!resolved.existing);
}

#[test]
fn relative_input_without_existing_prefix_falls_back_to_working_directory() {
    let backend = FakeFs::new("/srv/data", &["/srv/data"]);
    let resolved = resolve(&backend, Path::new("missing")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data"));
    assert!(!resolved.existing);
}

#[test]
fn absolute_input_bottoms_out_at_filesystem_root() {
    let backend = FakeFs::new("/srv/data", &["/srv/data"]);
    let resolved = resolve(&backend, Path::new("/nonexistent/deep/path")).unwrap();
    assert_eq!(resolved.path, Path::new("/"));
    assert!(!resolved.existing);
}

#[test]
fn parent_traversal_after_a_missing_component_is_unresolvable() {
    // "/home/user" exists, but once "nope" is created the input lands in "/etc".
    let backend = FakeFs::new("/home/user", &["/home/user", "/etc"]);
    for input in [
        "/home/user/nope/../../../etc/x",
        "n/../../../etc/passwd",
        "nope/..",
    ] {
        match resolve(&backend, Path::new(input)) {
            Err(JailError::ResolutionFailure { path, .. }) => assert_eq!(path, Path::new(input)),
            other => panic!("expected ResolutionFailure for {input}, got {other:?}"),
        }
    }
}

#[test]
fn parent_traversal_inside_the_existing_prefix_is_resolved() {
    let backend = FakeFs::new("/srv/data", &["/srv/data/docs"]);
    let resolved = resolve(&backend, Path::new("/srv/data/docs/../new/file")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data"));
    assert!(!resolved.existing);

    let resolved = resolve(&backend, Path::new("docs/../fresh")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data"));
}

#[test]
fn special_literals_bypass_the_filesystem() {
    let backend = FakeFs::without_cwd();
    for literal in ["/dev/null", "."] {
        let resolved = resolve(&backend, Path::new(literal)).unwrap();
        assert_eq!(resolved.path, Path::new(literal));
        assert!(resolved.existing);
    }
}

#[test]
fn unresolvable_input_reports_resolution_failure() {
    let backend = FakeFs::without_cwd();
    match resolve(&backend, Path::new("lost/in/space")) {
        Err(JailError::ResolutionFailure { path, .. }) => {
            assert_eq!(path, Path::new("lost/in/space"))
        }
        other => panic!("expected ResolutionFailure, got {other:?}"),
    }

    let backend = FakeFs::new("/srv/data", &[]).without_fs_root();
    assert!(matches!(
        resolve(&backend, Path::new("/a/b")),
        Err(JailError::ResolutionFailure { .. })
    ));
}

#[test]
fn non_utf8_components_are_handled() {
    let td = tempfile::tempdir().unwrap();
    let base = td.path().canonicalize().unwrap();
    let backend = FakeFs::host_with_cwd(&base);
    let odd = base.join(OsStr::from_bytes(b"caf\xe9/child"));

    let resolved = resolve(&backend, &odd).unwrap();
    assert_eq!(resolved.path, base);
    assert!(!resolved.existing);
}

#[test]
fn containing_directory_of_a_new_file() {
    let backend = FakeFs::new("/srv/data", &["/srv/data/sub"]);

    let resolved = resolve_containing_directory(&backend, Path::new("/srv/data/sub/new.txt")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data/sub"));
    assert!(resolved.existing);

    let resolved = resolve_containing_directory(&backend, Path::new("/srv/data/x/y/z")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data"));
    assert!(!resolved.existing);
}

#[test]
fn existing_target_is_resolved_itself_not_its_directory() {
    let backend = FakeFs::new("/srv/data", &["/srv/data", "/etc/passwd"])
        .with_symlink("/srv/data/pw", "/etc/passwd");

    let resolved = resolve_containing_directory(&backend, Path::new("/srv/data/pw")).unwrap();
    assert_eq!(resolved.path, Path::new("/etc/passwd"));
    assert!(resolved.existing);

    let resolved = resolve_containing_directory(&backend, Path::new("/srv/data")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data"));
}

#[test]
fn dangling_symlink_falls_back_to_its_directory() {
    let backend = FakeFs::new("/srv/data", &["/srv/data"])
        .with_symlink("/srv/data/later", "/srv/data/not-yet");
    let resolved = resolve_containing_directory(&backend, Path::new("/srv/data/later")).unwrap();
    assert_eq!(resolved.path, Path::new("/srv/data"));
}

#[test]
fn containing_directory_of_a_bare_name_is_the_current_directory_literal() {
    let backend = FakeFs::new("/srv/data", &["/srv/data"]);
    let resolved = resolve_containing_directory(&backend, Path::new("newdir")).unwrap();
    assert_eq!(resolved.path, Path::new("."));
}

#[test]
fn containing_directory_keeps_the_null_device() {
    let backend = FakeFs::without_cwd();
    let resolved = resolve_containing_directory(&backend, Path::new("/dev/null")).unwrap();
    assert_eq!(resolved.path, Path::new("/dev/null"));
}

#[test]
fn containing_directory_rejects_overlong_input() {
    let backend = FakeFs::new("/srv/data", &["/srv/data"]);
    let long = format!("/srv/data/{}", "a".repeat(MAX_PATH_LEN));
    match resolve_containing_directory(&backend, Path::new(&long)) {
        Err(JailError::PathTooLong { len, limit }) => {
            assert_eq!(len, long.len());
            assert_eq!(limit, MAX_PATH_LEN);
        }
        other => panic!("expected PathTooLong, got {other:?}"),
    }
}
