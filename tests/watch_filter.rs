// tests/watch_filter.rs

use std::path::{Path, PathBuf};

use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind};

use coco::fs::{collect_dirs, RealFileSystem};
use coco::fs::mock::MockFileSystem;
use coco::watch::{classify_event, is_content_change, ExtensionFilter, FsStatus};

fn event(kind: EventKind, paths: &[&str]) -> Event {
    paths
        .iter()
        .fold(Event::new(kind), |ev, p| ev.add_path(PathBuf::from(p)))
}

fn write_event(path: &str) -> Event {
    event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), &[path])
}

#[test]
fn matching_extension_triggers() {
    let filter = ExtensionFilter::new(&["go"]);

    assert_eq!(classify_event(&write_event("/proj/main.go"), &filter), FsStatus::Send);
    assert_eq!(classify_event(&write_event("/proj/README.md"), &filter), FsStatus::Continue);
}

#[test]
fn leading_dot_in_extension_is_tolerated() {
    let filter = ExtensionFilter::new(&[".c", "h"]);

    assert!(filter.matches(Path::new("src/lib.c")));
    assert!(filter.matches(Path::new("include/lib.h")));
    assert!(!filter.matches(Path::new("src/lib.cc")));
}

#[test]
fn suffix_must_include_the_dot() {
    let filter = ExtensionFilter::new(&["go"]);

    assert!(!filter.matches(Path::new("/proj/cargo")));
    assert!(filter.matches(Path::new("/proj/main.go")));
}

#[test]
fn empty_filter_accepts_any_change() {
    let filter = ExtensionFilter::new::<&str>(&[]);

    assert!(filter.is_empty());
    assert_eq!(classify_event(&write_event("/proj/notes.txt"), &filter), FsStatus::Send);
    assert_eq!(
        classify_event(&event(EventKind::Create(CreateKind::File), &["/proj/Makefile"]), &filter),
        FsStatus::Send
    );
}

#[test]
fn metadata_and_access_never_trigger() {
    let filter = ExtensionFilter::new::<&str>(&[]);

    let chmod = event(
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
        &["/proj/main.go"],
    );
    let open = event(EventKind::Access(AccessKind::Any), &["/proj/main.go"]);

    assert!(!is_content_change(&chmod.kind));
    assert!(!is_content_change(&open.kind));
    assert_eq!(classify_event(&chmod, &filter), FsStatus::Continue);
    assert_eq!(classify_event(&open, &filter), FsStatus::Continue);
}

#[test]
fn create_remove_and_rename_are_changes() {
    let filter = ExtensionFilter::new(&["go"]);

    for kind in [
        EventKind::Create(CreateKind::File),
        EventKind::Remove(RemoveKind::File),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)),
    ] {
        assert_eq!(classify_event(&event(kind, &["/proj/x.go"]), &filter), FsStatus::Send);
    }
}

#[test]
fn rename_triggers_if_either_side_matches() {
    let filter = ExtensionFilter::new(&["go"]);
    let rename = event(
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
        &["/proj/x.go.tmp", "/proj/x.go"],
    );

    assert_eq!(classify_event(&rename, &filter), FsStatus::Send);
}

#[test]
fn collect_dirs_lists_parents_before_children() {
    let fs = MockFileSystem::new();
    fs.add_file("proj/main.go");
    fs.add_file("proj/pkg/util/util.go");
    fs.add_file("proj/cmd/tool/main.go");
    fs.add_dir("proj/empty");

    let dirs = collect_dirs(&fs, Path::new("proj")).unwrap();

    assert_eq!(
        dirs,
        vec![
            PathBuf::from("proj"),
            PathBuf::from("proj/cmd"),
            PathBuf::from("proj/cmd/tool"),
            PathBuf::from("proj/empty"),
            PathBuf::from("proj/pkg"),
            PathBuf::from("proj/pkg/util"),
        ]
    );
}

#[test]
fn collect_dirs_rejects_a_file_root() {
    let fs = MockFileSystem::new();
    fs.add_file("proj/main.go");

    assert!(collect_dirs(&fs, Path::new("proj/main.go")).is_err());
    assert!(collect_dirs(&fs, Path::new("missing")).is_err());
}

#[cfg(unix)]
#[test]
fn collect_dirs_does_not_follow_symlinks() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let root = tmp.path().canonicalize()?;
    std::fs::create_dir(root.join("a"))?;
    std::os::unix::fs::symlink("..", root.join("a/loop"))?;

    let outside = tempfile::tempdir()?;
    std::fs::create_dir(outside.path().join("big"))?;
    std::os::unix::fs::symlink(outside.path(), root.join("vendor"))?;

    let dirs = collect_dirs(&RealFileSystem, &root)?;

    assert_eq!(dirs, vec![root.clone(), root.join("a")]);
    Ok(())
}
