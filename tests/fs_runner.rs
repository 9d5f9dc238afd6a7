// tests/fs_runner.rs

mod common;
use crate::common::{init_tracing, with_timeout, RecordingSink};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use coco::engine::FsRunner;
use coco::errors::CocoError;
use coco::exec::CommandDef;
use coco::types::RunnerSignal;

type TestResult = Result<(), Box<dyn Error>>;

fn echo_built() -> Arc<CommandDef> {
    Arc::new(CommandDef::new("echo", "", vec!["built".to_string()], Vec::new()))
}

#[tokio::test]
async fn registers_every_existing_directory() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    std::fs::create_dir_all(tmp.path().join("pkg/inner"))?;
    std::fs::create_dir_all(tmp.path().join("cmd"))?;
    std::fs::write(tmp.path().join("pkg/lib.go"), "package pkg")?;

    let (sink, _outputs) = RecordingSink::new();
    let runner = FsRunner::new(tmp.path(), &["go"], echo_built(), Arc::new(sink))?;

    let root = tmp.path().canonicalize()?;
    assert_eq!(
        runner.watched_dirs(),
        &[
            root.clone(),
            root.join("cmd"),
            root.join("pkg"),
            root.join("pkg/inner"),
        ][..]
    );
    Ok(())
}

#[tokio::test]
async fn missing_root_is_an_error() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let (sink, _outputs) = RecordingSink::new();

    let res = FsRunner::new(tmp.path().join("nope"), &["go"], echo_built(), Arc::new(sink));

    assert!(res.is_err());
    Ok(())
}

#[tokio::test]
async fn runs_at_start_and_on_matching_changes() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    std::fs::create_dir_all(tmp.path().join("pkg"))?;

    let (sink, mut outputs) = RecordingSink::new();
    let sink = Arc::new(sink);
    let mut runner = FsRunner::new(tmp.path(), &["go"], echo_built(), sink.clone())?;
    runner.start()?;

    // Unconditional first build.
    let (output, code) = with_timeout(outputs.recv()).await.ok_or("sink closed")?;
    assert_eq!((output.as_str(), code), ("built\n", 0));

    // Filtered out by extension.
    std::fs::write(tmp.path().join("README.md"), "docs")?;
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(outputs.try_recv().is_err(), "README.md must not trigger a build");

    // Nested directory registered at construction.
    std::fs::write(tmp.path().join("pkg/main.go"), "package main")?;
    let (output, _) = with_timeout(outputs.recv()).await.ok_or("sink closed")?;
    assert_eq!(output, "built\n");

    runner.signal(RunnerSignal::Quit).await?;
    with_timeout(runner.wait()).await?;
    assert!(sink.logs().iter().any(|l| l.contains("Quit")));
    Ok(())
}

#[tokio::test]
async fn force_update_runs_without_a_change() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;

    let (sink, mut outputs) = RecordingSink::new();
    let mut runner = FsRunner::new(tmp.path(), &["go"], echo_built(), Arc::new(sink))?;
    runner.start()?;
    with_timeout(outputs.recv()).await.ok_or("sink closed")?;

    runner.signal(RunnerSignal::ForceUpdate).await?;
    with_timeout(outputs.recv()).await.ok_or("sink closed")?;

    runner.signal(RunnerSignal::Quit).await?;
    with_timeout(runner.wait()).await?;
    Ok(())
}

#[tokio::test]
async fn empty_extension_list_accepts_any_file() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;

    let (sink, mut outputs) = RecordingSink::new();
    let mut runner = FsRunner::new::<&str>(tmp.path(), &[], echo_built(), Arc::new(sink))?;
    runner.start()?;
    with_timeout(outputs.recv()).await.ok_or("sink closed")?;

    std::fs::write(tmp.path().join("Makefile"), "all:")?;
    with_timeout(outputs.recv()).await.ok_or("sink closed")?;

    runner.signal(RunnerSignal::Quit).await?;
    with_timeout(runner.wait()).await?;
    Ok(())
}

#[tokio::test]
async fn watcher_error_stops_the_runner() -> TestResult {
    init_tracing();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (sink, mut outputs) = RecordingSink::new();
    let sink = Arc::new(sink);
    let mut runner = FsRunner::from_events(".", &["go"], echo_built(), sink.clone(), events_rx);
    runner.start()?;
    with_timeout(outputs.recv()).await.ok_or("sink closed")?;

    events_tx.send(Err(notify::Error::generic("inotify queue overflow")))?;

    let res = with_timeout(runner.wait()).await;
    assert!(matches!(res, Err(CocoError::Watcher(_))), "got {res:?}");
    assert!(
        sink.logs()
            .iter()
            .any(|l| l.starts_with("File watcher error") && l.contains("inotify queue overflow"))
    );
    assert!(!sink.logs().iter().any(|l| l.contains("Quit")));

    // The executor is gone: the output channel drains and nothing else runs.
    assert!(outputs.try_recv().is_err());
    assert_eq!(sink.output_count(), 1);
    Ok(())
}

#[tokio::test]
async fn closed_event_stream_stops_the_runner() -> TestResult {
    init_tracing();
    let (events_tx, events_rx) = mpsc::unbounded_channel::<notify::Result<notify::Event>>();
    let (sink, mut outputs) = RecordingSink::new();
    let sink = Arc::new(sink);
    let mut runner = FsRunner::from_events(".", &["go"], echo_built(), sink.clone(), events_rx);
    runner.start()?;
    with_timeout(outputs.recv()).await.ok_or("sink closed")?;

    drop(events_tx);

    let res = with_timeout(runner.wait()).await;
    assert!(matches!(res, Err(CocoError::Runner(_))), "got {res:?}");
    assert!(sink.logs().iter().any(|l| l == "File watcher stopped"));
    assert_eq!(sink.output_count(), 1);
    Ok(())
}
