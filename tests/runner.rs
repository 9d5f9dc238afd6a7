// tests/runner.rs

mod common;
use crate::common::builders::{CommandSectionBuilder, ConfigFileBuilder};
use crate::common::{init_tracing, with_timeout, RecordingSink};

use std::error::Error;
use std::sync::Arc;

use coco::engine::Runner;
use coco::errors::CocoError;
use coco::types::RunnerSignal;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn time_config_builds_a_time_runner() -> TestResult {
    init_tracing();
    let cfg = ConfigFileBuilder::new()
        .with_command(CommandSectionBuilder::new("echo").arg("hi").dir("").build())
        .time(0.25)
        .build();
    let (sink, _outputs) = RecordingSink::new();

    let mut runner = Runner::from_config(&cfg.run_on, cfg.command.to_command_def()?, Arc::new(sink))?;

    match &runner {
        Runner::Time(r) => assert_eq!(r.interval().as_millis(), 250),
        other => panic!("expected a time runner, got {other:?}"),
    }

    runner.start()?;
    let signaller = runner.signaller()?;
    signaller.signal(RunnerSignal::Quit).await?;
    with_timeout(runner.wait()).await?;
    Ok(())
}

#[tokio::test]
async fn fs_config_builds_an_fs_runner() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .with_command(CommandSectionBuilder::new("echo").dir("").build())
        .fs_root(tmp.path())
        .extension("rs")
        .build();
    let (sink, _outputs) = RecordingSink::new();

    let runner = Runner::from_config(&cfg.run_on, cfg.command.to_command_def()?, Arc::new(sink))?;

    assert!(matches!(runner, Runner::Fs(_)));
    Ok(())
}

#[tokio::test]
async fn signal_mode_is_reserved() -> TestResult {
    init_tracing();
    let raw = ConfigFileBuilder::new()
        .with_command(CommandSectionBuilder::new("echo").build())
        .mode("signal")
        .raw();
    let (sink, _outputs) = RecordingSink::new();
    let command = raw.command.clone().ok_or("no command")?.to_command_def()?;

    let mut runner = Runner::from_config(&raw.run_on, command, Arc::new(sink))?;

    assert!(matches!(runner.start(), Err(CocoError::Unsupported(_))));
    assert!(matches!(
        runner.signal(RunnerSignal::ForceUpdate).await,
        Err(CocoError::Unsupported(_))
    ));
    assert!(runner.signaller().is_err());
    Ok(())
}

#[tokio::test]
async fn invalid_mode_is_refused() -> TestResult {
    let raw = ConfigFileBuilder::new()
        .with_command(CommandSectionBuilder::new("echo").build())
        .mode("fs")
        .raw();
    let (sink, _outputs) = RecordingSink::new();
    let command = raw.command.clone().ok_or("no command")?.to_command_def()?;

    let res = Runner::from_config(&raw.run_on, command, Arc::new(sink));

    assert!(matches!(res, Err(CocoError::ConfigError(_))));
    Ok(())
}

#[tokio::test]
async fn oversized_interval_is_a_config_error() -> TestResult {
    let raw = ConfigFileBuilder::new()
        .with_command(CommandSectionBuilder::new("echo").build())
        .mode("time")
        .time(1e30)
        .raw();
    let (sink, _outputs) = RecordingSink::new();
    let command = raw.command.clone().ok_or("no command")?.to_command_def()?;

    let res = Runner::from_config(&raw.run_on, command, Arc::new(sink));

    assert!(matches!(res, Err(CocoError::ConfigError(_))));
    Ok(())
}
