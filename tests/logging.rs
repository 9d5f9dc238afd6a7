// tests/logging.rs

use coco::cli::LogLevel;
use coco::logging::build_filter;

#[test]
fn cli_level_wins_over_environment() {
    let filter = build_filter(Some(LogLevel::Debug), Some("coco=trace"));
    assert_eq!(filter.to_string(), "debug");
}

#[test]
fn environment_directives_are_used_without_cli_level() {
    let filter = build_filter(None, Some("coco=debug"));
    assert_eq!(filter.to_string(), "coco=debug");
}

#[test]
fn missing_or_blank_environment_falls_back_to_info() {
    assert_eq!(build_filter(None, None).to_string(), "info");
    assert_eq!(build_filter(None, Some("   ")).to_string(), "info");
}
