use std::time::Duration;

use async_trait::async_trait;
use tempfile::tempdir;

use super::slurp::parse_suffixes;
use super::summary::render_summary;
use super::*;
use crate::config::RunPlan;
use crate::domain::{RunConfiguration, Termination};
use crate::error::{AppError, ConfigError, PluginError};
use crate::metrics::{PhaseStats, ResultMetrics};
use crate::plugin::InitHook;
use crate::sinks::ExportSettings;
use crate::test_support::spawn_server;

struct FailingHook;

#[async_trait]
impl InitHook for FailingHook {
    async fn init(&self) -> Result<(), PluginError> {
        Err(PluginError::Initialization("license check failed".to_owned()))
    }
}

fn count_config(url: &str, requests: u64) -> Result<RunConfiguration, String> {
    let mut config = RunConfiguration::new(url);
    config.termination = Termination::fixed_count(requests).map_err(|err| err.to_string())?;
    Ok(config)
}

#[tokio::test]
async fn failing_plugin_prevents_any_request() -> Result<(), String> {
    let server = spawn_server(200, Duration::ZERO).await?;
    let controller = RunController::new(Box::new(FailingHook));
    match controller.run(count_config(&server.url, 5)?).await {
        Err(AppError::Plugin(PluginError::Initialization(message)))
            if message == "license check failed" => {}
        other => return Err(format!("Expected plugin error, got {:?}", other)),
    }
    if server.hits() != 0 {
        return Err(format!("No request should be sent, saw {}", server.hits()));
    }
    Ok(())
}

#[tokio::test]
async fn controller_returns_metrics_after_hook() -> Result<(), String> {
    let server = spawn_server(200, Duration::ZERO).await?;
    let metrics = RunController::default()
        .run(count_config(&server.url, 3)?)
        .await
        .map_err(|err| err.to_string())?;
    if metrics.total_requests != 3 || metrics.base_url != server.url {
        return Err(format!("Unexpected metrics {:?}", metrics));
    }
    Ok(())
}

#[tokio::test]
async fn invalid_url_fails_before_plugin_runs() -> Result<(), String> {
    let controller = RunController::new(Box::new(FailingHook));
    match controller.run(RunConfiguration::new("ftp://example.com")).await {
        Err(AppError::Config(ConfigError::InvalidUrl { .. })) => Ok(()),
        other => Err(format!("Expected InvalidUrl, got {:?}", other)),
    }
}

#[tokio::test]
async fn run_load_test_writes_json_export() -> Result<(), String> {
    let server = spawn_server(200, Duration::ZERO).await?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let json_path = dir.path().join("out.json");
    let plan = RunPlan {
        run: count_config(&server.url, 4)?,
        exports: ExportSettings {
            json_file: Some(json_path.clone()),
            ..ExportSettings::default()
        },
        plugin: None,
    };

    let metrics = run_load_test(plan, false)
        .await
        .map_err(|err| err.to_string())?;
    let content =
        std::fs::read_to_string(&json_path).map_err(|err| format!("read failed: {}", err))?;
    let exported: ResultMetrics =
        serde_json::from_str(&content).map_err(|err| format!("parse failed: {}", err))?;
    if exported != metrics {
        return Err("Exported metrics differ from returned metrics".to_owned());
    }
    Ok(())
}

#[tokio::test]
async fn export_failure_after_run_is_reported_as_export_error() -> Result<(), String> {
    let server = spawn_server(200, Duration::ZERO).await?;
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let plan = RunPlan {
        run: count_config(&server.url, 2)?,
        exports: ExportSettings {
            json_file: Some(dir.path().join("missing").join("out.json")),
            ..ExportSettings::default()
        },
        plugin: None,
    };

    match run_load_test(plan, false).await {
        Err(err) if err.is_export() => {}
        other => return Err(format!("Expected export error, got {:?}", other)),
    }
    if server.hits() != 2 {
        return Err(format!("Run should complete before export, saw {}", server.hits()));
    }
    Ok(())
}

#[tokio::test]
async fn plugin_failure_is_not_an_export_error() -> Result<(), String> {
    let controller = RunController::new(Box::new(FailingHook));
    let server = spawn_server(200, Duration::ZERO).await?;
    match controller.run(count_config(&server.url, 1)?).await {
        Err(err) if !err.is_export() => Ok(()),
        other => Err(format!("Expected non-export error, got {:?}", other)),
    }
}

#[test]
fn suffix_lines_are_trimmed_and_blank_lines_skipped() -> Result<(), String> {
    let parsed = parse_suffixes("/a\n\n  /b  \r\n/c\n");
    if parsed != vec!["/a".to_owned(), "/b".to_owned(), "/c".to_owned()] {
        return Err(format!("Unexpected suffixes {:?}", parsed));
    }
    Ok(())
}

#[tokio::test]
async fn suffixes_load_from_local_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("paths.txt");
    std::fs::write(&path, "/health\n/ready\n").map_err(|err| format!("write failed: {}", err))?;
    let location = path.to_string_lossy().into_owned();
    let suffixes = load_suffixes(&location)
        .await
        .map_err(|err| err.to_string())?;
    if suffixes != vec!["/health".to_owned(), "/ready".to_owned()] {
        return Err(format!("Unexpected suffixes {:?}", suffixes));
    }
    Ok(())
}

#[tokio::test]
async fn suffixes_load_from_remote_url() -> Result<(), String> {
    let server = spawn_server(200, Duration::ZERO).await?;
    let location = format!("{}/suffixes.txt", server.url);
    let suffixes = load_suffixes(&location)
        .await
        .map_err(|err| err.to_string())?;
    if suffixes != vec!["OK".to_owned()] || server.paths() != vec!["/suffixes.txt".to_owned()] {
        return Err(format!("Unexpected suffixes {:?}", suffixes));
    }
    Ok(())
}

#[tokio::test]
async fn remote_error_status_is_a_fetch_error() -> Result<(), String> {
    let server = spawn_server(404, Duration::ZERO).await?;
    match load_suffixes(&server.url).await {
        Err(ConfigError::FetchSuffixes { .. }) => Ok(()),
        other => Err(format!("Expected FetchSuffixes, got {:?}", other)),
    }
}

#[tokio::test]
async fn empty_or_missing_suffix_files_are_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let empty = dir.path().join("empty.txt");
    std::fs::write(&empty, "\n  \n").map_err(|err| format!("write failed: {}", err))?;
    match load_suffixes(&empty.to_string_lossy()).await {
        Err(ConfigError::SuffixesEmpty { .. }) => {}
        other => return Err(format!("Expected SuffixesEmpty, got {:?}", other)),
    }
    let missing = dir.path().join("missing.txt");
    match load_suffixes(&missing.to_string_lossy()).await {
        Err(ConfigError::ReadSuffixes { .. }) => Ok(()),
        other => Err(format!("Expected ReadSuffixes, got {:?}", other)),
    }
}

#[test]
fn summary_table_lists_every_figure() -> Result<(), String> {
    let metrics = ResultMetrics {
        base_url: "http://example.com".to_owned(),
        total_requests: 100,
        failed_requests: 3,
        requests_per_second: 42.5,
        dns_median: 1.25,
        tcp_stats: PhaseStats {
            mean: 2.0,
            median: 1.5,
            p95: 4.75,
        },
        processing_stats: PhaseStats::default(),
        content_stats: PhaseStats::default(),
        elapsed_seconds: 2.0,
    };
    let table = render_summary(&metrics, false).map_err(|err| err.to_string())?;
    for expected in [
        "TCP Connect",
        "Avg/mean=2.00ms",
        "Median=1.50ms",
        "p(95)=4.75ms",
        "Server Processing",
        "Content Transfer",
        ": 100",
        ": 3",
        "1.25ms",
        "42.50",
    ] {
        if !table.contains(expected) {
            return Err(format!("Missing '{}' in:\n{}", expected, table));
        }
    }
    if table.contains('\x1b') {
        return Err("Plain table must not contain escape codes".to_owned());
    }
    let colored = render_summary(&metrics, true).map_err(|err| err.to_string())?;
    if !colored.contains("\x1b[36m") {
        return Err("Colored table should contain escape codes".to_owned());
    }
    Ok(())
}
