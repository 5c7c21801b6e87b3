use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::load_suffixes;
use crate::args::RunArgs;
use crate::domain::{
    DEFAULT_CONTENT_TYPE, HttpMethod, RequestBody, RequestHeader, RunConfiguration, Termination,
};
use crate::error::ConfigError;
use crate::http::{load_tls_materials, validate_base_url};
use crate::sinks::{
    CloudWatchSettings, DEFAULT_CLOUDWATCH_NAMESPACE, DEFAULT_JSON_METRICS_FILE, ExportSettings,
};

const DEFAULT_CONCURRENCY: usize = 1;
const DEFAULT_REQUESTS: u64 = 1;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_METRICS_MAX: usize = 1_000_000;

/// Everything needed to run and report one load test.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub run: RunConfiguration,
    pub exports: ExportSettings,
    pub plugin: Option<PathBuf>,
}

/// Validates merged arguments and loads the files they point at.
///
/// Nothing is sent to the target; the only network access is fetching a
/// remote suffix list.
///
/// # Errors
///
/// Returns the first invalid value or unreadable file.
pub async fn build_run_plan(args: &RunArgs) -> Result<RunPlan, ConfigError> {
    let base_url = args.url.as_deref().ok_or(ConfigError::MissingUrl)?;
    validate_base_url(base_url)?;

    let concurrency = NonZeroUsize::new(args.concurrency.unwrap_or(DEFAULT_CONCURRENCY))
        .ok_or(ConfigError::ConcurrencyZero)?;
    let termination = termination(args)?;
    let timeout = args.timeout.unwrap_or(DEFAULT_TIMEOUT);
    if timeout.is_zero() {
        return Err(ConfigError::TimeoutZero);
    }
    let header = args
        .header
        .as_deref()
        .map(RequestHeader::parse)
        .transpose()?;
    let (method, body) = request_body(args)?;
    let tls = load_tls_materials(args.ca.as_deref(), args.cert.as_deref(), args.key.as_deref())?;
    let url_suffixes = match args.file.as_deref() {
        Some(location) => load_suffixes(location).await?,
        None => Vec::new(),
    };

    let mut run = RunConfiguration::new(base_url);
    run.concurrency = concurrency;
    run.termination = termination;
    run.method = method;
    run.body = body;
    run.header = header;
    run.timeout = timeout;
    run.keep_alive = !args.disable_keep_alive;
    run.tls = tls;
    run.url_suffixes = url_suffixes;
    run.metrics_max = args.metrics_max.unwrap_or(DEFAULT_METRICS_MAX);

    Ok(RunPlan {
        run,
        exports: export_settings(args)?,
        plugin: args.plugin.clone(),
    })
}

fn termination(args: &RunArgs) -> Result<Termination, ConfigError> {
    match (args.requests, args.duration) {
        (Some(_), Some(_)) => Err(ConfigError::TerminationConflict),
        (None, Some(duration)) => Termination::for_duration(duration),
        (requests, None) => Termination::fixed_count(requests.unwrap_or(DEFAULT_REQUESTS)),
    }
}

fn request_body(args: &RunArgs) -> Result<(HttpMethod, Option<RequestBody>), ConfigError> {
    let (method, path) = match (
        args.postfile.as_deref(),
        args.putfile.as_deref(),
        args.patchfile.as_deref(),
    ) {
        (None, None, None) => return Ok((HttpMethod::Get, None)),
        (Some(path), None, None) => (HttpMethod::Post, path),
        (None, Some(path), None) => (HttpMethod::Put, path),
        (None, None, Some(path)) => (HttpMethod::Patch, path),
        _ => return Err(ConfigError::BodyConflict),
    };
    let content_type = args
        .content_type
        .clone()
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());
    Ok((
        method,
        Some(RequestBody {
            bytes: read_body(path)?,
            content_type,
        }),
    ))
}

fn read_body(path: &Path) -> Result<Vec<u8>, ConfigError> {
    std::fs::read(path).map_err(|err| ConfigError::ReadBody {
        path: path.to_path_buf(),
        source: err,
    })
}

fn export_settings(args: &RunArgs) -> Result<ExportSettings, ConfigError> {
    let json_file = if args.json_metrics || args.json_metrics_file.is_some() {
        Some(
            args.json_metrics_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_JSON_METRICS_FILE)),
        )
    } else {
        None
    };

    if let Some(gateway) = args.prompushgwurl.as_deref() {
        validate_base_url(gateway)?;
    }

    let cloudwatch = args.cloudwatch.then(|| CloudWatchSettings {
        namespace: args
            .cloudwatch_namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_CLOUDWATCH_NAMESPACE.to_owned()),
    });

    Ok(ExportSettings {
        json_file,
        prometheus_gateway: args.prompushgwurl.clone(),
        cloudwatch,
    })
}
