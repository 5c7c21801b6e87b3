use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::parsers::parse_duration_arg;

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "cassowary",
    version,
    about = "Concurrent HTTP load tester that breaks every request down into DNS, TCP connect, server processing and content transfer time."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (CASSOWARY_LOG / RUST_LOG take precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Start a load test
    Run(RunArgs),
}

/// Options of `cassowary run`. Unset options fall back to the config file,
/// then to built-in defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    /// The absolute http(s) URL to load-test
    #[arg(long, short)]
    pub url: Option<String>,

    /// Number of concurrent workers [default: 1]
    #[arg(long, short)]
    pub concurrency: Option<usize>,

    /// Number of requests to perform [default: 1]
    #[arg(long, short = 'n', conflicts_with = "duration")]
    pub requests: Option<u64>,

    /// Run for this long instead of a fixed request count (e.g. 30, 30s, 2m)
    #[arg(long, short, value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Per-request client timeout (e.g. 5, 500ms) [default: 5s]
    #[arg(long, short, value_parser = parse_duration_arg)]
    pub timeout: Option<Duration>,

    /// File-slurp mode: local path or http(s) URL of a newline-separated list of URL suffixes
    #[arg(long, short)]
    pub file: Option<String>,

    /// Extra request header, e.g. 'Host: www.example.com'
    #[arg(long, short = 'H')]
    pub header: Option<String>,

    /// File whose content is sent as a POST body
    #[arg(long, conflicts_with_all = ["putfile", "patchfile"])]
    pub postfile: Option<PathBuf>,

    /// File whose content is sent as a PUT body
    #[arg(long, conflicts_with = "patchfile")]
    pub putfile: Option<PathBuf>,

    /// File whose content is sent as a PATCH body
    #[arg(long)]
    pub patchfile: Option<PathBuf>,

    /// Content type of the request body [default: application/json]
    #[arg(long = "content-type")]
    pub content_type: Option<String>,

    /// Open a new connection for every request
    #[arg(long = "disable-keep-alive")]
    pub disable_keep_alive: bool,

    /// CA certificate (PEM) to verify the server against
    #[arg(long)]
    pub ca: Option<PathBuf>,

    /// Client certificate (PEM); requires --key
    #[arg(long, requires = "key")]
    pub cert: Option<PathBuf>,

    /// Client private key (PKCS#8 PEM); requires --cert
    #[arg(long, requires = "cert")]
    pub key: Option<PathBuf>,

    /// Write the results to a JSON file
    #[arg(long = "json-metrics", short = 'F')]
    pub json_metrics: bool,

    /// Path of the JSON results file [default: out.json]
    #[arg(long = "json-metrics-file")]
    pub json_metrics_file: Option<PathBuf>,

    /// Prometheus push gateway URL to send the results to
    #[arg(long = "prompushgwurl", short = 'p')]
    pub prompushgwurl: Option<String>,

    /// Publish the results to AWS CloudWatch
    #[arg(long, short = 'C')]
    pub cloudwatch: bool,

    /// CloudWatch namespace [default: cassowary]
    #[arg(long = "cloudwatch-namespace")]
    pub cloudwatch_namespace: Option<String>,

    /// Plugin executable to initialize before the run
    #[arg(long)]
    pub plugin: Option<PathBuf>,

    /// Exact samples kept per phase before percentiles switch to a histogram [default: 1000000]
    #[arg(long = "metrics-max")]
    pub metrics_max: Option<usize>,

    /// Config file (.toml or .json); defaults to ./cassowary.toml or ./cassowary.json
    #[arg(long)]
    pub config: Option<String>,
}
