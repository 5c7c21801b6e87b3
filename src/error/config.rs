use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Concurrency level cannot be set to 0.")]
    ConcurrencyZero,
    #[error("Number of requests cannot be set to 0.")]
    RequestsZero,
    #[error("Duration cannot be set to 0 or negative.")]
    DurationZero,
    #[error("Timeout cannot be set to 0.")]
    TimeoutZero,
    #[error("Invalid duration '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },
    #[error("Cannot set both a request count and a duration.")]
    TerminationConflict,
    #[error("Only one of --postfile, --putfile or --patchfile may be set.")]
    BodyConflict,
    #[error("Not a valid URL '{url}'. Must have the format http{{s}}://{{host}}.")]
    InvalidUrl { url: String },
    #[error("Not a valid header value '{value}'. Expected 'Key: Value'.")]
    InvalidHeader { value: String },
    #[error("Failed to read request body '{path}': {source}")]
    ReadBody {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read cacert '{path}': {source}")]
    ReadCacert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid cacert '{path}': {source}")]
    InvalidCacert {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read cert '{path}': {source}")]
    ReadCert {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read key '{path}': {source}")]
    ReadKey {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid cert/key: {source}")]
    InvalidIdentity {
        #[source]
        source: reqwest::Error,
    },
    #[error("--cert requires --key.")]
    CertRequiresKey,
    #[error("--key requires --cert.")]
    KeyRequiresCert,
    #[error("Failed to read URL suffix file '{path}': {source}")]
    ReadSuffixes {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to fetch URL suffix file '{url}': {source}")]
    FetchSuffixes {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("URL suffix file '{location}' was empty.")]
    SuffixesEmpty { location: String },
    #[error("Failed to read config '{path}': {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse TOML config '{path}': {source}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Failed to parse JSON config '{path}': {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Unsupported config extension '{ext}'. Use .toml or .json.")]
    UnsupportedExtension { ext: String },
    #[error("Config file must have .toml or .json extension.")]
    MissingExtension,
    #[error("Missing URL (set --url or provide it in config).")]
    MissingUrl,
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
}
