use std::path::Path;

use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::ResultMetrics;

/// Writes `metrics` as pretty-printed JSON, replacing any existing file.
///
/// # Errors
///
/// Returns an error when serialization or the file write fails.
pub async fn write_json(path: &Path, metrics: &ResultMetrics) -> AppResult<()> {
    let mut json = serde_json::to_vec_pretty(metrics)
        .map_err(|err| AppError::sink(SinkError::SerializeJson { source: err }))?;
    json.push(b'\n');
    tokio::fs::write(path, json).await.map_err(|err| {
        AppError::sink(SinkError::WriteJson {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    tracing::info!("Wrote JSON metrics to {}", path.display());
    Ok(())
}
