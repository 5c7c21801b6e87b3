use tracing::info;

use crate::config::RunPlan;
use crate::domain::RunConfiguration;
use crate::error::{AppError, AppResult};
use crate::http::WorkerCoordinator;
use crate::metrics::ResultMetrics;
use crate::plugin::{InitHook, NoopPlugin, SubprocessPlugin};
use crate::sinks::write_sinks;

use super::summary::print_summary;

/// Runs the initialization hook, then the load test.
///
/// Display and export of the returned metrics are left to the caller.
pub struct RunController {
    hook: Box<dyn InitHook>,
}

impl std::fmt::Debug for RunController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunController").finish_non_exhaustive()
    }
}

impl Default for RunController {
    fn default() -> Self {
        Self::new(Box::new(NoopPlugin))
    }
}

impl RunController {
    #[must_use]
    pub fn new(hook: Box<dyn InitHook>) -> Self {
        Self { hook }
    }

    /// # Errors
    ///
    /// Returns the hook's error untouched when it fails, in which case no
    /// request is sent. Otherwise returns configuration or runtime errors of
    /// the worker pool.
    pub async fn run(&self, config: RunConfiguration) -> AppResult<ResultMetrics> {
        let coordinator = WorkerCoordinator::new(config)?;
        self.hook.init().await.map_err(AppError::Plugin)?;
        coordinator.run().await
    }
}

/// Runs a validated plan end to end: plugin, load test, summary table and
/// every configured export.
///
/// # Errors
///
/// Returns plugin, run or export errors. Export errors are returned after
/// the summary has been printed.
pub async fn run_load_test(plan: RunPlan, color: bool) -> AppResult<ResultMetrics> {
    let hook: Box<dyn InitHook> = match plan.plugin.as_ref() {
        Some(path) => {
            info!("Initializing plugin {}", path.display());
            Box::new(SubprocessPlugin::new(path))
        }
        None => Box::new(NoopPlugin),
    };

    let metrics = RunController::new(hook).run(plan.run).await?;
    print_summary(&metrics, color)?;
    write_sinks(&plan.exports, &metrics).await?;
    Ok(metrics)
}
