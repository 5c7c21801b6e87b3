use crate::args::RunArgs;
use crate::error::ConfigError;

use super::types::ConfigFile;

/// Fills options the command line left unset from the config file.
///
/// The request count and duration are taken from the file only when neither
/// was given on the command line, and likewise for the three body files.
///
/// # Errors
///
/// Returns an error when the file sets both termination modes, more than one
/// body file, or an unparsable duration.
pub fn apply_config(args: &mut RunArgs, config: &ConfigFile) -> Result<(), ConfigError> {
    fill(&mut args.url, config.url.as_ref());
    fill(&mut args.concurrency, config.concurrency.as_ref());
    fill(&mut args.file, config.file.as_ref());
    fill(&mut args.header, config.header.as_ref());
    fill(&mut args.content_type, config.content_type.as_ref());
    fill(&mut args.ca, config.ca.as_ref());
    fill(&mut args.cert, config.cert.as_ref());
    fill(&mut args.key, config.key.as_ref());
    fill(&mut args.json_metrics_file, config.json_metrics_file.as_ref());
    fill(&mut args.prompushgwurl, config.prompushgwurl.as_ref());
    fill(
        &mut args.cloudwatch_namespace,
        config.cloudwatch_namespace.as_ref(),
    );
    fill(&mut args.plugin, config.plugin.as_ref());
    fill(&mut args.metrics_max, config.metrics_max.as_ref());

    if args.timeout.is_none()
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = Some(timeout.to_duration()?);
    }

    if args.requests.is_none() && args.duration.is_none() {
        if config.requests.is_some() && config.duration.is_some() {
            return Err(ConfigError::TerminationConflict);
        }
        args.requests = config.requests;
        if let Some(duration) = config.duration.as_ref() {
            args.duration = Some(duration.to_duration()?);
        }
    }

    if args.postfile.is_none() && args.putfile.is_none() && args.patchfile.is_none() {
        let set = [&config.postfile, &config.putfile, &config.patchfile]
            .iter()
            .filter(|file| file.is_some())
            .count();
        if set > 1 {
            return Err(ConfigError::BodyConflict);
        }
        args.postfile.clone_from(&config.postfile);
        args.putfile.clone_from(&config.putfile);
        args.patchfile.clone_from(&config.patchfile);
    }

    if !args.disable_keep_alive
        && let Some(disable) = config.disable_keep_alive
    {
        args.disable_keep_alive = disable;
    }
    if !args.json_metrics
        && let Some(enabled) = config.json_metrics
    {
        args.json_metrics = enabled;
    }
    if !args.cloudwatch
        && let Some(enabled) = config.cloudwatch
    {
        args.cloudwatch = enabled;
    }

    Ok(())
}

fn fill<T: Clone>(target: &mut Option<T>, fallback: Option<&T>) {
    if target.is_none() {
        *target = fallback.cloned();
    }
}
