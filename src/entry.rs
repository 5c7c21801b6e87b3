use std::ffi::OsString;
use std::io::IsTerminal;

use clap::{CommandFactory, FromArgMatches};
use tracing::error;

use crate::app::run_load_test;
use crate::args::{Cli, Command, RunArgs};
use crate::config::{apply_config, build_run_plan, load_config};
use crate::error::AppResult;

/// Binary entry point: parse arguments, set up logging and the runtime,
/// then dispatch the subcommand.
///
/// # Errors
///
/// Returns configuration, plugin, run or export errors.
pub fn run() -> AppResult<()> {
    let Some(cli) = parse_args()? else {
        return Ok(());
    };

    crate::logger::init_logging(cli.verbose, cli.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(run_async(cli));
    match result.as_ref() {
        Err(err) if err.is_export() => {
            error!("Load test finished but export failed: {}", err);
        }
        Err(err) => error!("{}", err),
        Ok(()) => {}
    }
    result
}

fn parse_args() -> AppResult<Option<Cli>> {
    let mut cmd = Cli::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if matches!(raw_args.as_slice(), [] | [_]) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let cli = Cli::from_arg_matches(&matches)?;
    Ok(Some(cli))
}

async fn run_async(cli: Cli) -> AppResult<()> {
    let color = !cli.no_color && std::io::stdout().is_terminal();
    match cli.command {
        Command::Run(args) => run_command(args, color).await,
    }
}

async fn run_command(mut args: RunArgs, color: bool) -> AppResult<()> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &config)?;
    }
    let plan = build_run_plan(&args).await?;
    run_load_test(plan, color).await?;
    Ok(())
}
