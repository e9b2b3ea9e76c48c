#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use stmtmart::cli::app::{Cli, Command, RuntimeArgs};
use stmtmart::cli::commands;
use stmtmart::config::RuntimePaths;
use stmtmart::models::EnvelopeCommandFailure;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_INPUT_FAILURE: i32 = 2;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };

    match execute(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            classify_runtime_error(&error)
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Config(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::config::run(&args, &runtime_paths)
        }
        Command::Ranges(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::ranges::run(&args, &runtime_paths)
        }
        Command::Types(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::types::run(&args, &runtime_paths)
        }
        Command::Search(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::search::run(&args, &runtime_paths)
        }
        Command::Plans(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::plans::run_plans(&args, &runtime_paths)
        }
        Command::PlanDetail(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::plans::run_plan_detail(&args, &runtime_paths)
        }
        Command::Inspect(args) => commands::inspect::run(&args),
    }
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<EnvelopeCommandFailure>() {
        Some(failure) if failure.is_input_error() => EXIT_INPUT_FAILURE,
        _ => EXIT_RUNTIME_FAILURE,
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    stmtmart::config::resolve_runtime_paths(&home_dir, &cwd, args.db.as_deref())
}
