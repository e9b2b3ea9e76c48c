use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands::{
    config::ConfigArgs,
    inspect::InspectArgs,
    plans::{PlanDetailArgs, PlansArgs},
    ranges::RangesArgs,
    search::SearchArgs,
    types::TypesArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "stmtmart",
    version,
    about = "Statement summary statistics query and configuration"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Config(ConfigArgs),
    Ranges(RangesArgs),
    Types(TypesArgs),
    Search(SearchArgs),
    Plans(PlansArgs),
    PlanDetail(PlanDetailArgs),
    Inspect(InspectArgs),
}
