use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;

use self::{shapes::ShapesArg, simulate::SimulateArg};

mod shapes;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Game config file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Minimum level of log messages written to stderr (`RUST_LOG` overrides it)
    #[arg(long, global = true, default_value_t = LevelFilter::Warn)]
    log_level: LevelFilter,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play games with random commands and report the results
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the geometry of every piece kind in each orientation
    Shapes(#[clap(flatten)] ShapesArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .parse_default_env()
        .try_init()?;

    let config = crate::util::load_config(args.config.as_deref())?;
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg, config)?,
        Mode::Shapes(arg) => shapes::run(&arg, &config)?,
    }
    Ok(())
}
