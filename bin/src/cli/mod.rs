use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::LevelFilter;

mod extractcsv;
mod foodnames;
mod nutrienttotals;

/// Extracts and queries the Kenya Food Composition Tables dataset.
#[derive(Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Command {
    ExtractCsv(extractcsv::Command),
    FoodNames(foodnames::Command),
    NutrientTotals(nutrienttotals::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    use Command::*;
    match &args.command {
        ExtractCsv(cmd) => extractcsv::run(cmd),
        FoodNames(cmd) => foodnames::run(cmd),
        NutrientTotals(cmd) => nutrienttotals::run(cmd),
    }
}
