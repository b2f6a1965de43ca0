use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use pipeline::dataset::Dataset;

/// Lists the distinct food names of an extracted dataset, one per line.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to a dataset CSV written by extract-csv.
    dataset: PathBuf,
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let dataset = Dataset::load(&cmd.dataset)?;

    let mut stdout = std::io::stdout().lock();
    for name in dataset.distinct_food_names() {
        writeln!(stdout, "{name}").context("writing food name")?;
    }
    Ok(())
}
