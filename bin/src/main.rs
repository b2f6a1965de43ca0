use anyhow::Result;

mod cli;
mod distpaths;

fn main() -> Result<()> {
    cli::run()
}
