use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use pipeline::{
    config::ExtractConfig,
    extract::{ExtractEvent, ExtractEvents, Extractor},
    fragment::TableLayout,
    source::{
        PageRange,
        tabula_pdf::{SingleThreadedTabulaExtractor, TabulaFragmentSource},
    },
};
use simple_bar::ProgressBar;

use crate::distpaths;

/// Extracts the food composition tables from the KFCT 2018 PDF into a single CSV dataset.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to input PDF.
    input_pdf: PathBuf,

    /// Path of the CSV file to write the dataset to. Any existing file is replaced.
    output: PathBuf,

    /// Options relating to the extraction configuration.
    #[command(flatten)]
    config: ConfigArgs,

    /// Path to Tabula JAR file. Defaults to the JAR distributed alongside this program.
    #[arg(long)]
    tabula_libpath: Option<String>,

    /// Do not show a progress bar reflecting overall extraction progress.
    #[arg(long, default_value = "false")]
    no_progress: bool,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Path to a YAML extraction configuration. The built-in configuration is used if absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pages to extract stream tables from, e.g. "29-202". Overrides the configuration.
    #[arg(long)]
    pages: Option<PageRange>,

    /// Pages to extract lattice tables from, e.g. "30-37". Overrides the configuration.
    #[arg(long, conflicts_with = "no_lattice")]
    lattice_pages: Option<PageRange>,

    /// Skip the lattice table extraction.
    #[arg(long)]
    no_lattice: bool,
}

impl ConfigArgs {
    fn load_config(&self) -> Result<ExtractConfig> {
        let mut config = ExtractConfig::load_or_default(self.config.as_deref())?;
        if let Some(pages) = self.pages {
            config.pages = pages;
        }
        if let Some(lattice_pages) = self.lattice_pages {
            config.lattice_pages = Some(lattice_pages);
        }
        if self.no_lattice {
            config.lattice_pages = None;
        }
        Ok(config)
    }
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let config = cmd.config.load_config()?;

    let tabula_libpath = cmd
        .tabula_libpath
        .clone()
        .or_else(distpaths::tabula_jar)
        .ok_or_else(|| anyhow!("--tabula-libpath is required, no distributed tabula.jar found"))?;
    let vm = tabula::TabulaVM::new(&tabula_libpath, false).context("initialising Tabula")?;
    let env = vm.attach().context("attaching to TabulaVM")?;
    let tabula_extractor = SingleThreadedTabulaExtractor::new(env);
    let lattice = TabulaFragmentSource::new(&tabula_extractor, TableLayout::Lattice);
    let stream = TabulaFragmentSource::new(&tabula_extractor, TableLayout::Stream);

    let extractor = Extractor::new(&config, &lattice, &stream);
    let mut events = EventDisplayer::new(!cmd.no_progress);
    let report = extractor.run(&cmd.input_pdf, &cmd.output, &mut events)?;

    log::info!(
        "wrote {} records from {} fragments to {:?}",
        report.dataset.len(),
        report.fragments,
        cmd.output
    );
    if report.degraded {
        eprintln!("Warning: the dataset may be incomplete, see the warnings above.");
    }

    Ok(())
}

struct EventDisplayer {
    show_progress: bool,
    progress_bar: Option<ProgressBar>,
    /// Percentage already shown on the progress bar.
    shown_percent: u8,
}

impl EventDisplayer {
    fn new(show_progress: bool) -> Self {
        EventDisplayer {
            show_progress,
            progress_bar: None,
            shown_percent: 0,
        }
    }
}

impl ExtractEvents for EventDisplayer {
    fn on_event(&mut self, event: ExtractEvent) {
        match event {
            ExtractEvent::Progress { percent, stage } => {
                log::debug!("{percent}%: {stage}");
                if !self.show_progress {
                    return;
                }

                let progress_bar = self
                    .progress_bar
                    .get_or_insert_with(|| ProgressBar::cargo_style(100, 80, true));
                while self.shown_percent < percent {
                    progress_bar.update();
                    self.shown_percent += 1;
                }
            }
            ExtractEvent::Warning(err) => {
                eprintln!("Warning (continuing): {:#}.", err);
            }
            ExtractEvent::Completed => {
                eprintln!("Extraction complete.");
            }
        }
    }
}
