//! Runs the whole extraction, from fragment sources to the written dataset.

#[cfg(test)]
mod tests;

use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::{
    assemble::assemble_records,
    clean::clean_fragment,
    columns::map_columns,
    config::ExtractConfig,
    dataset::Dataset,
    dedupe::{DropCounts, deduplicate},
    fragment::RawFragment,
    header::locate_header,
    normalize::normalize_record,
    record::NormalizedRecord,
    source::{FragmentSource, PageRange},
};

/// Conditions that stop an extraction without writing any output.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("source document is unavailable")]
    SourceUnavailable,
    #[error("no table fragments were extracted by any strategy")]
    NoFragmentsExtracted,
}

/// Milestones of an extraction, in the order that they are reached.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, strum_macros::Display)]
pub enum ExtractStage {
    #[strum(serialize = "extracting lattice tables")]
    PrimaryStarted,
    #[strum(serialize = "extracted lattice tables")]
    PrimaryDone,
    #[strum(serialize = "extracting stream tables")]
    SecondaryStarted,
    #[strum(serialize = "extracted stream tables")]
    SecondaryDone,
    #[strum(serialize = "processing fragments")]
    Processing,
    #[strum(serialize = "saving dataset")]
    Saving,
    #[strum(serialize = "done")]
    Done,
}

impl ExtractStage {
    /// Approximate overall progress on reaching the stage.
    pub fn percent(self) -> u8 {
        use ExtractStage::*;
        match self {
            PrimaryStarted => 5,
            PrimaryDone => 15,
            SecondaryStarted => 20,
            SecondaryDone => 45,
            Processing => 50,
            Saving => 90,
            Done => 100,
        }
    }
}

/// Extraction event emitted to track progress.
#[derive(Debug)]
pub enum ExtractEvent {
    /// Indicates that the extraction reached the given stage.
    Progress { percent: u8, stage: ExtractStage },
    /// Indicates a failure that the extraction recovered from, at the cost of a possibly
    /// incomplete dataset.
    Warning(anyhow::Error),
    /// Indicates that the dataset has been written and that no more events will follow.
    Completed,
}

/// Trait to implement to receive notifications about extraction events.
pub trait ExtractEvents {
    fn on_event(&mut self, event: ExtractEvent);
}

/// Outcome of a successful extraction.
#[derive(Debug)]
pub struct ExtractReport {
    pub dataset: Dataset,
    /// Number of fragments from all strategies.
    pub fragments: usize,
    /// `true` if a strategy failed and its tables are missing from the dataset.
    pub degraded: bool,
    pub dropped: DropCounts,
}

/// Encapsulates the values required to extract the dataset from a document.
pub struct Extractor<'a> {
    config: &'a ExtractConfig,
    /// Bordered table strategy, run first over the lattice pages.
    primary: &'a dyn FragmentSource,
    /// Whitespace aligned strategy, run over all pages.
    secondary: &'a dyn FragmentSource,
}

impl<'a> Extractor<'a> {
    pub fn new(
        config: &'a ExtractConfig,
        primary: &'a dyn FragmentSource,
        secondary: &'a dyn FragmentSource,
    ) -> Self {
        Self {
            config,
            primary,
            secondary,
        }
    }

    /// Extracts the dataset from the document at `pdf_path` and writes it as CSV to
    /// `output_path`.
    ///
    /// Nothing is written unless at least one fragment was extracted.
    pub fn run(
        &self,
        pdf_path: &Path,
        output_path: &Path,
        events: &mut dyn ExtractEvents,
    ) -> Result<ExtractReport> {
        if !pdf_path.is_file() {
            return Err(anyhow!(ExtractError::SourceUnavailable))
                .with_context(|| format!("opening source document {:?}", pdf_path));
        }

        let mut degraded = false;
        let mut fragments: Vec<RawFragment> = Vec::new();

        progress(events, ExtractStage::PrimaryStarted);
        if let Some(lattice_pages) = self.config.lattice_pages {
            match self.primary.extract(pdf_path, lattice_pages) {
                Ok(extracted) => fragments.extend(extracted),
                Err(err) => {
                    degraded = true;
                    strategy_failed(events, err, "lattice", lattice_pages);
                }
            }
        }
        progress(events, ExtractStage::PrimaryDone);

        progress(events, ExtractStage::SecondaryStarted);
        match self.secondary.extract(pdf_path, self.config.pages) {
            Ok(extracted) => fragments.extend(extracted),
            Err(err) => {
                degraded = true;
                strategy_failed(events, err, "stream", self.config.pages);
            }
        }
        progress(events, ExtractStage::SecondaryDone);

        if fragments.is_empty() {
            return Err(anyhow!(ExtractError::NoFragmentsExtracted))
                .with_context(|| format!("extracting tables from {:?}", pdf_path));
        }
        let fragment_count = fragments.len();
        log::info!("extracted {fragment_count} fragments");

        progress(events, ExtractStage::Processing);
        let records: Vec<NormalizedRecord> = fragments
            .into_iter()
            .flat_map(|fragment| process_fragment(fragment, self.config))
            .collect();
        log::info!("assembled {} records", records.len());
        let deduplicated = deduplicate(records);
        let dataset = Dataset::new(deduplicated.records);

        progress(events, ExtractStage::Saving);
        dataset
            .write_csv(output_path)
            .with_context(|| format!("writing dataset to {:?}", output_path))?;

        progress(events, ExtractStage::Done);
        events.on_event(ExtractEvent::Completed);

        Ok(ExtractReport {
            dataset,
            fragments: fragment_count,
            degraded,
            dropped: deduplicated.dropped,
        })
    }
}

/// Runs every per-fragment stage over a single fragment.
pub fn process_fragment(fragment: RawFragment, config: &ExtractConfig) -> Vec<NormalizedRecord> {
    let fragment = clean_fragment(fragment);
    let header = locate_header(&fragment, &config.header_anchors);
    let mapped = map_columns(fragment, header.index, &config.column_rules);
    let records = assemble_records(&mapped);
    log::debug!(
        "page {:?}: {} records below header row {}",
        mapped.page,
        records.len(),
        header.index
    );
    records
        .into_iter()
        .map(|record| normalize_record(record, &config.categories))
        .collect()
}

fn progress(events: &mut dyn ExtractEvents, stage: ExtractStage) {
    events.on_event(ExtractEvent::Progress {
        percent: stage.percent(),
        stage,
    });
}

fn strategy_failed(
    events: &mut dyn ExtractEvents,
    err: anyhow::Error,
    strategy: &str,
    pages: PageRange,
) {
    let err = err.context(format!(
        "{strategy} extraction of pages {pages} failed, continuing without it"
    ));
    log::warn!("{err:#}");
    events.on_event(ExtractEvent::Warning(err));
}
