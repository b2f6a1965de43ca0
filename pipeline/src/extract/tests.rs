use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use googletest::prelude::*;
use mockall::mock;
use testutils::{anyhow_downcasts_to, grid, read_csv_records};

use super::*;
use crate::{fragment::TableLayout, nutrient::NutrientKey};

mock! {
    pub Source {}
    impl FragmentSource for Source {
        fn extract(&self, pdf_path: &Path, pages: PageRange) -> Result<Vec<RawFragment>>;
    }
}

#[derive(Default)]
struct RecordedEvents {
    percents: Vec<u8>,
    warnings: Vec<String>,
    completed: bool,
}

impl ExtractEvents for RecordedEvents {
    fn on_event(&mut self, event: ExtractEvent) {
        match event {
            ExtractEvent::Progress { percent, .. } => self.percents.push(percent),
            ExtractEvent::Warning(err) => self.warnings.push(format!("{err:#}")),
            ExtractEvent::Completed => self.completed = true,
        }
    }
}

/// Temporary directory holding a stand-in source document.
struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("kfct.pdf"), b"%PDF-1.4")?;
        Ok(Self { dir })
    }

    fn pdf_path(&self) -> PathBuf {
        self.dir.path().join("kfct.pdf")
    }

    fn output_path(&self) -> PathBuf {
        self.dir.path().join("out.csv")
    }
}

fn lattice_pages() -> PageRange {
    PageRange::new(30, 37).expect("valid range")
}

fn all_pages() -> PageRange {
    PageRange::new(29, 202).expect("valid range")
}

fn source_returning(
    expected_pages: PageRange,
    result: impl Fn() -> Result<Vec<RawFragment>> + Send + 'static,
) -> MockSource {
    let mut source = MockSource::new();
    source
        .expect_extract()
        .withf(move |_, pages| *pages == expected_pages)
        .times(1)
        .returning(move |_, _| result());
    source
}

fn cereal_fragment() -> RawFragment {
    RawFragment::new(
        TableLayout::Lattice,
        Some(30),
        grid(&[
            &["KENYA FOOD COMPOSITION TABLES", "", "", "", "", ""],
            &[
                "Code",
                "Food name in English",
                "Energy\nkcal",
                "Protein (g)",
                "Fat (g)",
                "Iron (mg)",
            ],
            &["A1", "Maize, white, whole grain", "350", "9.4", "3.8 tr", "2.1"],
            &["A2", "Millet, finger, whole grain", "336", "7.3", "1.3", "*"],
            &["A3", "Sorghum, white", "344", "10.1", "", "3.4"],
            &["", "", "", "", "", ""],
        ]),
    )
}

fn meat_fragment() -> RawFragment {
    RawFragment::new(
        TableLayout::Stream,
        Some(121),
        grid(&[
            &["Code", "Food", "Energy", "Protein", "Fat"],
            &["G1", "Beef, lean, raw", "150", "20.7", "7.4"],
            &["Code", "Food", "Energy", "Protein", "Fat"],
            &["G2", "Chicken, meat only, raw", "124", "21.1", "4.3"],
            &["A2", "Millet, finger, whole grain", "336", "7.3", "1.3"],
        ]),
    )
}

fn numbered_fragment(i: usize) -> RawFragment {
    let code = format!("G{i}");
    let name = format!("Meat product {i}");
    RawFragment::new(
        TableLayout::Stream,
        Some(100 + i as i32),
        [
            vec!["Code", "Food", "Energy", "Protein"],
            vec![code.as_str(), name.as_str(), "100", "10"],
        ],
    )
}

#[gtest]
#[test_log::test]
fn test_extracts_both_strategies_into_dataset() -> Result<()> {
    let workspace = Workspace::new()?;
    let config = ExtractConfig::default();

    // GIVEN: a lattice table of cereals and a stream table of meats.
    let primary = source_returning(lattice_pages(), || Ok(vec![cereal_fragment()]));
    let secondary = source_returning(all_pages(), || Ok(vec![meat_fragment()]));
    let mut events = RecordedEvents::default();

    // WHEN: the extraction runs.
    let report = Extractor::new(&config, &primary, &secondary).run(
        &workspace.pdf_path(),
        &workspace.output_path(),
        &mut events,
    )?;

    // THEN: one record per distinct food is kept, lattice records first.
    let codes: Vec<String> = report
        .dataset
        .records()
        .iter()
        .map(|record| record.food_code.to_string())
        .collect();
    expect_that!(
        codes,
        elements_are![eq("A1"), eq("A2"), eq("A3"), eq("G1"), eq("G2")]
    );
    let categories: Vec<String> = report
        .dataset
        .records()
        .iter()
        .map(|record| record.category.clone())
        .collect();
    expect_that!(
        categories,
        elements_are![
            eq("Cereals and their products"),
            eq("Cereals and their products"),
            eq("Cereals and their products"),
            eq("Meat, poultry and their products"),
            eq("Meat, poultry and their products"),
        ]
    );
    expect_false!(report.degraded);
    expect_eq!(report.fragments, 2);
    expect_eq!(report.dropped.header_leaks, 1);
    expect_eq!(report.dropped.duplicates, 1);

    // THEN: footnote markers and blanks read as numbers.
    let maize = &report.dataset.records()[0];
    expect_that!(maize.nutrients.get(NutrientKey::EnergyKcal), eq(350.0));
    expect_that!(maize.nutrients.get(NutrientKey::FatG), eq(3.8));
    expect_that!(maize.nutrients.get(NutrientKey::IronMg), eq(2.1));
    expect_that!(report.dataset.records()[1].nutrients.get(NutrientKey::IronMg), eq(0.0));

    // THEN: the file holds the header and the same records.
    let rows = read_csv_records(&workspace.output_path())?;
    expect_eq!(rows.len(), 6);
    expect_eq!(rows[0], crate::dataset::csv_header());
    expect_eq!(Dataset::load(&workspace.output_path())?, report.dataset);

    // THEN: progress reaches every milestone in order.
    expect_that!(
        events.percents,
        elements_are![eq(&5), eq(&15), eq(&20), eq(&45), eq(&50), eq(&90), eq(&100)]
    );
    expect_true!(events.completed);
    expect_true!(events.warnings.is_empty());
    Ok(())
}

#[gtest]
#[test_log::test]
fn test_continues_without_failed_lattice_strategy() -> Result<()> {
    let workspace = Workspace::new()?;
    let config = ExtractConfig::default();

    // GIVEN: the lattice strategy fails, and the stream strategy finds 50 tables.
    let primary = source_returning(lattice_pages(), || Err(anyhow!("lattice detector crashed")));
    let secondary = source_returning(all_pages(), || {
        Ok((1..=50).map(numbered_fragment).collect())
    });
    let mut events = RecordedEvents::default();

    // WHEN: the extraction runs.
    let report = Extractor::new(&config, &primary, &secondary).run(
        &workspace.pdf_path(),
        &workspace.output_path(),
        &mut events,
    )?;

    // THEN: the stream records are written, and the failure is reported as a warning.
    expect_eq!(report.dataset.len(), 50);
    expect_true!(report.degraded);
    expect_that!(
        events.warnings,
        elements_are![all!(
            contains_substring("lattice extraction of pages 30-37 failed"),
            contains_substring("lattice detector crashed"),
        )]
    );
    expect_true!(events.completed);
    expect_eq!(read_csv_records(&workspace.output_path())?.len(), 51);
    Ok(())
}

#[gtest]
#[test_log::test]
fn test_continues_without_failed_stream_strategy() -> Result<()> {
    let workspace = Workspace::new()?;
    let config = ExtractConfig::default();

    let primary = source_returning(lattice_pages(), || Ok(vec![cereal_fragment()]));
    let secondary = source_returning(all_pages(), || Err(anyhow!("stream detector crashed")));
    let mut events = RecordedEvents::default();

    let report = Extractor::new(&config, &primary, &secondary).run(
        &workspace.pdf_path(),
        &workspace.output_path(),
        &mut events,
    )?;

    expect_eq!(report.dataset.len(), 3);
    expect_true!(report.degraded);
    expect_eq!(events.warnings.len(), 1);
    Ok(())
}

#[gtest]
#[test_log::test]
fn test_fails_when_no_fragments_extracted() -> Result<()> {
    let workspace = Workspace::new()?;
    let config = ExtractConfig::default();

    // GIVEN: neither strategy yields a fragment.
    let primary = source_returning(lattice_pages(), || Ok(vec![]));
    let secondary = source_returning(all_pages(), || Err(anyhow!("stream detector crashed")));
    let mut events = RecordedEvents::default();

    // WHEN: the extraction runs.
    let result = Extractor::new(&config, &primary, &secondary).run(
        &workspace.pdf_path(),
        &workspace.output_path(),
        &mut events,
    );

    // THEN: it fails, and writes nothing.
    let err = result.err().ok_or_else(|| anyhow!("extraction unexpectedly succeeded"))?;
    expect_that!(
        &err,
        anyhow_downcasts_to::<ExtractError, _>(eq(ExtractError::NoFragmentsExtracted))
    );
    expect_false!(workspace.output_path().exists());
    expect_false!(events.completed);
    Ok(())
}

#[gtest]
fn test_fails_when_source_unavailable() -> Result<()> {
    let workspace = Workspace::new()?;
    let config = ExtractConfig::default();

    // GIVEN: sources that must not be called.
    let primary = MockSource::new();
    let secondary = MockSource::new();
    let mut events = RecordedEvents::default();

    let result = Extractor::new(&config, &primary, &secondary).run(
        &workspace.dir.path().join("missing.pdf"),
        &workspace.output_path(),
        &mut events,
    );

    let err = result.err().ok_or_else(|| anyhow!("extraction unexpectedly succeeded"))?;
    expect_that!(
        &err,
        anyhow_downcasts_to::<ExtractError, _>(eq(ExtractError::SourceUnavailable))
    );
    expect_false!(workspace.output_path().exists());
    expect_true!(events.percents.is_empty());
    Ok(())
}

#[gtest]
fn test_skips_lattice_strategy_without_lattice_pages() -> Result<()> {
    let workspace = Workspace::new()?;
    let config = ExtractConfig {
        lattice_pages: None,
        ..ExtractConfig::default()
    };

    let primary = MockSource::new();
    let secondary = source_returning(all_pages(), || Ok(vec![meat_fragment()]));
    let mut events = RecordedEvents::default();

    let report = Extractor::new(&config, &primary, &secondary).run(
        &workspace.pdf_path(),
        &workspace.output_path(),
        &mut events,
    )?;

    expect_eq!(report.dataset.len(), 3);
    expect_false!(report.degraded);
    Ok(())
}

#[gtest]
fn test_process_fragment_falls_back_to_first_row_header() {
    let fragment = RawFragment::new(
        TableLayout::Stream,
        Some(60),
        grid(&[
            &["Code", "Item", "Kcal", "Protein"],
            &["E4", "Kale, raw", "49", "4.3"],
        ]),
    );

    let records = process_fragment(fragment, &ExtractConfig::default());

    expect_eq!(records.len(), 1);
    expect_that!(records[0].provisional.food_name_english, eq("Kale, raw"));
    expect_that!(records[0].nutrients.get(NutrientKey::ProteinG), eq(4.3));
    expect_that!(records[0].nutrients.get(NutrientKey::EnergyKcal), eq(0.0));
    expect_that!(records[0].category, eq("Vegetables and their products"));
}
