//! [FragmentSource] backed by Tabula.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{
    fragment::{RawFragment, Row, TableLayout},
    source::{FragmentSource, PageRange},
};

/// Required trait for making a single batch extraction call to Tabula for table(s) extraction.
pub trait TabulaExtractor {
    fn extract_tables(&self, request: TabulaExtractionRequest) -> Result<JsonTableSet>;
}

/// Single request to a [TabulaExtractor] to batch extract every table from pages of a PDF file.
#[derive(Clone, Debug, PartialEq)]
pub struct TabulaExtractionRequest {
    pub pdf_path: PathBuf,
    pub pages: Vec<i32>,
    pub guess: bool,
    pub layout: TableLayout,
}

/// A sequence of extracted tables from a PDF file.
#[derive(Deserialize, Debug)]
#[serde(transparent)]
pub struct JsonTableSet(pub Vec<JsonTable>);

/// A single extracted table from a PDF file.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct JsonTable {
    pub extraction_method: String,
    pub page_number: i32,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub right: f32,
    pub bottom: f32,
    pub data: Vec<JsonRow>,
}

/// A single extracted table row from a PDF file.
#[derive(Deserialize, Debug)]
pub struct JsonRow(pub Vec<JsonCell>);

/// A single extracted table cell from a PDF file.
#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct JsonCell {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
}

/// Single threaded implementation of [TabulaExtractor].
///
/// Must be created and run on the thread that attached the [tabula::TabulaEnv].
pub struct SingleThreadedTabulaExtractor<'env> {
    tabula_env: tabula::TabulaEnv<'env>,
}

impl<'env> SingleThreadedTabulaExtractor<'env> {
    pub fn new(tabula_env: tabula::TabulaEnv<'env>) -> Self {
        Self { tabula_env }
    }
}

impl TabulaExtractor for SingleThreadedTabulaExtractor<'_> {
    fn extract_tables(&self, request: TabulaExtractionRequest) -> Result<JsonTableSet> {
        let tabula = self
            .tabula_env
            .configure_tabula(
                None,
                Some(&request.pages),
                tabula::OutputFormat::Json,
                request.guess,
                request.layout.to_tabula_extraction_method(),
                false,
                None,
            )
            .with_context(|| format!("configuring Tabula for {} extraction", request.layout))?;

        let extracted_file = tempfile::NamedTempFile::new()
            .context("creating temporary file for extracting PDF table data")?;
        tabula
            .parse_document_into(&request.pdf_path, extracted_file.path())
            .context("extracting PDF table data")?;

        serde_json::from_reader(extracted_file).context("parsing extracted PDF table data")
    }
}

/// Extracts fragments with one table layout, making one fragment of each table that Tabula
/// reports.
pub struct TabulaFragmentSource<'a, X> {
    extractor: &'a X,
    layout: TableLayout,
}

impl<'a, X> TabulaFragmentSource<'a, X>
where
    X: TabulaExtractor,
{
    pub fn new(extractor: &'a X, layout: TableLayout) -> Self {
        Self { extractor, layout }
    }

    fn to_fragment(&self, table: JsonTable) -> RawFragment {
        RawFragment::new(
            self.layout,
            Some(table.page_number),
            table
                .data
                .into_iter()
                .map(|row| Row(row.0.into_iter().map(|cell| cell.text).collect())),
        )
    }
}

impl<X> FragmentSource for TabulaFragmentSource<'_, X>
where
    X: TabulaExtractor,
{
    fn extract(&self, pdf_path: &Path, pages: PageRange) -> Result<Vec<RawFragment>> {
        let table_set = self
            .extractor
            .extract_tables(TabulaExtractionRequest {
                pdf_path: pdf_path.to_owned(),
                pages: pages.pages().collect(),
                guess: false,
                layout: self.layout,
            })
            .with_context(|| format!("extracting {} tables from pages {}", self.layout, pages))?;

        log::debug!(
            "Tabula found {} {} tables across {} pages ({})",
            table_set.0.len(),
            self.layout,
            pages.page_count(),
            pages
        );

        Ok(table_set
            .0
            .into_iter()
            .map(|table| self.to_fragment(table))
            .collect())
    }
}
