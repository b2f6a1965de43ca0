//! Raw table fragments, as read from the source document.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

/// Table layout that a fragment was extracted as.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableLayout {
    /// Bordered tables, where ruling lines delimit cells.
    Lattice,
    /// Tables delimited by whitespace alignment only.
    Stream,
}

impl TableLayout {
    pub fn to_tabula_extraction_method(self) -> tabula::ExtractionMethod {
        match self {
            TableLayout::Lattice => tabula::ExtractionMethod::Spreadsheet,
            TableLayout::Stream => tabula::ExtractionMethod::Basic,
        }
    }
}

impl std::fmt::Display for TableLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableLayout::Lattice => write!(f, "lattice"),
            TableLayout::Stream => write!(f, "stream"),
        }
    }
}

/// One ragged grid of cell text from a single region of the source document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawFragment {
    /// One-based page number that the fragment was found on, if known.
    pub page: Option<i32>,
    pub layout: TableLayout,
    pub rows: Vec<Row>,
}

impl RawFragment {
    pub fn new<R>(layout: TableLayout, page: Option<i32>, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: Into<Row>,
    {
        Self {
            page,
            layout,
            rows: rows.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of cells in the widest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    /// Returns the text of the given cell, treating absent cells as empty.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|row| row.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Row(pub Vec<String>);

impl Row {
    /// Returns the text of the given cell, treating absent cells as empty.
    pub fn cell(&self, column: usize) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    /// Returns `true` if every cell is empty (or the row has no cells).
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }
}

impl Deref for Row {
    type Target = Vec<String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S: Into<String>> From<Vec<S>> for Row {
    fn from(value: Vec<S>) -> Self {
        value.into_iter().collect()
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Row {
    fn from(value: [S; N]) -> Self {
        value.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Row(iter.into_iter().map(Into::into).collect())
    }
}
