//! Sources of raw table fragments.

pub mod tabula_pdf;

use std::{ops::RangeInclusive, path::Path, str::FromStr};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::fragment::RawFragment;

/// Extracts the raw table fragments found within a range of pages of a document.
///
/// Implementations treat the table detection itself as opaque. The caller decides what a
/// failure means for the overall extraction.
pub trait FragmentSource {
    fn extract(&self, pdf_path: &Path, pages: PageRange) -> Result<Vec<RawFragment>>;
}

/// Inclusive range of one-based page numbers, written as `<first>-<last>`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageRange {
    first: i32,
    last: i32,
}

impl PageRange {
    pub fn new(first: i32, last: i32) -> Result<Self, PageRangeError> {
        if first < 1 {
            return Err(PageRangeError::NotOneBased(first));
        }
        if last < first {
            return Err(PageRangeError::Reversed { first, last });
        }
        Ok(Self { first, last })
    }

    pub fn pages(&self) -> RangeInclusive<i32> {
        self.first..=self.last
    }

    pub fn page_count(&self) -> usize {
        (self.last - self.first + 1) as usize
    }

    /// Returns `true` if every page of `other` is within `self`.
    pub fn contains_range(&self, other: &PageRange) -> bool {
        self.first <= other.first && other.last <= self.last
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PageRangeError {
    #[error("{0:?} is not a page range of the form <first>-<last>")]
    Malformed(String),
    #[error("page numbers start at 1, got {0}")]
    NotOneBased(i32),
    #[error("page range ends at {last} before it starts at {first}")]
    Reversed { first: i32, last: i32 },
}

impl FromStr for PageRange {
    type Err = PageRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PageRangeError::Malformed(s.to_string());
        let (first, last) = lazy_regex::regex_captures!(r"^\s*(\d+)\s*-\s*(\d+)\s*$", s)
            .map(|(_, first, last)| (first, last))
            .ok_or_else(malformed)?;
        Self::new(
            first.parse().map_err(|_| malformed())?,
            last.parse().map_err(|_| malformed())?,
        )
    }
}

impl TryFrom<String> for PageRange {
    type Error = PageRangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PageRange> for String {
    fn from(value: PageRange) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[gtest]
    fn parses_page_range() {
        let range: std::result::Result<PageRange, _> = "30-37".parse();
        expect_eq!(range.clone().map(|r| r.to_string()), Ok("30-37".to_string()));
        expect_eq!(range.map(|r| r.page_count()), Ok(8));
        expect_eq!(" 29 - 202 ".parse::<PageRange>(), PageRange::new(29, 202));
    }

    #[gtest]
    fn rejects_invalid_page_ranges() {
        expect_eq!(
            "30".parse::<PageRange>(),
            Err(PageRangeError::Malformed("30".into()))
        );
        expect_eq!(
            "0-3".parse::<PageRange>(),
            Err(PageRangeError::NotOneBased(0))
        );
        expect_eq!(
            "37-30".parse::<PageRange>(),
            Err(PageRangeError::Reversed {
                first: 37,
                last: 30
            })
        );
    }

    #[gtest]
    fn checks_containment() -> anyhow::Result<()> {
        let full = PageRange::new(29, 202)?;
        expect_true!(full.contains_range(&PageRange::new(30, 37)?));
        expect_false!(full.contains_range(&PageRange::new(28, 37)?));
        Ok(())
    }
}
