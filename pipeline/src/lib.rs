//! Extraction of the Kenya Food Composition Tables into a typed, de-duplicated dataset.
//!
//! Table fragments from a [source::FragmentSource] pass through each stage in turn:
//! [clean], [header], [columns], [assemble], [normalize] (which applies [category]), and
//! finally [dedupe] over the records of every fragment. [extract::Extractor] drives the stages
//! and writes the resulting [dataset::Dataset].

pub mod assemble;
pub mod calculator;
pub mod category;
pub mod clean;
pub mod columns;
pub mod config;
pub mod dataset;
pub mod dedupe;
pub mod extract;
pub mod fragment;
pub mod header;
pub mod normalize;
pub mod nutrient;
pub mod record;
pub mod source;
