//! Removes header leaks, degenerate rows and duplicates from the combined records.

use hashbrown::HashSet;

use crate::{
    nutrient::NutrientKey,
    record::{FoodRecord, NormalizedRecord},
};

/// Names must be longer than this many characters, after trimming.
const MIN_NAME_CHARS: usize = 2;

/// Number of records dropped for each reason.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct DropCounts {
    /// Repeated header rows, detected by a protein cell that reads "protein".
    pub header_leaks: usize,
    pub missing_code: usize,
    pub short_name: usize,
    pub duplicates: usize,
}

impl DropCounts {
    pub fn total(&self) -> usize {
        self.header_leaks + self.missing_code + self.short_name + self.duplicates
    }
}

#[derive(Debug)]
pub struct Deduplicated {
    pub records: Vec<FoodRecord>,
    pub dropped: DropCounts,
}

/// Filters `records` down to valid, unique [FoodRecord]s, retaining the first of any records that
/// share a code and name.
pub fn deduplicate(records: Vec<NormalizedRecord>) -> Deduplicated {
    let mut dropped = DropCounts::default();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut kept = Vec::with_capacity(records.len());

    for record in records {
        if is_header_leak(&record) {
            dropped.header_leaks += 1;
            continue;
        }

        let NormalizedRecord {
            provisional,
            nutrients,
            category,
        } = record;

        let Some(food_code) = provisional.food_code else {
            dropped.missing_code += 1;
            continue;
        };
        if provisional.food_name_english.trim().chars().count() <= MIN_NAME_CHARS {
            dropped.short_name += 1;
            continue;
        }

        let key = (
            food_code.as_str().to_string(),
            provisional.food_name_english.clone(),
        );
        if !seen.insert(key) {
            dropped.duplicates += 1;
            continue;
        }

        kept.push(FoodRecord {
            food_code,
            food_name_english: provisional.food_name_english,
            category,
            nutrients,
        });
    }

    log::info!(
        "kept {} records; dropped {} header leaks, {} without code, {} with short names, {} duplicates",
        kept.len(),
        dropped.header_leaks,
        dropped.missing_code,
        dropped.short_name,
        dropped.duplicates,
    );

    Deduplicated {
        records: kept,
        dropped,
    }
}

fn is_header_leak(record: &NormalizedRecord) -> bool {
    record
        .provisional
        .nutrient_cell(NutrientKey::ProteinG)
        .is_some_and(|cell| cell.to_lowercase().contains("protein"))
}
