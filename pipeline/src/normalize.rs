//! Parses raw nutrient cells into numbers.

use strum::IntoEnumIterator;

use crate::{
    category::CategoryTable,
    nutrient::{NutrientKey, NutrientValues},
    record::{NormalizedRecord, ProvisionalRecord},
};

/// Returns the first decimal number within `cell`, or `0` if it has none.
///
/// Footnote markers such as `tr` or `*` around the number are ignored. Only ASCII digits form
/// numbers, and a number too large to represent reads as `0`.
pub fn extract_number(cell: &str) -> f64 {
    lazy_regex::regex_find!(r"[0-9]+\.?[0-9]*", cell)
        .map(|token| token.trim_end_matches('.'))
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parses every nutrient of `record`, treating absent columns as zero, and assigns its category.
pub fn normalize_record(record: ProvisionalRecord, categories: &CategoryTable) -> NormalizedRecord {
    let nutrients = NutrientKey::iter()
        .map(|key| (key, record.nutrient_cell(key).map_or(0.0, extract_number)))
        .collect::<NutrientValues>();
    let category = categories.categorize(record.food_code.as_ref()).to_string();

    NormalizedRecord {
        provisional: record,
        nutrients,
        category,
    }
}
