//! Food records, from the provisional rows assembled out of a fragment to the final dataset rows.

use std::collections::BTreeMap;

use crate::nutrient::{NutrientKey, NutrientValues};

#[derive(Debug, thiserror::Error)]
#[error("got {value:?} which is not {expected}")]
pub struct ValueError<V> {
    pub value: V,
    pub expected: &'static str,
}

/// Identifier of a food within the composition tables, such as `A12` or `1034`.
///
/// The leading letter, when present, identifies the food's category.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FoodCode(String);

impl FoodCode {
    const EXPECTED: &str = r#"a food code matching ^[A-Z]?[0-9]{1,4}$"#;

    fn valid_regex() -> &'static lazy_regex::Regex {
        lazy_regex::regex!(r#"^[A-Z]?[0-9]{1,4}$"#)
    }

    /// Parses the trimmed text of a cell as a food code, returning [None] if it is not one.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        Self::valid_regex()
            .is_match(cell)
            .then(|| Self(cell.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The leading character of the code.
    pub fn leading_char(&self) -> Option<char> {
        self.0.chars().next()
    }
}

impl TryFrom<String> for FoodCode {
    type Error = ValueError<String>;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::valid_regex().is_match(&value) {
            Ok(Self(value))
        } else {
            Err(ValueError {
                value,
                expected: Self::EXPECTED,
            })
        }
    }
}

impl std::fmt::Display for FoodCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A row assembled from a fragment, with its nutrient cells still as raw text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProvisionalRecord {
    /// Code of the row, or inherited from the nearest preceding row with one.
    pub food_code: Option<FoodCode>,
    pub food_name_english: String,
    /// Unparsed nutrient cells, by the column they were mapped to.
    pub nutrient_cells: BTreeMap<NutrientKey, String>,
    /// Cells of unmapped columns, by position within the fragment.
    pub unknown_cells: BTreeMap<usize, String>,
    /// Page of the fragment that the row came from.
    pub page: Option<i32>,
}

impl ProvisionalRecord {
    pub fn nutrient_cell(&self, key: NutrientKey) -> Option<&str> {
        self.nutrient_cells.get(&key).map(String::as_str)
    }
}

/// A provisional record with its nutrient values parsed and its category assigned.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedRecord {
    pub provisional: ProvisionalRecord,
    pub nutrients: NutrientValues,
    pub category: String,
}

/// Final unit of the dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct FoodRecord {
    pub food_code: FoodCode,
    pub food_name_english: String,
    pub category: String,
    pub nutrients: NutrientValues,
}
