//! Maps raw header labels onto canonical column keys with an ordered table of substring rules.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{fragment::RawFragment, fragment::Row, nutrient::NutrientKey};

/// Key that a column can be identified as.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum CanonicalKey {
    FoodCode,
    FoodNameEnglish,
    Nutrient(NutrientKey),
}

impl CanonicalKey {
    pub const FOOD_CODE: &str = "food_code";
    pub const FOOD_NAME_ENGLISH: &str = "food_name_english";
}

impl FromStr for CanonicalKey {
    type Err = UnknownKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::FOOD_CODE => Ok(Self::FoodCode),
            Self::FOOD_NAME_ENGLISH => Ok(Self::FoodNameEnglish),
            other => NutrientKey::from_str(other)
                .map(Self::Nutrient)
                .map_err(|_| UnknownKeyError(other.to_string())),
        }
    }
}

impl TryFrom<String> for CanonicalKey {
    type Error = UnknownKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CanonicalKey> for String {
    fn from(value: CanonicalKey) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanonicalKey::FoodCode => f.write_str(Self::FOOD_CODE),
            CanonicalKey::FoodNameEnglish => f.write_str(Self::FOOD_NAME_ENGLISH),
            CanonicalKey::Nutrient(key) => f.write_str(key.as_ref()),
        }
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("{0:?} is not a canonical column key")]
pub struct UnknownKeyError(pub String);

/// Identity of a single column within a fragment.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColumnKey {
    Canonical(CanonicalKey),
    /// Column whose label matched no rule, tagged with its position.
    Unknown(usize),
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKey::Canonical(key) => key.fmt(f),
            ColumnKey::Unknown(position) => write!(f, "unknown_{position}"),
        }
    }
}

/// Identifies a column as `key` if its case-folded label contains `pattern`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnRule {
    pub pattern: String,
    pub key: CanonicalKey,
}

/// Ordered rules, where the first matching rule wins.
///
/// More specific patterns must precede shorter ones that they contain, otherwise the shorter
/// pattern shadows them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnRules(pub Vec<ColumnRule>);

impl ColumnRules {
    /// Returns the key of the first rule matching `label`.
    pub fn identify(&self, label: &str) -> Option<CanonicalKey> {
        let label = label.to_lowercase();
        self.0
            .iter()
            .find(|rule| label.contains(rule.pattern.as_str()))
            .map(|rule| rule.key)
    }

    /// Returns a description of the first rule that can never match because an earlier rule's
    /// pattern is contained within its own and maps to a different key.
    pub fn find_shadowed(&self) -> Option<String> {
        self.0.iter().enumerate().find_map(|(i, rule)| {
            self.0[..i]
                .iter()
                .find(|earlier| rule.pattern.contains(earlier.pattern.as_str()) && earlier.key != rule.key)
                .map(|earlier| {
                    format!(
                        "rule {:?} => {} is shadowed by earlier rule {:?} => {}",
                        rule.pattern, rule.key, earlier.pattern, earlier.key
                    )
                })
        })
    }
}

impl Default for ColumnRules {
    fn default() -> Self {
        use CanonicalKey::*;
        use NutrientKey::*;
        let rules: &[(&str, CanonicalKey)] = &[
            ("code", FoodCode),
            ("food", FoodNameEnglish),
            ("energy", Nutrient(EnergyKcal)),
            ("protein", Nutrient(ProteinG)),
            ("fat", Nutrient(FatG)),
            ("carbohydrate", Nutrient(CarbsG)),
            ("fibre", Nutrient(FibreG)),
            ("fiber", Nutrient(FibreG)),
            ("ca", Nutrient(CalciumMg)),
            ("calcium", Nutrient(CalciumMg)),
            ("fe", Nutrient(IronMg)),
            ("iron", Nutrient(IronMg)),
            ("zn", Nutrient(ZincMg)),
            ("zinc", Nutrient(ZincMg)),
            ("vitamin a", Nutrient(VitARaeMcg)),
            ("vit a", Nutrient(VitARaeMcg)),
            ("retinol", Nutrient(VitARaeMcg)),
            ("thiamin", Nutrient(ThiaminMg)),
            ("riboflavin", Nutrient(RiboflavinMg)),
            ("niacin", Nutrient(NiacinMg)),
            ("vitamin c", Nutrient(VitCMg)),
            ("vit c", Nutrient(VitCMg)),
        ];
        Self(
            rules
                .iter()
                .map(|&(pattern, key)| ColumnRule {
                    pattern: pattern.to_string(),
                    key,
                })
                .collect(),
        )
    }
}

/// Positional identity of every column of a fragment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ColumnMapping(pub Vec<ColumnKey>);

impl ColumnMapping {
    /// Builds the mapping from the labels in `header`.
    pub fn from_header(header: &Row, rules: &ColumnRules) -> Self {
        Self(
            header
                .iter()
                .enumerate()
                .map(|(position, label)| match rules.identify(label) {
                    Some(key) => ColumnKey::Canonical(key),
                    None => {
                        log::debug!("column {position} label {label:?} matched no rule");
                        ColumnKey::Unknown(position)
                    }
                })
                .collect(),
        )
    }

    pub fn get(&self, position: usize) -> ColumnKey {
        self.0
            .get(position)
            .copied()
            .unwrap_or(ColumnKey::Unknown(position))
    }

    /// Returns the nutrient columns as `(position, key)`, using the left-most column for any key
    /// that more than one column maps to.
    pub fn nutrient_columns(&self, from_position: usize) -> Vec<(usize, NutrientKey)> {
        let mut columns: Vec<(usize, NutrientKey)> = Vec::new();
        for (position, column_key) in self.0.iter().enumerate().skip(from_position) {
            if let ColumnKey::Canonical(CanonicalKey::Nutrient(key)) = column_key {
                if columns.iter().any(|(_, seen)| seen == key) {
                    log::debug!("column {position} duplicates the {key} column, ignoring it");
                    continue;
                }
                columns.push((position, *key));
            }
        }
        columns
    }
}

/// Rows of a fragment below its header row, with the mapping built from that header row.
#[derive(Debug)]
pub struct MappedFragment {
    pub page: Option<i32>,
    pub mapping: ColumnMapping,
    pub data_rows: Vec<Row>,
}

/// Builds the [ColumnMapping] of `fragment` from the row at `header_index`, and drops that row and
/// all above it.
pub fn map_columns(fragment: RawFragment, header_index: usize, rules: &ColumnRules) -> MappedFragment {
    let mapping = fragment
        .rows
        .get(header_index)
        .map(|header| ColumnMapping::from_header(header, rules))
        .unwrap_or_else(|| ColumnMapping(Vec::new()));

    let data_rows = fragment.rows.into_iter().skip(header_index + 1).collect();

    MappedFragment {
        page: fragment.page,
        mapping,
        data_rows,
    }
}
