//! The final dataset of food records, and its CSV form.

use std::{
    collections::BTreeSet,
    io::{Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::{
    nutrient::{NutrientKey, NutrientValues},
    record::{FoodCode, FoodRecord},
};

/// Leading columns of the dataset CSV, followed by one column per [NutrientKey].
pub const IDENTITY_COLUMNS: [&str; 3] = ["food_code", "food_name_english", "category"];

/// Returns the full header row of the dataset CSV.
pub fn csv_header() -> Vec<String> {
    IDENTITY_COLUMNS
        .iter()
        .map(|name| name.to_string())
        .chain(NutrientKey::iter().map(|key| key.to_string()))
        .collect()
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset header is {found:?}, expected {expected:?}")]
    UnexpectedHeader {
        found: Vec<String>,
        expected: Vec<String>,
    },
    #[error("record {record} has negative {key} value {value}")]
    NegativeValue {
        record: usize,
        key: NutrientKey,
        value: String,
    },
}

/// Ordered, de-duplicated food records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    records: Vec<FoodRecord>,
}

impl Dataset {
    pub fn new(records: Vec<FoodRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FoodRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, distinct names of every food in the dataset.
    pub fn distinct_food_names(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.food_name_english.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Returns the first record with the given name.
    pub fn find_by_name(&self, food_name_english: &str) -> Option<&FoodRecord> {
        self.records
            .iter()
            .find(|record| record.food_name_english == food_name_english)
    }

    /// Writes the dataset as CSV to `path`, replacing any existing file only once the whole
    /// dataset has been written.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut csv_file = AtomicWriteFile::open(path)
            .with_context(|| format!("opening {:?} for writing", path))?;
        self.write_csv_to(&mut csv_file)?;
        csv_file.commit().context("committing CSV file")?;
        Ok(())
    }

    fn write_csv_to<W: Write>(&self, w: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(w);

        csv_writer
            .write_record(csv_header())
            .context("writing CSV header")?;
        for (index, record) in self.records.iter().enumerate() {
            csv_writer
                .serialize(CsvRecord::from(record))
                .with_context(|| format!("writing record {index}"))?;
        }

        // Check for error rather than implicitly flushing and ignoring.
        csv_writer.flush().context("flushing to CSV")?;
        Ok(())
    }

    /// Loads a dataset previously written by [Dataset::write_csv].
    pub fn load(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening dataset file {:?}", path))?;
        Self::load_from_read(file).with_context(|| format!("loading dataset file {:?}", path))
    }

    fn load_from_read<R: Read>(r: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(r);

        let expected = csv_header();
        let found: Vec<String> = reader
            .headers()
            .context("reading CSV header")?
            .iter()
            .map(str::to_string)
            .collect();
        if found != expected {
            return Err(DatasetError::UnexpectedHeader { found, expected }.into());
        }

        let records = reader
            .deserialize::<CsvRecord>()
            .enumerate()
            .map(|(index, result)| {
                let csv_record = result.with_context(|| format!("reading record {index}"))?;
                csv_record
                    .into_food_record(index)
                    .with_context(|| format!("converting record {index}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { records })
    }
}

/// Serialized form of a [FoodRecord], in dataset column order.
#[derive(Debug, Deserialize, Serialize)]
struct CsvRecord {
    food_code: String,
    food_name_english: String,
    category: String,
    #[serde(serialize_with = "plain_decimal")]
    energy_kcal: f64,
    #[serde(serialize_with = "plain_decimal")]
    protein_g: f64,
    #[serde(serialize_with = "plain_decimal")]
    fat_g: f64,
    #[serde(serialize_with = "plain_decimal")]
    carbs_g: f64,
    #[serde(serialize_with = "plain_decimal")]
    fibre_g: f64,
    #[serde(serialize_with = "plain_decimal")]
    calcium_mg: f64,
    #[serde(serialize_with = "plain_decimal")]
    iron_mg: f64,
    #[serde(serialize_with = "plain_decimal")]
    zinc_mg: f64,
    #[serde(serialize_with = "plain_decimal")]
    vit_a_rae_mcg: f64,
    #[serde(serialize_with = "plain_decimal")]
    thiamin_mg: f64,
    #[serde(serialize_with = "plain_decimal")]
    riboflavin_mg: f64,
    #[serde(serialize_with = "plain_decimal")]
    niacin_mg: f64,
    #[serde(serialize_with = "plain_decimal")]
    vit_c_mg: f64,
}

/// Writes `value` in positional notation with at least one fractional digit, as in `7.0` or
/// `0.000001`, never in exponent form.
fn plain_decimal<S>(value: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let mut text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        text.push_str(".0");
    }
    serializer.serialize_str(&text)
}

impl CsvRecord {
    fn nutrients(&self) -> NutrientValues {
        use NutrientKey::*;
        [
            (EnergyKcal, self.energy_kcal),
            (ProteinG, self.protein_g),
            (FatG, self.fat_g),
            (CarbsG, self.carbs_g),
            (FibreG, self.fibre_g),
            (CalciumMg, self.calcium_mg),
            (IronMg, self.iron_mg),
            (ZincMg, self.zinc_mg),
            (VitARaeMcg, self.vit_a_rae_mcg),
            (ThiaminMg, self.thiamin_mg),
            (RiboflavinMg, self.riboflavin_mg),
            (NiacinMg, self.niacin_mg),
            (VitCMg, self.vit_c_mg),
        ]
        .into_iter()
        .collect()
    }

    fn into_food_record(self, index: usize) -> Result<FoodRecord> {
        let nutrients = self.nutrients();
        if let Some((key, value)) = nutrients.iter().find(|(_, value)| *value < 0.0) {
            return Err(DatasetError::NegativeValue {
                record: index,
                key,
                value: value.to_string(),
            }
            .into());
        }

        Ok(FoodRecord {
            food_code: FoodCode::try_from(self.food_code)?,
            food_name_english: self.food_name_english,
            category: self.category,
            nutrients,
        })
    }
}

impl From<&FoodRecord> for CsvRecord {
    fn from(record: &FoodRecord) -> Self {
        use NutrientKey::*;
        let n = &record.nutrients;
        Self {
            food_code: record.food_code.to_string(),
            food_name_english: record.food_name_english.clone(),
            category: record.category.clone(),
            energy_kcal: n.get(EnergyKcal),
            protein_g: n.get(ProteinG),
            fat_g: n.get(FatG),
            carbs_g: n.get(CarbsG),
            fibre_g: n.get(FibreG),
            calcium_mg: n.get(CalciumMg),
            iron_mg: n.get(IronMg),
            zinc_mg: n.get(ZincMg),
            vit_a_rae_mcg: n.get(VitARaeMcg),
            thiamin_mg: n.get(ThiaminMg),
            riboflavin_mg: n.get(RiboflavinMg),
            niacin_mg: n.get(NiacinMg),
            vit_c_mg: n.get(VitCMg),
        }
    }
}
