//! Sums nutrient content across a selection of foods.

use crate::{dataset::Dataset, nutrient::NutrientValues};

/// Per 100 g nutrient totals of a selection of foods.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NutrientTotals {
    pub totals: NutrientValues,
    /// Names that were found in the dataset, in the order given.
    pub matched: Vec<String>,
    /// Names with no record in the dataset.
    pub unknown: Vec<String>,
}

pub struct NutrientCalculator<'a> {
    dataset: &'a Dataset,
}

impl<'a> NutrientCalculator<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Adds up the nutrients of 100 g of each named food. A name that appears more than once is
    /// counted each time.
    pub fn totals<I, S>(&self, food_names: I) -> NutrientTotals
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = NutrientTotals::default();
        for name in food_names {
            let name = name.as_ref();
            match self.dataset.find_by_name(name) {
                Some(record) => {
                    result.totals.accumulate(&record.nutrients);
                    result.matched.push(name.to_string());
                }
                None => {
                    log::warn!("no food named {name:?} in the dataset");
                    result.unknown.push(name.to_string());
                }
            }
        }
        result
    }
}
