//! The fixed set of nutrients carried by every food record.

use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

/// Canonical nutrient column. Every value is the content per 100 g of edible food.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    strum_macros::AsRefStr,
    strum_macros::Display,
    strum_macros::EnumCount,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NutrientKey {
    EnergyKcal,
    ProteinG,
    FatG,
    CarbsG,
    FibreG,
    CalciumMg,
    IronMg,
    ZincMg,
    VitARaeMcg,
    ThiaminMg,
    RiboflavinMg,
    NiacinMg,
    VitCMg,
}

impl NutrientKey {
    /// Position of the key within [NutrientKey::iter] order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit that values of this nutrient are measured in.
    pub fn unit(self) -> &'static str {
        use NutrientKey::*;
        match self {
            EnergyKcal => "kcal",
            ProteinG | FatG | CarbsG | FibreG => "g",
            CalciumMg | IronMg | ZincMg | ThiaminMg | RiboflavinMg | NiacinMg | VitCMg => "mg",
            VitARaeMcg => "mcg",
        }
    }
}

/// One numeric value per [NutrientKey].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NutrientValues([f64; NutrientKey::COUNT]);

impl NutrientValues {
    pub fn get(&self, key: NutrientKey) -> f64 {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: NutrientKey, value: f64) {
        self.0[key.index()] = value;
    }

    /// Iterates over every key and its value, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::iter().map(|key| (key, self.get(key)))
    }

    /// Adds each value of `other` to the respective value of `self`.
    pub fn accumulate(&mut self, other: &NutrientValues) {
        for (total, value) in self.0.iter_mut().zip(other.0.iter()) {
            *total += value;
        }
    }
}

impl FromIterator<(NutrientKey, f64)> for NutrientValues {
    fn from_iter<T: IntoIterator<Item = (NutrientKey, f64)>>(iter: T) -> Self {
        let mut values = Self::default();
        for (key, value) in iter {
            values.set(key, value);
        }
        values
    }
}
