//! Classifies foods by the leading letter of their code.

use std::collections::BTreeMap;

use crate::record::FoodCode;

pub const UNCATEGORIZED: &str = "Uncategorized";

/// Immutable mapping from the leading letter of a food code to a category name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CategoryTable(BTreeMap<char, String>);

impl CategoryTable {
    pub fn new(categories: BTreeMap<char, String>) -> Self {
        Self(categories)
    }

    /// Returns the category of `code`, or [UNCATEGORIZED] if its leading character has none.
    pub fn categorize(&self, code: Option<&FoodCode>) -> &str {
        code.and_then(FoodCode::leading_char)
            .and_then(|letter| self.0.get(&letter))
            .map_or(UNCATEGORIZED, String::as_str)
    }
}

impl Default for CategoryTable {
    /// The food groups of the Kenya Food Composition Tables.
    fn default() -> Self {
        let groups = [
            ('A', "Cereals and their products"),
            ('B', "Starchy roots, tubers, and their products"),
            ('C', "Legumes, and their products"),
            ('D', "Nuts, seeds and their products"),
            ('E', "Vegetables and their products"),
            ('F', "Fruits and their products"),
            ('G', "Meat, poultry and their products"),
            ('H', "Fish, other aquatic animals and their products"),
            ('J', "Milk, milk products and eggs"),
            ('K', "Oils and fats"),
            ('L', "Beverages"),
            ('M', "Spices and condiments"),
            ('N', "Miscellaneous"),
            ('P', "Infant foods"),
            ('S', "Foods for special dietary use"),
        ];
        Self(
            groups
                .into_iter()
                .map(|(letter, name)| (letter, name.to_string()))
                .collect(),
        )
    }
}
