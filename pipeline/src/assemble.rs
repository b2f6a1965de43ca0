//! Turns the data rows of a mapped fragment into provisional records.

use std::collections::BTreeMap;

use crate::{
    columns::{CanonicalKey, ColumnKey, MappedFragment},
    fragment::Row,
    nutrient::NutrientKey,
    record::{FoodCode, ProvisionalRecord},
};

/// Raw column holding the code candidate.
const CODE_COLUMN: usize = 0;
/// Raw column holding the name candidate where the row has a code.
const NAME_COLUMN: usize = 1;
/// First raw column attributed through the column mapping.
const FIRST_NUTRIENT_COLUMN: usize = 2;

/// Assembles a provisional record from each data row of `fragment`.
///
/// A row without a valid code is a continuation row. It takes its name from the code column and
/// inherits the code of the nearest preceding row in the fragment that had one.
pub fn assemble_records(fragment: &MappedFragment) -> Vec<ProvisionalRecord> {
    let nutrient_columns = fragment.mapping.nutrient_columns(FIRST_NUTRIENT_COLUMN);

    fragment
        .data_rows
        .iter()
        .scan(None::<FoodCode>, |current_code, row| {
            let own_code = FoodCode::from_cell(row.cell(CODE_COLUMN));
            let food_name_english = match own_code {
                Some(_) => row.cell(NAME_COLUMN),
                None => row.cell(CODE_COLUMN),
            }
            .to_string();
            if own_code.is_some() {
                *current_code = own_code;
            }

            let mut record = ProvisionalRecord {
                food_code: current_code.clone(),
                food_name_english,
                page: fragment.page,
                ..Default::default()
            };
            for (position, key) in &nutrient_columns {
                record
                    .nutrient_cells
                    .insert(*key, row.cell(*position).to_string());
            }
            record.unknown_cells = unknown_cells(fragment, row, &nutrient_columns);

            Some(record)
        })
        .collect()
}

fn unknown_cells(
    fragment: &MappedFragment,
    row: &Row,
    nutrient_columns: &[(usize, NutrientKey)],
) -> BTreeMap<usize, String> {
    (FIRST_NUTRIENT_COLUMN..row.len())
        .filter(|position| match fragment.mapping.get(*position) {
            ColumnKey::Unknown(_) => true,
            ColumnKey::Canonical(CanonicalKey::Nutrient(_)) => {
                !nutrient_columns.iter().any(|(used, _)| used == position)
            }
            // Identity columns only count in their raw positions.
            ColumnKey::Canonical(_) => false,
        })
        .map(|position| (position, row.cell(position).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use testutils::grid;

    use super::*;
    use crate::{
        columns::{ColumnRules, map_columns},
        fragment::{RawFragment, TableLayout},
    };

    fn mapped(rows: &[&[&str]]) -> MappedFragment {
        let fragment = RawFragment::new(TableLayout::Lattice, Some(31), grid(rows));
        map_columns(fragment, 0, &ColumnRules::default())
    }

    fn codes(records: &[ProvisionalRecord]) -> Vec<Option<String>> {
        records
            .iter()
            .map(|record| record.food_code.as_ref().map(FoodCode::to_string))
            .collect()
    }

    #[gtest]
    fn forward_fills_codes_for_continuation_rows() {
        let records = assemble_records(&mapped(&[
            &["Code", "Food", "Energy", "Protein"],
            &["A1", "Maize", "350", "9.4"],
            &["flour, white", "", "", ""],
            &["A2", "Rice", "360", "7"],
        ]));

        expect_that!(
            codes(&records),
            elements_are![
                eq(&Some("A1".to_string())),
                eq(&Some("A1".to_string())),
                eq(&Some("A2".to_string())),
            ]
        );
        expect_that!(records[1].food_name_english, eq("flour, white"));
        expect_that!(records[2].food_name_english, eq("Rice"));
    }

    #[gtest]
    fn leading_continuation_rows_have_no_code() {
        let records = assemble_records(&mapped(&[
            &["Code", "Food", "Energy"],
            &["(continued)", "", ""],
            &["B3", "Cassava", "150"],
        ]));

        expect_that!(
            codes(&records),
            elements_are![eq(&None::<String>), eq(&Some("B3".to_string()))]
        );
    }

    #[gtest]
    fn attributes_nutrient_and_unknown_cells() {
        let records = assemble_records(&mapped(&[
            &["Code", "Food", "Water", "Protein", "Protein (g)", "Iron"],
            &["A1", "Maize", "12", "9.4 tr", "99", "2.1"],
        ]));

        expect_eq!(records.len(), 1);
        let record = &records[0];
        expect_eq!(record.nutrient_cell(NutrientKey::ProteinG), Some("9.4 tr"));
        expect_eq!(record.nutrient_cell(NutrientKey::IronMg), Some("2.1"));
        expect_eq!(record.nutrient_cell(NutrientKey::FatG), None);
        expect_that!(
            record.unknown_cells.keys().copied().collect::<Vec<_>>(),
            elements_are![eq(&2), eq(&4)]
        );
        expect_eq!(record.page, Some(31));
    }

    #[gtest]
    fn code_column_ignores_mapping() {
        let records = assemble_records(&mapped(&[
            &["Food", "Code", "Energy"],
            &["G2", "Chicken", "160"],
        ]));

        expect_eq!(codes(&records), vec![Some("G2".to_string())]);
        expect_that!(records[0].food_name_english, eq("Chicken"));
    }
}
