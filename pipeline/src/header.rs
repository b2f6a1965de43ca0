//! Locates the column header row of a cleaned fragment.

use crate::fragment::RawFragment;

/// Terms that must all appear within a row for it to be taken as the header row.
pub const DEFAULT_ANCHORS: &[&str] = &["food", "protein", "energy"];

/// Position of the row judged to hold the column labels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HeaderRow {
    pub index: usize,
    /// `false` when no row qualified and row 0 was assumed.
    pub found: bool,
}

/// Returns the first row of `fragment` whose case-folded text contains every one of `anchors`,
/// or row 0 if there is none.
pub fn locate_header<S>(fragment: &RawFragment, anchors: &[S]) -> HeaderRow
where
    S: AsRef<str>,
{
    let found = fragment.rows.iter().position(|row| {
        let row_text = row
            .iter()
            .map(|cell| cell.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        anchors
            .iter()
            .all(|anchor| row_text.contains(anchor.as_ref()))
    });

    match found {
        Some(index) => HeaderRow { index, found: true },
        None => {
            log::debug!(
                "no header row found in fragment from page {:?}, assuming row 0",
                fragment.page
            );
            HeaderRow {
                index: 0,
                found: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use testutils::grid;

    use super::*;
    use crate::fragment::TableLayout;

    fn fragment(rows: &[&[&str]]) -> RawFragment {
        RawFragment::new(TableLayout::Lattice, Some(30), grid(rows))
    }

    #[gtest]
    fn finds_row_with_all_anchors() {
        let fragment = fragment(&[
            &["KENYA FOOD COMPOSITION TABLES", "", "", ""],
            &["Cereals", "", "", ""],
            &["Food Code", "Food", "Energy", "Protein"],
            &["A1", "Maize, white", "350", "9.4"],
        ]);

        expect_that!(
            locate_header(&fragment, DEFAULT_ANCHORS),
            eq(HeaderRow {
                index: 2,
                found: true
            })
        );
    }

    #[gtest]
    fn anchors_may_span_cells() {
        let fragment = fragment(&[
            &["A1", "Maize, white", "350"],
            &["FOOD NAME", "ENERGY kcal", "PROTEIN g"],
        ]);

        expect_that!(locate_header(&fragment, DEFAULT_ANCHORS).index, eq(1));
    }

    #[gtest]
    fn falls_back_to_first_row() {
        let fragment = fragment(&[
            &["Food Code", "Food", "Energy"],
            &["A1", "Maize", "350"],
            &["Protein", "", ""],
        ]);

        expect_that!(
            locate_header(&fragment, DEFAULT_ANCHORS),
            eq(HeaderRow {
                index: 0,
                found: false
            })
        );
    }

    #[gtest]
    fn empty_fragment_falls_back_to_first_row() {
        expect_that!(locate_header(&fragment(&[]), DEFAULT_ANCHORS).index, eq(0));
    }

    #[gtest]
    fn uses_given_anchors() {
        let fragment = fragment(&[&["Food", "Energy", "Protein"], &["Item", "Kcal"]]);

        expect_that!(locate_header(&fragment, &["item", "kcal"]).index, eq(1));
    }
}
