//! Normalises the cells of a raw fragment and removes empty rows and columns.

use lazy_regex::regex_replace_all;

use crate::fragment::{RawFragment, Row};

/// Cleans a single fragment. Applying this to an already cleaned fragment returns it unchanged.
pub fn clean_fragment(mut fragment: RawFragment) -> RawFragment {
    for row in fragment.rows.iter_mut() {
        for cell in row.iter_mut() {
            clean_text(cell);
        }
    }

    fragment.rows.retain(|row| !row.is_blank());

    let width = fragment.width();
    for row in fragment.rows.iter_mut() {
        row.resize(width, String::new());
    }

    let keep_columns: Vec<bool> = (0..width)
        .map(|column| fragment.rows.iter().any(|row| !row[column].is_empty()))
        .collect();
    if keep_columns.iter().all(|&keep| keep) {
        return fragment;
    }

    fragment.rows = fragment
        .rows
        .into_iter()
        .map(|row| {
            row.0
                .into_iter()
                .zip(keep_columns.iter())
                .filter_map(|(cell, &keep)| keep.then_some(cell))
                .collect::<Row>()
        })
        .collect();

    fragment
}

/// Collapses line breaks, control characters and runs of whitespace into single spaces, and trims
/// the result, in-place.
pub fn clean_text(s: &mut String) {
    let trimmed = s.trim_matches(is_space_like);
    // Skip the copy/realloc if nothing to do.
    if trimmed.len() != s.len() || needs_collapse(trimmed) {
        let new = regex_replace_all!(r"[\s\p{Cc}]+", trimmed, " ");
        *s = new.to_string();
    }
}

fn is_space_like(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}

/// Returns `true` if `s` has anything other than lone ASCII spaces between words.
fn needs_collapse(s: &str) -> bool {
    let mut prev_space = false;
    for c in s.chars() {
        if c == ' ' {
            if prev_space {
                return true;
            }
            prev_space = true;
        } else if is_space_like(c) {
            return true;
        } else {
            prev_space = false;
        }
    }
    false
}
