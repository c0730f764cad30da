//! Cell and row equivalence under the active [`DiffOptions`].
//!
//! Everything in this module is a pure, total function: no side effects,
//! no panics for any well-formed input. The engine calls
//! [`cells_equivalent`] once per aligned cell pair, so it must stay cheap.

use crate::options::DiffOptions;
use crate::workbook::{Cell, CellValue, Row};
use std::borrow::Cow;

/// Column positions (ascending) where the two rows' cells are not
/// equivalent. An empty result means the rows are equivalent.
///
/// Columns beyond one row's length are compared as absent cells for that
/// side, so a trailing blank cell only counts when `ignore_empty_cells`
/// is off.
pub(crate) fn modified_columns(old: &Row, new: &Row, options: &DiffOptions) -> Vec<u32> {
    let width = old.cells.len().max(new.cells.len());
    (0..width)
        .filter(|&col| !cells_equivalent(old.cell(col), new.cell(col), options))
        .map(|col| col as u32)
        .collect()
}

/// Decide whether two cells at the same (row, column) position are the same.
///
/// `None` means the cell position does not exist on that side.
pub(crate) fn cells_equivalent(
    old: Option<&Cell>,
    new: Option<&Cell>,
    options: &DiffOptions,
) -> bool {
    match (old, new) {
        (None, None) => true,
        (Some(present), None) | (None, Some(present)) => {
            options.ignore_empty_cells && present.is_blank()
        }
        (Some(a), Some(b)) => {
            if options.compare_formulas && a.formula != b.formula {
                return false;
            }
            if options.compare_kinds && a.kind != b.kind {
                return false;
            }
            // Two blank cells match regardless of how the blankness is
            // spelled (empty kind, absent value, empty string).
            if a.is_blank() && b.is_blank() {
                return true;
            }
            values_equivalent(a.value.as_ref(), b.value.as_ref(), options)
        }
    }
}

fn values_equivalent(
    a: Option<&CellValue>,
    b: Option<&CellValue>,
    options: &DiffOptions,
) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(CellValue::Text(x)), Some(CellValue::Text(y))) => {
            normalize_text(x, options) == normalize_text(y, options)
        }
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn normalize_text<'a>(text: &'a str, options: &DiffOptions) -> Cow<'a, str> {
    let trimmed = if options.ignore_whitespace {
        text.trim()
    } else {
        text
    };
    if options.case_sensitive {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellKind;

    fn lenient() -> DiffOptions {
        DiffOptions::default()
    }

    #[test]
    fn both_absent_cells_are_equivalent() {
        assert!(cells_equivalent(None, None, &lenient()));
    }

    #[test]
    fn absent_vs_blank_depends_on_ignore_empty_cells() {
        let blank = Cell::empty();
        assert!(cells_equivalent(Some(&blank), None, &lenient()));
        assert!(cells_equivalent(None, Some(&blank), &lenient()));

        let strict = DiffOptions::builder()
            .ignore_empty_cells(false)
            .build()
            .expect("valid options");
        assert!(!cells_equivalent(Some(&blank), None, &strict));
    }

    #[test]
    fn absent_vs_value_is_never_equivalent() {
        let cell = Cell::number(1.0);
        assert!(!cells_equivalent(Some(&cell), None, &lenient()));
    }

    #[test]
    fn whitespace_option_controls_trimming() {
        let a = Cell::text("foo");
        let b = Cell::text("foo ");
        assert!(cells_equivalent(Some(&a), Some(&b), &lenient()));

        let keep_ws = DiffOptions::builder()
            .ignore_whitespace(false)
            .build()
            .expect("valid options");
        assert!(!cells_equivalent(Some(&a), Some(&b), &keep_ws));
    }

    #[test]
    fn case_option_controls_lowercasing() {
        let a = Cell::text("ABC");
        let b = Cell::text("abc");
        assert!(cells_equivalent(Some(&a), Some(&b), &lenient()));

        let sensitive = DiffOptions::builder()
            .case_sensitive(true)
            .build()
            .expect("valid options");
        assert!(!cells_equivalent(Some(&a), Some(&b), &sensitive));
    }

    #[test]
    fn formula_text_only_matters_when_compared() {
        let a = Cell::formula(Some(CellValue::Number(3.0)), "1+2");
        let b = Cell::formula(Some(CellValue::Number(3.0)), "3");
        assert!(cells_equivalent(Some(&a), Some(&b), &lenient()));

        let formulas = DiffOptions::builder()
            .compare_formulas(true)
            .build()
            .expect("valid options");
        assert!(!cells_equivalent(Some(&a), Some(&b), &formulas));
    }

    #[test]
    fn one_sided_formula_counts_as_formula_change() {
        let a = Cell::formula(Some(CellValue::Number(3.0)), "1+2");
        let b = Cell::number(3.0);
        let formulas = DiffOptions::builder()
            .compare_formulas(true)
            .build()
            .expect("valid options");
        assert!(!cells_equivalent(Some(&a), Some(&b), &formulas));
        assert!(cells_equivalent(Some(&a), Some(&b), &lenient()));
    }

    #[test]
    fn kind_mismatch_only_matters_when_compared() {
        // Same cached numeric value, one spelled as a formula result.
        let a = Cell::formula(Some(CellValue::Number(7.0)), "A1*7");
        let b = Cell::number(7.0);
        assert!(cells_equivalent(Some(&a), Some(&b), &lenient()));

        let kinds = DiffOptions::builder()
            .compare_kinds(true)
            .build()
            .expect("valid options");
        assert!(!cells_equivalent(Some(&a), Some(&b), &kinds));
    }

    #[test]
    fn blank_spellings_are_interchangeable() {
        let empty_kind = Cell::empty();
        let empty_text = Cell::text("");
        let no_value = Cell {
            value: None,
            kind: CellKind::Text,
            formula: None,
        };
        assert!(cells_equivalent(Some(&empty_kind), Some(&empty_text), &lenient()));
        assert!(cells_equivalent(Some(&empty_text), Some(&no_value), &lenient()));
    }

    #[test]
    fn zero_does_not_match_blank() {
        let zero = Cell::number(0.0);
        let blank = Cell::empty();
        assert!(!cells_equivalent(Some(&zero), Some(&blank), &lenient()));
        assert!(!cells_equivalent(Some(&zero), None, &lenient()));
    }

    #[test]
    fn dates_compare_by_serial() {
        let a = Cell::date(45123.0);
        let b = Cell::date(45123.0);
        let c = Cell::date(45124.0);
        assert!(cells_equivalent(Some(&a), Some(&b), &lenient()));
        assert!(!cells_equivalent(Some(&a), Some(&c), &lenient()));
    }

    #[test]
    fn modified_columns_covers_the_wider_row() {
        let old = Row::new(0, vec![Cell::number(1.0), Cell::number(2.0)]);
        let new = Row::new(
            0,
            vec![Cell::number(1.0), Cell::number(2.0), Cell::number(3.0)],
        );
        assert_eq!(modified_columns(&old, &new, &lenient()), vec![2]);
    }

    #[test]
    fn trailing_blank_cell_tolerated_only_when_ignoring_empties() {
        let old = Row::new(0, vec![Cell::number(1.0), Cell::number(2.0)]);
        let new = Row::new(
            0,
            vec![Cell::number(1.0), Cell::number(2.0), Cell::empty()],
        );
        assert!(modified_columns(&old, &new, &lenient()).is_empty());

        let strict = DiffOptions::builder()
            .ignore_empty_cells(false)
            .build()
            .expect("valid options");
        assert_eq!(modified_columns(&old, &new, &strict), vec![2]);
    }

    #[test]
    fn modified_columns_are_ascending() {
        let old = Row::new(
            0,
            vec![Cell::text("a"), Cell::text("b"), Cell::text("c")],
        );
        let new = Row::new(
            0,
            vec![Cell::text("x"), Cell::text("b"), Cell::text("z")],
        );
        assert_eq!(modified_columns(&old, &new, &lenient()), vec![0, 2]);
    }
}
