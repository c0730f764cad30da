//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use sheetdiff::{Cell, DiffOptions, Row, Sheet, Workbook, WorkbookDiff, compare};

/// Build a workbook where each sheet is given as (name, rows of numbers).
/// Row indices are assigned positionally.
pub fn numbers_workbook(file_name: &str, sheets: Vec<(&str, Vec<Vec<f64>>)>) -> Workbook {
    Workbook::new(
        file_name,
        sheets
            .into_iter()
            .map(|(name, rows)| {
                Sheet::new(
                    name,
                    rows.into_iter()
                        .enumerate()
                        .map(|(index, values)| {
                            Row::new(
                                index as u32,
                                values.into_iter().map(Cell::number).collect(),
                            )
                        })
                        .collect(),
                )
            })
            .collect(),
    )
}

/// Single-sheet workbook from explicit rows.
pub fn single_sheet_workbook(file_name: &str, sheet_name: &str, rows: Vec<Vec<Cell>>) -> Workbook {
    Workbook::new(
        file_name,
        vec![Sheet::new(
            sheet_name,
            rows.into_iter()
                .enumerate()
                .map(|(index, cells)| Row::new(index as u32, cells))
                .collect(),
        )],
    )
}

pub fn diff_default(old: &Workbook, new: &Workbook) -> WorkbookDiff {
    compare(old, new, &DiffOptions::default()).expect("comparison should succeed")
}
