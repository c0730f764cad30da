//! Sheet alignment across two workbooks.
//!
//! Sheets are matched by exact name. A sheet appearing under different
//! names in the two workbooks is reported as one sheet's rows deleted plus
//! the other's added; rename detection is out of scope.

use crate::diff::{RowDiff, SheetDiff};
use crate::options::DiffOptions;
use crate::workbook::{Sheet, Workbook};
use rustc_hash::FxHashMap;

use super::{row_align, stats};

/// Produce one [`SheetDiff`] per distinct sheet name across both inputs.
///
/// Output order is deterministic: old-workbook encounter order first, then
/// sheets present only in the new workbook in its encounter order.
pub(crate) fn align_sheets(
    old: &Workbook,
    new: &Workbook,
    options: &DiffOptions,
) -> Vec<SheetDiff> {
    let old_by_name: FxHashMap<&str, &Sheet> = old
        .sheets
        .iter()
        .map(|sheet| (sheet.name.as_str(), sheet))
        .collect();
    let new_by_name: FxHashMap<&str, &Sheet> = new
        .sheets
        .iter()
        .map(|sheet| (sheet.name.as_str(), sheet))
        .collect();

    let mut diffs = Vec::with_capacity(old.sheets.len() + new.sheets.len());

    for old_sheet in &old.sheets {
        match new_by_name.get(old_sheet.name.as_str()) {
            Some(new_sheet) => {
                let rows = row_align::align_rows(old_sheet, new_sheet, options);
                let stats = stats::tally(&rows);
                diffs.push(SheetDiff {
                    sheet_name: old_sheet.name.clone(),
                    rows,
                    stats,
                });
            }
            None => diffs.push(expand_deleted(old_sheet)),
        }
    }

    for new_sheet in &new.sheets {
        if !old_by_name.contains_key(new_sheet.name.as_str()) {
            diffs.push(expand_added(new_sheet));
        }
    }

    diffs
}

/// A sheet present only in the new workbook: every row is an addition.
fn expand_added(sheet: &Sheet) -> SheetDiff {
    let rows: Vec<RowDiff> = sheet
        .rows
        .iter()
        .map(|row| RowDiff::added(row.index, row.cells.clone()))
        .collect();
    let stats = stats::tally(&rows);
    SheetDiff {
        sheet_name: sheet.name.clone(),
        rows,
        stats,
    }
}

/// A sheet present only in the old workbook: every row is a deletion.
fn expand_deleted(sheet: &Sheet) -> SheetDiff {
    let rows: Vec<RowDiff> = sheet
        .rows
        .iter()
        .map(|row| RowDiff::deleted(row.index, row.cells.clone()))
        .collect();
    let stats = stats::tally(&rows);
    SheetDiff {
        sheet_name: sheet.name.clone(),
        rows,
        stats,
    }
}
