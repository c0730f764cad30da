//! Row alignment for two sheets sharing a name.
//!
//! Rows are matched strictly by index. Inserting a row in the middle of a
//! sheet therefore shows up as a cascade of modified rows rather than a
//! single addition; that positional behavior is deliberate.

use crate::diff::RowDiff;
use crate::options::DiffOptions;
use crate::workbook::{Row, Sheet};
use rustc_hash::FxHashMap;

use super::equivalence;

/// Classify every row index present in either sheet.
///
/// The output is sorted by ascending `row_index`. This ordering is part of
/// the observable contract: the index maps do not iterate in numeric order,
/// so the union is sorted explicitly rather than emitted in discovery order.
pub(crate) fn align_rows(old: &Sheet, new: &Sheet, options: &DiffOptions) -> Vec<RowDiff> {
    let old_rows: FxHashMap<u32, &Row> = old.rows.iter().map(|row| (row.index, row)).collect();
    let new_rows: FxHashMap<u32, &Row> = new.rows.iter().map(|row| (row.index, row)).collect();

    let mut indices: Vec<u32> = old_rows.keys().chain(new_rows.keys()).copied().collect();
    indices.sort_unstable();
    indices.dedup();

    let mut diffs = Vec::with_capacity(indices.len());
    for index in indices {
        match (old_rows.get(&index), new_rows.get(&index)) {
            (None, Some(row)) => diffs.push(RowDiff::added(index, row.cells.clone())),
            (Some(row), None) => diffs.push(RowDiff::deleted(index, row.cells.clone())),
            (Some(old_row), Some(new_row)) => {
                let columns = equivalence::modified_columns(old_row, new_row, options);
                if columns.is_empty() {
                    diffs.push(RowDiff::unchanged(
                        index,
                        old_row.cells.clone(),
                        new_row.cells.clone(),
                    ));
                } else {
                    diffs.push(RowDiff::modified(
                        index,
                        old_row.cells.clone(),
                        new_row.cells.clone(),
                        columns,
                    ));
                }
            }
            (None, None) => {
                debug_assert!(false, "index union produced an index on neither side");
            }
        }
    }

    diffs
}
