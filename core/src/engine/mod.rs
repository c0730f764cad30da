//! Core comparison engine.
//!
//! Provides the single entry point [`compare`] for producing a
//! [`WorkbookDiff`] from two loaded workbooks.
//!
//! ## Module Structure
//!
//! - `sheet_align`: sheet enumeration and single-side sheet expansion
//! - `row_align`: index-based row alignment and classification
//! - `equivalence`: the cell/row equivalence predicate
//! - `stats`: sheet- and workbook-level count aggregation

mod equivalence;
mod row_align;
mod sheet_align;
mod stats;

use crate::diff::{CompareError, WorkbookDiff};
use crate::options::DiffOptions;
use crate::workbook::Workbook;
use log::debug;
use std::panic::{self, AssertUnwindSafe};

/// Compare two workbooks under the given options.
///
/// The comparison is a pure, synchronous function of its inputs: no shared
/// state, no I/O, and a freshly allocated result per call, so independent
/// comparisons may run concurrently without coordination.
///
/// All alignment and equivalence steps are panic-free for well-formed
/// workbooks (including empty sheets, zero sheets, and mismatched column
/// counts). Should a value comparison panic anyway, the panic is trapped
/// here and returned as [`CompareError::Internal`] rather than crossing
/// into the caller.
pub fn compare(
    old: &Workbook,
    new: &Workbook,
    options: &DiffOptions,
) -> Result<WorkbookDiff, CompareError> {
    panic::catch_unwind(AssertUnwindSafe(|| compare_inner(old, new, options))).map_err(|payload| {
        CompareError::Internal {
            message: panic_message(payload.as_ref()),
        }
    })
}

fn compare_inner(old: &Workbook, new: &Workbook, options: &DiffOptions) -> WorkbookDiff {
    let sheets = sheet_align::align_sheets(old, new, options);
    let summary = stats::summarize(&sheets);

    debug!(
        "compared '{}' against '{}': {} sheet(s), +{} -{} ~{} row(s)",
        old.file_name,
        new.file_name,
        sheets.len(),
        summary.total_added,
        summary.total_deleted,
        summary.total_modified
    );

    WorkbookDiff {
        old_file_name: old.file_name.clone(),
        new_file_name: new.file_name.clone(),
        sheets,
        summary,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic during comparison".to_string()
    }
}
