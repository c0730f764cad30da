//! Diff results for workbook comparison.
//!
//! This module defines the hierarchical result model produced by the engine:
//! - [`RowDiff`]: classification of one aligned row position
//! - [`SheetDiff`]: all row diffs for one sheet name plus its tally
//! - [`WorkbookDiff`]: the full comparison result with a workbook-level summary
//! - [`CompareError`]: errors surfaced by the comparison entry point

use crate::workbook::Cell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat classification of a [`RowDiff`], used for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowDiffKind {
    Added,
    Deleted,
    Modified,
    Unchanged,
}

/// The outcome of aligning one row index across the two sheets.
///
/// Both cell arrays are retained on `Modified` and `Unchanged` rows so a
/// side-by-side renderer never has to go back to the source workbooks.
/// `modified_columns` lists, in ascending order, every column position where
/// the paired cells are not equivalent under the active options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowDiff {
    Added {
        row_index: u32,
        new_cells: Vec<Cell>,
    },
    Deleted {
        row_index: u32,
        old_cells: Vec<Cell>,
    },
    Modified {
        row_index: u32,
        old_cells: Vec<Cell>,
        new_cells: Vec<Cell>,
        modified_columns: Vec<u32>,
    },
    Unchanged {
        row_index: u32,
        old_cells: Vec<Cell>,
        new_cells: Vec<Cell>,
    },
}

impl RowDiff {
    pub fn added(row_index: u32, new_cells: Vec<Cell>) -> RowDiff {
        RowDiff::Added {
            row_index,
            new_cells,
        }
    }

    pub fn deleted(row_index: u32, old_cells: Vec<Cell>) -> RowDiff {
        RowDiff::Deleted {
            row_index,
            old_cells,
        }
    }

    pub fn modified(
        row_index: u32,
        old_cells: Vec<Cell>,
        new_cells: Vec<Cell>,
        modified_columns: Vec<u32>,
    ) -> RowDiff {
        debug_assert!(
            modified_columns.windows(2).all(|w| w[0] < w[1]),
            "modified_columns must be strictly ascending"
        );
        RowDiff::Modified {
            row_index,
            old_cells,
            new_cells,
            modified_columns,
        }
    }

    pub fn unchanged(row_index: u32, old_cells: Vec<Cell>, new_cells: Vec<Cell>) -> RowDiff {
        RowDiff::Unchanged {
            row_index,
            old_cells,
            new_cells,
        }
    }

    pub fn row_index(&self) -> u32 {
        match self {
            RowDiff::Added { row_index, .. }
            | RowDiff::Deleted { row_index, .. }
            | RowDiff::Modified { row_index, .. }
            | RowDiff::Unchanged { row_index, .. } => *row_index,
        }
    }

    pub fn kind(&self) -> RowDiffKind {
        match self {
            RowDiff::Added { .. } => RowDiffKind::Added,
            RowDiff::Deleted { .. } => RowDiffKind::Deleted,
            RowDiff::Modified { .. } => RowDiffKind::Modified,
            RowDiff::Unchanged { .. } => RowDiffKind::Unchanged,
        }
    }

    pub fn old_cells(&self) -> Option<&[Cell]> {
        match self {
            RowDiff::Deleted { old_cells, .. }
            | RowDiff::Modified { old_cells, .. }
            | RowDiff::Unchanged { old_cells, .. } => Some(old_cells),
            RowDiff::Added { .. } => None,
        }
    }

    pub fn new_cells(&self) -> Option<&[Cell]> {
        match self {
            RowDiff::Added { new_cells, .. }
            | RowDiff::Modified { new_cells, .. }
            | RowDiff::Unchanged { new_cells, .. } => Some(new_cells),
            RowDiff::Deleted { .. } => None,
        }
    }

    /// Random-access view of the differing column positions; `None` unless
    /// the row is `Modified`.
    pub fn modified_columns(&self) -> Option<&[u32]> {
        match self {
            RowDiff::Modified {
                modified_columns, ..
            } => Some(modified_columns),
            _ => None,
        }
    }
}

/// Partition counts of one sheet's rows by [`RowDiffKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetStats {
    pub added: u32,
    pub deleted: u32,
    pub modified: u32,
    pub unchanged: u32,
}

impl SheetStats {
    pub fn record(&mut self, kind: RowDiffKind) {
        match kind {
            RowDiffKind::Added => self.added += 1,
            RowDiffKind::Deleted => self.deleted += 1,
            RowDiffKind::Modified => self.modified += 1,
            RowDiffKind::Unchanged => self.unchanged += 1,
        }
    }

    pub fn changed(&self) -> u32 {
        self.added + self.deleted + self.modified
    }
}

/// All row diffs for one sheet name, ordered by ascending `row_index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDiff {
    pub sheet_name: String,
    pub rows: Vec<RowDiff>,
    pub stats: SheetStats,
}

impl SheetDiff {
    pub fn has_changes(&self) -> bool {
        self.stats.changed() > 0
    }
}

/// Workbook-level totals over row changes.
///
/// Unchanged rows are tracked per sheet but intentionally left out here:
/// the summary exists to highlight actionable changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_added: u32,
    pub total_deleted: u32,
    pub total_modified: u32,
}

impl DiffSummary {
    pub fn total_changed(&self) -> u32 {
        self.total_added + self.total_deleted + self.total_modified
    }
}

/// The complete comparison result. Constructed once by [`crate::compare`]
/// and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookDiff {
    pub old_file_name: String,
    pub new_file_name: String,
    pub sheets: Vec<SheetDiff>,
    pub summary: DiffSummary,
}

impl WorkbookDiff {
    pub fn sheet(&self, name: &str) -> Option<&SheetDiff> {
        self.sheets.iter().find(|sheet| sheet.sheet_name == name)
    }

    pub fn has_changes(&self) -> bool {
        self.summary.total_changed() > 0
    }
}

/// Errors produced by the comparison entry point.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompareError {
    #[error(
        "sheet '{sheet}' exceeds comparison limits: rows={rows}, cols={cols} \
         (limits: rows={max_rows}, cols={max_cols})"
    )]
    LimitsExceeded {
        sheet: String,
        rows: u32,
        cols: u32,
        max_rows: u32,
        max_cols: u32,
    },

    #[error("internal comparison error: {message}")]
    Internal { message: String },
}
