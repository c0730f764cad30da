//! Statistics aggregation: row-level counts rolled up to sheet and
//! workbook level.

use crate::diff::{DiffSummary, RowDiff, SheetDiff, SheetStats};

/// Partition count of row diffs by kind.
pub(crate) fn tally(rows: &[RowDiff]) -> SheetStats {
    let mut stats = SheetStats::default();
    for row in rows {
        stats.record(row.kind());
    }
    stats
}

/// Workbook-level totals. Unchanged rows stay per-sheet only.
pub(crate) fn summarize(sheets: &[SheetDiff]) -> DiffSummary {
    let mut summary = DiffSummary::default();
    for sheet in sheets {
        summary.total_added += sheet.stats.added;
        summary.total_deleted += sheet.stats.deleted;
        summary.total_modified += sheet.stats.modified;
    }
    summary
}
