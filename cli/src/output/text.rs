use crate::commands::diff::Verbosity;
use anyhow::Result;
use sheetdiff::{Cell, CellValue, RowDiff, SheetDiff, WorkbookDiff, column_label};
use std::io::Write;

pub fn write_text_report<W: Write>(
    w: &mut W,
    diff: &WorkbookDiff,
    verbosity: Verbosity,
) -> Result<()> {
    if !diff.has_changes() {
        writeln!(w, "No differences found.")?;
        write_summary(w, diff)?;
        return Ok(());
    }

    if verbosity != Verbosity::Quiet {
        for sheet in &diff.sheets {
            if !sheet.has_changes() && verbosity != Verbosity::Verbose {
                continue;
            }
            write_sheet(w, sheet, verbosity)?;
        }
    }

    write_summary(w, diff)?;

    Ok(())
}

fn write_sheet<W: Write>(w: &mut W, sheet: &SheetDiff, verbosity: Verbosity) -> Result<()> {
    writeln!(w, "Sheet \"{}\":", sheet.sheet_name)?;

    for row in &sheet.rows {
        // Display rows are 1-based.
        let row_number = row.row_index() + 1;
        match row {
            RowDiff::Added { new_cells, .. } => {
                writeln!(w, "  Row {}: ADDED {}", row_number, render_cells(new_cells))?;
            }
            RowDiff::Deleted { old_cells, .. } => {
                writeln!(
                    w,
                    "  Row {}: REMOVED {}",
                    row_number,
                    render_cells(old_cells)
                )?;
            }
            RowDiff::Modified {
                old_cells,
                new_cells,
                modified_columns,
                ..
            } => {
                let columns: Vec<String> = modified_columns
                    .iter()
                    .map(|&col| column_label(col))
                    .collect();
                writeln!(
                    w,
                    "  Row {}: MODIFIED (columns {})",
                    row_number,
                    columns.join(", ")
                )?;
                for &col in modified_columns {
                    writeln!(
                        w,
                        "    {}{}: {} -> {}",
                        column_label(col),
                        row_number,
                        render_cell_at(old_cells, col),
                        render_cell_at(new_cells, col)
                    )?;
                }
            }
            RowDiff::Unchanged { .. } => {
                if verbosity == Verbosity::Verbose {
                    writeln!(w, "  Row {}: unchanged", row_number)?;
                }
            }
        }
    }

    writeln!(w)?;
    Ok(())
}

fn write_summary<W: Write>(w: &mut W, diff: &WorkbookDiff) -> Result<()> {
    writeln!(
        w,
        "Summary: {} -> {}",
        diff.old_file_name, diff.new_file_name
    )?;
    for sheet in &diff.sheets {
        writeln!(
            w,
            "  \"{}\": +{} -{} ~{} ({} unchanged)",
            sheet.sheet_name,
            sheet.stats.added,
            sheet.stats.deleted,
            sheet.stats.modified,
            sheet.stats.unchanged
        )?;
    }
    writeln!(
        w,
        "  Total: {} added, {} deleted, {} modified",
        diff.summary.total_added, diff.summary.total_deleted, diff.summary.total_modified
    )?;
    Ok(())
}

fn render_cells(cells: &[Cell]) -> String {
    let rendered: Vec<String> = cells.iter().map(display_cell).collect();
    format!("[{}]", rendered.join(", "))
}

fn render_cell_at(cells: &[Cell], col: u32) -> String {
    match cells.get(col as usize) {
        Some(cell) => display_cell(cell),
        None => "<absent>".to_string(),
    }
}

fn display_cell(cell: &Cell) -> String {
    match &cell.value {
        Some(CellValue::Number(n)) => n.to_string(),
        Some(CellValue::Text(s)) => format!("\"{s}\""),
        Some(CellValue::Bool(b)) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Some(CellValue::Date(serial)) => format!("<date {serial}>"),
        None => String::new(),
    }
}
