use anyhow::{Context, Result};
use sheetdiff::load;
use std::process::ExitCode;

pub fn run(path: &str) -> Result<ExitCode> {
    let workbook = load(path).with_context(|| format!("Failed to load workbook: {path}"))?;

    println!("File: {}", workbook.file_name);
    println!("Sheets: {}", workbook.sheets.len());
    for sheet in &workbook.sheets {
        println!(
            "  \"{}\": {} row(s), {} cell(s), widest row {} column(s)",
            sheet.name,
            sheet.row_count(),
            sheet.cell_count(),
            sheet.max_row_width()
        );
    }

    Ok(ExitCode::from(0))
}
