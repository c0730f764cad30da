use anyhow::Result;
use sheetdiff::{WorkbookDiff, write_diff};
use std::io::Write;

pub fn write_json_report<W: Write>(mut w: W, diff: &WorkbookDiff) -> Result<()> {
    write_diff(&mut w, diff)?;
    writeln!(w)?;
    Ok(())
}
