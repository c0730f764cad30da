//! Workbook loading.
//!
//! Turns an `.xlsx`-family file into the [`Workbook`] model. Every sheet is
//! fully materialized before the function returns; the diff engine never
//! sees lazy or streaming cells.

use crate::container::{ContainerError, OpcContainer};
use crate::sheet_parser::{
    SheetParseError, parse_relationships, parse_shared_strings, parse_sheet_xml,
    parse_workbook_xml, resolve_sheet_target,
};
use crate::workbook::{Sheet, Workbook};
use log::debug;
use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;

const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xltx", "xltm"];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to open '{path}': {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },
    #[error("unsupported file extension for '{path}' (expected one of: xlsx, xlsm, xltx, xltm)")]
    UnsupportedExtension { path: String },
    #[error("container error: {0}")]
    Container(#[from] ContainerError),
    #[error("sheet parse error: {0}")]
    SheetParse(#[from] SheetParseError),
    #[error("workbook.xml missing or unreadable")]
    WorkbookXmlMissing,
    #[error("worksheet XML missing for sheet '{sheet_name}'")]
    WorksheetXmlMissing { sheet_name: String },
    #[error("workbook contains no sheets")]
    NoSheets,
}

/// Load a workbook from a file path.
///
/// Fails fast on a missing file or an unrecognized extension before any
/// archive is opened.
pub fn load(path: impl AsRef<Path>) -> Result<Workbook, LoadError> {
    let path = path.as_ref();

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    let supported = extension
        .as_deref()
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
    if !supported {
        return Err(LoadError::UnsupportedExtension {
            path: path.display().to_string(),
        });
    }

    let file = std::fs::File::open(path).map_err(|source| LoadError::FileOpen {
        path: path.display().to_string(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    load_from_reader(file, &file_name)
}

/// Load a workbook from any seekable reader.
///
/// `file_name` is recorded on the result for reporting; it is not
/// interpreted.
pub fn load_from_reader<R: Read + Seek + 'static>(
    reader: R,
    file_name: &str,
) -> Result<Workbook, LoadError> {
    let mut container = OpcContainer::open_from_reader(reader)?;

    let shared_strings = match container.read_file_optional("xl/sharedStrings.xml")? {
        Some(bytes) => parse_shared_strings(&bytes)?,
        None => Vec::new(),
    };

    let workbook_bytes = container
        .read_file("xl/workbook.xml")
        .map_err(|_| LoadError::WorkbookXmlMissing)?;
    let descriptors = parse_workbook_xml(&workbook_bytes)?;
    if descriptors.is_empty() {
        return Err(LoadError::NoSheets);
    }

    let relationships = match container.read_file_optional("xl/_rels/workbook.xml.rels")? {
        Some(bytes) => parse_relationships(&bytes)?,
        None => HashMap::new(),
    };

    let mut sheets = Vec::with_capacity(descriptors.len());
    for (idx, descriptor) in descriptors.iter().enumerate() {
        let target = resolve_sheet_target(descriptor, &relationships, idx);
        let sheet_bytes =
            container
                .read_file(&target)
                .map_err(|_| LoadError::WorksheetXmlMissing {
                    sheet_name: descriptor.name.clone(),
                })?;
        let rows = parse_sheet_xml(&sheet_bytes, &shared_strings)?;
        sheets.push(Sheet::new(descriptor.name.clone(), rows));
    }

    debug!(
        "loaded '{}': {} sheet(s), {} row(s)",
        file_name,
        sheets.len(),
        sheets.iter().map(Sheet::row_count).sum::<usize>()
    );

    Ok(Workbook::new(file_name, sheets))
}
