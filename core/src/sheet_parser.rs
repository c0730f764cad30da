//! XML parsing for worksheet contents.
//!
//! Handles worksheet XML, shared strings, workbook structure, and
//! relationship files, producing the dense row-major [`Row`] representation
//! the diff engine consumes.

use crate::addressing::address_to_index;
use crate::workbook::{Cell, CellKind, CellValue, Row};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetParseError {
    #[error("XML parse error: {0}")]
    XmlError(String),
    #[error("invalid cell address: {0}")]
    InvalidAddress(String),
    #[error("shared string index {0} out of bounds")]
    SharedStringOutOfBounds(usize),
}

pub struct SheetDescriptor {
    pub name: String,
    pub rel_id: Option<String>,
    pub sheet_id: Option<u32>,
}

pub fn parse_shared_strings(xml: &[u8]) -> Result<Vec<String>, SheetParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"si" => {
                current.clear();
                in_si = true;
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" && in_si => {
                let text = reader.read_text(e.name()).map_err(to_xml_err)?.into_owned();
                current.push_str(&text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"si" => {
                strings.push(current.clone());
                in_si = false;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

pub fn parse_workbook_xml(xml: &[u8]) -> Result<Vec<SheetDescriptor>, SheetParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"sheet" => {
                let mut name = None;
                let mut rel_id = None;
                let mut sheet_id = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(to_xml_err)?;
                    match attr.key.as_ref() {
                        b"name" => {
                            name = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        b"sheetId" => {
                            let parsed = attr.unescape_value().map_err(to_xml_err)?;
                            sheet_id = parsed.parse::<u32>().ok();
                        }
                        b"r:id" => {
                            rel_id = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        _ => {}
                    }
                }
                if let Some(name) = name {
                    sheets.push(SheetDescriptor {
                        name,
                        rel_id,
                        sheet_id,
                    });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

pub fn parse_relationships(xml: &[u8]) -> Result<HashMap<String, String>, SheetParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut map = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"Relationship" => {
                let mut id = None;
                let mut target = None;
                let mut rel_type = None;
                for attr in e.attributes() {
                    let attr = attr.map_err(to_xml_err)?;
                    match attr.key.as_ref() {
                        b"Id" => id = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned()),
                        b"Target" => {
                            target = Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        b"Type" => {
                            rel_type =
                                Some(attr.unescape_value().map_err(to_xml_err)?.into_owned())
                        }
                        _ => {}
                    }
                }

                if let (Some(id), Some(target), Some(rel_type)) = (id, target, rel_type) {
                    if rel_type.contains("worksheet") {
                        map.insert(id, target);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(map)
}

pub fn resolve_sheet_target(
    sheet: &SheetDescriptor,
    relationships: &HashMap<String, String>,
    index: usize,
) -> String {
    if let Some(rel_id) = &sheet.rel_id {
        if let Some(target) = relationships.get(rel_id) {
            return normalize_target(target);
        }
    }

    let guessed = sheet
        .sheet_id
        .map(|id| format!("xl/worksheets/sheet{id}.xml"))
        .unwrap_or_else(|| format!("xl/worksheets/sheet{}.xml", index + 1));
    normalize_target(&guessed)
}

fn normalize_target(target: &str) -> String {
    let trimmed = target.trim_start_matches('/');
    if trimmed.starts_with("xl/") {
        trimmed.to_string()
    } else {
        format!("xl/{trimmed}")
    }
}

/// Parse one worksheet part into dense rows.
///
/// Cells are grouped by row index and gaps inside a row are padded with
/// empty cells, so column position in the output equals column position in
/// the sheet. Row indices with no cells at all are simply absent.
pub fn parse_sheet_xml(xml: &[u8], shared_strings: &[String]) -> Result<Vec<Row>, SheetParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut by_row: BTreeMap<u32, Vec<(u32, Cell)>> = BTreeMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"c" => {
                let (row, col, cell) = parse_cell(&mut reader, e, shared_strings)?;
                by_row.entry(row).or_default().push((col, cell));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    let rows = by_row
        .into_iter()
        .map(|(index, cells)| {
            let width = cells.iter().map(|(col, _)| *col + 1).max().unwrap_or(0);
            let mut dense = vec![Cell::empty(); width as usize];
            for (col, cell) in cells {
                dense[col as usize] = cell;
            }
            Row::new(index, dense)
        })
        .collect();

    Ok(rows)
}

fn parse_cell(
    reader: &mut Reader<&[u8]>,
    start: BytesStart,
    shared_strings: &[String],
) -> Result<(u32, u32, Cell), SheetParseError> {
    let address_raw = get_attr_value(&start, b"r")?
        .ok_or_else(|| SheetParseError::XmlError("cell missing address".into()))?;
    let (row, col) = address_to_index(&address_raw)
        .ok_or_else(|| SheetParseError::InvalidAddress(address_raw.clone()))?;

    let cell_type = get_attr_value(&start, b"t")?;

    let mut value_text: Option<String> = None;
    let mut formula_text: Option<String> = None;
    let mut inline_text: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"v" => {
                let text = reader.read_text(e.name()).map_err(to_xml_err)?.into_owned();
                value_text = Some(text);
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"f" => {
                let text = reader.read_text(e.name()).map_err(to_xml_err)?.into_owned();
                let unescaped = quick_xml::escape::unescape(&text)
                    .map_err(to_xml_err)?
                    .into_owned();
                formula_text = Some(unescaped);
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"is" => {
                inline_text = Some(read_inline_string(reader)?);
            }
            Ok(Event::End(e)) if e.name().as_ref() == start.name().as_ref() => break,
            Ok(Event::Eof) => {
                return Err(SheetParseError::XmlError("unexpected EOF inside cell".into()));
            }
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }

    let (value, kind) = match inline_text {
        Some(text) => (Some(CellValue::Text(text)), CellKind::Text),
        None => convert_value(value_text.as_deref(), cell_type.as_deref(), shared_strings)?,
    };

    // A formula element overrides the cached value's classification.
    let cell = match formula_text {
        Some(formula) => Cell {
            value,
            kind: CellKind::Formula,
            formula: Some(formula),
        },
        None => Cell {
            value,
            kind,
            formula: None,
        },
    };

    Ok((row, col, cell))
}

fn read_inline_string(reader: &mut Reader<&[u8]>) -> Result<String, SheetParseError> {
    let mut buf = Vec::new();
    let mut value = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" => {
                let text = reader.read_text(e.name()).map_err(to_xml_err)?.into_owned();
                value.push_str(&text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"is" => break,
            Ok(Event::Eof) => {
                return Err(SheetParseError::XmlError(
                    "unexpected EOF inside inline string".into(),
                ));
            }
            Err(e) => return Err(to_xml_err(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(value)
}

fn convert_value(
    value_text: Option<&str>,
    cell_type: Option<&str>,
    shared_strings: &[String],
) -> Result<(Option<CellValue>, CellKind), SheetParseError> {
    let raw = match value_text {
        Some(t) => t,
        None => return Ok((None, CellKind::Empty)),
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok((Some(CellValue::Text(String::new())), CellKind::Empty));
    }

    match cell_type {
        Some("s") => {
            let idx = trimmed
                .parse::<usize>()
                .map_err(|e| SheetParseError::XmlError(e.to_string()))?;
            let text = shared_strings
                .get(idx)
                .ok_or(SheetParseError::SharedStringOutOfBounds(idx))?;
            Ok((Some(CellValue::Text(text.clone())), CellKind::Text))
        }
        Some("b") => Ok(match trimmed {
            "1" => (Some(CellValue::Bool(true)), CellKind::Bool),
            "0" => (Some(CellValue::Bool(false)), CellKind::Bool),
            _ => (None, CellKind::Empty),
        }),
        Some("e") => Ok((Some(CellValue::Text(trimmed.to_string())), CellKind::Error)),
        Some("d") => match iso_to_serial(trimmed) {
            Some(serial) => Ok((Some(CellValue::Date(serial)), CellKind::Date)),
            None => Ok((Some(CellValue::Text(trimmed.to_string())), CellKind::Text)),
        },
        Some("str") | Some("inlineStr") => {
            Ok((Some(CellValue::Text(raw.to_string())), CellKind::Text))
        }
        _ => {
            if let Ok(n) = trimmed.parse::<f64>() {
                Ok((Some(CellValue::Number(n)), CellKind::Number))
            } else {
                Ok((Some(CellValue::Text(trimmed.to_string())), CellKind::Text))
            }
        }
    }
}

/// Convert an ISO-8601 date (`t="d"` cells) to the OOXML serial number.
///
/// Serial day 0 is 1899-12-30; times become day fractions. Returns `None`
/// for strings that are not `YYYY-MM-DD` with an optional `THH:MM:SS` tail.
fn iso_to_serial(text: &str) -> Option<f64> {
    let (date_part, time_part) = match text.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (text, None),
    };

    let mut fields = date_part.splitn(3, '-');
    let year: i64 = fields.next()?.parse().ok()?;
    let month: u32 = fields.next()?.parse().ok()?;
    let day: u32 = fields.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // Unix epoch 1970-01-01 is serial 25569.
    let serial_days = days_from_civil(year, month, day) + 25_569;

    let fraction = match time_part {
        Some(time) => {
            let hms = time.trim_end_matches('Z');
            let mut fields = hms.splitn(3, ':');
            let hours: f64 = fields.next()?.parse().ok()?;
            let minutes: f64 = fields.next().unwrap_or("0").parse().ok()?;
            let seconds: f64 = fields.next().unwrap_or("0").parse().ok()?;
            (hours * 3600.0 + minutes * 60.0 + seconds) / 86_400.0
        }
        None => 0.0,
    };

    Some(serial_days as f64 + fraction)
}

/// Days between the given civil date and 1970-01-01 (proleptic Gregorian).
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let shifted = if y >= 0 { y } else { y - 399 };
    let era = shifted / 400;
    let yoe = (y - era * 400) as i64;
    let mp = ((month + 9) % 12) as i64;
    let doy = (153 * mp + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn get_attr_value(
    element: &BytesStart<'_>,
    key: &[u8],
) -> Result<Option<String>, SheetParseError> {
    for attr in element.attributes() {
        let attr = attr.map_err(to_xml_err)?;
        if attr.key.as_ref() == key {
            return Ok(Some(
                attr.unescape_value().map_err(to_xml_err)?.into_owned(),
            ));
        }
    }
    Ok(None)
}

fn to_xml_err<E: std::fmt::Display>(err: E) -> SheetParseError {
    SheetParseError::XmlError(err.to_string())
}
