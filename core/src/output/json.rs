//! JSON serialization of [`WorkbookDiff`].
//!
//! The JSON form round-trips every field of the diff model losslessly;
//! consumers that persist a report can deserialize it back into an
//! identical [`WorkbookDiff`].

use crate::diff::WorkbookDiff;
use std::io::Write;

pub fn serialize_diff(diff: &WorkbookDiff) -> serde_json::Result<String> {
    serde_json::to_string(diff)
}

pub fn serialize_diff_pretty(diff: &WorkbookDiff) -> serde_json::Result<String> {
    serde_json::to_string_pretty(diff)
}

pub fn write_diff<W: Write>(writer: W, diff: &WorkbookDiff) -> serde_json::Result<()> {
    serde_json::to_writer(writer, diff)
}
