//! Configuration for the diff engine.
//!
//! `DiffOptions` centralizes every equivalence knob so the predicate in the
//! engine stays free of hardcoded policy.

use crate::diff::CompareError;
use crate::workbook::Workbook;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Equivalence rules and advisory size caps for one comparison.
///
/// `max_rows`/`max_cols` are advisory: the engine itself never enforces
/// them. Callers that want a bound should invoke [`DiffOptions::check_limits`]
/// before comparing and fail fast on the returned error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Treat a cell paired with an absent cell as equivalent when both are blank.
    pub ignore_empty_cells: bool,
    /// Trim text values before comparing.
    pub ignore_whitespace: bool,
    /// Compare text values without lower-casing them.
    pub case_sensitive: bool,
    /// Treat differing formula text as a modification even when values match.
    pub compare_formulas: bool,
    /// Treat a kind-tag mismatch as a modification even when values match.
    pub compare_kinds: bool,
    pub max_rows: Option<u32>,
    pub max_cols: Option<u32>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_empty_cells: true,
            ignore_whitespace: true,
            case_sensitive: false,
            compare_formulas: false,
            compare_kinds: false,
            max_rows: None,
            max_cols: None,
        }
    }
}

impl DiffOptions {
    /// The default rule set: tolerant of whitespace, casing, and trailing
    /// blank cells.
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Every normalization off; formulas and kind tags participate in
    /// equivalence.
    pub fn strict() -> Self {
        Self {
            ignore_empty_cells: false,
            ignore_whitespace: false,
            case_sensitive: true,
            compare_formulas: true,
            compare_kinds: true,
            ..Default::default()
        }
    }

    pub fn builder() -> DiffOptionsBuilder {
        DiffOptionsBuilder {
            inner: DiffOptions::default(),
        }
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        ensure_non_zero(self.max_rows, "max_rows")?;
        ensure_non_zero(self.max_cols, "max_cols")?;
        Ok(())
    }

    /// Fail fast when a workbook exceeds the advisory caps.
    ///
    /// This is the caller-side enforcement hook; `compare` never calls it.
    pub fn check_limits(&self, workbook: &Workbook) -> Result<(), CompareError> {
        for sheet in &workbook.sheets {
            let rows = sheet.row_count() as u32;
            let cols = sheet.max_row_width() as u32;
            let rows_exceeded = self.max_rows.is_some_and(|max| rows > max);
            let cols_exceeded = self.max_cols.is_some_and(|max| cols > max);
            if rows_exceeded || cols_exceeded {
                return Err(CompareError::LimitsExceeded {
                    sheet: sheet.name.clone(),
                    rows,
                    cols,
                    max_rows: self.max_rows.unwrap_or(u32::MAX),
                    max_cols: self.max_cols.unwrap_or(u32::MAX),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("{field} must be greater than zero when set")]
    NonPositiveLimit { field: &'static str },
}

fn ensure_non_zero(value: Option<u32>, field: &'static str) -> Result<(), OptionsError> {
    if value == Some(0) {
        return Err(OptionsError::NonPositiveLimit { field });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct DiffOptionsBuilder {
    inner: DiffOptions,
}

impl DiffOptionsBuilder {
    pub fn ignore_empty_cells(mut self, value: bool) -> Self {
        self.inner.ignore_empty_cells = value;
        self
    }

    pub fn ignore_whitespace(mut self, value: bool) -> Self {
        self.inner.ignore_whitespace = value;
        self
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.inner.case_sensitive = value;
        self
    }

    pub fn compare_formulas(mut self, value: bool) -> Self {
        self.inner.compare_formulas = value;
        self
    }

    pub fn compare_kinds(mut self, value: bool) -> Self {
        self.inner.compare_kinds = value;
        self
    }

    pub fn max_rows(mut self, value: u32) -> Self {
        self.inner.max_rows = Some(value);
        self
    }

    pub fn max_cols(mut self, value: u32) -> Self {
        self.inner.max_cols = Some(value);
        self
    }

    pub fn build(self) -> Result<DiffOptions, OptionsError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}
