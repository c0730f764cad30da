use crate::OutputFormat;
use crate::output::{json, text};
use anyhow::{Context, Result};
use log::info;
use sheetdiff::{DiffOptions, Workbook, compare, load};
use std::io;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
}

pub struct DiffArgs {
    pub old: String,
    pub new: String,
    pub format: OutputFormat,
    pub strict: bool,
    pub case_sensitive: bool,
    pub keep_whitespace: bool,
    pub keep_empty: bool,
    pub compare_formulas: bool,
    pub compare_kinds: bool,
    pub max_rows: Option<u32>,
    pub max_cols: Option<u32>,
    pub quiet: bool,
    pub verbose: bool,
}

pub fn run(args: DiffArgs) -> Result<ExitCode> {
    let verbosity = if args.quiet {
        Verbosity::Quiet
    } else if args.verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let options = build_options(&args)?;

    let old_wb =
        load(&args.old).with_context(|| format!("Failed to load old workbook: {}", args.old))?;
    let new_wb =
        load(&args.new).with_context(|| format!("Failed to load new workbook: {}", args.new))?;

    // Advisory caps are enforced here, before comparing; the engine never
    // truncates silently.
    check_limits(&options, &old_wb, &args.old)?;
    check_limits(&options, &new_wb, &args.new)?;

    let started = Instant::now();
    let diff = compare(&old_wb, &new_wb, &options).context("Comparison failed")?;
    info!("comparison finished in {:.1?}", started.elapsed());

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match args.format {
        OutputFormat::Text => text::write_text_report(&mut handle, &diff, verbosity)?,
        OutputFormat::Json => json::write_json_report(&mut handle, &diff)?,
    }

    if diff.has_changes() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::from(0))
    }
}

fn build_options(args: &DiffArgs) -> Result<DiffOptions> {
    let mut options = if args.strict {
        DiffOptions::strict()
    } else {
        DiffOptions::lenient()
    };

    if args.case_sensitive {
        options.case_sensitive = true;
    }
    if args.keep_whitespace {
        options.ignore_whitespace = false;
    }
    if args.keep_empty {
        options.ignore_empty_cells = false;
    }
    if args.compare_formulas {
        options.compare_formulas = true;
    }
    if args.compare_kinds {
        options.compare_kinds = true;
    }
    options.max_rows = args.max_rows;
    options.max_cols = args.max_cols;

    options.validate().context("Invalid diff options")?;
    Ok(options)
}

fn check_limits(options: &DiffOptions, workbook: &Workbook, path: &str) -> Result<()> {
    options
        .check_limits(workbook)
        .with_context(|| format!("Workbook exceeds size limits: {path}"))
}
