mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use log::{LevelFilter, Metadata, Record};
use sheetdiff::CompareError;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "sheetdiff")]
#[command(about = "Compare spreadsheet workbooks and show differences")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Compare two workbooks")]
    Diff {
        #[arg(help = "Path to the old/base workbook")]
        old: String,
        #[arg(help = "Path to the new/changed workbook")]
        new: String,
        #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
        format: OutputFormat,
        #[arg(long, help = "Strict preset: no normalization, compare formulas and kinds")]
        strict: bool,
        #[arg(long, help = "Compare text case-sensitively")]
        case_sensitive: bool,
        #[arg(long, help = "Do not trim whitespace before comparing text")]
        keep_whitespace: bool,
        #[arg(long, help = "Treat trailing blank cells as differences")]
        keep_empty: bool,
        #[arg(long, help = "Treat formula text changes as modifications")]
        compare_formulas: bool,
        #[arg(long, help = "Treat cell kind changes as modifications")]
        compare_kinds: bool,
        #[arg(long, value_name = "N", help = "Refuse to compare sheets taller than N rows")]
        max_rows: Option<u32>,
        #[arg(long, value_name = "N", help = "Refuse to compare sheets wider than N columns")]
        max_cols: Option<u32>,
        #[arg(long, short, help = "Quiet mode: only show summary")]
        quiet: bool,
        #[arg(long, short, help = "Verbose mode: include unchanged rows")]
        verbose: bool,
    },
    #[command(about = "Show information about a workbook")]
    Info {
        #[arg(help = "Path to the workbook")]
        path: String,
    },
}

#[derive(Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_logger();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Diff {
            old,
            new,
            format,
            strict,
            case_sensitive,
            keep_whitespace,
            keep_empty,
            compare_formulas,
            compare_kinds,
            max_rows,
            max_cols,
            quiet,
            verbose,
        } => commands::diff::run(commands::diff::DiffArgs {
            old,
            new,
            format,
            strict,
            case_sensitive,
            keep_whitespace,
            keep_empty,
            compare_formulas,
            compare_kinds,
            max_rows,
            max_cols,
            quiet,
            verbose,
        }),
        Commands::Info { path } => commands::info::run(&path),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for_error(&e)
        }
    }
}

fn exit_code_for_error(err: &anyhow::Error) -> ExitCode {
    if is_internal_error(err) {
        ExitCode::from(3)
    } else {
        ExitCode::from(2)
    }
}

fn is_internal_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<CompareError>(),
            Some(CompareError::Internal { .. })
        )
    })
}

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logger() {
    static LOGGER: StderrLogger = StderrLogger;
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log_level_from_env());
}

fn log_level_from_env() -> LevelFilter {
    match std::env::var("SHEETDIFF_LOG").as_deref() {
        Ok("error") => LevelFilter::Error,
        Ok("warn") => LevelFilter::Warn,
        Ok("info") => LevelFilter::Info,
        Ok("debug") => LevelFilter::Debug,
        Ok("trace") => LevelFilter::Trace,
        Ok("off") => LevelFilter::Off,
        _ => LevelFilter::Warn,
    }
}
