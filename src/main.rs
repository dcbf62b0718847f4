use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, Level};

use ddlsort::types::DEFAULT_OUTPUT_PATH;
use ddlsort::{process_sql, ReorderOptions};

#[derive(Parser)]
#[command(name = "ddlsort")]
#[command(about = "Reorder CREATE TABLE statements so referenced tables come first")]
#[command(version)]
#[command(long_about = "ddlsort reads a SQL DDL file, builds the dependency graph implied by its FOREIGN KEY ... REFERENCES clauses and writes the CREATE TABLE blocks back out in an order where every table follows the tables it references. Cyclic foreign keys are reported as an error and no output is written.")]
#[command(after_help = "EXAMPLES:
    # Reorder schema.sql into output.sql
    ddlsort -i schema.sql

    # Choose the output file and keep leading comments/SET statements
    ddlsort -i schema.sql -o ordered.sql --keep-preamble

    # Also write a JSON summary of the run
    ddlsort -i schema.sql --report summary.json")]
struct Cli {
    /// Input SQL file containing CREATE TABLE statements
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Output SQL file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Keep lines that precede the first CREATE TABLE (dropped by default)
    #[arg(long)]
    keep_preamble: bool,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Print the resulting table order to stdout
    #[arg(long)]
    print_order: bool,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    verbose: bool,

    /// Set log level explicitly
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

#[derive(ValueEnum, Clone, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // usage errors exit with 1 rather than clap's 2; help and version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            e.print().context("failed to print usage message")?;
            std::process::exit(code);
        }
    };

    initialize_logging(&cli)?;
    info!("Starting ddlsort v{}", env!("CARGO_PKG_VERSION"));

    let options = ReorderOptions::new(&cli.input)
        .with_output(&cli.output)
        .with_keep_preamble(cli.keep_preamble)
        .with_report(cli.report.clone());

    match process_sql(&options) {
        Ok(summary) => {
            if cli.print_order {
                for table in summary.written_order() {
                    println!("{}", table);
                }
            }
            println!("✅ DDL written in dependency order: {}", summary.output.display());
        }
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Initialize logging based on CLI configuration
fn initialize_logging(cli: &Cli) -> Result<()> {
    let log_level = if let Some(level) = &cli.log_level {
        level.clone().into()
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(cli.verbose)
            .with_line_number(cli.verbose)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_file(cli.verbose)
            .with_line_number(cli.verbose)
            .init();
    }

    Ok(())
}
