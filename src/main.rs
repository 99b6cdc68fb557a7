//! ychaos - test plan tooling for YChaos chaos experiments.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use ychaos::ValidationError;
use ychaos::batch::{BatchReport, validate_paths};
use ychaos::testplan::schema_reference;

/// ychaos - chaos experiment tooling
#[derive(Parser, Debug)]
#[command(name = "ychaos")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Work with test plans
    #[command(subcommand)]
    Testplan(TestplanCommands),
}

#[derive(Subcommand, Debug)]
enum TestplanCommands {
    /// Validate test plan files
    Validate {
        /// Space separated list of file/directory paths to validate
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the field reference of every test plan schema
    Schema,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Testplan(TestplanCommands::Validate { paths, format }) => {
            let report = validate_paths(&paths);
            match format {
                Format::Text => print_text(&report),
                Format::Json => print_json(&report)?,
            }
            Ok(ExitCode::from(report.exit_code()))
        }
        Commands::Testplan(TestplanCommands::Schema) => {
            println!("{}", schema_reference());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_text(report: &BatchReport) {
    if report.files.is_empty() {
        println!("{}", "No test plans found".yellow());
        return;
    }

    for file in &report.files {
        let path = file.path.display();
        match &file.outcome {
            Ok(_) => println!("{} {}", "✔".green(), path.to_string().green()),
            Err(e) if e.is_not_found() => {
                println!("{} {} {}", "✘".red(), path.to_string().red(), "not found".italic())
            }
            Err(e) => {
                println!("{} {}", "✘".red().bold(), path.to_string().red().bold());
                match e.validation() {
                    Some(failure) => {
                        for error in &failure.errors {
                            println!("    {}", error.display_path().bold());
                            println!("      {} ({})", error.message, error.kind);
                        }
                    }
                    None => println!("    {}", e),
                }
            }
        }
    }

    println!();
    println!(
        "{} passed, {} failed",
        report.passed().to_string().green(),
        report.failed().to_string().red()
    );
}

#[derive(Serialize)]
struct JsonReport {
    success: bool,
    passed: usize,
    failed: usize,
    files: Vec<JsonFile>,
}

#[derive(Serialize)]
struct JsonFile {
    path: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<ValidationError>,
}

fn print_json(report: &BatchReport) -> Result<()> {
    let files = report
        .files
        .iter()
        .map(|file| {
            let (error, errors) = match &file.outcome {
                Ok(_) => (None, Vec::new()),
                Err(e) => match e.validation() {
                    Some(failure) => (None, failure.errors.clone()),
                    None => (Some(e.to_string()), Vec::new()),
                },
            };
            JsonFile {
                path: file.path.display().to_string(),
                valid: file.is_valid(),
                error,
                errors,
            }
        })
        .collect();

    let json = JsonReport {
        success: report.is_success(),
        passed: report.passed(),
        failed: report.failed(),
        files,
    };
    let out = serde_json::to_string_pretty(&json).context("failed to render JSON report")?;
    println!("{}", out);
    Ok(())
}
