#![forbid(unsafe_code)]
//! Runs a ledger command script and prints its output.

use clap::Parser;
use colored::*;
use hashledger::config::{load_config, DEFAULT_CONFIG_PATH};
use hashledger::script::{Interpreter, LineOutcome, ScriptReport};
use hashledger::Ledger;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Script file with one command per line
    script: PathBuf,
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Start with the ledger described in the configuration instead of
    /// waiting for a create-ledger command
    #[arg(long)]
    preload: bool,
    /// Emit a JSON report instead of plain text
    #[arg(long)]
    json: bool,
    /// Log at debug level regardless of the configured level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.logging.max_level()?
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut interpreter = if cli.preload {
        Interpreter::with_ledger(Ledger::from_config(&config.ledger))
    } else {
        Interpreter::new()
    };

    let file = File::open(&cli.script)
        .map_err(|e| format!("Failed to open script {}: {}", cli.script.display(), e))?;
    let report = interpreter.run_script(BufReader::new(file))?;

    if cli.json {
        print_json(&report)?;
    } else {
        print_text(&report);
    }

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_text(report: &ScriptReport) {
    for outcome in &report.outcomes {
        match outcome {
            LineOutcome::Output { lines, .. } => {
                for line in lines {
                    if line.starts_with('#') {
                        println!("{}", line.bright_black());
                    } else {
                        println!("{}", line);
                    }
                }
            }
            LineOutcome::Failed(err) => {
                println!("{}", err.to_string().red());
            }
        }
    }
}

fn print_json(report: &ScriptReport) -> Result<(), serde_json::Error> {
    let outcomes: Vec<serde_json::Value> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            LineOutcome::Output { line, lines } => serde_json::json!({
                "line": line,
                "output": lines,
            }),
            LineOutcome::Failed(err) => serde_json::json!({
                "line": err.line,
                "command": err.command,
                "error": err.source.to_string(),
            }),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&outcomes)?);
    Ok(())
}
