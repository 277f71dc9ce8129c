//! oaemend - normalize and downgrade OpenAPI/Swagger documents
//!
//! A command line front-end over the `oaemend` library. Owns all file I/O
//! and JSON (de)serialization; the library itself never touches a path.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use oaemend::error::Diagnostic;

#[derive(Parser)]
#[command(name = "oaemend")]
#[command(about = "Normalize Swagger 2.0 / OpenAPI 3.0 / 3.1 documents into the emended dialect, or downgrade back")]
#[command(version)]
struct Cli {
    /// Output location. Use '-' for stdout.
    #[arg(short, long, default_value = "-")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upgrade a Swagger 2.0 / OpenAPI 3.0 / 3.1 document into the emended dialect
    Upgrade {
        /// Path to the source document
        file: PathBuf,
    },

    /// Downgrade a document into an older dialect
    Downgrade {
        /// Path to the source document (any dialect `upgrade` accepts)
        file: PathBuf,

        /// Target version: "2.0" or "3.0"
        #[arg(short, long)]
        target: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Commands::Upgrade { file } => {
            let value = read_document(&file)?;
            let (doc, diagnostics) = oaemend::convert(&value)?;
            report_diagnostics(&diagnostics);
            let rendered = serde_json::to_string_pretty(&doc)?;
            writeln!(output, "{rendered}")?;
        }
        Commands::Downgrade { file, target } => {
            let value = read_document(&file)?;
            let (doc, mut diagnostics) = oaemend::convert(&value)?;
            let (rendered_value, downgrade_diagnostics) = oaemend::downgrade(&doc, &target)?;
            diagnostics.extend(downgrade_diagnostics);
            report_diagnostics(&diagnostics);
            let rendered = serde_json::to_string_pretty(&rendered_value)?;
            writeln!(output, "{rendered}")?;
        }
    }

    Ok(())
}

fn read_document(file: &PathBuf) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(file).map_err(|e| format!("Failed to read file {file:?}: {e}"))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse {file:?} as JSON: {e}").into())
}

fn report_diagnostics(diagnostics: &[Diagnostic]) {
    if !diagnostics.is_empty() {
        eprintln!("{} diagnostic(s) recorded (see logs for detail)", diagnostics.len());
    }
}
