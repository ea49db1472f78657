use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use fiscal_frame_builder::{FactsInventory, FiscalFrameProcessor};

const USAGE: &str = "Usage: fiscal-trim <facts-inventory.json>";

/// Reconciles a ticker's facts inventory into fiscal-quarter-aligned statements.
///
/// Writes `<input-basename>-trimmed.json` next to the input and prints its path.
/// `FISCAL_YEAR_END` (MMDD) sets the fiscal year end when the input does not.
#[derive(Debug, Parser)]
#[command(name = "fiscal-trim", version)]
struct Cli {
    /// Path to the facts inventory JSON file
    input: Option<PathBuf>,

    /// Print the JSON Schema of the input document and exit
    #[arg(long)]
    schema: bool,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.schema {
        return match FactsInventory::schema_as_json() {
            Ok(schema) => {
                println!("{schema}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("{err}");
                ExitCode::from(1)
            }
        };
    }

    let Some(input) = cli.input else {
        eprintln!("{USAGE}");
        return ExitCode::from(1);
    };

    match FiscalFrameProcessor::process_file(&input) {
        Ok(output_path) => {
            println!("{}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}
