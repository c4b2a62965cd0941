use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use earnings_data::{TaxRateLoader, default_table};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Csv,
    Json,
}

/// Inspect or convert a state tax-rate table.
///
/// The table may be CSV with a `state,rate` header or a JSON object mapping
/// state names to rates. Without `--file` the bundled table is used.
#[derive(Parser, Debug)]
#[command(name = "earnings-rates")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a `.csv` or `.json` tax-rate table
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Output format for the table
    #[arg(short, long, value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Print only the rate for this state (exact, case-sensitive)
    #[arg(short, long)]
    state: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let table = match &args.file {
        Some(path) => TaxRateLoader::from_path(path)
            .with_context(|| format!("Failed to load tax table: {}", path.display()))?,
        None => default_table().context("Failed to parse bundled tax table")?,
    };

    if let Some(state) = &args.state {
        let rate = table
            .get(state.trim())
            .with_context(|| format!("State '{}' is not in the tax table", state.trim()))?;
        println!("{rate}");
        return Ok(());
    }

    match args.output {
        Output::Text => {
            for (state, rate) in table.iter() {
                println!("{state:<24}{rate}");
            }
            println!("{} states", table.len());
        }
        Output::Csv => TaxRateLoader::write_csv(&table, io::stdout().lock())
            .context("Failed to write CSV")?,
        Output::Json => println!(
            "{}",
            TaxRateLoader::to_json(&table).context("Failed to render JSON")?
        ),
    }

    Ok(())
}
