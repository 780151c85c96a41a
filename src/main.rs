//! churnmap - Designite/churn dataset mapper
//!
//! This is the main entry point for the churnmap command-line interface.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use churnmap::mapper::{MapSummary, Mapper, MapperConfig};

#[derive(Parser, Debug)]
#[command(name = "churnmap", version, about = "Join a Designite CSV with a churn CSV by commit and file")]
struct Cli {
    /// Designite CSV (child_commit_id|commit_id, file_path, metrics...)
    designite_csv: PathBuf,

    /// Churn CSV (child_commit|commit_id, new_path, [old_path], metrics...)
    churn_csv: PathBuf,

    /// Merged CSV to write; its parent directory is created if missing
    output_csv: PathBuf,

    /// Suffix for churn columns whose name is already taken
    #[arg(long, default_value = "_churn")]
    clash_suffix: String,

    /// Field delimiter for input and output
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Only quote output fields that need it
    #[arg(long)]
    no_quote_all: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    summary_json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if !cli.delimiter.is_ascii() {
        eprintln!("Error: delimiter must be a single ASCII character");
        return ExitCode::FAILURE;
    }

    let config = MapperConfig::new(&cli.designite_csv, &cli.churn_csv, &cli.output_csv)
        .clash_suffix(cli.clash_suffix.as_str())
        .delimiter(cli.delimiter as u8)
        .quote_all(!cli.no_quote_all);

    match Mapper::new(config).run() {
        Ok(summary) => {
            print_summary(&summary, cli.summary_json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &MapSummary, as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("could not render summary as json: {}", e),
        }
        return;
    }
    println!("Mapped rows: {}", summary.unique_rows);
    println!("Wrote: {}", summary.output_path.display());
}
