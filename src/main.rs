//! NACHA Generator CLI
//!
//! Reads transactions from CSV and writes a NACHA ACH file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --destination 071000505 --origin 1234567890 \
//!     --company-name "ACME CORP" --company-id 1234567890 payroll.csv > payroll.ach
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `NACHA_*`: Defaults for the identity and file options below

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::Parser;
use nacha_gen::input::INPUT_DATE_FORMAT;
use nacha_gen::{
    load_batches, BatchDefaults, GeneratorOptions, NachaGenerator, OriginIdentity, Result,
    SecCode,
};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process;

/// Generate a NACHA ACH file from a CSV of transactions
#[derive(Parser, Debug)]
#[command(name = "nacha-gen", version)]
struct Cli {
    /// CSV file: batch,routing_number,account_number,amount,type,id_number,name[,...]
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Immediate destination routing number (9 digits)
    #[arg(long, env = "NACHA_DESTINATION")]
    destination: String,

    /// Immediate origin (10 digits)
    #[arg(long, env = "NACHA_ORIGIN")]
    origin: String,

    /// Company name, truncated to 16 characters
    #[arg(long, env = "NACHA_COMPANY_NAME")]
    company_name: String,

    /// Company identification (10 digits)
    #[arg(long, env = "NACHA_COMPANY_ID")]
    company_id: String,

    /// Immediate destination name for the file header
    #[arg(long, env = "NACHA_DESTINATION_NAME", default_value = "LaSalle Bank N.A.")]
    destination_name: String,

    /// File ID modifier (A-Z, 0-9)
    #[arg(long, env = "NACHA_FILE_ID_MODIFIER", default_value_t = 'A')]
    file_id_modifier: char,

    /// Reference code for the file header
    #[arg(long, env = "NACHA_REFERENCE_CODE", default_value = "")]
    reference_code: String,

    /// SEC code for batches that do not set one
    #[arg(long, default_value = "PPD", value_parser = parse_sec_code)]
    sec_code: SecCode,

    /// Entry description for batches that do not set one
    #[arg(long, default_value = "PAYMENT")]
    entry_description: String,

    /// Effective entry date (YYYY-MM-DD), defaults to the file creation date
    #[arg(long, value_parser = parse_date)]
    effective_date: Option<NaiveDate>,

    /// Sequence number of the first trace number
    #[arg(long, default_value_t = 1)]
    trace_seed: u64,

    /// Pad the file with all-nines lines to a multiple of 10 records
    #[arg(long)]
    pad_blocks: bool,

    /// Freeze the creation time (YYYY-MM-DDTHH:MM) for reproducible output
    #[arg(long, value_parser = parse_timestamp)]
    timestamp: Option<NaiveDateTime>,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_sec_code(s: &str) -> std::result::Result<SecCode, String> {
    s.parse().map_err(|e: nacha_gen::NachaError| e.to_string())
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, INPUT_DATE_FORMAT).map_err(|e| e.to_string())
}

fn parse_timestamp(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").map_err(|e| e.to_string())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let identity = OriginIdentity::new(
        &cli.destination,
        &cli.origin,
        &cli.company_name,
        &cli.company_id,
    )?;
    let options = GeneratorOptions {
        file_id_modifier: cli.file_id_modifier,
        destination_name: cli.destination_name,
        reference_code: cli.reference_code,
        trace_seed: cli.trace_seed,
        pad_blocks: cli.pad_blocks,
    };
    let generator = NachaGenerator::with_options(identity, options)?;

    let now = cli
        .timestamp
        .unwrap_or_else(|| Local::now().naive_local());
    let defaults = BatchDefaults {
        sec_code: cli.sec_code,
        entry_description: cli.entry_description,
        effective_date: cli.effective_date.unwrap_or(now.date()),
    };

    let file = File::open(&cli.input)?;
    let batches = load_batches(BufReader::new(file), &defaults)?;

    match cli.output {
        Some(path) => {
            // A failed generation must not create the output file.
            let text = generator.generate_file(&batches, now)?;
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "{}", text)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            generator.write_file(&batches, now, stdout.lock())?;
        }
    }

    Ok(())
}
