#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the GST return extraction toolkit.
//!
//! Run with a subcommand for scripted use, or without one for a guided
//! interactive session.
//!
//! Uses `indicatif-log-bridge` (via [`gst_extract_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod interactive;
mod output;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use gst_extract_cli_utils::IndicatifProgress;
use gst_extract_extractor::config::embedded_toml;
use gst_extract_pdf::open_source;
use gst_extract_reconcile::{FilterAttribute, FilterSelection, extract_paths, filter};
use gst_extract_returns_models::ReturnKind;
use gst_extract_returns_models::region::{REGION_CODES, region_name};

use crate::output::Outputs;

#[derive(Parser)]
#[command(name = "gst_extract", about = "GST return PDF extraction toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a batch of returns into spreadsheets
    Extract {
        /// Return type of every document (`gstr1` or `gstr3b`)
        #[arg(long, short)]
        kind: ReturnKind,
        /// PDF or JSON layout files, or directories containing them
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Excel workbook to write (default: `<KIND>.xlsx` when no other
        /// output is given)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Directory to write one CSV file per sheet into
        #[arg(long)]
        csv_dir: Option<PathBuf>,
        /// File to write the full batch to as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Custom extraction profile (TOML), see the `profile` command
        #[arg(long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List GSTIN state codes
    Regions,
    /// Print the page layouts of a document as JSON
    Inspect {
        /// PDF or JSON layout file
        file: PathBuf,
    },
    /// Print the built-in extraction profile for a return type
    Profile {
        /// Return type (`gstr1` or `gstr3b`)
        kind: ReturnKind,
    },
}

/// Inclusion filters; each flag may be repeated. "Select All" or no flag
/// means no restriction.
#[derive(Args)]
struct FilterArgs {
    /// Keep documents with this GSTIN
    #[arg(long = "gstin")]
    gstins: Vec<String>,
    /// Keep documents from this state (e.g. "Maharashtra")
    #[arg(long = "region")]
    regions: Vec<String>,
    /// Keep documents with this legal name
    #[arg(long = "legal-name")]
    legal_names: Vec<String>,
    /// Keep documents for this tax period
    #[arg(long = "period")]
    periods: Vec<String>,
    /// Keep documents for this financial year
    #[arg(long = "financial-year")]
    financial_years: Vec<String>,
}

impl FilterArgs {
    fn selection(self) -> FilterSelection {
        FilterSelection::new()
            .with(FilterAttribute::Gstin, self.gstins)
            .with(FilterAttribute::Region, self.regions)
            .with(FilterAttribute::LegalName, self.legal_names)
            .with(FilterAttribute::Period, self.periods)
            .with(FilterAttribute::FinancialYear, self.financial_years)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = gst_extract_cli_utils::init_logger();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("GST Return Extraction");
        println!();
        return interactive::run(&multi);
    };

    match command {
        Commands::Extract {
            kind,
            files,
            output: xlsx,
            csv_dir,
            json,
            config,
            filters,
        } => {
            let profile = output::load_profile(kind, config.as_deref())?;
            let inputs = output::collect_inputs(&files)?;
            log::info!("Extracting {} {kind} document(s)", inputs.len());

            let progress = IndicatifProgress::documents_bar(&multi, "Extracting");
            let start = Instant::now();
            let batch = extract_paths(&profile, &inputs, &progress);
            log::info!("Extraction took {:.1}s", start.elapsed().as_secs_f64());

            let filtered = filter::apply(&batch, &filters.selection());
            output::print_summary(&filtered);

            let mut outputs = Outputs {
                xlsx,
                csv_dir,
                json,
            };
            if outputs.is_empty() {
                outputs.xlsx = Some(output::default_workbook(kind));
            }
            output::write_outputs(&filtered, &outputs)?;
        }
        Commands::Regions => {
            println!("{:<6} STATE", "CODE");
            println!("{}", "-".repeat(50));
            for code in REGION_CODES {
                println!("{code:<6} {}", region_name(code));
            }
        }
        Commands::Inspect { file } => {
            let source = open_source(&file)?;
            let pages = source.pages()?;
            log::info!("{}: {} page(s)", source.name(), pages.len());
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
        Commands::Profile { kind } => {
            print!("{}", embedded_toml(kind));
        }
    }

    Ok(())
}
