//! Interactive flow for users who don't want to memorize flags.
//!
//! Walks through return type, input documents, per-attribute filters
//! ("Select All" plus every value present in the batch) and output
//! destinations using `dialoguer` prompts.

use std::path::PathBuf;
use std::time::Instant;

use dialoguer::{Input, MultiSelect, Select};
use gst_extract_cli_utils::{IndicatifProgress, MultiProgress};
use gst_extract_reconcile::filter::{self, available_values};
use gst_extract_reconcile::{BatchResult, FilterAttribute, FilterSelection, SELECT_ALL, extract_paths};
use gst_extract_returns_models::ReturnKind;

use crate::output::{self, Outputs};

/// Output destinations offered after extraction.
enum Destination {
    Xlsx,
    CsvDir,
    Json,
    Done,
}

impl Destination {
    const ALL: &[Self] = &[Self::Xlsx, Self::CsvDir, Self::Json, Self::Done];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Xlsx => "Save Excel workbook",
            Self::CsvDir => "Save CSV files",
            Self::Json => "Save JSON",
            Self::Done => "Done",
        }
    }
}

/// Runs the interactive flow.
///
/// # Errors
///
/// Returns an error if a prompt fails, no documents are found, or an
/// output cannot be written.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let kind_labels: Vec<String> = ReturnKind::all().iter().map(ToString::to_string).collect();
    let idx = Select::new()
        .with_prompt("Select return type")
        .items(&kind_labels)
        .default(0)
        .interact()?;
    let kind = ReturnKind::all()[idx];

    let raw: String = Input::new()
        .with_prompt("PDF files or directories (comma-separated)")
        .interact_text()?;
    let paths: Vec<PathBuf> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect();
    let inputs = output::collect_inputs(&paths)?;
    if inputs.is_empty() {
        println!("No documents found.");
        return Ok(());
    }

    let profile = output::load_profile(kind, None)?;
    let progress = IndicatifProgress::documents_bar(multi, "Extracting");
    let start = Instant::now();
    let batch = extract_paths(&profile, &inputs, &progress);
    log::info!("Extraction took {:.1}s", start.elapsed().as_secs_f64());

    let selection = prompt_filters(&batch)?;
    let filtered = filter::apply(&batch, &selection);
    output::print_summary(&filtered);

    loop {
        let labels: Vec<&str> = Destination::ALL.iter().map(Destination::label).collect();
        let idx = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        let outputs = match Destination::ALL[idx] {
            Destination::Xlsx => Outputs {
                xlsx: Some(prompt_path(
                    "Workbook path",
                    &output::default_workbook(kind).display().to_string(),
                )?),
                ..Outputs::default()
            },
            Destination::CsvDir => Outputs {
                csv_dir: Some(prompt_path("CSV directory", "csv")?),
                ..Outputs::default()
            },
            Destination::Json => Outputs {
                json: Some(prompt_path("JSON path", &format!("{kind}.json"))?),
                ..Outputs::default()
            },
            Destination::Done => break,
        };

        if let Err(e) = output::write_outputs(&filtered, &outputs) {
            log::error!("Failed to write output: {e}");
        }
    }

    Ok(())
}

/// Prompts for a value selection on every attribute with more than one
/// distinct value. "Select All" starts checked.
fn prompt_filters(batch: &BatchResult) -> Result<FilterSelection, Box<dyn std::error::Error>> {
    let mut selection = FilterSelection::new();

    for attribute in FilterAttribute::all() {
        let values = available_values(&batch.documents, *attribute);
        if values.len() < 2 {
            continue;
        }

        let items: Vec<String> = std::iter::once(SELECT_ALL.to_owned())
            .chain(values.iter().map(|v| display_value(v)))
            .collect();
        let mut defaults = vec![false; items.len()];
        defaults[0] = true;

        let chosen = MultiSelect::new()
            .with_prompt(format!(
                "Filter by {} (space=toggle, enter=confirm)",
                attribute.label()
            ))
            .items(&items)
            .defaults(&defaults)
            .max_length(20)
            .interact()?;

        // Index 0 is the sentinel; the rest map back onto raw values.
        selection.select(
            *attribute,
            chosen.into_iter().map(|i| {
                if i == 0 {
                    SELECT_ALL.to_owned()
                } else {
                    values[i - 1].clone()
                }
            }),
        );
    }

    Ok(selection)
}

fn display_value(value: &str) -> String {
    if value.is_empty() {
        "(blank)".to_owned()
    } else {
        value.to_owned()
    }
}

fn prompt_path(prompt: &str, default: &str) -> Result<PathBuf, dialoguer::Error> {
    let path: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_owned())
        .interact_text()?;
    Ok(PathBuf::from(path))
}
