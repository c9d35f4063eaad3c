//! Shared plumbing for the batch command and the interactive flow: input
//! discovery, profile loading, writing outputs and the terminal summary.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use gst_extract_export::{CsvSink, SheetSink, XlsxSink, sheets_from_batch};
use gst_extract_extractor::ReturnProfile;
use gst_extract_reconcile::BatchResult;
use gst_extract_returns_models::ReturnKind;

/// Extensions accepted when scanning a directory for documents.
const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "json"];

/// Expands directories into the documents they contain (sorted by name,
/// non-recursive). Files are passed through as given, in order.
///
/// # Errors
///
/// Returns an error if a directory cannot be read.
pub fn collect_inputs(paths: &[PathBuf]) -> std::io::Result<Vec<PathBuf>> {
    let mut inputs = Vec::with_capacity(paths.len());

    for path in paths {
        if !path.is_dir() {
            inputs.push(path.clone());
            continue;
        }

        let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_document(p))
            .collect();
        entries.sort();

        log::debug!("{}: {} document(s)", path.display(), entries.len());
        inputs.extend(entries);
    }

    Ok(inputs)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DOCUMENT_EXTENSIONS.iter().any(|d| e.eq_ignore_ascii_case(d)))
}

/// Loads the profile for `kind`: from `config` when given, else the
/// built-in one.
///
/// # Errors
///
/// Returns an error if the config file is invalid or describes a different
/// return type.
pub fn load_profile(
    kind: ReturnKind,
    config: Option<&Path>,
) -> Result<ReturnProfile, Box<dyn std::error::Error>> {
    let Some(path) = config else {
        return Ok(ReturnProfile::embedded(kind));
    };

    let profile = ReturnProfile::from_path(path)?;
    if profile.kind != kind {
        return Err(format!(
            "{} is a {} profile, but {kind} was requested",
            path.display(),
            profile.kind
        )
        .into());
    }
    Ok(profile)
}

/// Where to write a batch.
#[derive(Debug, Default)]
pub struct Outputs {
    pub xlsx: Option<PathBuf>,
    pub csv_dir: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl Outputs {
    /// Whether no destination is set.
    pub const fn is_empty(&self) -> bool {
        self.xlsx.is_none() && self.csv_dir.is_none() && self.json.is_none()
    }
}

/// Default workbook path for a batch of `kind` returns.
pub fn default_workbook(kind: ReturnKind) -> PathBuf {
    PathBuf::from(format!("{kind}.xlsx"))
}

/// Writes `batch` to every destination in `outputs`.
///
/// # Errors
///
/// Returns an error if any destination cannot be written.
pub fn write_outputs(
    batch: &BatchResult,
    outputs: &Outputs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sinks: Vec<Box<dyn SheetSink>> = Vec::new();
    if let Some(path) = &outputs.xlsx {
        sinks.push(Box::new(XlsxSink::new(path)));
    }
    if let Some(dir) = &outputs.csv_dir {
        sinks.push(Box::new(CsvSink::new(dir)));
    }

    if !sinks.is_empty() {
        let sheets = sheets_from_batch(batch);
        for sink in &sinks {
            sink.write(&sheets)?;
            println!("Wrote {}", sink.target().display());
        }
    }

    if let Some(path) = &outputs.json {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, batch)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

/// Prints one line per document and per failure.
pub fn print_summary(batch: &BatchResult) {
    println!();
    println!(
        "{:<32} {:<17} {:<24} {:<12} {:>6}",
        "FILE", "GSTIN", "STATE", "PERIOD", "ROWS"
    );
    println!("{}", "-".repeat(95));

    for document in &batch.documents {
        let rows: usize = document.tables.iter().map(|t| t.rows.len()).sum();
        println!(
            "{:<32} {:<17} {:<24} {:<12} {:>6}",
            truncate(&document.file_name, 32),
            document.fields.gstin.as_deref().unwrap_or("-"),
            truncate(&document.region, 24),
            document.fields.period.as_deref().unwrap_or("-"),
            rows
        );
    }

    for failure in &batch.failures {
        println!(
            "{:<32} FAILED: {}",
            truncate(&failure.file_name, 32),
            failure.message
        );
    }

    println!();
    println!(
        "{} {} document(s), {} failure(s)",
        batch.kind,
        batch.documents.len(),
        batch.failures.len()
    );
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
