use crate::domain::model::{ClassificationLabel, Evaluation};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub const REPORT_HEADER: [&str; 5] = ["neighborhood", "day", "liters", "excess_percent", "label"];

/// One CSV line per evaluated reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub neighborhood: String,
    pub day: usize,
    pub liters: f64,
    pub excess_percent: f64,
    pub label: ClassificationLabel,
}

impl ReportRow {
    pub fn new(neighborhood: &str, day: usize, evaluation: &Evaluation) -> Self {
        Self {
            neighborhood: neighborhood.to_string(),
            day,
            liters: evaluation.liters,
            excess_percent: evaluation.excess_percent,
            label: evaluation.label,
        }
    }
}

/// Writes the header even when there are no rows.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(REPORT_HEADER)?;
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_report_file<P: AsRef<Path>>(path: P, rows: &[ReportRow]) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(&path)?;
    write_report(file, rows)?;
    tracing::info!("📄 Report written to {}", path.as_ref().display());
    Ok(())
}
