//! CSV record sink
//!
//! One file per locality and run: `therapists_<locality>_<timestamp>.csv`.
//! The header is written when the file is created; later pages append rows.

use crate::extract::TherapistRecord;
use crate::output::traits::RecordSink;
use crate::state::LocalityTarget;
use crate::OutputResult;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Timestamp format used in output file names
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S";

/// Formats the run timestamp embedded in file names
pub fn format_run_timestamp<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(RUN_TIMESTAMP_FORMAT).to_string()
}

/// Appends records to per-locality CSV files
#[derive(Debug, Clone)]
pub struct CsvOutput {
    directory: PathBuf,
    run_timestamp: String,
}

impl CsvOutput {
    pub fn new(directory: impl Into<PathBuf>, run_timestamp: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            run_timestamp: run_timestamp.into(),
        }
    }

    /// A sink stamped with the current local time
    pub fn for_current_run(directory: impl Into<PathBuf>) -> Self {
        Self::new(directory, format_run_timestamp(&Local::now()))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn run_timestamp(&self) -> &str {
        &self.run_timestamp
    }

    /// File receiving a locality's records for this run
    pub fn path_for(&self, target: &LocalityTarget) -> PathBuf {
        self.directory.join(format!(
            "therapists_{}_{}.csv",
            target.locality_name, self.run_timestamp
        ))
    }
}

impl RecordSink for CsvOutput {
    fn append(
        &mut self,
        target: &LocalityTarget,
        records: &[TherapistRecord],
    ) -> OutputResult<PathBuf> {
        fs::create_dir_all(&self.directory)?;

        let path = self.path_for(target);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer.write_record(TherapistRecord::COLUMNS)?;
        }

        for record in records {
            writer.write_record(encode_row(record)?)?;
        }

        writer.flush()?;

        tracing::debug!("Appended {} rows to {}", records.len(), path.display());
        Ok(path)
    }
}

/// Renders a record as cells in `TherapistRecord::COLUMNS` order
///
/// `None` becomes an empty cell; lists become JSON arrays.
pub fn encode_row(record: &TherapistRecord) -> OutputResult<Vec<String>> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    let list = |values: &[String]| serde_json::to_string(values);

    Ok(vec![
        record.region_code.clone(),
        optional(&record.locality_name),
        optional(&record.street_address_1),
        optional(&record.street_address_2),
        optional(&record.zip_1),
        optional(&record.zip_2),
        record.display_name.clone(),
        record.title.clone(),
        optional(&record.telephone),
        match &record.insurance_providers {
            Some(providers) => list(providers)?,
            None => String::new(),
        },
        list(&record.specialties)?,
        optional(&record.individual_session_price),
        optional(&record.couple_session_price),
        list(&record.therapy_types)?,
        list(&record.client_ages_served)?,
    ])
}
