//! Activity log source: the storage collaborator's on-disk JSONL format.
//!
//! One file per date, one JSON record per line, written append-only by the
//! capture stack. Records arrive already filtered and chronologically
//! ordered; this module only reads them back.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::models::LogRecord;

pub fn activity_log_path(log_dir: &Path, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("activity_log_{}.jsonl", date.format("%Y-%m-%d")))
}

/// Load the records for one date. A missing file is an empty day, not an
/// error; a malformed line is skipped with a warning so one corrupt write
/// can never lose the rest of the day.
pub fn load_records_for_date(log_dir: &Path, date: NaiveDate) -> Result<Vec<LogRecord>> {
    let path = activity_log_path(log_dir, date);

    if !path.exists() {
        log::warn!("activity log does not exist: {}", path.display());
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(&path)
        .with_context(|| format!("failed to read activity log {}", path.display()))?;

    let mut records = Vec::new();
    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<LogRecord>(line) {
            Ok(mut record) => {
                record.normalize();
                records.push(record);
            }
            Err(err) => {
                log::warn!(
                    "skipping unparsable line {} of {}: {}",
                    line_number + 1,
                    path.display(),
                    err
                );
            }
        }
    }

    log::info!("loaded {} records for {}", records.len(), date);
    Ok(records)
}
