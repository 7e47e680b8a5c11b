use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Deterministic date-keyed filename, with an optional time suffix for
/// keeping multiple generations of the same day side by side.
pub fn build_report_filename(date: NaiveDate, timestamp: Option<&str>) -> String {
    let date = date.format("%Y-%m-%d");
    match timestamp {
        Some(ts) => {
            let safe = ts.replace(':', "-").replace(' ', "_");
            format!("report_{date}_{safe}.md")
        }
        None => format!("report_{date}.md"),
    }
}

/// Persist the rendered document atomically: write a temp file in the
/// destination directory, then rename over the final path. A crash or
/// cancellation mid-write leaves either the previous report or none, never
/// a truncated one.
pub fn save_report(
    document: &str,
    report_dir: &Path,
    date: NaiveDate,
    timestamp: Option<&str>,
) -> Result<PathBuf> {
    fs::create_dir_all(report_dir)
        .with_context(|| format!("failed to create report dir {}", report_dir.display()))?;

    let path = report_dir.join(build_report_filename(date, timestamp));
    let tmp_path = path.with_extension("md.tmp");

    fs::write(&tmp_path, document)
        .with_context(|| format!("failed to write report to {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path).with_context(|| {
        format!(
            "failed to move report into place at {}",
            path.display()
        )
    })?;

    log::info!("report saved: {}", path.display());
    Ok(path)
}
