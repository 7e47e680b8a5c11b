use chrono::NaiveDate;
use std::path::PathBuf;

/// The finished artifact of one run: the merged body, the rendered
/// five-section document, and where it was written.
#[derive(Debug, Clone)]
pub struct Report {
    pub date: NaiveDate,
    /// Merged generation output (before the section skeleton is applied)
    pub body: String,
    /// Full markdown document as written to disk
    pub document: String,
    pub path: PathBuf,
}
