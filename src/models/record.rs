//! Activity record data model.
//!
//! Represents one timestamped capture of the active app/window plus its
//! OCR'd screen text, as written by the upstream capture collaborator.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One per-minute activity capture. Immutable once loaded; the pipeline
/// stages only read references to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    /// Offset-aware capture instant (ISO 8601 with offset on the wire)
    pub timestamp: DateTime<FixedOffset>,
    pub app_name: String,
    #[serde(default)]
    pub window_title: String,
    #[serde(default)]
    pub ocr_text: String,
    /// Character count of `ocr_text`; recomputed on load when absent
    #[serde(default)]
    pub ocr_length: usize,
}

impl LogRecord {
    /// Restore the `ocr_length == chars(ocr_text)` invariant for records
    /// written by older collaborators that omitted the field.
    pub fn normalize(&mut self) {
        let chars = self.ocr_text.chars().count();
        if self.ocr_length != chars {
            self.ocr_length = chars;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_format() {
        let line = r#"{"timestamp":"2025-06-01T09:00:00+09:00","app_name":"Terminal","window_title":"zsh","ocr_text":"cargo build","ocr_length":11}"#;
        let record: LogRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.app_name, "Terminal");
        assert_eq!(record.timestamp.offset().local_minus_utc(), 9 * 3600);
        assert_eq!(record.ocr_length, 11);
    }

    #[test]
    fn normalize_recomputes_char_count() {
        let line = r#"{"timestamp":"2025-06-01T09:00:00+00:00","app_name":"Notes","ocr_text":"日本語テキスト"}"#;
        let mut record: LogRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.ocr_length, 0);
        record.normalize();
        assert_eq!(record.ocr_length, 7);
    }
}
