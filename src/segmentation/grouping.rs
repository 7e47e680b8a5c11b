use chrono::{DateTime, FixedOffset};

use crate::models::LogRecord;
use crate::segmentation::Session;

/// Consecutive records in one session sharing the same (app, window)
/// context, folded into a single block. Owns its merged text but not the
/// underlying records.
#[derive(Debug, Clone)]
pub struct SessionGroup<'a> {
    /// Which session this group came from (0-based, in session order)
    pub session_index: usize,
    pub app_name: &'a str,
    pub window_title: &'a str,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// Ordered, newline-joined concatenation of the members' OCR text
    pub merged_text: String,
    pub member_count: usize,
    /// Sum of the members' `ocr_length`
    pub total_chars: usize,
}

impl<'a> SessionGroup<'a> {
    fn new(session_index: usize, record: &'a LogRecord) -> Self {
        let mut group = Self {
            session_index,
            app_name: &record.app_name,
            window_title: &record.window_title,
            start: record.timestamp,
            end: record.timestamp,
            merged_text: String::new(),
            member_count: 0,
            total_chars: 0,
        };
        group.push(record);
        group
    }

    fn push(&mut self, record: &'a LogRecord) {
        self.end = record.timestamp;
        self.member_count += 1;
        self.total_chars += record.ocr_length;
        if !record.ocr_text.is_empty() {
            if !self.merged_text.is_empty() {
                self.merged_text.push('\n');
            }
            self.merged_text.push_str(&record.ocr_text);
        }
    }

    fn matches(&self, record: &LogRecord) -> bool {
        self.app_name == record.app_name && self.window_title == record.window_title
    }
}

/// Collapse each session's consecutive same-context records into groups.
/// A change in either app_name or window_title always starts a new group,
/// so concatenating the output reproduces the record order exactly.
pub fn group_sessions<'a>(sessions: &[Session<'a>]) -> Vec<SessionGroup<'a>> {
    let mut groups = Vec::new();

    for (session_index, session) in sessions.iter().enumerate() {
        let mut current: Option<SessionGroup<'a>> = None;

        for &record in &session.records {
            match &mut current {
                Some(group) if group.matches(record) => group.push(record),
                _ => {
                    if let Some(group) = current.take() {
                        groups.push(group);
                    }
                    current = Some(SessionGroup::new(session_index, record));
                }
            }
        }

        if let Some(group) = current.take() {
            groups.push(group);
        }
    }

    groups
}
