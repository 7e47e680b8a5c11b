use chrono::{DateTime, Duration, FixedOffset};

use crate::models::LogRecord;

/// A run of records with no inter-record gap at or above the configured
/// threshold. Never mutated after creation; lives for one run.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub records: Vec<&'a LogRecord>,
}

impl<'a> Session<'a> {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Lazily walks the day's ordered records and yields one session per run.
/// Re-deriving from the same input yields identical sessions.
pub struct Sessions<'a> {
    records: &'a [LogRecord],
    pos: usize,
    gap: Duration,
}

impl<'a> Iterator for Sessions<'a> {
    type Item = Session<'a>;

    fn next(&mut self) -> Option<Session<'a>> {
        let records = self.records;
        if self.pos >= records.len() {
            return None;
        }

        let first = &records[self.pos];
        let mut members: Vec<&'a LogRecord> = vec![first];
        let mut prev = first.timestamp;
        let mut end = first.timestamp;
        self.pos += 1;

        while self.pos < records.len() {
            let record = &records[self.pos];
            let mut gap = record.timestamp - prev;

            // Clock skew in the capture stream must not fail the run:
            // clamp the gap to zero and keep the record in this session.
            if gap < Duration::zero() {
                log::warn!(
                    "non-monotonic timestamp at {} (previous {}), clamping gap to zero",
                    record.timestamp,
                    prev
                );
                gap = Duration::zero();
            }

            if gap >= self.gap {
                break;
            }

            members.push(record);
            prev = record.timestamp;
            if record.timestamp > end {
                end = record.timestamp;
            }
            self.pos += 1;
        }

        Some(Session {
            start: first.timestamp,
            end,
            records: members,
        })
    }
}

/// Split the day's ordered records into sessions by time-gap threshold.
/// A gap of `gap_minutes` or more between consecutive records closes the
/// current session. Empty input yields no sessions.
pub fn split_into_sessions(records: &[LogRecord], gap_minutes: i64) -> Sessions<'_> {
    Sessions {
        records,
        pos: 0,
        gap: Duration::minutes(gap_minutes),
    }
}
