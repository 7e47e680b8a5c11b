//! Packs the day's ordered session groups into character-bounded chunks for
//! the generation backend.
//!
//! Packing is greedy and order-preserving: reading chunks in index order,
//! then groups within a chunk in packing order, reproduces exactly the
//! day's grouped sequence. Lengths are measured in Unicode scalar values
//! and whole groups are never split, so a multi-byte character can never be
//! cut in half.

use std::fmt::Write as _;

use crate::segmentation::SessionGroup;

/// One size-bounded batch of groups, sent as a single generation request.
#[derive(Debug, Clone)]
pub struct Chunk<'a> {
    /// 0-based; defines merge order in the final document
    pub index: usize,
    pub groups: Vec<&'a SessionGroup<'a>>,
    /// Serialized payload exactly as the backend will see it
    pub text: String,
    /// Length of `text` in Unicode scalar values
    pub char_len: usize,
    /// A single group alone exceeded the budget; it was kept whole rather
    /// than split, and truncation is deferred to the backend
    pub oversized: bool,
}

/// Serialize one group: header block, merged OCR text and separator, with a
/// session-boundary marker prepended when this group opens a new session
/// (only meaningful when the day has more than one session).
fn serialize_unit(
    group: &SessionGroup<'_>,
    prev_session: Option<usize>,
    session_count: usize,
) -> String {
    let mut unit = String::new();

    if session_count > 1 && prev_session != Some(group.session_index) {
        let _ = writeln!(
            unit,
            "=== Session {}/{} ===\n",
            group.session_index + 1,
            session_count
        );
    }

    let _ = writeln!(unit, "[{}]", group.app_name);
    if !group.window_title.is_empty() {
        let _ = writeln!(unit, "Window: {}", group.window_title);
    }
    let _ = writeln!(
        unit,
        "Time: {} - {}",
        group.start.to_rfc3339(),
        group.end.to_rfc3339()
    );
    let _ = writeln!(
        unit,
        "Entries: {}, chars: {}",
        group.member_count, group.total_chars
    );
    unit.push('\n');

    if !group.merged_text.is_empty() {
        unit.push_str(&group.merged_text);
        unit.push('\n');
    }

    unit.push_str("\n---\n\n");
    unit
}

/// Greedy order-preserving bin packing of the grouped day into chunks of at
/// most `chunk_chars` characters each.
pub fn build_chunks<'a>(
    groups: &'a [SessionGroup<'a>],
    session_count: usize,
    chunk_chars: usize,
) -> Vec<Chunk<'a>> {
    let mut chunks: Vec<Chunk<'a>> = Vec::new();
    let mut current_groups: Vec<&'a SessionGroup<'a>> = Vec::new();
    let mut current_text = String::new();
    let mut current_len = 0usize;
    let mut prev_session: Option<usize> = None;

    let close = |groups: &mut Vec<&'a SessionGroup<'a>>,
                     text: &mut String,
                     len: &mut usize,
                     chunks: &mut Vec<Chunk<'a>>| {
        if groups.is_empty() {
            return;
        }
        chunks.push(Chunk {
            index: chunks.len(),
            groups: std::mem::take(groups),
            text: std::mem::take(text),
            char_len: *len,
            oversized: *len > chunk_chars,
        });
        *len = 0;
    };

    for group in groups {
        let unit = serialize_unit(group, prev_session, session_count);
        prev_session = Some(group.session_index);
        let unit_len = unit.chars().count();

        if !current_groups.is_empty() && current_len + unit_len > chunk_chars {
            close(
                &mut current_groups,
                &mut current_text,
                &mut current_len,
                &mut chunks,
            );
        }

        current_groups.push(group);
        current_text.push_str(&unit);
        current_len += unit_len;
    }

    close(
        &mut current_groups,
        &mut current_text,
        &mut current_len,
        &mut chunks,
    );

    log::info!(
        "packed {} groups into {} chunks (budget {} chars)",
        groups.len(),
        chunks.len(),
        chunk_chars
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::sessions::tests::record;
    use crate::segmentation::{group_sessions, split_into_sessions, Session};
    use crate::models::LogRecord;

    fn grouped(records: &[LogRecord]) -> (Vec<Session<'_>>, usize) {
        let sessions: Vec<Session> = split_into_sessions(records, 10).collect();
        let count = sessions.len();
        (sessions, count)
    }

    // Three same-shape groups so every serialized unit has the same length.
    fn three_group_day() -> Vec<LogRecord> {
        vec![
            record("2025-06-01T09:00:00+00:00", "AppA", "win", "aaaaaaaaaa"),
            record("2025-06-01T09:01:00+00:00", "AppB", "win", "bbbbbbbbbb"),
            record("2025-06-01T09:02:00+00:00", "AppC", "win", "cccccccccc"),
        ]
    }

    #[test]
    fn two_units_per_chunk_when_third_would_overflow() {
        let records = three_group_day();
        let (sessions, session_count) = grouped(&records);
        let groups = group_sessions(&sessions);
        let unit_len = serialize_unit(&groups[0], None, session_count)
            .chars()
            .count();

        // Budget fits two units but not three: expect chunks of 2 + 1.
        let chunks = build_chunks(&groups, session_count, unit_len * 2);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].groups.len(), 2);
        assert_eq!(chunks[0].char_len, unit_len * 2);
        assert_eq!(chunks[1].groups.len(), 1);
        assert!(!chunks[0].oversized);
        assert!(!chunks[1].oversized);
    }

    #[test]
    fn single_group_over_budget_becomes_oversized_chunk() {
        let records = vec![record(
            "2025-06-01T09:00:00+00:00",
            "AppA",
            "win",
            &"x".repeat(80),
        )];
        let (sessions, session_count) = grouped(&records);
        let groups = group_sessions(&sessions);

        let chunks = build_chunks(&groups, session_count, 50);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].groups.len(), 1);
        assert!(chunks[0].oversized);
        assert!(chunks[0].char_len > 50);
        // The group was kept whole, never split.
        assert!(chunks[0].text.contains(&"x".repeat(80)));
    }

    #[test]
    fn greedy_packing_is_optimal_under_order_constraint() {
        let records = three_group_day();
        let (sessions, session_count) = grouped(&records);
        let groups = group_sessions(&sessions);
        let unit_len = serialize_unit(&groups[0], None, session_count)
            .chars()
            .count();

        let chunks = build_chunks(&groups, session_count, unit_len * 2);
        // No two adjacent chunks could be merged without exceeding the budget.
        for pair in chunks.windows(2) {
            assert!(pair[0].char_len + pair[1].char_len > unit_len * 2);
        }
    }

    #[test]
    fn index_order_reconstructs_grouped_sequence() {
        let records = vec![
            record("2025-06-01T09:00:00+00:00", "AppA", "w", "one"),
            record("2025-06-01T09:01:00+00:00", "AppB", "w", "two"),
            record("2025-06-01T09:30:00+00:00", "AppC", "w", "three"),
            record("2025-06-01T09:31:00+00:00", "AppD", "w", "four"),
        ];
        let (sessions, session_count) = grouped(&records);
        let groups = group_sessions(&sessions);
        let chunks = build_chunks(&groups, session_count, 1);

        // Tiny budget: one group per chunk, indexes ascending, order kept.
        assert_eq!(chunks.len(), groups.len());
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
        let repacked: Vec<&str> = chunks
            .iter()
            .flat_map(|c| c.groups.iter().map(|g| g.app_name))
            .collect();
        let original: Vec<&str> = groups.iter().map(|g| g.app_name).collect();
        assert_eq!(repacked, original);
    }

    #[test]
    fn session_markers_appear_only_between_sessions() {
        let records = vec![
            record("2025-06-01T09:00:00+00:00", "AppA", "w", "one"),
            record("2025-06-01T09:01:00+00:00", "AppB", "w", "two"),
            record("2025-06-01T09:30:00+00:00", "AppC", "w", "three"),
        ];
        let (sessions, session_count) = grouped(&records);
        assert_eq!(session_count, 2);
        let groups = group_sessions(&sessions);
        let chunks = build_chunks(&groups, session_count, usize::MAX);

        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].text.contains("=== Session 1/2 ==="));
        assert!(chunks[0].text.contains("=== Session 2/2 ==="));
        // AppB continues session 1: no marker directly before it.
        assert!(!chunks[0].text.contains("=== Session 1/2 ===\n\n[AppB]"));
    }

    #[test]
    fn single_session_day_has_no_markers() {
        let records = vec![
            record("2025-06-01T09:00:00+00:00", "AppA", "w", "one"),
            record("2025-06-01T09:01:00+00:00", "AppB", "w", "two"),
        ];
        let (sessions, session_count) = grouped(&records);
        let groups = group_sessions(&sessions);
        let chunks = build_chunks(&groups, session_count, usize::MAX);
        assert!(!chunks[0].text.contains("=== Session"));
    }

    #[test]
    fn lengths_are_counted_in_codepoints_not_bytes() {
        // 10 Japanese characters are 30 bytes in UTF-8; a byte-based budget
        // would split where a codepoint budget must not.
        let records = vec![
            record("2025-06-01T09:00:00+00:00", "メモ", "win", "あいうえおかきくけこ"),
            record("2025-06-01T09:01:00+00:00", "端末", "win", "さしすせそたちつてと"),
        ];
        let (sessions, session_count) = grouped(&records);
        let groups = group_sessions(&sessions);
        let unit_len = serialize_unit(&groups[0], None, session_count)
            .chars()
            .count();

        let chunks = build_chunks(&groups, session_count, unit_len * 2);
        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].char_len,
            chunks[0].text.chars().count()
        );
    }
}
