//! Wraps the merged body into the fixed report skeleton.
//!
//! The output document always carries the same five sections, whatever
//! shape the backend's prose came back in, so downstream consumers can rely
//! on the structure.

use chrono::NaiveDate;

pub const SECTION_TITLES: [&str; 5] = [
    "Purpose",
    "Work Done",
    "Learnings",
    "AI-Output Log",
    "Next Steps",
];

const EMPTY_SECTION: &str = "_Nothing recorded._";
const NO_ACTIVITY: &str = "No activity was recorded for this date.";

fn title_line(date: NaiveDate) -> String {
    format!("# Daily Report {}", date.format("%Y-%m-%d"))
}

/// True when the body already delineates every fixed section itself, which
/// is what the system prompt asks the backend for.
fn has_all_sections(body: &str) -> bool {
    SECTION_TITLES
        .iter()
        .all(|title| body.contains(&format!("## {title}")))
}

/// Render the final document. A body that already carries all five section
/// headings is kept as-is beneath the title; freeform prose falls back to
/// living under "Work Done" with neutral placeholders elsewhere, so the
/// file is always syntactically complete.
pub fn render_report(date: NaiveDate, body: &str) -> String {
    let body = body.trim();

    if body.is_empty() {
        return render_empty_report(date);
    }

    let mut document = title_line(date);
    document.push_str("\n\n");

    if has_all_sections(body) {
        document.push_str(body);
        document.push('\n');
        return document;
    }

    for title in SECTION_TITLES {
        document.push_str(&format!("## {title}\n\n"));
        if title == "Work Done" {
            document.push_str(body);
        } else {
            document.push_str(EMPTY_SECTION);
        }
        document.push_str("\n\n");
    }
    document.truncate(document.trim_end().len());
    document.push('\n');
    document
}

/// Document for a day with no records at all. Still a complete, valid
/// report rather than an error.
pub fn render_empty_report(date: NaiveDate) -> String {
    let mut document = title_line(date);
    document.push_str("\n\n");
    document.push_str(&format!("_{NO_ACTIVITY}_\n"));

    for title in SECTION_TITLES {
        document.push_str(&format!("\n## {title}\n\n{EMPTY_SECTION}\n"));
    }
    document
}
