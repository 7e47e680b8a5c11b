//! Reassembles per-chunk generation results into one ordered body.
//!
//! Merge is a pure function of the completed result set: results are
//! buffered by chunk index, so the output is byte-identical no matter in
//! which order the chunks finished.

use crate::models::{GenerationOutcome, GenerationResult};

/// Concatenate all chunk results strictly by ascending chunk index. Failed
/// chunks contribute a visible, labeled placeholder instead of aborting the
/// merge; parts after the first are introduced by a rule and a part
/// heading.
pub fn merge_results(results: &[GenerationResult]) -> String {
    let mut ordered: Vec<&GenerationResult> = results.iter().collect();
    ordered.sort_by_key(|result| result.chunk_index);

    let total = ordered.len();
    let mut body = String::new();

    for (position, result) in ordered.iter().enumerate() {
        if position > 0 {
            body.push_str("\n---\n\n");
            body.push_str(&format!("## Part {}/{}\n\n", position + 1, total));
        }

        match &result.outcome {
            GenerationOutcome::Success { text } => body.push_str(text.trim_end()),
            GenerationOutcome::Failed { error } => {
                body.push_str(&failure_placeholder(result.chunk_index, error));
            }
        }
        body.push('\n');
    }

    body
}

fn failure_placeholder(chunk_index: usize, error: &str) -> String {
    format!(
        "> **Report generation failed for this part of the day** (chunk {}).\n> {}",
        chunk_index + 1,
        error
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(index: usize, text: &str) -> GenerationResult {
        GenerationResult::success(index, text.to_string())
    }

    #[test]
    fn merges_by_index_not_arrival_order() {
        let in_order = vec![success(0, "first"), success(1, "second"), success(2, "third")];
        let scrambled = vec![success(2, "third"), success(0, "first"), success(1, "second")];

        assert_eq!(merge_results(&in_order), merge_results(&scrambled));
        let body = merge_results(&scrambled);
        let first = body.find("first").unwrap();
        let second = body.find("second").unwrap();
        let third = body.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn merge_is_idempotent() {
        let results = vec![success(0, "alpha"), success(1, "beta")];
        assert_eq!(merge_results(&results), merge_results(&results));
    }

    #[test]
    fn single_chunk_has_no_part_heading() {
        let body = merge_results(&[success(0, "only part")]);
        assert_eq!(body, "only part\n");
    }

    #[test]
    fn multiple_chunks_get_part_headings() {
        let body = merge_results(&[success(0, "one"), success(1, "two")]);
        assert!(body.contains("## Part 2/2"));
        assert!(body.contains("---"));
    }

    #[test]
    fn failed_chunk_yields_visible_placeholder() {
        let results = vec![
            success(0, "fine"),
            GenerationResult::failed(1, "transport error: connection refused".into()),
            success(2, "also fine"),
        ];
        let body = merge_results(&results);

        assert!(body.contains("fine"));
        assert!(body.contains("also fine"));
        assert!(body.contains("Report generation failed for this part of the day"));
        assert!(body.contains("connection refused"));
    }
}
