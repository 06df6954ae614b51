//! Tabular region handling for extracted page text.
//!
//! Two consumers: the text path strips mostly-numeric table rows out of the
//! prose stream, and the table path lifts contiguous tabular runs into
//! standalone table documents with generated `table_<index>` ids.

use crate::store::Document;

use super::pdf::PageText;

/// Minimum contiguous tabular lines to treat a run as a table.
const MIN_TABLE_LINES: usize = 2;

/// A line counts as numeric when at least this fraction of its
/// non-whitespace characters are digits or numeric punctuation.
const NUMERIC_RATIO: f64 = 0.6;

/// Heuristic: a line looks tabular if it has multiple columns separated by
/// tabs, pipes, or multi-space gaps.
///
/// Patterns detected:
/// - Tab-separated: "Name\tRevenue\tYear"
/// - Pipe-separated: "Name | Revenue | Year"
/// - Multi-space aligned: "Revenue    14.2    2021"
pub fn is_tabular_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.len() < 5 {
        return false;
    }

    if trimmed.matches('\t').count() >= 2 {
        return true;
    }

    if trimmed.matches('|').count() >= 2 {
        return true;
    }

    count_multi_space_gaps(trimmed) >= 2
}

/// Count runs of 3+ consecutive spaces that separate non-empty text segments.
fn count_multi_space_gaps(text: &str) -> usize {
    let mut count = 0;
    let mut in_gap = false;
    let mut gap_len = 0;

    for ch in text.chars() {
        if ch == ' ' {
            gap_len += 1;
            if gap_len >= 3 && !in_gap {
                in_gap = true;
                count += 1;
            }
        } else {
            in_gap = false;
            gap_len = 0;
        }
    }

    count
}

/// A tabular line whose cells are mostly numbers carries no prose value.
fn is_numeric_line(line: &str) -> bool {
    let visible: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
    if visible.is_empty() {
        return false;
    }
    let numeric = visible
        .iter()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '%' | '-' | '+' | '|'))
        .count();
    numeric as f64 / visible.len() as f64 >= NUMERIC_RATIO
}

/// Remove mostly-numeric tabular lines from a text stream.
///
/// Prose and table headers survive; rows of bare figures are dropped so the
/// retriever does not index them as passages.
pub fn strip_numeric_tables(text: &str) -> String {
    text.lines()
        .filter(|line| !(is_tabular_line(line) && is_numeric_line(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract every tabular region from the given pages as table documents.
///
/// A region is a contiguous run of at least `MIN_TABLE_LINES` tabular lines.
/// Ids continue from `next_index` so they stay unique across a whole
/// directory (`table_0`, `table_1`, ...).
pub fn extract_tables(pages: &[PageText], next_index: &mut usize) -> Vec<Document> {
    let mut tables = Vec::new();

    for page in pages {
        let mut run: Vec<&str> = Vec::new();
        for line in page.text.lines().chain(std::iter::once("")) {
            if is_tabular_line(line) {
                run.push(line.trim_end());
            } else {
                if run.len() >= MIN_TABLE_LINES {
                    let content = run.join("\n");
                    tables.push(Document::table(format!("table_{next_index}"), content));
                    *next_index += 1;
                }
                run.clear();
            }
        }
    }

    tables
}
