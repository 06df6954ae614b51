//! Answer extraction from retrieved candidates.
//!
//! Readers turn retrieved documents into ranked answer spans. The text
//! reader scores sentence spans by query-term overlap; the table reader
//! scores rows and answers with the best cell. Both produce confidences
//! strictly inside (0, 1): the overlap fraction is divided by one more than
//! the query length, so a perfect match still scores below 1 and a zero
//! match is filtered out.

use std::collections::HashSet;

use crate::ingest::preprocess::split_sentences;
use crate::store::Document;

use super::tokenize;

/// A candidate answer with its confidence and provenance.
#[derive(Debug, Clone)]
pub struct Answer {
    pub answer: String,
    pub score: f32,
    pub document_id: String,
}

/// Extracts ranked answers from a set of candidate documents.
pub trait Reader: Send + Sync {
    fn read(&self, query: &str, documents: &[&Document], top_k: usize) -> Vec<Answer>;
}

fn overlap_score(query_terms: &HashSet<String>, candidate_terms: &HashSet<String>) -> f32 {
    if query_terms.is_empty() {
        return 0.0;
    }
    let matched = query_terms.intersection(candidate_terms).count() as f32;
    matched / (query_terms.len() as f32 + 1.0)
}

fn sort_and_truncate(mut answers: Vec<Answer>, top_k: usize) -> Vec<Answer> {
    answers.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    answers.truncate(top_k);
    answers
}

/// Extractive reader over text documents: the best-scoring sentence span is
/// the answer.
pub struct SpanReader;

impl Reader for SpanReader {
    fn read(&self, query: &str, documents: &[&Document], top_k: usize) -> Vec<Answer> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        let mut answers = Vec::new();

        for doc in documents {
            for sentence in split_sentences(&doc.content) {
                let sentence_terms: HashSet<String> =
                    tokenize(&sentence).into_iter().collect();
                let score = overlap_score(&query_terms, &sentence_terms);
                if score > 0.0 {
                    answers.push(Answer {
                        answer: sentence,
                        score,
                        document_id: doc.id.clone(),
                    });
                }
            }
        }

        sort_and_truncate(answers, top_k)
    }
}

/// Extractive reader over table documents: rows are scored by overlap and
/// the answer is the best cell of the best row that is not itself part of
/// the query.
pub struct TableReader;

/// Split a table row into cells on tabs, pipes, or 3+ space gaps.
fn split_cells(row: &str) -> Vec<String> {
    let normalized = row.replace('|', "\t");
    let mut cells = Vec::new();
    for piece in normalized.split('\t') {
        for cell in piece.split("   ") {
            let cell = cell.trim();
            if !cell.is_empty() {
                cells.push(cell.to_string());
            }
        }
    }
    cells
}

impl Reader for TableReader {
    fn read(&self, query: &str, documents: &[&Document], top_k: usize) -> Vec<Answer> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        let mut answers = Vec::new();

        for doc in documents {
            let rows: Vec<&str> = doc.content.lines().collect();
            let has_header = rows.len() > 1;
            let header_cells: Vec<String> =
                rows.first().map(|r| split_cells(r)).unwrap_or_default();
            let header_terms: HashSet<String> = header_cells
                .iter()
                .flat_map(|c| tokenize(c))
                .collect();

            let data_rows = if has_header { &rows[1..] } else { &rows[..] };

            for row in data_rows {
                let row_terms: HashSet<String> = tokenize(row).into_iter().collect();
                // Data rows inherit the header vocabulary: a row answers a
                // query about "capital" through its Capital column even when
                // the word never appears in the row itself.
                let mut combined = row_terms.clone();
                if has_header {
                    combined.extend(header_terms.iter().cloned());
                }
                let score = overlap_score(&query_terms, &combined);
                if score == 0.0 || overlap_score(&query_terms, &row_terms) == 0.0 {
                    continue;
                }

                let cells = split_cells(row);
                let answer_cell = pick_answer_cell(&cells, &header_cells, &query_terms)
                    .unwrap_or_else(|| row.trim().to_string());

                answers.push(Answer {
                    answer: answer_cell,
                    score,
                    document_id: doc.id.clone(),
                });
            }
        }

        sort_and_truncate(answers, top_k)
    }
}

/// Choose the cell that answers the query: prefer the column whose header
/// matches a query term, then any cell disjoint from the query.
fn pick_answer_cell(
    cells: &[String],
    header_cells: &[String],
    query_terms: &HashSet<String>,
) -> Option<String> {
    let disjoint = |cell: &str| {
        let cell_terms: HashSet<String> = tokenize(cell).into_iter().collect();
        !cell_terms.is_empty() && cell_terms.is_disjoint(query_terms)
    };

    for (j, header) in header_cells.iter().enumerate() {
        let header_terms: HashSet<String> = tokenize(header).into_iter().collect();
        if !header_terms.is_disjoint(query_terms) {
            if let Some(cell) = cells.get(j) {
                if disjoint(cell) {
                    return Some(cell.clone());
                }
            }
        }
    }

    cells.iter().find(|cell| disjoint(cell)).cloned()
}
