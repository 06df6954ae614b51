//! Normalization pass over extracted text before indexing.
//!
//! Cleans empty lines and whitespace runs, then splits the text into
//! word-count chunks that never cross a sentence boundary. Chunk ids are
//! content-derived, so running the pass twice over the same input produces
//! identical documents.

use std::sync::LazyLock;

use regex::Regex;

use crate::store::Document;

/// Word budget per chunk.
pub const SPLIT_LENGTH: usize = 100;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("static regex"));

/// Strip empty lines and collapse horizontal whitespace runs.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| WHITESPACE_RUN.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split text into sentences on terminal punctuation followed by whitespace.
///
/// Deliberately simple: abbreviations ("e.g. ") will over-split, which only
/// shortens a chunk, never breaks the word budget.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            if chars.peek().map_or(true, |next| next.is_whitespace()) {
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
        }
    }

    let tail = current.trim().to_string();
    if !tail.is_empty() {
        sentences.push(tail);
    }

    sentences
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split cleaned text into chunks of at most `split_length` words, closing a
/// chunk before any sentence that would overflow it. A single sentence
/// longer than the budget is hard-split on word boundaries.
pub fn split_into_chunks(text: &str, split_length: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_words = 0;

    for sentence in split_sentences(text) {
        let words = word_count(&sentence);

        if words > split_length {
            if !current.is_empty() {
                chunks.push(current.join(" "));
                current.clear();
                current_words = 0;
            }
            let all_words: Vec<&str> = sentence.split_whitespace().collect();
            for piece in all_words.chunks(split_length) {
                chunks.push(piece.join(" "));
            }
            continue;
        }

        if current_words + words > split_length && !current.is_empty() {
            chunks.push(current.join(" "));
            current.clear();
            current_words = 0;
        }

        current.push(sentence);
        current_words += words;
    }

    if !current.is_empty() {
        chunks.push(current.join(" "));
    }

    chunks
}

/// Full normalization pass: clean, chunk, wrap as text documents.
pub fn preprocess_text(raw: &str) -> Vec<Document> {
    let cleaned = clean_text(raw);
    split_into_chunks(&cleaned, SPLIT_LENGTH)
        .into_iter()
        .map(Document::text)
        .collect()
}
