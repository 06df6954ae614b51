//! Candidate retrieval over the document store.
//!
//! Two strategies behind one trait: Okapi BM25 over a sparse term index for
//! the extractive pipelines, and cosine similarity over precomputed
//! embeddings for the generative pipeline. Both indexes are built once at
//! startup against an immutable store.

use std::collections::HashMap;

use crate::store::DocumentStore;

use super::embedding::{cosine_similarity, EmbeddingModel};
use super::tokenize;

const BM25_K1: f32 = 1.5;
const BM25_B: f32 = 0.75;

/// A document id with its retrieval score, descending by score.
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document_id: String,
    pub score: f32,
}

/// Retrieval strategy. Each implementation owns its index, built once
/// at startup from the store.
pub trait Retriever: Send + Sync {
    fn retrieve(&self, query: &str, top_k: usize) -> Vec<ScoredDocument>;
}

struct IndexedDocument {
    document_id: String,
    term_frequencies: HashMap<String, f32>,
    length: f32,
}

/// Okapi BM25 retriever. Indexes the store at construction time.
pub struct Bm25Retriever {
    documents: Vec<IndexedDocument>,
    document_frequencies: HashMap<String, f32>,
    average_length: f32,
}

impl Bm25Retriever {
    pub fn index(store: &DocumentStore) -> Self {
        let mut documents = Vec::with_capacity(store.len());
        let mut document_frequencies: HashMap<String, f32> = HashMap::new();
        let mut total_length = 0.0;

        for doc in store.iter() {
            let tokens = tokenize(&doc.content);
            let length = tokens.len() as f32;
            total_length += length;

            let mut term_frequencies: HashMap<String, f32> = HashMap::new();
            for token in tokens {
                *term_frequencies.entry(token).or_default() += 1.0;
            }
            for term in term_frequencies.keys() {
                *document_frequencies.entry(term.clone()).or_default() += 1.0;
            }

            documents.push(IndexedDocument {
                document_id: doc.id.clone(),
                term_frequencies,
                length,
            });
        }

        let average_length = if documents.is_empty() {
            0.0
        } else {
            total_length / documents.len() as f32
        };

        Self {
            documents,
            document_frequencies,
            average_length,
        }
    }

    fn idf(&self, term: &str) -> f32 {
        let n = self.documents.len() as f32;
        let df = self.document_frequencies.get(term).copied().unwrap_or(0.0);
        // Okapi IDF with the +1 inside the log to keep scores non-negative.
        ((n - df + 0.5) / (df + 0.5) + 1.0).ln()
    }

    fn score(&self, doc: &IndexedDocument, query_terms: &[String]) -> f32 {
        let mut score = 0.0;
        for term in query_terms {
            let tf = doc.term_frequencies.get(term).copied().unwrap_or(0.0);
            if tf == 0.0 {
                continue;
            }
            let idf = self.idf(term);
            let norm = tf + BM25_K1 * (1.0 - BM25_B + BM25_B * doc.length / self.average_length);
            score += idf * tf * (BM25_K1 + 1.0) / norm;
        }
        score
    }
}

impl Retriever for Bm25Retriever {
    fn retrieve(&self, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        let query_terms = tokenize(query);
        if query_terms.is_empty() || self.documents.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredDocument> = self
            .documents
            .iter()
            .map(|doc| ScoredDocument {
                document_id: doc.document_id.clone(),
                score: self.score(doc, &query_terms),
            })
            .filter(|s| s.score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

/// Dense retriever: embeds every document at construction, scores queries
/// by cosine similarity.
pub struct DenseRetriever {
    embedder: Box<dyn EmbeddingModel>,
    embeddings: Vec<(String, Vec<f32>)>,
}

impl DenseRetriever {
    /// Embed all documents in the store. This is the startup-time analogue
    /// of an index build: each document gets one vector.
    pub fn index(store: &DocumentStore, embedder: Box<dyn EmbeddingModel>) -> Self {
        let embeddings = store
            .iter()
            .map(|doc| (doc.id.clone(), embedder.embed(&doc.content)))
            .collect();
        Self {
            embedder,
            embeddings,
        }
    }
}

impl Retriever for DenseRetriever {
    fn retrieve(&self, query: &str, top_k: usize) -> Vec<ScoredDocument> {
        let query_embedding = self.embedder.embed(query);

        let mut scored: Vec<ScoredDocument> = self
            .embeddings
            .iter()
            .map(|(id, embedding)| ScoredDocument {
                document_id: id.clone(),
                score: cosine_similarity(&query_embedding, embedding),
            })
            .filter(|s| s.score > 0.0)
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::embedding::HashedTfEmbedder;
    use crate::store::{Document, DuplicatePolicy};

    fn store_with(contents: &[&str]) -> DocumentStore {
        let mut store = DocumentStore::new();
        store
            .write_documents(
                contents.iter().map(|c| Document::text(*c)).collect(),
                DuplicatePolicy::Skip,
            )
            .unwrap();
        store
    }

    #[test]
    fn bm25_ranks_matching_document_first() {
        let store = store_with(&[
            "Paris is the capital and most populous city of France.",
            "Berlin is the capital of Germany and a major cultural hub.",
            "The quarterly revenue grew by fourteen percent this year.",
        ]);
        let retriever = Bm25Retriever::index(&store);

        let results = retriever.retrieve("What is the capital of France?", 10);

        assert!(!results.is_empty());
        let best = store.get(&results[0].document_id).unwrap();
        assert!(best.content.contains("France"));
    }

    #[test]
    fn bm25_respects_top_k() {
        let store = store_with(&[
            "the cat sat on the mat",
            "the dog sat on the rug",
            "the bird sat on the wire",
        ]);
        let retriever = Bm25Retriever::index(&store);

        let results = retriever.retrieve("sat on the", 2);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn bm25_scores_descend() {
        let store = store_with(&[
            "France France France is mentioned often here.",
            "France appears once in this sentence.",
            "Nothing relevant in this one at all.",
        ]);
        let retriever = Bm25Retriever::index(&store);

        let results = retriever.retrieve("France", 10);
        assert!(results.len() >= 2);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn bm25_no_match_returns_empty() {
        let store = store_with(&["alpha beta gamma", "delta epsilon zeta"]);
        let retriever = Bm25Retriever::index(&store);

        let results = retriever.retrieve("quetzalcoatl", 10);
        assert!(results.is_empty());
    }

    #[test]
    fn bm25_empty_store_returns_empty() {
        let store = DocumentStore::new();
        let retriever = Bm25Retriever::index(&store);
        assert!(retriever.retrieve("anything", 10).is_empty());
    }

    #[test]
    fn dense_ranks_overlapping_document_first() {
        let store = store_with(&[
            "Paris is the capital of France.",
            "Completely unrelated gardening advice about tomato plants.",
        ]);
        let retriever =
            DenseRetriever::index(&store, Box::new(HashedTfEmbedder::default()));

        let results = retriever.retrieve("capital of France", 5);
        assert!(!results.is_empty());
        let best = store.get(&results[0].document_id).unwrap();
        assert!(best.content.contains("Paris"));
    }

    #[test]
    fn dense_respects_top_k() {
        let store = store_with(&[
            "one shared token alpha",
            "two shared token alpha",
            "three shared token alpha",
        ]);
        let retriever =
            DenseRetriever::index(&store, Box::new(HashedTfEmbedder::default()));

        let results = retriever.retrieve("shared token", 2);
        assert_eq!(results.len(), 2);
    }
}
