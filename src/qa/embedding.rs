//! Embeddings for dense retrieval.
//!
//! The embedding model sits behind a trait so the dense retriever does not
//! care where vectors come from. The default implementation is a hashed
//! term-frequency embedder: deterministic, dependency-free, and good enough
//! for lexical-overlap retrieval over a small corpus.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::tokenize;

/// Produces a fixed-width vector for a piece of text.
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;

    fn dimension(&self) -> usize;
}

/// Hashed term-frequency embedder.
///
/// Each token is hashed into one of `dimension` buckets; the bucket counts
/// are L2-normalized. Cosine similarity over these vectors approximates
/// token-overlap similarity.
pub struct HashedTfEmbedder {
    dimension: usize,
}

impl HashedTfEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashedTfEmbedder {
    fn default() -> Self {
        Self::new(512)
    }
}

impl EmbeddingModel for HashedTfEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() as usize) % self.dimension;
            vector[bucket] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut vector {
                *x /= norm;
            }
        }
        vector
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
