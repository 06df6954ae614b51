//! Documents and the in-memory document store.
//!
//! The store is populated once at startup and never mutated per-request:
//! the registry owns it behind an immutable reference for the lifetime of
//! the process.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// What a document's content represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Table,
}

/// A unit of retrievable content. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub content_type: ContentType,
}

impl Document {
    /// Text document with a content-derived id, so re-ingesting identical
    /// content produces the same id.
    pub fn text(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            id: content_id(&content),
            content,
            content_type: ContentType::Text,
        }
    }

    /// Table document with an explicit generated id (`table_<index>`).
    pub fn table(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            content_type: ContentType::Table,
        }
    }
}

/// Stable id from a SHA-256 over the content.
pub fn content_id(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest[..8].iter().map(|b| format!("{b:02x}")).collect()
}

/// How `write_documents` treats an id that is already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    Skip,
    Overwrite,
    Fail,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate document id: {0}")]
    DuplicateId(String),
}

/// Insertion-ordered mapping from document id to document.
///
/// Append-only during initialization; readers iterate in write order.
#[derive(Debug, Default)]
pub struct DocumentStore {
    by_id: HashMap<String, usize>,
    documents: Vec<Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a batch of documents under the given duplicate policy.
    /// Returns how many documents were actually written.
    pub fn write_documents(
        &mut self,
        documents: Vec<Document>,
        policy: DuplicatePolicy,
    ) -> Result<usize, StoreError> {
        let mut written = 0;
        for doc in documents {
            match self.by_id.get(&doc.id) {
                Some(&idx) => match policy {
                    DuplicatePolicy::Skip => {
                        tracing::debug!(id = %doc.id, "Skipping duplicate document");
                    }
                    DuplicatePolicy::Overwrite => {
                        self.documents[idx] = doc;
                        written += 1;
                    }
                    DuplicatePolicy::Fail => {
                        return Err(StoreError::DuplicateId(doc.id));
                    }
                },
                None => {
                    self.by_id.insert(doc.id.clone(), self.documents.len());
                    self.documents.push(doc);
                    written += 1;
                }
            }
        }
        Ok(written)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.by_id.get(id).map(|&idx| &self.documents[idx])
    }

    /// Documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
