//! The QA model variants.
//!
//! A closed set of three pipelines behind one tagged type: extractive over
//! text, extractive over text + tables with per-content-type routing, and
//! generative over dense retrieval. Exactly these three exist, so dispatch
//! is an enum match rather than an open trait hierarchy.

use std::path::Path;

use crate::config::AppConfig;
use crate::store::{ContentType, Document, DocumentStore, DuplicatePolicy};

use crate::ingest::preparer::prepare_directory;

use super::embedding::HashedTfEmbedder;
use super::generator::{GeneratorClient, LlmGenerate};
use super::reader::{Answer, Reader, SpanReader, TableReader};
use super::retriever::{Bm25Retriever, DenseRetriever, Retriever};
use super::QaError;

/// Extractive pipelines: candidate passages retrieved per query.
const EXTRACTIVE_RETRIEVER_TOP_K: usize = 10;
/// Extractive pipelines: candidate answers read per query.
const EXTRACTIVE_READER_TOP_K: usize = 5;
/// Generative pipeline: densely retrieved passages per query.
const GENERATIVE_RETRIEVER_TOP_K: usize = 5;

/// The closed set of model variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    ExtractiveText,
    ExtractiveTextTable,
    GenerativeText,
}

impl ModelKind {
    /// Registry key for this variant.
    pub fn key(&self) -> &'static str {
        match self {
            ModelKind::ExtractiveText => "extractive_text",
            ModelKind::ExtractiveTextTable => "extractive_text_table",
            ModelKind::GenerativeText => "generative_text",
        }
    }
}

/// Outcome of building a model variant.
///
/// `Degraded` is the non-fatal failure mode: the variant stays registered
/// but unusable, and predictions against it fail with a clear error instead
/// of a crash.
pub enum ModelInit {
    Ready(QaModel),
    Degraded { reason: String },
}

/// Ranked answers straight out of a pipeline, before formatting.
#[derive(Debug, Clone)]
pub struct RawPrediction {
    pub answers: Vec<Answer>,
}

/// An initialized QA pipeline: an owned document store plus the retrieval
/// and reading strategy for its variant.
pub enum QaModel {
    ExtractiveText {
        store: DocumentStore,
        retriever: Bm25Retriever,
        reader: SpanReader,
    },
    ExtractiveTextTable {
        store: DocumentStore,
        retriever: Bm25Retriever,
        text_reader: SpanReader,
        table_reader: TableReader,
    },
    GenerativeText {
        store: DocumentStore,
        retriever: DenseRetriever,
        generator: Box<dyn LlmGenerate>,
    },
}

impl QaModel {
    /// Build the variant named by `kind` from the configured data directory.
    ///
    /// A missing data directory degrades the variant (logged as an error,
    /// no panic); an unreadable directory or file is a hard error that
    /// fails startup.
    pub fn init(kind: ModelKind, config: &AppConfig) -> Result<ModelInit, QaError> {
        let Some(data_dir) = config.data_dir.as_deref() else {
            tracing::error!(
                model = kind.key(),
                "data_dir not in config, unable to init model"
            );
            return Ok(ModelInit::Degraded {
                reason: "data_dir not configured".to_string(),
            });
        };

        let model = match kind {
            ModelKind::ExtractiveText => {
                let store = build_store(data_dir, false)?;
                let retriever = Bm25Retriever::index(&store);
                QaModel::ExtractiveText {
                    store,
                    retriever,
                    reader: SpanReader,
                }
            }
            ModelKind::ExtractiveTextTable => {
                let store = build_store(data_dir, true)?;
                let retriever = Bm25Retriever::index(&store);
                QaModel::ExtractiveTextTable {
                    store,
                    retriever,
                    text_reader: SpanReader,
                    table_reader: TableReader,
                }
            }
            ModelKind::GenerativeText => {
                let store = build_store(data_dir, false)?;
                let retriever =
                    DenseRetriever::index(&store, Box::new(HashedTfEmbedder::default()));
                let generator = Box::new(GeneratorClient::new(
                    &config.generator_url,
                    &config.generator_model,
                    300,
                ));
                QaModel::GenerativeText {
                    store,
                    retriever,
                    generator,
                }
            }
        };

        Ok(ModelInit::Ready(model))
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            QaModel::ExtractiveText { .. } => ModelKind::ExtractiveText,
            QaModel::ExtractiveTextTable { .. } => ModelKind::ExtractiveTextTable,
            QaModel::GenerativeText { .. } => ModelKind::GenerativeText,
        }
    }

    /// Run the variant's pipeline for a query.
    pub fn predict(&self, query: &str) -> Result<RawPrediction, QaError> {
        match self {
            QaModel::ExtractiveText {
                store,
                retriever,
                reader,
            } => {
                let candidates = lookup(store, retriever, query, EXTRACTIVE_RETRIEVER_TOP_K);
                let answers = reader.read(query, &candidates, EXTRACTIVE_READER_TOP_K);
                Ok(RawPrediction { answers })
            }

            QaModel::ExtractiveTextTable {
                store,
                retriever,
                text_reader,
                table_reader,
            } => {
                let candidates = lookup(store, retriever, query, EXTRACTIVE_RETRIEVER_TOP_K);

                // Route each retrieved document to the reader for its
                // content type, then join both answer lists into one
                // ranked list.
                let text_docs: Vec<&Document> = candidates
                    .iter()
                    .copied()
                    .filter(|d| d.content_type == ContentType::Text)
                    .collect();
                let table_docs: Vec<&Document> = candidates
                    .iter()
                    .copied()
                    .filter(|d| d.content_type == ContentType::Table)
                    .collect();

                let mut answers = text_reader.read(query, &text_docs, EXTRACTIVE_READER_TOP_K);
                answers.extend(table_reader.read(query, &table_docs, EXTRACTIVE_READER_TOP_K));
                answers.sort_by(|a, b| {
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                Ok(RawPrediction { answers })
            }

            QaModel::GenerativeText {
                store,
                retriever,
                generator,
            } => {
                let scored = retriever.retrieve(query, GENERATIVE_RETRIEVER_TOP_K);
                if scored.is_empty() {
                    return Ok(RawPrediction { answers: vec![] });
                }

                let mut context = String::new();
                for s in &scored {
                    if let Some(doc) = store.get(&s.document_id) {
                        context.push_str(&doc.content);
                        context.push_str("\n\n");
                    }
                }

                let system = "Answer the question using only the provided passages. \
                              Answer in one short sentence.";
                let prompt = format!("Passages:\n{context}\nQuestion: {query}\nAnswer:");
                let text = generator.generate(system, &prompt)?;

                // Mean retrieval similarity stands in for generation
                // confidence; cosine scores are already within (0, 1).
                let confidence =
                    scored.iter().map(|s| s.score).sum::<f32>() / scored.len() as f32;

                Ok(RawPrediction {
                    answers: vec![Answer {
                        answer: text,
                        score: confidence,
                        document_id: scored[0].document_id.clone(),
                    }],
                })
            }
        }
    }

    /// Best answer and its confidence.
    pub fn format_prediction(&self, prediction: &RawPrediction) -> Result<(String, f32), QaError> {
        let best = prediction.answers.first().ok_or(QaError::NoAnswer)?;
        Ok((best.answer.clone(), best.score))
    }
}

/// Ingest the data directory into a fresh store.
fn build_store(data_dir: &Path, read_tables: bool) -> Result<DocumentStore, QaError> {
    let (texts, tables) = prepare_directory(data_dir, read_tables)?;
    let mut store = DocumentStore::new();
    store
        .write_documents(texts, DuplicatePolicy::Skip)
        .expect("skip policy cannot fail");
    store
        .write_documents(tables, DuplicatePolicy::Skip)
        .expect("skip policy cannot fail");
    tracing::info!(documents = store.len(), "Document store populated");
    Ok(store)
}

/// Resolve retrieval results back to documents, dropping dangling ids.
fn lookup<'a>(
    store: &'a DocumentStore,
    retriever: &dyn Retriever,
    query: &str,
    top_k: usize,
) -> Vec<&'a Document> {
    retriever
        .retrieve(query, top_k)
        .iter()
        .filter_map(|s| store.get(&s.document_id))
        .collect()
}
