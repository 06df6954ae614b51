//! The model registry: one long-lived predictor per model name.
//!
//! Populated synchronously at startup, before the HTTP layer accepts its
//! first request, then shared read-only behind an `Arc`. There is no
//! interior mutability — the read-only-after-init invariant is structural,
//! not conventional.

use std::collections::HashMap;
use std::time::Instant;

use crate::config::AppConfig;

use super::model::{ModelInit, QaModel};
use super::QaError;

pub struct ModelRegistry {
    entries: HashMap<&'static str, ModelInit>,
}

impl ModelRegistry {
    /// Build every enabled model variant.
    ///
    /// Construction errors are fatal: the error is logged and propagated so
    /// the process never starts serving with a half-built registry. A
    /// variant missing its data directory is registered as degraded
    /// instead.
    pub fn init(config: &AppConfig) -> Result<Self, QaError> {
        tracing::info!("Loading model registry...");
        let start = Instant::now();

        let mut entries = HashMap::new();
        for &kind in &config.enabled_models {
            let init = QaModel::init(kind, config).map_err(|e| {
                tracing::error!(model = kind.key(), error = %e, "Model init failed");
                e
            })?;

            match &init {
                ModelInit::Ready(_) => {
                    tracing::info!(model = kind.key(), "Model ready");
                }
                ModelInit::Degraded { reason } => {
                    tracing::warn!(model = kind.key(), reason = %reason, "Model degraded");
                }
            }
            entries.insert(kind.key(), init);
        }

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            models = entries.len(),
            "Model registry loaded"
        );

        Ok(Self { entries })
    }

    /// Look up a usable predictor by registry key.
    ///
    /// Unknown names and degraded entries both surface as errors the caller
    /// can report; a degraded entry names the reason it is unusable.
    pub fn predictor(&self, name: &str) -> Result<&QaModel, QaError> {
        match self.entries.get(name) {
            None => Err(QaError::UnknownModel(name.to_string())),
            Some(ModelInit::Degraded { reason }) => Err(QaError::ModelNotInitialized {
                name: name.to_string(),
                reason: reason.clone(),
            }),
            Some(ModelInit::Ready(model)) => Ok(model),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
