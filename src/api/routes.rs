//! HTTP routes: the landing page and the predict endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL;
use crate::qa::registry::ModelRegistry;

use super::error::ApiError;

const INDEX_HTML: &str = include_str!("index.html");

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub answer: String,
    pub confidence: f32,
}

pub fn api_router(registry: Arc<ModelRegistry>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .with_state(registry)
}

async fn index() -> Html<&'static str> {
    tracing::info!("GET /");
    Html(INDEX_HTML)
}

/// Run the default model for a query.
///
/// The model pipelines are synchronous (CPU-bound scoring plus a blocking
/// generator client), so prediction runs on the blocking thread pool.
async fn predict(
    State(registry): State<Arc<ModelRegistry>>,
    Json(request): Json<PredictRequest>,
) -> Response {
    tracing::info!("POST /predict");

    let Some(query) = request.query else {
        tracing::error!("query params missing in request");
        return ApiError::MissingQuery.into_response();
    };

    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || {
        let model = registry.predictor(DEFAULT_MODEL)?;
        let prediction = model.predict(&query)?;
        model.format_prediction(&prediction)
    })
    .await;

    match result {
        Ok(Ok((answer, confidence))) => {
            tracing::info!(
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Prediction complete"
            );
            Json(PredictResponse { answer, confidence }).into_response()
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Prediction failed");
            ApiError::Prediction.into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Prediction task panicked");
            ApiError::Prediction.into_response()
        }
    }
}
