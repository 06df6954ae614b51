//! API error responses.
//!
//! The status mapping is inherited from the original service and is
//! deliberately non-standard: a missing `query` field answers 205, and an
//! internal prediction failure answers 200 with an error body. Clients
//! distinguish failure by the presence of the `error` key, not the status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("query params missing in request")]
    MissingQuery,
    #[error("Error in prediction")]
    Prediction,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingQuery => StatusCode::RESET_CONTENT,
            ApiError::Prediction => StatusCode::OK,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_query_returns_205_with_error_body() {
        let response = ApiError::MissingQuery.into_response();
        assert_eq!(response.status(), StatusCode::RESET_CONTENT);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "query params missing in request");
    }

    #[tokio::test]
    async fn prediction_failure_returns_200_with_error_body() {
        let response = ApiError::Prediction.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Error in prediction");
    }
}
