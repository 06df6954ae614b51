//! HTTP client for the answer-generation model.
//!
//! The generative pipeline delegates sequence-to-sequence generation to a
//! local model server speaking the Ollama `/api/generate` protocol. The
//! client is blocking; callers run it from the prediction thread pool.

use serde::{Deserialize, Serialize};

use super::QaError;

/// Beam width for generation.
const NUM_BEAMS: u32 = 2;
/// Generated answer length bounds, in tokens.
const MIN_LENGTH: u32 = 2;
const MAX_LENGTH: u32 = 200;

/// Text generation seam for the generative QA pipeline.
pub trait LlmGenerate: Send + Sync {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, QaError>;
}

/// Blocking HTTP client for an Ollama-style generation endpoint.
pub struct GeneratorClient {
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeneratorClient {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for /api/generate
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_beams: u32,
    min_length: u32,
    max_length: u32,
}

/// Response body from /api/generate
#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl LlmGenerate for GeneratorClient {
    fn generate(&self, system: &str, prompt: &str) -> Result<String, QaError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions {
                num_beams: NUM_BEAMS,
                min_length: MIN_LENGTH,
                max_length: MAX_LENGTH,
            },
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                QaError::GeneratorConnection(self.base_url.clone())
            } else if e.is_timeout() {
                QaError::GeneratorConnection(format!(
                    "request timed out after {}s",
                    self.timeout_secs
                ))
            } else {
                QaError::GeneratorConnection(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(QaError::GeneratorStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| QaError::GeneratorResponse(e.to_string()))?;

        Ok(parsed.response.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let client = GeneratorClient::new("http://localhost:11434/", "qa-generator", 30);
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.model(), "qa-generator");
    }

    #[test]
    fn unreachable_server_is_a_connection_error() {
        // Port 9 (discard) refuses connections on any sane host.
        let client = GeneratorClient::new("http://127.0.0.1:9", "qa-generator", 2);
        let result = client.generate("system", "prompt");
        assert!(matches!(result, Err(QaError::GeneratorConnection(_))));
    }

    #[test]
    fn request_body_serializes_beam_options() {
        let body = GenerateRequest {
            model: "qa-generator",
            prompt: "question",
            system: "system",
            stream: false,
            options: GenerateOptions {
                num_beams: NUM_BEAMS,
                min_length: MIN_LENGTH,
                max_length: MAX_LENGTH,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["options"]["num_beams"], 2);
        assert_eq!(json["options"]["min_length"], 2);
        assert_eq!(json["options"]["max_length"], 200);
        assert_eq!(json["stream"], false);
    }
}
