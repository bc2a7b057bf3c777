use std::time::Duration;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::language_utils::{SupportedLanguage, detect_language};
use crate::providers::{Translator, normalize_endpoint, snippet};

/// Client for the NLLB translation sidecar service
///
/// The sidecar wraps the NLLB-200 model behind a small JSON API:
/// `POST /translate` with `{ text, source, target, model }` returns
/// `{ translation }`. Source detection happens in this client so an
/// unsupported document language fails before any model call.
#[derive(Debug)]
pub struct NllbClient {
    /// Base URL of the translation service
    endpoint: String,
    /// Model identifier passed through to the service
    model: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

/// Translation request for the sidecar API
#[derive(Debug, Serialize)]
struct TranslationRequest {
    /// Text to translate
    text: String,
    /// FLORES-200 code of the source language
    source: String,
    /// FLORES-200 code of the target language
    target: String,
    /// Model identifier
    model: String,
}

/// Translation response from the sidecar API
#[derive(Debug, Deserialize)]
struct TranslationResponse {
    /// The translated text
    translation: String,
}

impl NllbClient {
    /// Create a new client with default timeout and retry settings
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_config(endpoint, model, 120, 3, 1000, None)
    }

    /// Create a new client with explicit configuration
    pub fn with_config(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Result<Self, ProviderError> {
        let endpoint = normalize_endpoint(&endpoint.into())?;

        Ok(Self {
            endpoint,
            model: model.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        })
    }
}

#[async_trait]
impl Translator for NllbClient {
    async fn translate(&self, text: &str, target: SupportedLanguage) -> Result<String, ProviderError> {
        // Detect the source language before going anywhere near the model
        let detected = detect_language(text);
        let source = match detected.as_deref().and_then(SupportedLanguage::from_tag) {
            Some(language) => language,
            None => {
                return Err(ProviderError::UnsupportedLanguage {
                    language: detected.unwrap_or_else(|| "unknown".to_string()),
                });
            }
        };

        let request = TranslationRequest {
            text: text.to_string(),
            source: source.nllb_code().to_string(),
            target: target.nllb_code().to_string(),
            model: self.model.clone(),
        };
        let url = format!("{}/translate", self.endpoint);

        let mut attempt = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            // Add rate limiting if configured
            if let Some(rate_limit) = self.rate_limit {
                let delay_ms = 60_000 / rate_limit as u64;
                if attempt > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            let response_result = self.client.post(&url)
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response.text().await
                            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text from translation service: {}", e)))?;

                        match serde_json::from_str::<TranslationResponse>(&response_text) {
                            Ok(parsed) => return Ok(parsed.translation),
                            Err(e) => {
                                error!("Failed to parse translation response: {}. Raw response (first 500 chars): {}",
                                      e, snippet(&response_text, 500));

                                // Lenient fallback: pull the field out of any JSON shape
                                if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response_text) {
                                    if let Some(translation) = value.get("translation").and_then(|v| v.as_str()) {
                                        return Ok(translation.to_string());
                                    }
                                }

                                return Err(ProviderError::ParseError(format!("Failed to parse translation response: {}", e)));
                            }
                        }
                    } else if status.as_u16() == 429 {
                        // Rate limited - retry after backoff
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation service rate limited: {} - attempt {}/{}", error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(ProviderError::RateLimitExceeded(error_text));
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation service error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(ProviderError::ApiError { status_code: status.as_u16(), message: error_text });
                    } else {
                        // Client error - don't retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Translation service error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError { status_code: status.as_u16(), message: error_text });
                    }
                },
                Err(e) => {
                    // Network error - can retry
                    error!("Translation service network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(ProviderError::ConnectionError(format!("Failed to send request to translation service: {}", e)));
                }
            }

            attempt += 1;

            // If we have more retries left, wait with exponential backoff
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::RequestFailed(
            format!("Translation request failed after {} attempts", self.max_retries + 1))))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/health", self.endpoint);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to translation service: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "Translation service health check failed".to_string(),
            })
        }
    }
}
