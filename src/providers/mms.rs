use std::time::Duration;
use serde::{Serialize, Deserialize};
use async_trait::async_trait;
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::language_utils::SupportedLanguage;
use crate::providers::{SpeechSynthesizer, SynthesisResult, normalize_endpoint, snippet};

/// Sample rate the MMS models synthesize at, used when a response omits it
const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// Client for the MMS text-to-speech sidecar service
///
/// One client narrates one language; the service selects the voice from the
/// model identifier. `POST /synthesize` with `{ text, model }` returns
/// `{ audio, sampling_rate }` with float samples, matching the output shape
/// of the upstream MMS pipeline.
#[derive(Debug)]
pub struct MmsClient {
    /// Base URL of the synthesis service
    endpoint: String,
    /// Model identifier passed through to the service
    model: String,
    /// Voice language of this client
    language: SupportedLanguage,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

/// Synthesis request for the sidecar API
#[derive(Debug, Serialize)]
struct SynthesisRequest {
    /// Text to narrate
    text: String,
    /// Model identifier
    model: String,
}

/// Synthesis response from the sidecar API
#[derive(Debug, Deserialize)]
struct SynthesisResponse {
    /// Float samples in the -1.0..1.0 range
    audio: Vec<f32>,
    /// Samples per second
    sampling_rate: u32,
}

impl MmsClient {
    /// The MMS model identifier for a voice language
    pub fn default_model(language: SupportedLanguage) -> &'static str {
        match language {
            SupportedLanguage::Es => "facebook/mms-tts-spa",
            SupportedLanguage::En => "facebook/mms-tts-eng",
        }
    }

    /// Create a new client for a language with default settings
    pub fn new(endpoint: impl Into<String>, language: SupportedLanguage) -> Result<Self, ProviderError> {
        Self::with_config(endpoint, Self::default_model(language), language, 300, 3, 1000)
    }

    /// Create a new client with explicit configuration
    pub fn with_config(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        language: SupportedLanguage,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ProviderError> {
        let endpoint = normalize_endpoint(&endpoint.into())?;

        Ok(Self {
            endpoint,
            model: model.into(),
            language,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for MmsClient {
    fn language(&self) -> SupportedLanguage {
        self.language
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesisResult, ProviderError> {
        let request = SynthesisRequest {
            text: text.to_string(),
            model: self.model.clone(),
        };
        let url = format!("{}/synthesize", self.endpoint);

        let mut attempt = 0;
        let mut last_error: Option<ProviderError> = None;

        while attempt <= self.max_retries {
            let response_result = self.client.post(&url)
                .json(&request)
                .send()
                .await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let response_text = response.text().await
                            .map_err(|e| ProviderError::RequestFailed(format!("Failed to get response text from synthesis service: {}", e)))?;

                        match serde_json::from_str::<SynthesisResponse>(&response_text) {
                            Ok(parsed) => {
                                return Ok(SynthesisResult {
                                    samples: parsed.audio,
                                    sample_rate: parsed.sampling_rate,
                                });
                            },
                            Err(e) => {
                                error!("Failed to parse synthesis response: {}. Raw response (first 500 chars): {}",
                                      e, snippet(&response_text, 500));

                                // Lenient fallback: pull the sample array out of any JSON shape
                                if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response_text) {
                                    if let Some(audio) = value.get("audio").and_then(|v| v.as_array()) {
                                        let samples: Vec<f32> = audio.iter()
                                            .filter_map(|v| v.as_f64().map(|f| f as f32))
                                            .collect();
                                        let sample_rate = value.get("sampling_rate")
                                            .and_then(|v| v.as_u64())
                                            .map_or(DEFAULT_SAMPLE_RATE, |r| r as u32);

                                        return Ok(SynthesisResult { samples, sample_rate });
                                    }
                                }

                                return Err(ProviderError::ParseError(format!("Failed to parse synthesis response: {}", e)));
                            }
                        }
                    } else if status.is_server_error() {
                        // Server error - can retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Synthesis service error ({}): {} - attempt {}/{}", status, error_text, attempt + 1, self.max_retries + 1);
                        last_error = Some(ProviderError::ApiError { status_code: status.as_u16(), message: error_text });
                    } else {
                        // Client error - don't retry
                        let error_text = response.text().await
                            .unwrap_or_else(|_| "Failed to get error response text".to_string());
                        error!("Synthesis service error ({}): {}", status, error_text);
                        return Err(ProviderError::ApiError { status_code: status.as_u16(), message: error_text });
                    }
                },
                Err(e) => {
                    // Network error - can retry
                    error!("Synthesis service network error: {} - attempt {}/{}", e, attempt + 1, self.max_retries + 1);
                    last_error = Some(ProviderError::ConnectionError(format!("Failed to send request to synthesis service: {}", e)));
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
            format!("Synthesis request failed after {} attempts", self.max_retries + 1))))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let url = format!("{}/health", self.endpoint);
        let response = self.client.get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to connect to synthesis service: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError {
                status_code: response.status().as_u16(),
                message: "Synthesis service health check failed".to_string(),
            })
        }
    }
}
