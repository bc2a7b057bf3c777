/*!
 * Provider implementations for the inference sidecar services.
 *
 * This module contains client implementations for the model services the
 * pipeline talks to over HTTP:
 * - Nllb: NLLB-200 translation sidecar
 * - Mms: MMS text-to-speech sidecar
 *
 * The mock module provides scripted in-process implementations for tests.
 */

use async_trait::async_trait;
use std::fmt::Debug;
use url::Url;

use crate::errors::ProviderError;
use crate::language_utils::SupportedLanguage;

/// Normalize a sidecar endpoint to a base URL without trailing slash,
/// defaulting the scheme to http when none is given
pub(crate) fn normalize_endpoint(endpoint: &str) -> Result<String, ProviderError> {
    if endpoint.is_empty() {
        return Err(ProviderError::ConnectionError("Endpoint cannot be empty".to_string()));
    }

    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };

    let url = Url::parse(&with_scheme)
        .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint {}: {}", endpoint, e)))?;

    Ok(url.to_string().trim_end_matches('/').to_string())
}

/// First `limit` characters of a response body, for log lines
pub(crate) fn snippet(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        text.chars().take(limit).collect()
    } else {
        text.to_string()
    }
}

/// Raw audio returned by a synthesis engine, before PCM conversion
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Float samples in the -1.0..1.0 range
    pub samples: Vec<f32>,
    /// Samples per second
    pub sample_rate: u32,
}

/// Common trait for text translation providers
///
/// The provider detects the source language of each text itself; a source
/// outside the supported set is an `UnsupportedLanguage` error, which the
/// pipeline records for that page and moves past.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate a text into the target language
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `target` - The language to translate into
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, target: SupportedLanguage) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Common trait for speech synthesis providers
///
/// One provider instance narrates one language; the pipeline holds one per
/// supported language and routes pages between them.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// The voice language of this engine
    fn language(&self) -> SupportedLanguage;

    /// Synthesize speech for a text
    ///
    /// # Arguments
    /// * `text` - The text to narrate
    ///
    /// # Returns
    /// * `Result<SynthesisResult, ProviderError>` - Float audio or an error
    async fn synthesize(&self, text: &str) -> Result<SynthesisResult, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod nllb;
pub mod mms;
pub mod mock;
