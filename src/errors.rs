/*!
 * Error types for the librovoz application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with inference sidecar APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Language outside the supported set for the requested operation
    #[error("Unsupported language: {language}")]
    UnsupportedLanguage {
        /// The offending language tag, or "unknown" when detection failed
        language: String
    },
}

impl ProviderError {
    /// Whether this error is a per-page failure the pipeline records and
    /// skips past, rather than an abort of the whole run
    pub fn is_page_recoverable(&self) -> bool {
        matches!(self, ProviderError::UnsupportedLanguage { .. })
    }
}

/// Errors that can occur while reading, writing or joining page audio
#[derive(Error, Debug)]
pub enum AudioError {
    /// Error reading a WAV file
    #[error("Failed to read audio file {file}: {reason}")]
    ReadFailed {
        /// Path of the file that failed to read
        file: String,
        /// Underlying decoder error
        reason: String
    },

    /// Error writing a WAV file
    #[error("Failed to write audio file {file}: {reason}")]
    WriteFailed {
        /// Path of the file that failed to write
        file: String,
        /// Underlying encoder error
        reason: String
    },

    /// Page files disagree on the WAV format; joining them would corrupt playback
    #[error("Audio format mismatch in {file}: expected {expected}, found {found}")]
    FormatMismatch {
        /// Format of the first page file
        expected: String,
        /// Format of the mismatching file
        found: String,
        /// Path of the mismatching file
        file: String
    },

    /// No page audio available to join
    #[error("No page audio files found in {0}")]
    NoInput(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an inference provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from audio processing
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
