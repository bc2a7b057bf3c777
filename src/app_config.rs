use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::language_utils::SupportedLanguage;

/// Application configuration module
/// This module handles the application configuration including the
/// directory layout, sidecar service settings and logging options.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory layout for pipeline artifacts
    #[serde(default)]
    pub directories: DirectoriesConfig,

    /// Translation service config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Speech synthesis service config
    #[serde(default)]
    pub tts: TtsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation decision mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    // @mode: Prompt the operator once per run
    #[default]
    Ask,
    // @mode: Translate without prompting whenever the source language is supported
    Always,
    // @mode: Keep the source text untouched
    Never,
}

impl TranslationMode {
    // @returns: Lowercase mode identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ask => "ask".to_string(),
            Self::Always => "always".to_string(),
            Self::Never => "never".to_string(),
        }
    }
}

// Implement Display trait for TranslationMode
impl std::fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationMode
impl std::str::FromStr for TranslationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ask" => Ok(Self::Ask),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(anyhow!("Invalid translation mode: {}", s)),
        }
    }
}

/// Directory layout for the pipeline stages
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DirectoriesConfig {
    /// Source documents directory
    #[serde(default = "default_data_dir")]
    pub data: PathBuf,

    /// Per-page document output directory
    #[serde(default = "default_pages_dir")]
    pub pages: PathBuf,

    /// Extracted text directory
    #[serde(default = "default_text_dir")]
    pub text: PathBuf,

    /// Per-page audio directory
    #[serde(default = "default_audio_dir")]
    pub audio: PathBuf,

    /// Concatenated audio output directory
    #[serde(default = "default_results_dir")]
    pub results: PathBuf,
}

impl DirectoriesConfig {
    // @returns: Every configured directory, bootstrap order
    pub fn all(&self) -> [&Path; 5] {
        [
            self.data.as_path(),
            self.pages.as_path(),
            self.text.as_path(),
            self.audio.as_path(),
            self.results.as_path(),
        ]
    }
}

impl Default for DirectoriesConfig {
    fn default() -> Self {
        Self {
            data: default_data_dir(),
            pages: default_pages_dir(),
            text: default_text_dir(),
            audio: default_audio_dir(),
            results: default_results_dir(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Decision mode applied to the whole run
    #[serde(default)]
    pub mode: TranslationMode,

    /// Sidecar service endpoint URL
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    /// Model identifier sent with every request
    #[serde(default = "default_translation_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_translation_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Rate limit in requests per minute (optional)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            mode: TranslationMode::default(),
            endpoint: default_translation_endpoint(),
            model: default_translation_model(),
            timeout_secs: default_translation_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit: None,
        }
    }
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TtsConfig {
    /// Sidecar service endpoint URL
    #[serde(default = "default_tts_endpoint")]
    pub endpoint: String,

    /// Spanish voice model identifier
    #[serde(default = "default_spanish_voice")]
    pub voice_es: String,

    /// English voice model identifier
    #[serde(default = "default_english_voice")]
    pub voice_en: String,

    /// Request timeout in seconds
    #[serde(default = "default_tts_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl TtsConfig {
    // @returns: Voice model identifier for the routed language
    pub fn voice_for(&self, language: SupportedLanguage) -> &str {
        match language {
            SupportedLanguage::Es => &self.voice_es,
            SupportedLanguage::En => &self.voice_en,
        }
    }
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            endpoint: default_tts_endpoint(),
            voice_es: default_spanish_voice(),
            voice_en: default_english_voice(),
            timeout_secs: default_tts_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_pages_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_text_dir() -> PathBuf {
    PathBuf::from("text")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("audio/result_audio")
}

fn default_translation_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_translation_model() -> String {
    "facebook/nllb-200-3.3B".to_string()
}

fn default_translation_timeout_secs() -> u64 {
    120
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_tts_endpoint() -> String {
    "http://localhost:5001".to_string()
}

fn default_spanish_voice() -> String {
    "facebook/mms-tts-spa".to_string()
}

fn default_english_voice() -> String {
    "facebook/mms-tts-eng".to_string()
}

fn default_tts_timeout_secs() -> u64 {
    // Synthesis of a full page takes far longer than translation
    300
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        for dir in self.directories.all() {
            if dir.as_os_str().is_empty() {
                return Err(anyhow!("Directory paths must not be empty"));
            }
        }

        if self.translation.endpoint.trim().is_empty() {
            return Err(anyhow!("Translation endpoint must not be empty"));
        }
        if self.translation.model.trim().is_empty() {
            return Err(anyhow!("Translation model must not be empty"));
        }
        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("Translation timeout must be greater than zero"));
        }

        if self.tts.endpoint.trim().is_empty() {
            return Err(anyhow!("TTS endpoint must not be empty"));
        }
        if self.tts.voice_es.trim().is_empty() || self.tts.voice_en.trim().is_empty() {
            return Err(anyhow!("TTS voice identifiers must not be empty"));
        }
        if self.tts.timeout_secs == 0 {
            return Err(anyhow!("TTS timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            directories: DirectoriesConfig::default(),
            translation: TranslationConfig::default(),
            tts: TtsConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
