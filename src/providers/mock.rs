/*!
 * Mock provider implementations for testing.
 *
 * This module provides scripted in-process providers:
 * - `MockTranslator::working()` - Always succeeds with tagged text
 * - `MockTranslator::unsupported_nth(n)` - Fails the nth request with an unsupported language
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockSynthesizer::working(language)` - Returns deterministic audio per text
 *
 * The default working translator echoes the input with a `[target]` tag,
 * which language detection will still classify by the original text; tests
 * that depend on realistic detection of translated pages should install a
 * custom response generator returning text in the target language.
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::language_utils::SupportedLanguage;
use crate::providers::{SpeechSynthesizer, SynthesisResult, Translator};

/// Samples the working mock synthesizer emits per character of input
const SAMPLES_PER_CHAR: usize = 8;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockTranslatorBehavior {
    /// Always succeeds with tagged text
    Working,
    /// Fails the nth request (1-based) with an unsupported language error
    UnsupportedNth { n: usize },
    /// Fails intermittently (every Nth request) with a server error
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock translator for testing pipeline behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockTranslatorBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&str, SupportedLanguage) -> String>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockTranslatorBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockTranslatorBehavior::Working)
    }

    /// Create a mock that rejects the nth request as an unsupported language
    pub fn unsupported_nth(n: usize) -> Self {
        Self::new(MockTranslatorBehavior::UnsupportedNth { n })
    }

    /// Create an intermittently failing mock translator
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockTranslatorBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockTranslatorBehavior::Failing)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&str, SupportedLanguage) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target: SupportedLanguage) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockTranslatorBehavior::Working => {
                let translated = if let Some(generator) = self.custom_response {
                    generator(text, target)
                } else {
                    format!("[{}] {}", target.tag(), text)
                };
                Ok(translated)
            }

            MockTranslatorBehavior::UnsupportedNth { n } => {
                if count + 1 == n {
                    Err(ProviderError::UnsupportedLanguage {
                        language: "unknown".to_string(),
                    })
                } else {
                    Ok(format!("[{}] {}", target.tag(), text))
                }
            }

            MockTranslatorBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(format!("[{}] {}", target.tag(), text))
                }
            }

            MockTranslatorBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated translator failure".to_string(),
                status_code: 500,
            }),

            MockTranslatorBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(format!("[{}] {}", target.tag(), text))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockTranslatorBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockSynthesizerBehavior {
    /// Always succeeds with deterministic audio
    Working,
    /// Always fails with an error
    Failing,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock speech synthesizer for testing pipeline behavior
///
/// The working behavior returns `SAMPLES_PER_CHAR` samples per character
/// of input, so tests can reason about output lengths.
#[derive(Debug)]
pub struct MockSynthesizer {
    /// Voice language this mock reports
    language: SupportedLanguage,
    /// Sample rate of the generated audio
    sample_rate: u32,
    /// Behavior mode
    behavior: MockSynthesizerBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
}

impl MockSynthesizer {
    /// Create a new mock synthesizer with the specified behavior
    pub fn new(language: SupportedLanguage, behavior: MockSynthesizerBehavior) -> Self {
        Self {
            language,
            sample_rate: 16_000,
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock synthesizer for a language
    pub fn working(language: SupportedLanguage) -> Self {
        Self::new(language, MockSynthesizerBehavior::Working)
    }

    /// Create a failing mock synthesizer for a language
    pub fn failing(language: SupportedLanguage) -> Self {
        Self::new(language, MockSynthesizerBehavior::Failing)
    }

    /// Override the sample rate of the generated audio
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Number of synthesize calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }
}

impl Clone for MockSynthesizer {
    fn clone(&self) -> Self {
        Self {
            language: self.language,
            sample_rate: self.sample_rate,
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    fn language(&self) -> SupportedLanguage {
        self.language
    }

    async fn synthesize(&self, text: &str) -> Result<SynthesisResult, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);

        match self.behavior {
            MockSynthesizerBehavior::Working => Ok(SynthesisResult {
                samples: vec![0.25; text.chars().count().max(1) * SAMPLES_PER_CHAR],
                sample_rate: self.sample_rate,
            }),

            MockSynthesizerBehavior::Failing => Err(ProviderError::ApiError {
                message: "Simulated synthesizer failure".to_string(),
                status_code: 500,
            }),

            MockSynthesizerBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                Ok(SynthesisResult {
                    samples: vec![0.25; text.chars().count().max(1) * SAMPLES_PER_CHAR],
                    sample_rate: self.sample_rate,
                })
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockSynthesizerBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
