use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for detection and ISO code handling
///
/// This module provides the supported-language set for the pipeline,
/// text language detection, and helpers for normalizing ISO 639-1
/// (2-letter) and ISO 639-3 (3-letter) language codes.
/// The two languages the pipeline can translate between and narrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedLanguage {
    /// Spanish
    Es,
    /// English
    En,
}

impl SupportedLanguage {
    /// Parse a two-letter tag, tolerating surrounding whitespace and case
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "es" => Some(SupportedLanguage::Es),
            "en" => Some(SupportedLanguage::En),
            _ => None,
        }
    }

    /// The two-letter lowercase tag
    pub fn tag(&self) -> &'static str {
        match self {
            SupportedLanguage::Es => "es",
            SupportedLanguage::En => "en",
        }
    }

    /// The other member of the supported pair
    pub fn other(&self) -> Self {
        match self {
            SupportedLanguage::Es => SupportedLanguage::En,
            SupportedLanguage::En => SupportedLanguage::Es,
        }
    }

    /// FLORES-200 code used by the NLLB translation model
    pub fn nllb_code(&self) -> &'static str {
        match self {
            SupportedLanguage::Es => "spa_Latn",
            SupportedLanguage::En => "eng_Latn",
        }
    }

    /// Human-readable English name
    pub fn name(&self) -> &'static str {
        match self {
            SupportedLanguage::Es => Language::Spa.to_name(),
            SupportedLanguage::En => Language::Eng.to_name(),
        }
    }
}

impl std::fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Detect the language of a text, returning a normalized 2-letter tag
/// where one exists (3-letter otherwise). Returns None when the text is
/// empty or detection finds nothing.
pub fn detect_language(text: &str) -> Option<String> {
    let info = whatlang::detect(text)?;
    let code = info.lang().code();
    Some(normalize_to_part1_or_part2t(code).unwrap_or_else(|_| code.to_string()))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to the 3-letter code if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's already a 2-letter code, validate it
    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    }
    // If it's a 3-letter code, try to find the corresponding 2-letter code
    else if normalized_code.len() == 3 {
        if let Some(lang) = Language::from_639_3(&normalized_code) {
            // Try to get the ISO 639-1 code
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }

            // If no ISO 639-1 code exists, return the 3-letter code
            return Ok(normalized_code);
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the language name from a 2- or 3-letter code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = code.trim().to_lowercase();
    let lang = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(&normalized),
        _ => None,
    };

    lang.map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))
}
