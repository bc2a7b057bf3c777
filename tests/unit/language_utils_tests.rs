/*!
 * Tests for language utility functions
 */

use librovoz::language_utils::{
    detect_language, get_language_name, normalize_to_part1_or_part2t, SupportedLanguage,
};
use crate::common;

/// Test parsing of supported language tags
#[test]
fn test_from_tag_withValidTags_shouldParse() {
    assert_eq!(SupportedLanguage::from_tag("es"), Some(SupportedLanguage::Es));
    assert_eq!(SupportedLanguage::from_tag("en"), Some(SupportedLanguage::En));

    // Whitespace and case tests
    assert_eq!(SupportedLanguage::from_tag(" ES "), Some(SupportedLanguage::Es));
    assert_eq!(SupportedLanguage::from_tag("En"), Some(SupportedLanguage::En));

    // Anything outside the pair is not supported
    assert_eq!(SupportedLanguage::from_tag("fr"), None);
    assert_eq!(SupportedLanguage::from_tag("spa"), None);
    assert_eq!(SupportedLanguage::from_tag(""), None);
}

/// Test the code and name accessors of the supported pair
#[test]
fn test_supported_language_accessors_shouldExposeProtocolCodes() {
    assert_eq!(SupportedLanguage::Es.tag(), "es");
    assert_eq!(SupportedLanguage::En.tag(), "en");

    assert_eq!(SupportedLanguage::Es.nllb_code(), "spa_Latn");
    assert_eq!(SupportedLanguage::En.nllb_code(), "eng_Latn");

    assert_eq!(SupportedLanguage::Es.name(), "Spanish");
    assert_eq!(SupportedLanguage::En.name(), "English");

    // Display renders the two-letter tag
    assert_eq!(SupportedLanguage::Es.to_string(), "es");
    assert_eq!(SupportedLanguage::En.to_string(), "en");
}

/// Test that each language maps to the other member of the pair
#[test]
fn test_other_shouldReturnTheOppositeLanguage() {
    assert_eq!(SupportedLanguage::Es.other(), SupportedLanguage::En);
    assert_eq!(SupportedLanguage::En.other(), SupportedLanguage::Es);
    assert_eq!(SupportedLanguage::Es.other().other(), SupportedLanguage::Es);
}

/// Test detection of Spanish text
#[test]
fn test_detect_language_withSpanishText_shouldReturnEs() {
    let text = "En un lugar de la Mancha, de cuyo nombre no quiero acordarme, no ha mucho \
                tiempo que vivía un hidalgo de los de lanza en astillero, adarga antigua, \
                rocín flaco y galgo corredor.";
    assert_eq!(detect_language(text).as_deref(), Some("es"));

    // The ASCII sample used for PDF round trips detects the same way
    assert_eq!(detect_language(common::spanish_sample_text()).as_deref(), Some("es"));
}

/// Test detection of English text
#[test]
fn test_detect_language_withEnglishText_shouldReturnEn() {
    let text = "It is a truth universally acknowledged, that a single man in possession \
                of a good fortune, must be in want of a wife.";
    assert_eq!(detect_language(text).as_deref(), Some("en"));
    assert_eq!(detect_language(common::english_sample_text()).as_deref(), Some("en"));
}

/// Test detection of empty and whitespace-only text
#[test]
fn test_detect_language_withEmptyText_shouldReturnNone() {
    assert_eq!(detect_language(""), None);
    assert_eq!(detect_language("   \n\t  "), None);
}

/// Test that detected tags feed straight into the supported pair
#[test]
fn test_detect_language_resultFeedsFromTag() {
    let detected = detect_language(common::spanish_sample_text());
    let language = detected.as_deref().and_then(SupportedLanguage::from_tag);
    assert_eq!(language, Some(SupportedLanguage::Es));
}

/// Test normalization of language codes to ISO 639-1 format
#[test]
fn test_normalize_to_part1_or_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part1_or_part2t("es").unwrap(), "es");
    assert_eq!(normalize_to_part1_or_part2t("spa").unwrap(), "es");
    assert_eq!(normalize_to_part1_or_part2t("eng").unwrap(), "en");

    // Case insensitivity and whitespace
    assert_eq!(normalize_to_part1_or_part2t("EN").unwrap(), "en");
    assert_eq!(normalize_to_part1_or_part2t(" SPA ").unwrap(), "es");

    // A code with no 2-letter equivalent keeps its 3-letter form
    assert_eq!(normalize_to_part1_or_part2t("ceb").unwrap(), "ceb");

    // Invalid codes
    assert!(normalize_to_part1_or_part2t("xyz").is_err());
    assert!(normalize_to_part1_or_part2t("e").is_err());
    assert!(normalize_to_part1_or_part2t("abcd").is_err());
}

/// Test retrieval of language names from codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnCorrectName() {
    assert_eq!(get_language_name("es").unwrap(), "Spanish");
    assert_eq!(get_language_name("spa").unwrap(), "Spanish");
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("eng").unwrap(), "English");

    // Invalid codes
    assert!(get_language_name("xyz").is_err());
    assert!(get_language_name("q").is_err());
}
