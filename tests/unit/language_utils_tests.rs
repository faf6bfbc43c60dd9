/*!
 * Tests for language utility functions
 */

use panelkit::language_utils::{
    MAX_LANGUAGE_CODE_LEN, get_language_name, get_native_name, language_codes_match,
    normalize_language_code, validate_language_code,
};

#[test]
fn test_normalize_language_code_withValidCodes_shouldReturnBackendForm() {
    assert_eq!(normalize_language_code("en").unwrap(), "en");
    assert_eq!(normalize_language_code(" CS ").unwrap(), "cs");
    assert_eq!(normalize_language_code("ces").unwrap(), "cs");
    assert_eq!(normalize_language_code("cze").unwrap(), "cs");
    assert_eq!(normalize_language_code("ger").unwrap(), "de");
    assert_eq!(normalize_language_code("pt_br").unwrap(), "pt-BR");
    assert_eq!(normalize_language_code("en-us").unwrap(), "en-US");
}

#[test]
fn test_normalize_language_code_withInvalidCodes_shouldFail() {
    for code in ["", "x", "xx", "english", "en-USA", "zh-Hant", "e1"] {
        assert!(normalize_language_code(code).is_err(), "{:?} should be rejected", code);
    }
}

#[test]
fn test_normalize_language_code_shouldFitBackendLimit() {
    for code in ["en", "cs", "pt-BR", "deu"] {
        let normalized = normalize_language_code(code).unwrap();
        assert!(normalized.len() <= MAX_LANGUAGE_CODE_LEN);
    }
}

#[test]
fn test_validate_language_code_shouldMatchNormalization() {
    assert!(validate_language_code("fr").is_ok());
    assert!(validate_language_code("fra").is_ok());
    assert!(validate_language_code("zz").is_err());
}

#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("cs", "ces"));
    assert!(language_codes_match("cs", "CZE"));
    assert!(language_codes_match("pt-BR", "pt_br"));
    assert!(!language_codes_match("pt-BR", "pt"));
    assert!(!language_codes_match("en", "cs"));
    assert!(!language_codes_match("en", "invalid"));
}

#[test]
fn test_get_language_name_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("cs").unwrap(), "Czech");
    assert_eq!(get_language_name("pt-BR").unwrap(), "Portuguese");
    assert!(get_language_name("xx").is_err());
}

#[test]
fn test_get_native_name_shouldReturnAutonym() {
    assert_eq!(get_native_name("cs").unwrap(), "čeština");
    assert!(get_native_name("xx").is_err());
}
