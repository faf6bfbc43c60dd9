use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for the codes used as translation table keys
///
/// The backend stores language codes of at most five characters: an
/// ISO 639-1 code optionally followed by a region (`en`, `cs`, `pt-BR`).
/// These helpers validate and normalize user input to that form.

/// Maximum length of a language code accepted by the backend
pub const MAX_LANGUAGE_CODE_LEN: usize = 5;

/// Map an ISO 639-2/B code to its ISO 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Split `pt_BR` / `pt-br` into its primary subtag and optional region
fn split_tag(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((primary, region)) => (primary.to_lowercase(), Some(region.to_uppercase())),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Look up the language for a primary subtag (2 or 3 letters)
fn lookup(primary: &str) -> Option<Language> {
    match primary.len() {
        2 => Language::from_639_1(primary),
        3 => {
            let part2t = part2b_to_part2t(primary).unwrap_or(primary);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Validate a language code
pub fn validate_language_code(code: &str) -> Result<()> {
    normalize_language_code(code).map(|_| ())
}

/// Normalize a language code to the backend form (`cs`, `pt-BR`)
///
/// Three-letter codes are converted to their two-letter equivalent when one
/// exists. Codes that end up longer than the backend accepts are rejected.
pub fn normalize_language_code(code: &str) -> Result<String> {
    let (primary, region) = split_tag(code);

    let language = lookup(&primary).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    let primary = language
        .to_639_1()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Language has no two-letter code: {}", code))?;

    let normalized = match region {
        Some(region) if region.len() == 2 && region.chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("{}-{}", primary, region)
        }
        Some(region) => return Err(anyhow!("Invalid region '{}' in language code: {}", region, code)),
        None => primary,
    };

    if normalized.len() > MAX_LANGUAGE_CODE_LEN {
        return Err(anyhow!("Language code too long: {}", code));
    }

    Ok(normalized)
}

/// Check if two language codes match (represent the same language and region)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_language_code(code1), normalize_language_code(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let (primary, _) = split_tag(code);
    let lang = lookup(&primary).ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;
    Ok(lang.to_name().to_string())
}

/// Get the language's own name for itself (`čeština` for `cs`), falling back
/// to the English name
pub fn get_native_name(code: &str) -> Result<String> {
    let (primary, _) = split_tag(code);
    let lang = lookup(&primary).ok_or_else(|| anyhow!("Failed to get language from code: {}", code))?;
    Ok(lang
        .to_autonym()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_name().to_string()))
}
