/*!
 * Tests for the translation resolver
 */

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use panelkit::client::models::{TranslationCreate, TranslationUpdate};
use panelkit::errors::TranslationError;
use panelkit::i18n::{Translate, TranslationResolver, resolve_language};

use crate::common::mock_api::{MockErrorType, MockTranslationsApi};
use crate::common::{self, sample_user};

fn backend() -> MockTranslationsApi {
    MockTranslationsApi::new()
        .with_table(
            "en",
            &[
                ("welcome", "Welcome"),
                ("greet", "Hello {name}, welcome back {name}!"),
                ("bye", "Goodbye"),
            ],
        )
        .with_table(
            "cs",
            &[
                ("welcome", "Vítejte"),
                ("greet", "Ahoj {name}!"),
                ("bye", "Nashledanou"),
            ],
        )
}

fn resolver(api: MockTranslationsApi) -> (Arc<MockTranslationsApi>, TranslationResolver<MockTranslationsApi>) {
    let api = Arc::new(api);
    (api.clone(), TranslationResolver::new(api, "en"))
}

fn replacements(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_get_translation_withLoadedTable_shouldReturnValue() -> Result<()> {
    let (_, resolver) = resolver(backend());
    resolver.load("en").await?;

    assert_eq!(resolver.get_translation("welcome", None), "Welcome");
    Ok(())
}

#[tokio::test]
async fn test_get_translation_withMissingKey_shouldReturnKey() -> Result<()> {
    let (_, resolver) = resolver(backend());
    resolver.load("en").await?;

    assert_eq!(resolver.get_translation("missing_key", None), "missing_key");
    Ok(())
}

#[tokio::test]
async fn test_get_translation_withoutLoadedTable_shouldReturnKey() {
    let (_, resolver) = resolver(backend());

    assert!(!resolver.is_ready());
    assert_eq!(resolver.get_translation("welcome", None), "welcome");
    assert!(matches!(resolver.active_table(), Err(TranslationError::NotLoaded(_))));
}

#[tokio::test]
async fn test_get_translation_withReplacements_shouldReplaceEveryOccurrence() -> Result<()> {
    let (_, resolver) = resolver(backend());
    resolver.load("en").await?;

    let values = replacements(&[("name", "Ana")]);
    assert_eq!(
        resolver.get_translation("greet", Some(&values)),
        "Hello Ana, welcome back Ana!"
    );
    Ok(())
}

#[tokio::test]
async fn test_translate_shouldResolveWithoutReplacements() -> Result<()> {
    let (_, resolver) = resolver(backend());
    resolver.load("en").await?;

    let translator: &dyn Translate = &resolver;
    assert_eq!(translator.translate("bye"), "Goodbye");
    Ok(())
}

// =============================================================================
// Loading and switching
// =============================================================================

#[tokio::test]
async fn test_load_withCachedTable_shouldNotRefetch() -> Result<()> {
    let (api, resolver) = resolver(backend());

    resolver.load("en").await?;
    resolver.load("en").await?;
    resolver.load("EN").await?;

    assert_eq!(api.call_count("get_translations"), 1);
    assert_eq!(resolver.cache_stats().hits, 2);
    Ok(())
}

#[tokio::test]
async fn test_load_withInvalidLanguage_shouldFailWithoutFetching() {
    let (api, resolver) = resolver(backend());

    let result = resolver.load("not a language").await;

    assert!(matches!(result, Err(TranslationError::InvalidLanguage(_))));
    assert_eq!(api.call_count("get_translations"), 0);
}

#[tokio::test]
async fn test_load_withApiFailure_shouldLeaveTableUnavailable() {
    let (api, resolver) = resolver(backend());
    api.fail_next_call(MockErrorType::Connection);

    assert!(matches!(resolver.load("en").await, Err(TranslationError::Api(_))));
    assert!(!resolver.is_ready());
    assert!(!resolver.is_loading());
    assert_eq!(resolver.get_translation("welcome", None), "welcome");
}

#[tokio::test]
async fn test_reload_shouldReplaceCachedTable() -> Result<()> {
    let (api, resolver) = resolver(backend());
    resolver.load("en").await?;
    api.set_value("en", "welcome", "Hi there");

    assert_eq!(resolver.get_translation("welcome", None), "Welcome");
    resolver.reload("en").await?;
    assert_eq!(resolver.get_translation("welcome", None), "Hi there");
    Ok(())
}

#[tokio::test]
async fn test_set_language_fromEnToCs_shouldReturnCzechAfterLoad() -> Result<()> {
    let (_, resolver) = resolver(backend());
    resolver.set_language("en").await?;
    assert_eq!(resolver.get_translation("welcome", None), "Welcome");

    resolver.set_language("cs").await?;

    assert_eq!(resolver.active_language(), "cs");
    assert_eq!(resolver.get_translation("welcome", None), "Vítejte");
    assert_eq!(resolver.get_translation("bye", None), "Nashledanou");
    Ok(())
}

#[tokio::test]
async fn test_set_language_whileLoading_shouldNeverMixTables() -> Result<()> {
    let api = backend().with_delay("cs", Duration::from_millis(200));
    let (_, resolver) = resolver(api);
    resolver.set_language("en").await?;

    let switch = resolver.set_language("cs");
    let observe = async {
        let mut seen = Vec::new();
        for _ in 0..10 {
            tokio::time::sleep(Duration::from_millis(2)).await;
            seen.push((
                resolver.is_loading(),
                resolver.get_translation("welcome", None),
                resolver.get_translation("bye", None),
            ));
        }
        seen
    };
    let (switched, seen) = tokio::join!(switch, observe);
    switched?;

    for (loading, welcome, bye) in seen {
        assert!(loading, "cs table should still be loading");
        // Neither English values nor a mix: keys until the Czech table arrives
        assert_eq!((welcome.as_str(), bye.as_str()), ("welcome", "bye"));
    }
    assert!(resolver.is_ready());
    assert!(!resolver.is_loading());
    assert_eq!(resolver.get_translation("welcome", None), "Vítejte");
    assert_eq!(resolver.get_translation("bye", None), "Nashledanou");
    Ok(())
}

#[tokio::test]
async fn test_set_language_withSupersededSlowFetch_shouldKeepLatestLanguage() -> Result<()> {
    let api = backend().with_delay("cs", Duration::from_millis(60));
    let (_, resolver) = resolver(api);

    let slow = resolver.set_language("cs");
    let fast = async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        resolver.set_language("en").await
    };
    let (slow, fast) = tokio::join!(slow, fast);
    slow?;
    fast?;

    assert_eq!(resolver.active_language(), "en");
    assert_eq!(resolver.get_translation("welcome", None), "Welcome");
    assert!(resolver.table("cs").is_some());
    Ok(())
}

#[tokio::test]
async fn test_preload_shouldLoadValidLanguagesAndSkipFailures() {
    let (_, resolver) = resolver(backend());

    let loaded = resolver
        .preload(&["en".to_string(), "cs".to_string(), "de".to_string()])
        .await;

    assert_eq!(loaded, 2);
    assert_eq!(resolver.cache().languages(), vec!["cs".to_string(), "en".to_string()]);
}

// =============================================================================
// Language precedence
// =============================================================================

#[test]
fn test_resolve_language_withUserPreference_shouldWin() {
    let user = sample_user("user@example.com", "cs");
    assert_eq!(resolve_language(Some(&user), Some("de"), "en"), "cs");
}

#[test]
fn test_resolve_language_withoutUser_shouldUseStoredPreference() {
    assert_eq!(resolve_language(None, Some("de"), "en"), "de");
}

#[test]
fn test_resolve_language_withEmptyValues_shouldFallBackToDefault() {
    let user = sample_user("user@example.com", "");
    assert_eq!(resolve_language(Some(&user), Some(" "), "en"), "en");
    assert_eq!(resolve_language(None, None, "en"), "en");
}

// =============================================================================
// Administration
// =============================================================================

#[tokio::test]
async fn test_create_entry_shouldInvalidateLanguageTable() -> Result<()> {
    let (_, resolver) = resolver(backend());
    resolver.load("en").await?;
    resolver.load("cs").await?;

    let response = resolver
        .create_entry(
            &common::live_token(),
            &TranslationCreate {
                language_code: "en".into(),
                key: "new_key".into(),
                value: "New value".into(),
            },
        )
        .await?;

    assert_eq!(response.translation.key, "new_key");
    assert!(resolver.table("en").is_none());
    assert!(resolver.table("cs").is_some());

    resolver.load("en").await?;
    assert_eq!(resolver.get_translation("new_key", None), "New value");
    Ok(())
}

#[tokio::test]
async fn test_update_entry_shouldInvalidateLanguageTable() -> Result<()> {
    let (api, resolver) = resolver(backend());
    resolver.load("cs").await?;
    let id = api.entry_id("cs", "bye").expect("entry exists");

    resolver
        .update_entry(
            &common::live_token(),
            id,
            &TranslationUpdate {
                value: Some("Sbohem".into()),
                ..TranslationUpdate::default()
            },
        )
        .await?;

    assert!(resolver.table("cs").is_none());
    Ok(())
}

#[tokio::test]
async fn test_delete_entry_shouldInvalidateAllTables() -> Result<()> {
    let (api, resolver) = resolver(backend());
    resolver.load("en").await?;
    resolver.load("cs").await?;
    let id = api.entry_id("en", "bye").expect("entry exists");

    resolver.delete_entry(&common::live_token(), id).await?;

    assert!(resolver.cache().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_bulk_insert_shouldInvalidateEachAffectedLanguage() -> Result<()> {
    let (_, resolver) = resolver(backend().with_table("de", &[("bye", "Tschüss")]));
    resolver.preload(&["en".to_string(), "cs".to_string(), "de".to_string()]).await;

    let entries = vec![
        TranslationCreate {
            language_code: "en".into(),
            key: "a".into(),
            value: "A".into(),
        },
        TranslationCreate {
            language_code: "cs".into(),
            key: "a".into(),
            value: "A".into(),
        },
    ];
    resolver.bulk_insert(&common::live_token(), &entries).await?;

    assert_eq!(resolver.cache().languages(), vec!["de".to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_bulk_shouldReturnTablesPerLanguage() -> Result<()> {
    let (_, resolver) = resolver(backend());

    let bulk = resolver
        .bulk(&common::live_token(), &["en".to_string(), "cs".to_string()])
        .await?;

    assert_eq!(bulk["cs"]["welcome"], "Vítejte");
    assert_eq!(bulk["en"].len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_admin_withExpiredBearer_shouldReturnUnauthorized() {
    let (_, resolver) = resolver(backend());

    let result = resolver
        .bulk(&common::expired_token(), &["en".to_string()])
        .await;

    assert!(result.is_err_and(|e| e.is_unauthorized()));
}

#[tokio::test]
async fn test_entry_withNormalizedLanguage_shouldFetchWithoutCaching() -> Result<()> {
    let (api, resolver) = resolver(backend());

    let entry = resolver.entry("CES", "bye").await?;

    assert_eq!(entry.language_code, "cs");
    assert_eq!(entry.value, "Nashledanou");
    assert_eq!(api.call_count("get_translation"), 1);
    assert!(resolver.table("cs").is_none());

    let missing = resolver.entry("cs", "nope").await;
    assert!(matches!(missing, Err(TranslationError::Api(_))));
    Ok(())
}
