/*!
 * Tests for error types and conversions
 */

use panelkit::errors::{ApiError, AppError, SessionError, TranslationError, ValidationDetail};

fn detail(loc: &[&str], msg: &str) -> ValidationDetail {
    ValidationDetail {
        loc: loc.iter().map(|part| serde_json::Value::from(*part)).collect(),
        msg: msg.to_string(),
        error_type: "value_error".to_string(),
    }
}

#[test]
fn test_apiError_status_shouldDisplayStatusAndMessage() {
    let error = ApiError::Status {
        status_code: 404,
        message: "User not found".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("404"));
    assert!(display.contains("User not found"));
}

#[test]
fn test_apiError_validation_shouldDisplayFirstMessage() {
    let error = ApiError::Validation(vec![
        detail(&["body", "email"], "value is not a valid email address"),
        detail(&["body", "password"], "too short"),
    ]);
    let display = format!("{}", error);
    assert!(display.contains("value is not a valid email address"));
    assert!(!display.contains("too short"));
}

#[test]
fn test_apiError_statusCode_shouldMapVariants() {
    assert_eq!(ApiError::Unauthorized(String::new()).status_code(), Some(401));
    assert_eq!(ApiError::Validation(Vec::new()).status_code(), Some(422));
    assert_eq!(ApiError::Transport("refused".into()).status_code(), None);
    assert_eq!(ApiError::Parse("eof".into()).status_code(), None);
    assert!(ApiError::Unauthorized(String::new()).is_unauthorized());
    assert!(!ApiError::Transport("refused".into()).is_unauthorized());
}

#[test]
fn test_apiError_userMessage_withEmptyMessage_shouldUseFallback() {
    let error = ApiError::Status {
        status_code: 500,
        message: String::new(),
    };
    assert_eq!(error.user_message("form_generic_error"), "form_generic_error");
    assert_eq!(
        ApiError::Validation(Vec::new()).user_message("form_generic_error"),
        "form_generic_error"
    );
    assert_eq!(
        ApiError::Unauthorized("Not authenticated".into()).user_message("x"),
        "Not authenticated"
    );
}

#[test]
fn test_validationDetail_location_shouldJoinParts() {
    let mut d = detail(&["body", "items"], "bad");
    d.loc.push(serde_json::Value::from(2));
    assert_eq!(d.location(), "body.items.2");
}

#[test]
fn test_validationDetail_deserialize_withTypeField_shouldMapErrorType() {
    let json = r#"{"loc":["body","email"],"msg":"field required","type":"missing"}"#;
    let parsed: ValidationDetail = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.error_type, "missing");
    assert_eq!(parsed.location(), "body.email");
}

#[test]
fn test_sessionError_fromApiError_shouldWrap() {
    let error: SessionError = ApiError::Unauthorized("expired".into()).into();
    assert!(matches!(error, SessionError::Api(ApiError::Unauthorized(_))));
}

#[test]
fn test_sessionError_fromAnyhow_shouldBecomeStorageError() {
    let error: SessionError = anyhow::anyhow!("disk full").into();
    assert!(matches!(error, SessionError::Storage(ref msg) if msg.contains("disk full")));
}

#[test]
fn test_appError_fromErrors_shouldWrapEachLayer() {
    let error: AppError = SessionError::NotLoggedIn.into();
    assert!(format!("{}", error).contains("Not logged in"));

    let error: AppError = TranslationError::NotLoaded("cs".into()).into();
    assert!(format!("{}", error).contains("cs"));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(error, AppError::Unknown(_)));
}
