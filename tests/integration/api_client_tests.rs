/*!
 * Integration tests for the HTTP client against a local stub server
 */

use anyhow::Result;
use uuid::Uuid;

use panelkit::client::models::{LoginCredentials, UserUpdate, UserUpdateMe};
use panelkit::client::{ApiClient, AuthApi, TranslationsApi, UsersApi};
use panelkit::errors::ApiError;

use crate::common::http_stub::HttpStub;

const USER_JSON: &str = r#"{
    "id": "5f0c4a52-1b0c-4f1b-9c38-3f4d8c1d2e11",
    "email": "user@example.com",
    "is_active": true,
    "is_superuser": false,
    "full_name": "Test User",
    "preferred_language": "cs",
    "auth_provider": "local"
}"#;

const USER_ID: &str = "5f0c4a52-1b0c-4f1b-9c38-3f4d8c1d2e11";

async fn stub_and_client() -> Result<(HttpStub, ApiClient)> {
    let stub = HttpStub::start().await?;
    let client = ApiClient::new(&stub.api_root())?;
    Ok((stub, client))
}

#[tokio::test]
async fn test_login_shouldPostFormCredentials() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "POST",
        "/api/v1/auth/login",
        200,
        r#"{"access_token":"a.b.c","refresh_token":"r","token_type":"bearer"}"#,
    );

    let token = client
        .login(&LoginCredentials::new("user@example.com", "p&ss word"))
        .await?;

    assert_eq!(token.access_token, "a.b.c");
    assert_eq!(token.refresh_token.as_deref(), Some("r"));

    let request = stub.last_request().expect("request recorded");
    assert_eq!(
        request.headers.get("content-type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert!(request.body.contains("username=user%40example.com"));
    assert!(request.body.contains("password=p%26ss+word"));
    Ok(())
}

#[tokio::test]
async fn test_login_withoutRefreshToken_shouldDecode() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route("POST", "/api/v1/auth/login", 200, r#"{"access_token":"a.b.c"}"#);

    let token = client.login(&LoginCredentials::new("u", "p")).await?;

    assert_eq!(token.refresh_token, None);
    assert_eq!(token.token_type, "bearer");
    Ok(())
}

#[tokio::test]
async fn test_current_user_shouldSendBearerToken() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route("GET", "/api/v1/auth/profile", 200, USER_JSON);

    let user = client.current_user("token-123").await?;

    assert_eq!(user.preferred_language, "cs");
    let request = stub.last_request().expect("request recorded");
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer token-123")
    );
    Ok(())
}

#[tokio::test]
async fn test_current_user_with401_shouldReturnUnauthorized() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "GET",
        "/api/v1/auth/profile",
        401,
        r#"{"detail":"Could not validate credentials"}"#,
    );

    let result = client.current_user("expired").await;

    assert!(matches!(result, Err(ApiError::Unauthorized(ref m)) if m == "Could not validate credentials"));
    Ok(())
}

#[tokio::test]
async fn test_register_with422_shouldReturnValidationDetails() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "POST",
        "/api/v1/auth/register",
        422,
        r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address","type":"value_error"}]}"#,
    );

    let registration = panelkit::client::models::UserRegister {
        email: "bad".into(),
        password: "password123".into(),
        full_name: None,
    };
    let result = client.register(&registration).await;

    match result {
        Err(ApiError::Validation(details)) => {
            assert_eq!(details[0].msg, "value is not a valid email address");
            assert_eq!(details[0].location(), "body.email");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_update_current_user_shouldPatchOnlySetFields() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route("PATCH", "/api/v1/users/me", 200, USER_JSON);

    let update = UserUpdateMe {
        preferred_language: Some("cs".into()),
        ..UserUpdateMe::default()
    };
    client.update_current_user("token", &update).await?;

    let request = stub.last_request().expect("request recorded");
    let body: serde_json::Value = serde_json::from_str(&request.body)?;
    assert_eq!(body, serde_json::json!({"preferred_language": "cs"}));
    Ok(())
}

#[tokio::test]
async fn test_recover_password_shouldPutEmailInPath() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "POST",
        "/api/v1/auth/password/recover/user@example.com",
        200,
        r#"{"message":"Password recovery email sent"}"#,
    );

    let message = client.recover_password("user@example.com").await?;

    assert_eq!(message.message, "Password recovery email sent");
    Ok(())
}

#[tokio::test]
async fn test_get_translations_shouldDecodeList() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "GET",
        "/api/v1/languages/cs",
        200,
        r#"[{"key":"welcome","value":"Vítejte"},{"key":"bye","value":"Nashledanou"}]"#,
    );

    let items = client.get_translations("cs").await?;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].key, "welcome");
    assert_eq!(items[0].value, "Vítejte");
    Ok(())
}

#[tokio::test]
async fn test_get_bulk_translations_shouldRepeatLanguagesQuery() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "GET",
        "/api/v1/languages/translations/bulk/",
        200,
        r#"{"en":{"welcome":"Welcome"},"cs":{"welcome":"Vítejte"}}"#,
    );

    let bulk = client
        .get_bulk_translations("token", &["en".to_string(), "cs".to_string()])
        .await?;

    assert_eq!(bulk["cs"]["welcome"], "Vítejte");
    let request = stub.last_request().expect("request recorded");
    assert_eq!(
        request.target,
        "/api/v1/languages/translations/bulk/?languages=en&languages=cs"
    );
    Ok(())
}

#[tokio::test]
async fn test_delete_user_with404_shouldKeepStatusAndDetail() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    let id = Uuid::new_v4();

    let result = client.delete_user("token", id).await;

    assert!(matches!(
        result,
        Err(ApiError::Status { status_code: 404, ref message }) if message == "Not Found"
    ));
    assert_eq!(
        stub.last_request().map(|r| r.target),
        Some(format!("/api/v1/admin/users/{}", id))
    );
    Ok(())
}

#[tokio::test]
async fn test_list_users_shouldSendPaging() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "GET",
        "/api/v1/admin/users",
        200,
        &format!(r#"{{"data":[{}],"count":41}}"#, USER_JSON),
    );

    let page = client.list_users("token", 20, 10).await?;

    assert_eq!(page.count, 41);
    assert_eq!(page.data.len(), 1);
    assert_eq!(
        stub.last_request().map(|r| r.target),
        Some("/api/v1/admin/users?skip=20&limit=10".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_request_withUnreachableServer_shouldReturnTransportError() -> Result<()> {
    // Bind then drop a listener so the port is very likely closed
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        listener.local_addr()?.port()
    };
    let mut config = panelkit::app_config::ApiConfig::default();
    config.base_url = format!("http://127.0.0.1:{}", port);
    config.retry_count = 1;
    config.retry_backoff_ms = 1;
    let client = ApiClient::from_config(&config)?;

    let result = client.get_translations("en").await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
    Ok(())
}

#[tokio::test]
async fn test_get_user_shouldUseDetailPath() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    let id: Uuid = USER_ID.parse()?;
    stub.route("GET", &format!("/api/v1/admin/users/detail/{}", id), 200, USER_JSON);

    let user = client.get_user("token", id).await?;

    assert_eq!(user.id, id);
    assert_eq!(user.email, "user@example.com");
    let request = stub.last_request().expect("request recorded");
    assert_eq!(request.method, "GET");
    assert_eq!(
        request.headers.get("authorization").map(String::as_str),
        Some("Bearer token")
    );
    Ok(())
}

#[tokio::test]
async fn test_update_user_shouldPatchOnlySetFields() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    let id: Uuid = USER_ID.parse()?;
    stub.route("PATCH", &format!("/api/v1/admin/users/{}", id), 200, USER_JSON);

    let update = UserUpdate {
        full_name: Some("Test User".into()),
        is_superuser: Some(false),
        ..UserUpdate::default()
    };
    let user = client.update_user("token", id, &update).await?;

    assert_eq!(user.full_name.as_deref(), Some("Test User"));
    let requests = stub.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "PATCH");
    let body: serde_json::Value = serde_json::from_str(&requests[0].body)?;
    assert_eq!(body, serde_json::json!({"full_name": "Test User", "is_superuser": false}));
    Ok(())
}

#[tokio::test]
async fn test_get_translation_shouldFetchSingleKeyWithoutAuth() -> Result<()> {
    let (stub, client) = stub_and_client().await?;
    stub.route(
        "GET",
        "/api/v1/languages/cs/welcome",
        200,
        r#"{"id":"0b8f3c1e-6a43-4d0e-9a43-2f1f6b1c9d10","language_code":"cs","key":"welcome","value":"Vítejte"}"#,
    );

    let entry = client.get_translation("cs", "welcome").await?;

    assert_eq!(entry.key, "welcome");
    assert_eq!(entry.value, "Vítejte");
    let request = stub.last_request().expect("request recorded");
    assert_eq!(request.target, "/api/v1/languages/cs/welcome");
    assert!(!request.headers.contains_key("authorization"));
    Ok(())
}
