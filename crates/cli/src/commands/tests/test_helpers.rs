use super::{config_for, with_token};
use crate::commands::helpers::{display_value, oauth_settings, resolve_provider};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_display_value() {
    assert_eq!(display_value(&json!(null)), "");
    assert_eq!(display_value(&json!("hello")), "hello");
    assert_eq!(display_value(&json!(42.5)), "42.5");
    assert_eq!(display_value(&json!(true)), "true");
}

#[tokio::test]
async fn test_oauth_settings_from_bootstrap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app_config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auth": {"clientId": "remote-client", "apiScopes": "api/read api/write"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = oauth_settings(&config_for(&server)).await.unwrap();
    assert_eq!(settings.client_id, "remote-client");
    assert_eq!(settings.scopes, vec!["api/read", "api/write"]);
    assert_eq!(settings.token_url.path(), "/oauth2/token");
    assert_eq!(settings.authorization_url.path(), "/login");
}

#[tokio::test]
async fn test_local_oauth_settings_skip_bootstrap() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app_config.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.auth.client_id = Some("local-client".to_string());
    config.auth.scopes = vec!["openid".to_string()];

    let settings = oauth_settings(&config).await.unwrap();
    assert_eq!(settings.client_id, "local-client");
    assert_eq!(settings.scopes, vec!["openid"]);
}

#[tokio::test]
async fn test_bootstrap_failure_names_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/app_config.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = oauth_settings(&config_for(&server)).await.unwrap_err();
    assert!(err.to_string().contains("app_config.json"));
}

#[tokio::test]
async fn test_static_token_needs_no_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let provider = resolve_provider(&with_token(config_for(&server)))
        .await
        .unwrap();
    assert!(provider.has_access().await);
    assert_eq!(provider.access_token().await.unwrap(), "cli_token");
}
