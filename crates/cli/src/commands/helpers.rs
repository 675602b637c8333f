//! Shared helper functions and types for CLI commands.
//!
//! # Components
//! - **Wiring**: `connect` (authorized connector), `resolve_provider` and `oauth_settings`
//!   (credentials, falling back to the deployment's bootstrap document for the client id).
//! - **Result Types**: Serializable structs used by commands for machine-readable (JSON/YAML) output.

use anyhow::Result;
use loopstudio_common::auth::provider_from_config;
use loopstudio_common::{AccessTokenProvider, AppConfig, OAuthSettings};
use loopstudio_connectors::bootstrap::{load_app_config, RemoteAppConfig};
use loopstudio_connectors::remote::HttpFetcher;
use loopstudio_connectors::Connector;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Fetch the deployment's public bootstrap document.
pub async fn fetch_app_config(config: &AppConfig) -> Result<RemoteAppConfig> {
    let url = config.remote.app_config_url()?;
    Ok(load_app_config(&HttpFetcher::anonymous(), &url).await?)
}

/// OAuth settings, completed from the bootstrap document when the client id or scopes are not
/// configured locally.
pub async fn oauth_settings(config: &AppConfig) -> Result<OAuthSettings> {
    if config.auth.client_id.is_some() && !config.auth.scopes.is_empty() {
        return Ok(OAuthSettings::from_config(config, None)?);
    }

    let app_config = fetch_app_config(config).await?;
    let client_id = config
        .auth
        .client_id
        .clone()
        .unwrap_or(app_config.auth.client_id);
    let mut settings = OAuthSettings::from_config(config, Some(client_id))?;
    if settings.scopes.is_empty() {
        settings.scopes = app_config.auth.api_scopes;
    }
    Ok(settings)
}

/// The credential provider for this invocation. A static token never touches the network.
pub async fn resolve_provider(config: &AppConfig) -> Result<Arc<dyn AccessTokenProvider>> {
    if config.auth.token.is_some() || config.auth.client_id.is_some() {
        return Ok(provider_from_config(config, None)?);
    }

    tracing::debug!("No local client id, reading it from the bootstrap document");
    let app_config = fetch_app_config(config).await?;
    Ok(provider_from_config(config, Some(app_config.auth.client_id))?)
}

pub async fn connect(config: &AppConfig) -> Result<Connector> {
    let provider = resolve_provider(config).await?;
    Ok(Connector::from_config(config, provider)?)
}

/// Render a cell for human output: strings unquoted, `null` empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ===== Result Types =====

#[derive(Serialize)]
pub struct TablesResult {
    pub tables: Vec<String>,
}

#[derive(Serialize)]
pub struct AuthUrlResult {
    pub authorization_url: String,
}

#[derive(Serialize)]
pub struct LoginResult {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
pub struct AuthStatusResult {
    pub authorized: bool,
    pub method: String,
}
