//! Access-token providers.
//!
//! The connector core only ever asks a provider for a bearer token. Establishing the identity
//! (the interactive authorization-code flow) and resetting it live here, outside the core.
//!
//! Two providers exist:
//! - [`StaticTokenProvider`] for a pre-issued bearer token.
//! - [`OAuthTokenProvider`] for the OAuth 2.0 authorization-code flow with refresh tokens and
//!   a `moka` access-token cache.

use crate::config::AppConfig;
use async_trait::async_trait;
use loopstudio_error::{Result, StudioError};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

/// The identity provider requires a client secret on every token request even though the
/// public client has none; any non-empty value is accepted.
const PLACEHOLDER_CLIENT_SECRET: &str = "_";

/// Seconds before expiry at which a cached token is treated as stale.
const EXPIRY_BUFFER_SECS: u64 = 60;

const TOKEN_CACHE_KEY: &str = "access_token";

#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Bearer token for the next request.
    async fn access_token(&self) -> Result<String>;

    /// Whether a usable credential is currently available.
    async fn has_access(&self) -> bool;

    /// Forget the stored credential. The user has to authorize again.
    async fn reset(&self);
}

/// Provider for a bearer token issued out of band.
pub struct StaticTokenProvider {
    token: RwLock<Option<SecretString>>,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .ok_or_else(not_authorized)
    }

    async fn has_access(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn reset(&self) {
        tracing::warn!("Discarding static access token");
        *self.token.write().await = None;
    }
}

/// OAuth 2.0 token response from the authorization server.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Clone, Debug)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn from_response(response: &TokenResponse) -> Self {
        let expires_in = response.expires_in.unwrap_or(3600);
        Self {
            access_token: response.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(expires_in),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() + Duration::from_secs(EXPIRY_BUFFER_SECS) >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub client_id: String,
    pub authorization_url: Url,
    pub token_url: Url,
    pub scopes: Vec<String>,
    pub redirect_uri: Option<String>,
}

impl OAuthSettings {
    /// Settings for the configured remote. `client_id` wins over `auth.client_id`.
    pub fn from_config(config: &AppConfig, client_id: Option<String>) -> Result<Self> {
        let client_id = client_id
            .or_else(|| config.auth.client_id.clone())
            .ok_or_else(|| {
                StudioError::config("No OAuth client id configured")
                    .with_hint("Set auth.client_id or LOOPSTUDIO_AUTH__CLIENT_ID")
            })?;

        Ok(Self {
            client_id,
            authorization_url: config.remote.authorization_url()?,
            token_url: config.remote.token_url()?,
            scopes: config.auth.scopes.clone(),
            redirect_uri: config.auth.redirect_uri.clone(),
        })
    }
}

/// Authorization-code flow with refresh-token renewal.
pub struct OAuthTokenProvider {
    settings: OAuthSettings,
    refresh_token: RwLock<Option<SecretString>>,
    cache: Cache<&'static str, CachedToken>,
    client: reqwest::Client,
}

impl OAuthTokenProvider {
    pub fn new(settings: OAuthSettings, refresh_token: Option<SecretString>) -> Self {
        Self {
            settings,
            refresh_token: RwLock::new(refresh_token),
            cache: Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(1)
                .build(),
            client: reqwest::Client::new(),
        }
    }

    /// URL the user opens to authorize the connector.
    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.settings.authorization_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.settings.client_id);
            if let Some(redirect_uri) = &self.settings.redirect_uri {
                query.append_pair("redirect_uri", redirect_uri);
            }
            if !self.settings.scopes.is_empty() {
                query.append_pair("scope", &self.settings.scopes.join(" "));
            }
            query.append_pair("state", state);
        }
        url
    }

    /// Exchange the code from the authorization callback for tokens.
    ///
    /// Returns whether the exchange produced a usable credential.
    pub async fn exchange_code(&self, code: &str) -> Result<bool> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", PLACEHOLDER_CLIENT_SECRET),
        ];
        if let Some(redirect_uri) = &self.settings.redirect_uri {
            form.push(("redirect_uri", redirect_uri.as_str()));
        }

        let response = self.request_token(&form).await?;
        self.store(&response).await;
        Ok(self.refresh_token.read().await.is_some())
    }

    /// Current refresh token, for persisting between invocations.
    pub async fn refresh_token(&self) -> Option<SecretString> {
        self.refresh_token.read().await.clone()
    }

    async fn store(&self, response: &TokenResponse) {
        if let Some(rotated) = &response.refresh_token {
            *self.refresh_token.write().await = Some(SecretString::from(rotated.clone()));
        }
        self.cache
            .insert(TOKEN_CACHE_KEY, CachedToken::from_response(response))
            .await;
    }

    async fn refresh(&self) -> Result<CachedToken> {
        let refresh_token = self
            .refresh_token
            .read()
            .await
            .as_ref()
            .map(|t| t.expose_secret().to_string())
            .ok_or_else(not_authorized)?;

        tracing::info!("Refreshing access token from {}", self.settings.token_url);
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", PLACEHOLDER_CLIENT_SECRET),
        ];
        let response = self.request_token(&form).await?;

        if let Some(rotated) = &response.refresh_token {
            *self.refresh_token.write().await = Some(SecretString::from(rotated.clone()));
        }
        Ok(CachedToken::from_response(&response))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse> {
        let url = self.settings.token_url.as_str();

        let resp = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| StudioError::remote_fetch(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StudioError::remote_fetch(
                url,
                format!("token request failed: {} - {}", status, body),
            )
            .with_status(status.as_u16()));
        }

        resp.json::<TokenResponse>()
            .await
            .map_err(|e| StudioError::remote_fetch(url, format!("failed to parse token response: {}", e)))
    }
}

#[async_trait]
impl AccessTokenProvider for OAuthTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let mut cached = self
            .cache
            .try_get_with(TOKEN_CACHE_KEY, self.refresh())
            .await
            .map_err(|e| (*e).clone())?;

        if cached.is_expired() {
            tracing::info!("Access token expired (buffer check), refreshing...");
            self.cache.invalidate(&TOKEN_CACHE_KEY).await;
            cached = self
                .cache
                .try_get_with(TOKEN_CACHE_KEY, self.refresh())
                .await
                .map_err(|e| (*e).clone())?;
        }

        Ok(cached.access_token)
    }

    async fn has_access(&self) -> bool {
        if self.refresh_token.read().await.is_none() {
            return false;
        }
        self.access_token().await.is_ok()
    }

    async fn reset(&self) {
        tracing::warn!("Resetting OAuth credentials");
        *self.refresh_token.write().await = None;
        self.cache.invalidate_all();
    }
}

fn not_authorized() -> StudioError {
    StudioError::not_authorized("Not authorized: no access token available")
        .with_hint("Run `loopstudio auth login` or set LOOPSTUDIO_AUTH__TOKEN")
}

/// Build the provider the configuration asks for.
///
/// A static token wins; otherwise the OAuth flow is used with `client_id` (usually from the
/// remote bootstrap document) or `auth.client_id`.
pub fn provider_from_config(
    config: &AppConfig,
    client_id: Option<String>,
) -> Result<Arc<dyn AccessTokenProvider>> {
    if let Some(token) = &config.auth.token {
        return Ok(Arc::new(StaticTokenProvider::new(token.clone())));
    }

    let settings = OAuthSettings::from_config(config, client_id)?;
    Ok(Arc::new(OAuthTokenProvider::new(
        settings,
        config.auth.refresh_token.clone(),
    )))
}
