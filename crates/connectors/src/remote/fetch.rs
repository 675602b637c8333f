//! Authorized JSON GET requests against the remote API.

use async_trait::async_trait;
use loopstudio_common::AccessTokenProvider;
use loopstudio_error::{ErrorContext, Result, StudioError};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Whether a request carries the bearer credential.
///
/// Only the bootstrap configuration document is fetched `Anonymous`; every workspace and
/// table endpoint requires authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Required,
    Anonymous,
}

#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GET `url` and parse the body as JSON.
    ///
    /// Transport errors, non-2xx statuses, missing credentials and unparseable bodies all
    /// surface as a user error naming the URL. Nothing is retried.
    async fn fetch_json(&self, url: &Url, auth: AuthMode) -> Result<Value>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
    tokens: Option<Arc<dyn AccessTokenProvider>>,
}

impl HttpFetcher {
    pub fn new(tokens: Arc<dyn AccessTokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens: Some(tokens),
        }
    }

    /// A fetcher without credentials, for the bootstrap document.
    pub fn anonymous() -> Self {
        Self {
            client: reqwest::Client::new(),
            tokens: None,
        }
    }

    async fn bearer_token(&self, url: &Url) -> Result<String> {
        let tokens = self.tokens.as_ref().ok_or_else(|| {
            StudioError::remote_fetch(url.as_str(), "no authorization configured")
                .with_context(ErrorContext::NotAuthorized {
                    url: Some(url.to_string()),
                })
        })?;

        tokens.access_token().await.map_err(|e| {
            let mut err = StudioError::remote_fetch(url.as_str(), &e.message);
            if let Some(ErrorContext::NotAuthorized { .. }) = e.context {
                err = err.with_context(ErrorContext::NotAuthorized {
                    url: Some(url.to_string()),
                });
            }
            match e.hint {
                Some(hint) => err.with_hint(hint),
                None => err,
            }
        })
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &Url, auth: AuthMode) -> Result<Value> {
        let mut req = self.client.get(url.clone());
        if auth == AuthMode::Required {
            req = req.bearer_auth(self.bearer_token(url).await?);
        }

        tracing::debug!(url = %url, ?auth, "GET");
        let resp = req
            .send()
            .await
            .map_err(|e| StudioError::remote_fetch(url.as_str(), e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(
                StudioError::remote_fetch(url.as_str(), format!("HTTP status {}", status))
                    .with_status(status.as_u16()),
            );
        }

        let body = resp
            .text()
            .await
            .map_err(|e| StudioError::remote_fetch(url.as_str(), e))?;

        serde_json::from_str(&body)
            .map_err(|e| StudioError::remote_fetch(url.as_str(), format!("invalid JSON: {}", e)))
    }
}
