//! The public `app_config.json` document published by the remote deployment.
//!
//! It carries the OAuth client id and scopes the interactive authorization flow needs, so it is
//! fetched before any credentials exist.

use crate::remote::{AuthMode, JsonFetcher};
use loopstudio_error::{Result, StudioError};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteAppConfig {
    pub auth: RemoteAuthConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAuthConfig {
    pub client_id: String,
    #[serde(default, deserialize_with = "deserialize_scopes")]
    pub api_scopes: Vec<String>,
}

/// Deployments publish scopes either as one space-separated string or as a list.
fn deserialize_scopes<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scopes {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Scopes::deserialize(deserializer)? {
        Scopes::Joined(s) => s.split_whitespace().map(str::to_string).collect(),
        Scopes::List(list) => list,
    })
}

/// Fetch the bootstrap document without credentials.
pub async fn load_app_config(fetcher: &dyn JsonFetcher, url: &Url) -> Result<RemoteAppConfig> {
    let value = fetcher.fetch_json(url, AuthMode::Anonymous).await?;
    let config: RemoteAppConfig = serde_json::from_value(value).map_err(|e| {
        StudioError::remote_fetch(url.as_str(), format!("unexpected app config: {}", e))
    })?;

    tracing::debug!(
        client_id = %config.auth.client_id,
        scopes = config.auth.api_scopes.len(),
        "Loaded remote app config"
    );
    Ok(config)
}
