//! Authorization commands: `auth url`, `auth login` and `auth status`.
//!
//! The OAuth flow is split across invocations: `auth url` prints the page the user opens,
//! the identity provider redirects with a `code`, and `auth login --code` trades it for a
//! refresh token that the user stores as `auth.refresh_token`.

use super::helpers::{oauth_settings, resolve_provider, AuthStatusResult, AuthUrlResult, LoginResult};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use loopstudio_common::{AppConfig, OAuthTokenProvider};
use loopstudio_error::StudioError;
use owo_colors::OwoColorize;
use secrecy::ExposeSecret;

pub async fn auth_url(config: &AppConfig, state: &str, format: OutputFormat) -> Result<()> {
    let provider = OAuthTokenProvider::new(oauth_settings(config).await?, None);
    let url = provider.authorization_url(state).to_string();

    if format.is_machine_readable() {
        return output::print_success(
            format,
            AuthUrlResult {
                authorization_url: url,
            },
        );
    }

    println!("{}", "Open this URL to authorize loopstudio:".bold());
    println!("{}", url);
    Ok(())
}

pub async fn auth_login(config: &AppConfig, code: &str, format: OutputFormat) -> Result<()> {
    let provider = OAuthTokenProvider::new(oauth_settings(config).await?, None);

    if !provider.exchange_code(code).await? {
        return Err(StudioError::user("Access denied: the token response carried no refresh token")
            .with_hint("Request a new code with `loopstudio auth url`")
            .into());
    }

    let refresh_token = provider
        .refresh_token()
        .await
        .map(|t| t.expose_secret().to_string());

    if format.is_machine_readable() {
        return output::print_success(
            format,
            LoginResult {
                authorized: true,
                refresh_token,
            },
        );
    }

    println!("{}", "Success! loopstudio is authorized.".green().bold());
    if let Some(token) = refresh_token {
        println!("Store the refresh token to stay signed in:");
        println!("  export LOOPSTUDIO_AUTH__REFRESH_TOKEN={}", token);
    }
    Ok(())
}

pub async fn auth_status(config: &AppConfig, format: OutputFormat) -> Result<()> {
    let method = if config.auth.token.is_some() {
        "token"
    } else {
        "oauth"
    };
    let provider = resolve_provider(config).await?;
    let authorized = provider.has_access().await;

    if format.is_machine_readable() {
        return output::print_success(
            format,
            AuthStatusResult {
                authorized,
                method: method.to_string(),
            },
        );
    }

    if authorized {
        println!("{} ({})", "Authorized".green().bold(), method);
    } else {
        println!("{} ({})", "Not authorized".red().bold(), method);
        println!("Run `loopstudio auth url` to start the authorization flow.");
    }
    Ok(())
}
