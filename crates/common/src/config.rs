use loopstudio_error::{ErrorContext, Result, StudioError};
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;
use validator::Validate;

// Default constants
pub const DEFAULT_HOST: &str = "alpha.priceloop.ai";
pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_API_VERSION: &str = "v1.0";
pub const DEFAULT_PAGE_SIZE: usize = 500;
pub const DEFAULT_LOG_FILTER: &str = "info";
pub const ENV_PREFIX: &str = "LOOPSTUDIO";

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[derive(Debug, Deserialize, Default, Clone, Validate)]
pub struct AppConfig {
    #[serde(default)]
    #[validate(nested)]
    pub remote: RemoteSettings,
    #[serde(default)]
    #[validate(nested)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the remote workspace API lives.
///
/// Every URL is derived from `host` unless one of the explicit overrides is set. The overrides
/// exist for self-hosted deployments and local test servers.
#[derive(Debug, Deserialize, Clone, Validate)]
pub struct RemoteSettings {
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,

    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Full API base URL, e.g. `http://127.0.0.1:8080/api/v1.0`.
    #[serde(default)]
    #[validate(custom(function = "validate_optional_url"))]
    pub api_url: String,

    /// Full URL of the unauthenticated bootstrap document.
    #[serde(default)]
    #[validate(custom(function = "validate_optional_url"))]
    pub app_config_url: String,

    /// Base URL of the identity provider (`/login`, `/oauth2/token`).
    #[serde(default)]
    #[validate(custom(function = "validate_optional_url"))]
    pub auth_url: String,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            scheme: default_scheme(),
            api_version: default_api_version(),
            api_url: String::new(),
            app_config_url: String::new(),
            auth_url: String::new(),
        }
    }
}

impl RemoteSettings {
    /// Base URL all workspace/table endpoints are resolved against.
    pub fn api_base_url(&self) -> Result<Url> {
        if !self.api_url.is_empty() {
            return parse_url(&self.api_url, "remote.api_url");
        }
        parse_url(
            &format!(
                "{}://api.{}/api/{}",
                self.scheme, self.host, self.api_version
            ),
            "remote.host",
        )
    }

    pub fn app_config_url(&self) -> Result<Url> {
        if !self.app_config_url.is_empty() {
            return parse_url(&self.app_config_url, "remote.app_config_url");
        }
        parse_url(
            &format!("{}://{}/app_config.json", self.scheme, self.host),
            "remote.host",
        )
    }

    pub fn authorization_url(&self) -> Result<Url> {
        self.auth_endpoint("login")
    }

    pub fn token_url(&self) -> Result<Url> {
        self.auth_endpoint("oauth2/token")
    }

    fn auth_endpoint(&self, path: &str) -> Result<Url> {
        let base = if self.auth_url.is_empty() {
            format!("{}://auth.{}", self.scheme, self.host)
        } else {
            self.auth_url.clone()
        };
        parse_url(
            &format!("{}/{}", base.trim_end_matches('/'), path),
            "remote.auth_url",
        )
    }
}

fn parse_url(raw: &str, field: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| {
        StudioError::config(format!("Invalid URL '{}': {}", raw, e)).with_context(
            ErrorContext::Config {
                file_path: None,
                field: Some(field.to_string()),
            },
        )
    })
}

#[derive(Debug, Deserialize, Clone, Copy, Validate)]
pub struct PaginationSettings {
    /// Rows requested per page.
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100000))]
    pub page_size: usize,

    /// Upper bound on pages fetched for one table. Exceeding it fails the request.
    #[serde(default)]
    pub max_pages: Option<usize>,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_pages: None,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AuthSettings {
    /// Static bearer token. Takes precedence over the OAuth flow.
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub token: Option<SecretString>,

    #[serde(default, deserialize_with = "deserialize_secret")]
    pub refresh_token: Option<SecretString>,

    /// OAuth client id. Falls back to the remote bootstrap document when unset.
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub scopes: Vec<String>,

    #[serde(default)]
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_scheme() -> String {
    DEFAULT_SCHEME.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn validate_optional_url(url: &str) -> std::result::Result<(), validator::ValidationError> {
    if url.is_empty() {
        return Ok(()); // derived from host
    }

    match Url::parse(url) {
        Ok(_) => Ok(()),
        Err(_) => Err(validator::ValidationError::new("invalid_url")),
    }
}

impl AppConfig {
    /// Load configuration from an optional file, overlaid by `LOOPSTUDIO_*` environment variables.
    ///
    /// `LOOPSTUDIO_REMOTE__HOST` maps to `remote.host`, `LOOPSTUDIO_AUTH__SCOPES` is a
    /// space-separated list.
    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let builder = config::Config::builder();

        let builder = match path {
            Some(p) if std::path::Path::new(p).exists() => {
                builder.add_source(config::File::with_name(p))
            }
            Some(p) => {
                return Err(StudioError::config(format!(
                    "Configuration file not found: {}",
                    p
                ))
                .with_context(ErrorContext::Config {
                    file_path: Some(p.to_string()),
                    field: None,
                }))
            }
            None => builder,
        };

        let builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(" ")
                .with_list_parse_key("auth.scopes")
                .try_parsing(true),
        );

        let cfg = builder
            .build()
            .map_err(|e| config_error(path, format!("Failed to build configuration: {}", e)))?;

        let app_config: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| config_error(path, format!("Failed to read configuration: {}", e)))?;

        app_config
            .validate()
            .map_err(|e| config_error(path, format!("Configuration validation failed: {}", e)))?;

        tracing::debug!(host = %app_config.remote.host, "Loaded configuration");
        Ok(app_config)
    }
}

fn config_error(path: Option<&str>, message: String) -> StudioError {
    StudioError::config(message).with_context(ErrorContext::Config {
        file_path: path.map(str::to_string),
        field: None,
    })
}
