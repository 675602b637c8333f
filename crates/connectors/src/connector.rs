//! The host-facing connector: table selection, schema and data requests.

use crate::bootstrap::{self, RemoteAppConfig};
use crate::fields::{FieldDescriptor, Fields};
use crate::remote::{HttpFetcher, JsonFetcher, RemoteApi};
use crate::rows::{fetch_all_rows, Row};
use crate::schema::build_fields;
use loopstudio_common::config::PaginationSettings;
use loopstudio_common::{AccessTokenProvider, AppConfig};
use loopstudio_error::{ErrorContext, Result, StudioError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// A `workspace/table` selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub workspace: String,
    pub table: String,
}

impl TableRef {
    pub fn new(workspace: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            table: table.into(),
        }
    }

    /// Parse `workspace/table`. Exactly two non-empty segments are accepted.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(ws), Some(t), None) if !ws.is_empty() && !t.is_empty() => Ok(Self::new(ws, t)),
            _ => Err(StudioError::user(format!(
                "Invalid table selection '{}'",
                raw
            ))
            .with_context(ErrorContext::InvalidTableRef {
                input: raw.to_string(),
            })
            .with_hint("Expected the form workspace/table")),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace, self.table)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub schema: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataResponse {
    pub schema: Vec<FieldDescriptor>,
    pub rows: Vec<Row>,
}

pub struct Connector {
    api: RemoteApi,
    fetcher: Arc<dyn JsonFetcher>,
    app_config_url: Url,
    pagination: PaginationSettings,
    auth: Option<Arc<dyn AccessTokenProvider>>,
}

impl Connector {
    pub fn new(
        fetcher: Arc<dyn JsonFetcher>,
        api_base_url: Url,
        app_config_url: Url,
        pagination: PaginationSettings,
    ) -> Self {
        Self {
            api: RemoteApi::new(fetcher.clone(), api_base_url),
            fetcher,
            app_config_url,
            pagination,
            auth: None,
        }
    }

    /// Connector for the configured remote, authorized through `provider`.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn AccessTokenProvider>) -> Result<Self> {
        let fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpFetcher::new(provider.clone()));
        let connector = Self::new(
            fetcher,
            config.remote.api_base_url()?,
            config.remote.app_config_url()?,
            config.pagination,
        )
        .with_auth(provider);

        tracing::debug!(api = %connector.api.base_url(), "Connector ready");
        Ok(connector)
    }

    pub fn with_auth(mut self, provider: Arc<dyn AccessTokenProvider>) -> Self {
        self.auth = Some(provider);
        self
    }

    pub fn api(&self) -> &RemoteApi {
        &self.api
    }

    /// Every `workspace/table` the user can pick, workspace by workspace.
    pub async fn table_options(&self) -> Result<Vec<TableRef>> {
        let mut options = Vec::new();
        for name in self.api.list_workspaces().await? {
            let workspace = self.api.workspace(&name).await?;
            options.extend(
                workspace
                    .tables
                    .iter()
                    .map(|t| TableRef::new(workspace.name.clone(), t.name.clone())),
            );
        }
        tracing::debug!(tables = options.len(), "Listed table options");
        Ok(options)
    }

    pub async fn get_fields(&self, table: &TableRef) -> Result<Fields> {
        build_fields(&self.api, &table.workspace, &table.table).await
    }

    pub async fn get_schema(&self, table: &TableRef) -> Result<SchemaResponse> {
        let fields = self.get_fields(table).await?;
        Ok(SchemaResponse {
            schema: fields.build(),
        })
    }

    /// All rows of `table` for the requested field ids, in request order.
    ///
    /// An empty id list requests every field.
    pub async fn get_data<S: AsRef<str>>(
        &self,
        table: &TableRef,
        requested_ids: &[S],
    ) -> Result<DataResponse> {
        let fields = self.get_fields(table).await?;
        let requested = if requested_ids.is_empty() {
            fields
        } else {
            fields.for_ids(requested_ids)?
        };

        let rows = fetch_all_rows(
            &self.api,
            &table.workspace,
            &table.table,
            &requested,
            &self.pagination,
        )
        .await?;

        Ok(DataResponse {
            schema: requested.build(),
            rows,
        })
    }

    pub async fn is_auth_valid(&self) -> bool {
        match &self.auth {
            Some(provider) => provider.has_access().await,
            None => false,
        }
    }

    pub async fn reset_auth(&self) {
        if let Some(provider) = &self.auth {
            provider.reset().await;
        }
    }

    /// The deployment's public bootstrap document.
    pub async fn load_app_config(&self) -> Result<RemoteAppConfig> {
        bootstrap::load_app_config(self.fetcher.as_ref(), &self.app_config_url).await
    }
}
