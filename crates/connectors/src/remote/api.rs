//! Typed client for the remote workspace/table API.
//!
//! | Endpoint | Response |
//! |----------|----------|
//! | `GET /workspaces` | `["ws", ...]` |
//! | `GET /workspaces/{ws}` | `{ name, tables: [{ name, ... }] }` |
//! | `GET /workspaces/{ws}/tables/{t}` | `{ columns: [{ name, tpe }] }` |
//! | `GET /workspaces/{ws}/tables/{t}/data?offset=&limit=` | `{ rows: [{ "<id>": value }] }` |

use super::fetch::{AuthMode, JsonFetcher};
use loopstudio_error::{Result, StudioError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use url::Url;

/// A column's declared type, normalized from either wire encoding.
///
/// Older API versions send a bare discriminant (`"number"`), newer ones a single-key tagged
/// object (`{"CtNumber": {...}}`). JSON `null` or a missing `tpe` means no type information.
/// Tags this crate does not know are kept in `Other` so the type mapper can name them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColumnType {
    Number,
    String,
    Boolean,
    Date,
    #[default]
    Null,
    Other(String),
}

impl ColumnType {
    fn from_tag(tag: &str) -> Self {
        match tag {
            "number" | "CtNumber" => Self::Number,
            "string" | "CtString" => Self::String,
            "boolean" | "CtBoolean" => Self::Boolean,
            "date" | "CtDate" => Self::Date,
            "null" | "CtNull" => Self::Null,
            other => Self::Other(other.to_string()),
        }
    }

    /// Decode the raw `tpe` value. Shapes other than a string, `null` or a single-key
    /// object are rejected.
    pub fn from_wire(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::Null => Ok(Self::Null),
            Value::String(tag) => Ok(Self::from_tag(tag)),
            Value::Object(map) if map.len() == 1 => {
                let (tag, _) = map.iter().next().ok_or("empty type object")?;
                Ok(Self::from_tag(tag))
            }
            Value::Object(map) => Err(format!(
                "column type object must have exactly one key, found {}",
                map.len()
            )),
            other => Err(format!("unsupported column type encoding: {}", other)),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Null => "null",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_wire(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default)]
    pub tpe: ColumnType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableInfo {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<TableInfo>,
}

/// One remote row: field id (`"1"`, `"2"`, ...) to raw value. Key `"0"` is the internal row id.
pub type RemoteRow = Map<String, Value>;

#[derive(Debug, Clone, Deserialize)]
pub struct DataPage {
    pub rows: Vec<RemoteRow>,
}

/// Endpoints of one remote API deployment.
#[derive(Clone)]
pub struct RemoteApi {
    fetcher: Arc<dyn JsonFetcher>,
    base_url: Url,
}

impl RemoteApi {
    /// `base_url` is the API root, e.g. `https://api.example.com/api/v1.0`.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_workspaces(&self) -> Result<Vec<String>> {
        self.get(self.endpoint(&["workspaces"])?).await
    }

    pub async fn workspace(&self, workspace: &str) -> Result<Workspace> {
        self.get(self.endpoint(&["workspaces", workspace])?).await
    }

    pub async fn table_schema(&self, workspace: &str, table: &str) -> Result<TableSchema> {
        self.get(self.endpoint(&["workspaces", workspace, "tables", table])?)
            .await
    }

    pub async fn data_page(
        &self,
        workspace: &str,
        table: &str,
        offset: usize,
        limit: usize,
    ) -> Result<DataPage> {
        self.get(self.data_url(workspace, table, offset, limit)?)
            .await
    }

    /// `.../workspaces/{ws}/tables/{t}/data?offset={offset}&limit={limit}`
    pub fn data_url(&self, workspace: &str, table: &str, offset: usize, limit: usize) -> Result<Url> {
        let mut url = self.endpoint(&["workspaces", workspace, "tables", table, "data"])?;
        url.query_pairs_mut()
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StudioError::config(format!(
                    "API base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let value = self.fetcher.fetch_json(&url, AuthMode::Required).await?;
        serde_json::from_value(value).map_err(|e| {
            StudioError::remote_fetch(url.as_str(), format!("unexpected response: {}", e))
        })
    }
}
