//! # Error Contexts
//!
//! Structured metadata attached to errors so callers (and the CLI's machine output) can react
//! without parsing messages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// A request to the remote API failed (transport, status or body).
    RemoteFetch {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },

    /// A table column declared a type the host cannot represent.
    UnsupportedColumnType {
        column: String,
        declared_type: String,
    },

    /// The host asked for a field id the table schema does not define.
    UnknownField {
        field: String,
        available_fields: Vec<String>,
    },

    /// Malformed or missing configuration.
    Config {
        file_path: Option<String>,
        field: Option<String>,
    },

    /// No usable credential: none configured, or no refresh token to redeem.
    NotAuthorized {
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    /// A table selection that is not of the form `workspace/table`.
    InvalidTableRef { input: String },
}
