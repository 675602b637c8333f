//! # loopstudio-error
//!
//! Error types shared by every loopstudio crate.
//!
//! There are exactly two kinds of error:
//! - **User** errors are shown to the report author verbatim. Every remote fetch failure,
//!   unsupported column type and configuration problem is one.
//! - **Debug** errors flag internal invariant violations and are not expected in normal operation.
//!
//! Errors carry a human-readable message (including the failing URL where there is one), an
//! optional structured [`ErrorContext`] and an optional hint.

mod context;
mod kind;
mod suggest;

pub use context::ErrorContext;
pub use kind::ErrorKind;
pub use suggest::find_closest_match;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioError {
    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Suggestion for the user on how to fix the problem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl StudioError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    /// An error the end user has to act on.
    pub fn user(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::User, message)
    }

    /// An internal invariant violation.
    pub fn debug(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Debug, message)
    }

    /// A failed request against the remote API.
    ///
    /// Formats as `Error querying "<url>": <cause>`.
    pub fn remote_fetch(url: impl Into<String>, cause: impl fmt::Display) -> Self {
        let url = url.into();
        Self::user(format!("Error querying \"{}\": {}", url, cause))
            .with_context(ErrorContext::RemoteFetch { url, status: None })
    }

    /// Missing credential. Distinct from a token the remote rejected.
    pub fn not_authorized(message: impl Into<String>) -> Self {
        Self::user(message).with_context(ErrorContext::NotAuthorized { url: None })
    }

    /// A column whose declared type has no host counterpart.
    pub fn unsupported_column_type(column: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let column = column.into();
        let declared_type = declared_type.into();
        Self::user(format!(
            "Unexpected type for column '{}': {}",
            column, declared_type
        ))
        .with_context(ErrorContext::UnsupportedColumnType {
            column,
            declared_type,
        })
    }

    /// Configuration that cannot be used.
    pub fn config(message: impl Into<String>) -> Self {
        Self::user(message).with_context(ErrorContext::Config {
            file_path: None,
            field: None,
        })
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Attach the HTTP status to a remote fetch context.
    pub fn with_status(mut self, status: u16) -> Self {
        if let Some(ErrorContext::RemoteFetch { status: s, .. }) = &mut self.context {
            *s = Some(status);
        }
        self
    }

    pub fn is_user_facing(&self) -> bool {
        self.kind.is_user_facing()
    }

    /// Serialize to JSON for machine-readable output
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize StudioError: {}", e);
            format!(
                r#"{{"kind":"{}","message":"Serialization failed"}}"#,
                self.kind
            )
        })
    }
}

impl fmt::Display for StudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for StudioError {}

pub type Result<T> = std::result::Result<T, StudioError>;
