use serde::{Deserialize, Serialize};
use std::fmt;

/// Who an error is meant for.
///
/// The reporting host renders `User` errors verbatim to the person building a report.
/// `Debug` errors indicate a broken internal invariant and are only shown to developers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    User,
    Debug,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::User => "user",
            ErrorKind::Debug => "debug",
        }
    }

    /// Returns true if the message may be shown to the end user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ErrorKind::User)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
