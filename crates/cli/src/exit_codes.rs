//! Structured exit codes for machine-readable error handling.
//!
//! Scripts calling `loopstudio` can tell a bad configuration apart from an unreachable remote or
//! a rejected credential.

use loopstudio_error::{ErrorContext, ErrorKind, StudioError};

/// General error (fallback for unknown errors)
pub const GENERAL_ERROR: i32 = 1;

/// CLI usage error (invalid arguments, malformed table selection)
pub const USAGE_ERROR: i32 = 2;

/// Configuration error (missing file, invalid URL, missing client id)
pub const CONFIG_ERROR: i32 = 3;

/// Connection error (remote unreachable, non-2xx response, invalid body)
pub const CONNECTION_ERROR: i32 = 4;

/// Validation error (unsupported column type, unknown field id)
pub const VALIDATION_ERROR: i32 = 5;

/// Permission error (no credential, rejected token)
pub const PERMISSION_ERROR: i32 = 7;

pub fn for_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<StudioError>() {
        Some(err) => for_studio_error(err),
        None => GENERAL_ERROR,
    }
}

pub fn for_studio_error(err: &StudioError) -> i32 {
    if err.kind == ErrorKind::Debug {
        return GENERAL_ERROR;
    }

    match &err.context {
        Some(ErrorContext::RemoteFetch {
            status: Some(401 | 403),
            ..
        }) => PERMISSION_ERROR,
        Some(ErrorContext::NotAuthorized { .. }) => PERMISSION_ERROR,
        Some(ErrorContext::RemoteFetch { .. }) => CONNECTION_ERROR,
        Some(ErrorContext::Config { .. }) => CONFIG_ERROR,
        Some(ErrorContext::UnsupportedColumnType { .. }) | Some(ErrorContext::UnknownField { .. }) => {
            VALIDATION_ERROR
        }
        Some(ErrorContext::InvalidTableRef { .. }) => USAGE_ERROR,
        None => GENERAL_ERROR,
    }
}
