//! CLI command implementations, split into logical modules for maintainability.

mod auth;
mod helpers;
mod tables;

pub use auth::{auth_login, auth_status, auth_url};
pub use helpers::connect;
pub use tables::{data, schema, tables};

#[cfg(test)]
mod tests;
