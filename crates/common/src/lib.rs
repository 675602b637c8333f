//! Shared building blocks for the loopstudio crates.
//!
//! - **Configuration**: strongly typed connector configuration (`config`).
//! - **Authorization**: access-token providers consumed by the HTTP fetcher (`auth`).
//! - **Telemetry**: `tracing` subscriber setup (`telemetry`).
pub mod auth;
pub mod config;
pub mod telemetry;

pub use crate::auth::{AccessTokenProvider, OAuthSettings, OAuthTokenProvider, StaticTokenProvider};
pub use crate::config::AppConfig;
