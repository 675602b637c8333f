//! The remote workspace API: HTTP transport and typed endpoints.

pub mod api;
pub mod fetch;

pub use api::{Column, ColumnType, DataPage, RemoteApi, RemoteRow, TableSchema, Workspace};
pub use fetch::{AuthMode, HttpFetcher, JsonFetcher};
