//! Connector between remote workspace tables and a reporting host.
//!
//! The remote API exposes workspaces, each holding tables with typed columns and rows served
//! in offset/limit pages. This crate turns a table into the host's field schema and returns
//! its full contents in the requested field order.
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | `remote` | Authorized JSON GETs and typed API endpoints |
//! | `types` | Remote column type to host role and scalar type |
//! | `fields` | Ordered field collection and the host schema descriptor |
//! | `schema` | Column list to field collection |
//! | `rows` | Paginated full-table fetch |
//! | `normalize` | Date-time encoding for the host |
//! | `bootstrap` | Unauthenticated deployment config |
//! | `connector` | Host-facing operations |

pub mod bootstrap;
pub mod connector;
pub mod fields;
pub mod normalize;
pub mod remote;
pub mod rows;
pub mod schema;
pub mod types;

#[cfg(test)]
mod testing;

pub use connector::{Connector, DataResponse, SchemaResponse, TableRef};
pub use fields::{Field, FieldDescriptor, Fields};
pub use rows::Row;
pub use types::{FieldRole, ScalarType};
