//! Synchronous client for the Retable tabular-data API.
//!
//! # Overview
//! Six operations against a remote table — metadata, read, insert, update,
//! delete, search — plus a file-backed cache that resolves human-readable
//! column titles to the service's internal column ids.
//!
//! # Design
//! - Each operation is split into a pure `build_*` method (produces an
//!   `HttpRequest`) and a convenience method that executes it, so every wire
//!   shape is testable without a server.
//! - Responses come back as parsed JSON whatever the HTTP status was; the
//!   service reports failures in the body and interpreting it is the
//!   caller's job.
//! - The column-mapping cache is owned by the client instance and persisted
//!   with an explicit flush, not ambient process state.
//! - Blocking I/O throughout, one connection per call, no retries.

pub mod cache;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use cache::{ColumnCache, DEFAULT_CACHE_PATH};
pub use client::{RetableClient, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CellUpdate, Column, DeleteRows, InsertRows, RowUpdate, TableMeta, TableSchema, UpdateRows};
