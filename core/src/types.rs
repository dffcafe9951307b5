//! Wire DTOs for the Retable API.
//!
//! # Design
//! Only the slice of the metadata response that column resolution consumes
//! is typed; everything else — row data in particular — stays an opaque
//! `serde_json::Value` that the client passes through unvalidated. The
//! write-side envelopes exist so request bodies are produced by serde
//! instead of hand-assembled JSON, which keeps key names in one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope of `GET retable/{id}`: the payload lives under `data`.
#[derive(Debug, Clone, Deserialize)]
pub struct TableMeta {
    pub data: TableSchema,
}

/// The column list inside a table-metadata response. Unknown fields (table
/// name, timestamps, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<Column>,
}

/// One column as described by table metadata.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Column {
    pub column_id: String,
    pub title: String,
}

/// Body of `POST retable/{id}/data`.
#[derive(Debug, Clone, Serialize)]
pub struct InsertRows<'a> {
    pub data: &'a [Value],
}

/// Body of `PUT retable/{id}/data`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRows {
    pub rows: Vec<RowUpdate>,
}

/// One row inside an update body.
#[derive(Debug, Clone, Serialize)]
pub struct RowUpdate {
    pub row_id: u64,
    pub columns: Vec<CellUpdate>,
}

/// One cell inside a row update.
#[derive(Debug, Clone, Serialize)]
pub struct CellUpdate {
    pub column_id: String,
    pub update_cell_value: Value,
}

/// Body of `DELETE retable/{id}/data`.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteRows<'a> {
    pub row_ids: &'a [u64],
}
