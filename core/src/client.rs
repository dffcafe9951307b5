//! Request builder, executor, and response parser for the Retable API.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a convenience method that runs build → execute → parse.
//! The builders are pure, so every wire shape is assertable in unit tests;
//! the convenience methods are the one-call surface matching the remote
//! endpoints.
//!
//! Responses are returned as parsed JSON regardless of HTTP status. The
//! Retable API reports failures in the body, and interpreting that body is
//! the caller's job — an error payload and a data payload come back the
//! same way.

use std::path::PathBuf;

use log::debug;
use serde::Serialize;
use serde_json::Value;

use crate::cache::{ColumnCache, DEFAULT_CACHE_PATH};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport;
use crate::types::{CellUpdate, DeleteRows, InsertRows, RowUpdate, TableMeta, UpdateRows};

/// Production endpoint of the Retable public API.
pub const DEFAULT_BASE_URL: &str = "https://api.retable.io/v1/public";

/// Synchronous client for the Retable API.
///
/// Holds the API key, the base URL, and the file-backed column-mapping
/// cache. One instance per process is the intended use; nothing here is
/// synchronized for sharing across threads.
#[derive(Debug, Clone)]
pub struct RetableClient {
    api_key: String,
    base_url: String,
    cache: ColumnCache,
}

impl RetableClient {
    /// Client against the production API, with the column-mapping cache at
    /// its default path. Loading the cache never fails; a missing or corrupt
    /// file starts empty.
    pub fn new(api_key: &str) -> Self {
        Self::with_config(api_key, DEFAULT_BASE_URL, DEFAULT_CACHE_PATH)
    }

    /// Client with an explicit base URL and cache path.
    pub fn with_config(api_key: &str, base_url: &str, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cache: ColumnCache::load(cache_path),
        }
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![("ApiKey".to_string(), self.api_key.clone())]
    }

    fn get_request(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{endpoint}", self.base_url),
            headers: self.auth_headers(),
            body: None,
        }
    }

    fn bodied_request<T: Serialize>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path: format!("{}/{endpoint}", self.base_url),
            headers: self.auth_headers(),
            body: Some(body),
        })
    }

    /// Build a request for an arbitrary endpoint. The escape hatch for
    /// endpoints without a dedicated method; the `ApiKey` header is attached
    /// like everywhere else.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<HttpRequest, ApiError> {
        match body {
            Some(body) => self.bodied_request(method, endpoint, body),
            None => {
                let mut req = self.get_request(endpoint);
                req.method = method;
                Ok(req)
            }
        }
    }

    pub fn build_table_info(&self, table_id: &str) -> HttpRequest {
        self.get_request(&format!("retable/{table_id}"))
    }

    pub fn build_table_data(&self, table_id: &str) -> HttpRequest {
        self.get_request(&format!("retable/{table_id}/data"))
    }

    pub fn build_insert_rows(&self, table_id: &str, rows: &[Value]) -> Result<HttpRequest, ApiError> {
        self.bodied_request(
            HttpMethod::Post,
            &format!("retable/{table_id}/data"),
            &InsertRows { data: rows },
        )
    }

    pub fn build_update_cell(
        &self,
        table_id: &str,
        row_id: u64,
        column_id: &str,
        value: Value,
    ) -> Result<HttpRequest, ApiError> {
        let body = UpdateRows {
            rows: vec![RowUpdate {
                row_id,
                columns: vec![CellUpdate {
                    column_id: column_id.to_string(),
                    update_cell_value: value,
                }],
            }],
        };
        self.bodied_request(HttpMethod::Put, &format!("retable/{table_id}/data"), &body)
    }

    pub fn build_delete_rows(
        &self,
        table_id: &str,
        row_ids: &[u64],
    ) -> Result<HttpRequest, ApiError> {
        self.bodied_request(
            HttpMethod::Delete,
            &format!("retable/{table_id}/data"),
            &DeleteRows { row_ids },
        )
    }

    /// The search term is interpolated into the query string verbatim.
    /// Callers must pre-encode reserved URL characters; an unencoded term
    /// reaches the transport as-is.
    pub fn build_search(&self, table_id: &str, column_id: &str, term: &str) -> HttpRequest {
        self.get_request(&format!("retable/{table_id}/search?columnID={column_id}&term={term}"))
    }

    /// Parse a response body as JSON. The status code is not consulted:
    /// error payloads parse and return exactly like data payloads.
    pub fn parse_body(response: HttpResponse) -> Result<Value, ApiError> {
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// Execute an arbitrary request built by [`RetableClient::build_request`].
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(&self.build_request(method, endpoint, body)?)?)
    }

    /// `GET retable/{id}` — table metadata, including the column list.
    pub fn table_info(&self, table_id: &str) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(&self.build_table_info(table_id))?)
    }

    /// `GET retable/{id}/data` — row data, returned unmodified.
    pub fn table_data(&self, table_id: &str) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(&self.build_table_data(table_id))?)
    }

    /// `POST retable/{id}/data` — insert `rows`, wrapped as `{"data": rows}`.
    /// Rows are opaque to the client and sent without validation.
    pub fn insert_rows(&self, table_id: &str, rows: &[Value]) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(&self.build_insert_rows(table_id, rows)?)?)
    }

    /// `PUT retable/{id}/data` — set one cell of one row. No batching:
    /// multi-cell updates take one call per cell.
    pub fn update_cell(
        &self,
        table_id: &str,
        row_id: u64,
        column_id: &str,
        value: Value,
    ) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(
            &self.build_update_cell(table_id, row_id, column_id, value)?,
        )?)
    }

    /// `DELETE retable/{id}/data` — delete the given rows.
    pub fn delete_rows(&self, table_id: &str, row_ids: &[u64]) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(&self.build_delete_rows(table_id, row_ids)?)?)
    }

    /// `GET retable/{id}/search` — search one column for `term`.
    pub fn search(&self, table_id: &str, column_id: &str, term: &str) -> Result<Value, ApiError> {
        Self::parse_body(transport::execute(&self.build_search(table_id, column_id, term))?)
    }

    /// Resolve a column title to the service's column id.
    ///
    /// A cached (table-id, title) pair is returned without any network call
    /// and is never re-validated. On a miss, one metadata fetch is made and
    /// the returned column list is scanned for the first exact title match;
    /// a match is cached and the backing file rewritten before returning.
    ///
    /// `Ok(None)` covers both "no such title" and "metadata fetch failed" —
    /// the two are indistinguishable to the caller. The only error is a
    /// failed rewrite of the mapping file.
    pub fn column_id_by_title(
        &mut self,
        table_id: &str,
        title: &str,
    ) -> Result<Option<String>, ApiError> {
        if let Some(id) = self.cache.get(table_id, title) {
            return Ok(Some(id.to_string()));
        }

        let info = match self.table_info(table_id) {
            Ok(info) => info,
            Err(e) => {
                debug!("metadata fetch for {table_id} failed: {e}");
                return Ok(None);
            }
        };
        let meta: TableMeta = match serde_json::from_value(info) {
            Ok(meta) => meta,
            Err(e) => {
                debug!("metadata for {table_id} missing column list: {e}");
                return Ok(None);
            }
        };

        for column in &meta.data.columns {
            if column.title == title {
                self.cache.insert(table_id, title, &column.column_id);
                self.cache.flush()?;
                return Ok(Some(column.column_id.clone()));
            }
        }
        Ok(None)
    }

    /// Rewrite the column-mapping file with the current in-memory state.
    /// `column_id_by_title` already flushes after each newly resolved title;
    /// this is for callers that mutate the cache directly.
    pub fn flush_column_mapping(&self) -> Result<(), ApiError> {
        self.cache.flush()
    }

    pub fn column_cache(&self) -> &ColumnCache {
        &self.cache
    }

    pub fn column_cache_mut(&mut self) -> &mut ColumnCache {
        &mut self.cache
    }
}
