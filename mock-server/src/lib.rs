//! In-memory emulation of the Retable public API for tests.
//!
//! Serves the six endpoints the client consumes under `/v1/public`, backed
//! by a `HashMap` of tables. Every route requires the `ApiKey` header (any
//! non-empty value passes) and unknown tables get a 404 with a JSON error
//! body, matching the real service's body-carries-the-error convention.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Column {
    pub column_id: String,
    pub title: String,
}

/// One stored row: an id plus a map of column-id → cell value.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Row {
    pub row_id: u64,
    pub columns: HashMap<String, Value>,
}

#[derive(Clone, Debug, Default)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    next_row_id: u64,
}

pub type Db = Arc<RwLock<HashMap<String, Table>>>;

#[derive(Deserialize)]
struct InsertBody {
    data: Vec<HashMap<String, Value>>,
}

#[derive(Deserialize)]
struct UpdateBody {
    rows: Vec<UpdateRow>,
}

#[derive(Deserialize)]
struct UpdateRow {
    row_id: u64,
    columns: Vec<CellPatch>,
}

#[derive(Deserialize)]
struct CellPatch {
    column_id: String,
    update_cell_value: Value,
}

#[derive(Deserialize)]
struct DeleteBody {
    row_ids: Vec<u64>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(rename = "columnID")]
    column_id: String,
    term: String,
}

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn new_db() -> Db {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Create a table with the given `(column_id, title)` pairs and no rows.
pub async fn seed_table(db: &Db, table_id: &str, columns: &[(&str, &str)]) {
    let table = Table {
        columns: columns
            .iter()
            .map(|(column_id, title)| Column {
                column_id: column_id.to_string(),
                title: title.to_string(),
            })
            .collect(),
        rows: Vec::new(),
        next_row_id: 0,
    };
    db.write().await.insert(table_id.to_string(), table);
}

pub fn app() -> Router {
    app_with_db(new_db())
}

pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/v1/public/retable/{id}", get(table_info))
        .route(
            "/v1/public/retable/{id}/data",
            get(table_data).post(insert_rows).put(update_rows).delete(delete_rows),
        )
        .route("/v1/public/retable/{id}/search", get(search))
        .with_state(db)
}

pub async fn run(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

fn require_api_key(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
    match headers.get("ApiKey") {
        Some(value) if !value.is_empty() => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "missing ApiKey header"})),
        )),
    }
}

fn table_not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({"error": "table not found"})))
}

async fn table_info(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    require_api_key(&headers)?;
    let tables = db.read().await;
    let table = tables.get(&id).ok_or_else(table_not_found)?;
    Ok(Json(json!({"data": {"id": id, "columns": table.columns}})))
}

async fn table_data(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    require_api_key(&headers)?;
    let tables = db.read().await;
    let table = tables.get(&id).ok_or_else(table_not_found)?;
    Ok(Json(json!({"data": {"rows": table.rows}})))
}

async fn insert_rows(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<InsertBody>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    require_api_key(&headers)?;
    let mut tables = db.write().await;
    let table = tables.get_mut(&id).ok_or_else(table_not_found)?;

    let mut created = Vec::with_capacity(body.data.len());
    for cells in body.data {
        table.next_row_id += 1;
        let row = Row {
            row_id: table.next_row_id,
            columns: cells,
        };
        created.push(row.clone());
        table.rows.push(row);
    }
    Ok((StatusCode::CREATED, Json(json!({"data": {"rows": created}}))))
}

async fn update_rows(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<UpdateBody>,
) -> ApiResult<Json<Value>> {
    require_api_key(&headers)?;
    let mut tables = db.write().await;
    let table = tables.get_mut(&id).ok_or_else(table_not_found)?;

    let mut updated = Vec::with_capacity(body.rows.len());
    for update in body.rows {
        let row = table
            .rows
            .iter_mut()
            .find(|row| row.row_id == update.row_id)
            .ok_or((
                StatusCode::NOT_FOUND,
                Json(json!({"error": "row not found"})),
            ))?;
        for patch in update.columns {
            row.columns.insert(patch.column_id, patch.update_cell_value);
        }
        updated.push(row.clone());
    }
    Ok(Json(json!({"data": {"rows": updated}})))
}

async fn delete_rows(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<DeleteBody>,
) -> ApiResult<Json<Value>> {
    require_api_key(&headers)?;
    let mut tables = db.write().await;
    let table = tables.get_mut(&id).ok_or_else(table_not_found)?;

    let before = table.rows.len();
    table.rows.retain(|row| !body.row_ids.contains(&row.row_id));
    Ok(Json(json!({"deleted": before - table.rows.len()})))
}

async fn search(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<SearchParams>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    require_api_key(&headers)?;
    let tables = db.read().await;
    let table = tables.get(&id).ok_or_else(table_not_found)?;

    let matches: Vec<&Row> = table
        .rows
        .iter()
        .filter(|row| match row.columns.get(&params.column_id) {
            Some(Value::String(s)) => s.contains(&params.term),
            Some(other) => other.to_string().contains(&params.term),
            None => false,
        })
        .collect();
    Ok(Json(json!({"data": {"rows": matches}})))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_serializes_with_columns_map() {
        let mut columns = HashMap::new();
        columns.insert("c1".to_string(), json!("Ada"));
        let row = Row { row_id: 3, columns };
        let v = serde_json::to_value(&row).unwrap();
        assert_eq!(v["row_id"], 3);
        assert_eq!(v["columns"]["c1"], "Ada");
    }

    #[test]
    fn insert_body_accepts_opaque_rows() {
        let body: InsertBody =
            serde_json::from_str(r#"{"data": [{"c1": "Ada", "c2": 36}]}"#).unwrap();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["c2"], 36);
    }

    #[test]
    fn insert_body_rejects_missing_data_key() {
        let result: Result<InsertBody, _> = serde_json::from_str(r#"{"rows": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_body_parses_cell_patches() {
        let body: UpdateBody = serde_json::from_str(
            r#"{"rows": [{"row_id": 1, "columns": [{"column_id": "c1", "update_cell_value": "x"}]}]}"#,
        )
        .unwrap();
        assert_eq!(body.rows.len(), 1);
        assert_eq!(body.rows[0].columns[0].column_id, "c1");
    }

    #[test]
    fn search_params_use_wire_casing() {
        let params: SearchParams =
            serde_json::from_value(json!({"columnID": "c2", "term": "Ada"})).unwrap();
        assert_eq!(params.column_id, "c2");
        assert_eq!(params.term, "Ada");
    }
}
