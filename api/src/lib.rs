//! This crate contains the remote contract with the warehouse backend:
//! wire types, the JSON-RPC client and the typed operations built on it.

pub mod config;
pub mod filters;
pub mod location;
pub mod metrics;
pub mod navigation;
pub mod prefs;
pub mod record;
pub mod rpc_client;
pub mod suggestion;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

use serde_json::json;
use serde_json::Map;
use serde_json::Value;

use filters::FilterState;
use location::LocationOption;
use metrics::DashboardMetrics;
use record::RecordRef;
use rpc_client::RemoteDataClient;
use rpc_client::RemoteError;
use suggestion::Suggestion;

pub const DASHBOARD_DATA_PATH: &str = "/warehouse/customer/dashboard/data";
pub const LOCATIONS_PATH: &str = "/warehouse/get_locations";
pub const CALL_KW_PATH: &str = "/web/dataset/call_kw";

/// Model that owns the memo-code search.
pub const MEMO_SEARCH_MODEL: &str = "stock.picking";

/// Model of the receipt records whose financial link is set on commit.
pub const RECEIPT_MODEL: &str = "stock.picking";

/// Fetches the dashboard counters for `filters`.
///
/// An empty answer yields all-zero metrics rather than an error.
pub async fn fetch_dashboard_metrics<C: RemoteDataClient>(
    client: &C,
    filters: &FilterState,
) -> Result<DashboardMetrics, RemoteError> {
    let result = client
        .call(DASHBOARD_DATA_PATH, json!({ "filters": filters }))
        .await?;
    Ok(DashboardMetrics::from_result(result))
}

/// Looks up origin codes matching `query`, best matches first.
pub async fn search_origin_codes<C: RemoteDataClient>(
    client: &C,
    query: &str,
) -> Result<Vec<Suggestion>, RemoteError> {
    let result = call_kw(client, MEMO_SEARCH_MODEL, "search_memo_codes", json!([query])).await?;
    if result.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(result).map_err(|e| RemoteError::unexpected_payload("suggestion", e))
}

/// Writes `fields` onto `record`.
pub async fn write_record_fields<C: RemoteDataClient>(
    client: &C,
    record: &RecordRef,
    fields: Map<String, Value>,
) -> Result<(), RemoteError> {
    call_kw(client, &record.model, "write", json!([[record.id], fields])).await?;
    Ok(())
}

/// Reads `fields` of `record` back from the backend. An empty `fields`
/// reads every field.
pub async fn read_record_fields<C: RemoteDataClient>(
    client: &C,
    record: &RecordRef,
    fields: &[&str],
) -> Result<Map<String, Value>, RemoteError> {
    let result = call_kw(client, &record.model, "read", json!([[record.id], fields])).await?;
    match result {
        Value::Array(rows) => match rows.into_iter().next() {
            Some(Value::Object(row)) => Ok(row),
            Some(other) => Err(RemoteError::unexpected_payload("record", other)),
            None => Err(RemoteError::Protocol {
                code: None,
                message: format!("{} {} no longer exists", record.model, record.id),
            }),
        },
        other => Err(RemoteError::unexpected_payload("record", other)),
    }
}

/// Lists the internal stock locations for the warehouse selector.
pub async fn fetch_locations<C: RemoteDataClient>(
    client: &C,
) -> Result<Vec<LocationOption>, RemoteError> {
    let result = client.call(LOCATIONS_PATH, json!({})).await?;
    location::decode_locations(result)
}

/// Calls `model.method(*args)` through the generic ORM endpoint.
async fn call_kw<C: RemoteDataClient>(
    client: &C,
    model: &str,
    method: &str,
    args: Value,
) -> Result<Value, RemoteError> {
    let path = format!("{CALL_KW_PATH}/{model}/{method}");
    client
        .call(
            &path,
            json!({
                "model": model,
                "method": method,
                "args": args,
                "kwargs": {},
            }),
        )
        .await
}
