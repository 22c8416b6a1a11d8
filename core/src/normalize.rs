//! Response-shape normalization.
//!
//! The backends wrap list results differently: the mock server answers with
//! a bare array, other deployments use `{"data": [...]}` or a paged
//! `{"content": [...]}`. `normalize` flattens all of them into one sequence
//! and degrades to an empty sequence when nothing matches, so list views
//! survive backend changes.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;
use crate::http::{check_status, HttpResponse};
use crate::types::Page;

/// Object fields that may hold the record array, in priority order.
const WRAPPER_FIELDS: [&str; 2] = ["data", "content"];

/// Body fields that may carry the total record count.
const TOTAL_FIELDS: [&str; 2] = ["totalElements", "total"];

/// Extract the record sequence from `body`. Never fails.
pub fn normalize(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for field in WRAPPER_FIELDS {
                if let Some(Value::Array(items)) = map.remove(field) {
                    return items;
                }
            }
            warn!(keys = ?map.keys().collect::<Vec<_>>(), "unrecognized list response shape");
            Vec::new()
        }
        other => {
            warn!(body = %other, "unrecognized list response shape");
            Vec::new()
        }
    }
}

/// Extract a single record from `body`.
///
/// A recognized sequence yields its first element; any other object is the
/// record itself. Scalars and `null` yield nothing.
pub fn normalize_record(body: Value) -> Option<Value> {
    match body {
        Value::Array(items) => items.into_iter().next(),
        Value::Object(map) => {
            let wrapped = WRAPPER_FIELDS
                .iter()
                .any(|field| matches!(map.get(*field), Some(Value::Array(_))));
            if wrapped {
                normalize(Value::Object(map)).into_iter().next()
            } else {
                Some(Value::Object(map))
            }
        }
        _ => None,
    }
}

/// Total count reported inside a paged body, if any.
pub fn total_count(body: &Value) -> Option<u64> {
    TOTAL_FIELDS
        .iter()
        .find_map(|field| body.get(*field).and_then(Value::as_u64))
}

/// Parse a response body as JSON. An empty body is treated as `null`.
pub fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Parse a list response body. A body that is not JSON at all (an HTML error
/// page, plain text) reads as `null` and so normalizes to an empty list.
pub fn parse_list_body(body: &str) -> Value {
    parse_body(body).unwrap_or_else(|e| {
        warn!(error = %e, "list response body is not JSON");
        Value::Null
    })
}

/// Normalize `body` and decode every element as `T`.
///
/// The shape check is permissive; an element that is present but does not
/// decode is still an error.
pub fn decode_list<T: DeserializeOwned>(body: Value) -> Result<Vec<T>, ApiError> {
    normalize(body)
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| ApiError::Deserialization(e.to_string())))
        .collect()
}

/// Decode a single record, reporting `NotFound` when the body holds none.
pub fn decode_record<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    let record = normalize_record(body).ok_or(ApiError::NotFound)?;
    serde_json::from_value(record).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Status-check `response` and decode it as one page of `T`.
///
/// The total comes from the `X-Total-Count` header when present, otherwise
/// from a paged body's total field.
pub fn decode_page<T: DeserializeOwned>(response: HttpResponse) -> Result<Page<T>, ApiError> {
    check_status(&response)?;
    let header_total = response
        .header("x-total-count")
        .and_then(|value| value.trim().parse().ok());
    let body = parse_list_body(&response.body);
    let total = header_total.or_else(|| total_count(&body));
    Ok(Page {
        items: decode_list(body)?,
        total_count: total,
    })
}

/// Status-check `response` and decode the single record it carries.
pub fn decode_one<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    decode_record(parse_body(&response.body)?)
}
