//! Count Estimator — aggregate `select=count` reads that treat the backend's
//! "no matching rows" failure as zero.

use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::dispatcher::{DispatchOptions, Dispatcher, Payload};
use crate::backend::error::RequestError;
use crate::backend::query::Filter;

/// Backend error code for "requested rows, got none".
pub const NO_ROWS_CODE: &str = "PGRST116";

/// Status the backend answers a "no rows" read with.
const NO_ROWS_STATUS: u16 = 406;

/// The backend's own wording for the same condition, matched only when no
/// code survives in the snippet.
const NO_ROWS_PHRASE: &str = "contains 0 rows";

#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    code: Option<String>,
}

/// How a failed count was recognised as "no matching rows".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoRowsSignal {
    /// `code` field of a parseable error body.
    Structured,
    /// Substring match on the raw diagnostic text.
    Heuristic,
}

fn no_rows_signal(err: &RequestError) -> Option<NoRowsSignal> {
    let RequestError::Status { status, snippet } = err else {
        return None;
    };

    // A readable code is authoritative, whatever the status or text says.
    if let Ok(BackendErrorBody { code: Some(code) }) =
        serde_json::from_str::<BackendErrorBody>(snippet)
    {
        return (code == NO_ROWS_CODE).then_some(NoRowsSignal::Structured);
    }

    if *status != NO_ROWS_STATUS {
        return None;
    }
    let matched = snippet.contains(NO_ROWS_CODE)
        || snippet.to_ascii_lowercase().contains(NO_ROWS_PHRASE);
    matched.then_some(NoRowsSignal::Heuristic)
}

fn parse_count(value: &Value) -> Result<u64, RequestError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| RequestError::UnexpectedShape(format!("count is not a count: {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| RequestError::UnexpectedShape(format!("count is not base-10: {s:?}"))),
        other => Err(RequestError::UnexpectedShape(format!(
            "count has unexpected type: {other}"
        ))),
    }
}

/// Pulls `count` out of the first row. Accepts a row array or a single
/// object; an empty body or empty array counts as zero.
fn extract_count(payload: Option<Payload>) -> Result<u64, RequestError> {
    let value = match payload {
        None => return Ok(0),
        Some(Payload::Json(value)) => value,
        Some(Payload::Text(text)) => return parse_count(&Value::String(text)),
    };

    let first_row = match &value {
        Value::Array(rows) => match rows.first() {
            Some(row) => row,
            None => return Ok(0),
        },
        Value::Object(_) => &value,
        other => {
            return Err(RequestError::UnexpectedShape(format!(
                "count response is neither rows nor a row: {other}"
            )))
        }
    };

    let count = first_row
        .get("count")
        .ok_or_else(|| RequestError::UnexpectedShape("count row has no `count` field".into()))?;
    parse_count(count)
}

/// Counts rows of `resource_path` matching `filter`.
///
/// Returns `Ok(0)` when the backend rejects the read with its "no rows"
/// condition; every other failure propagates unchanged.
pub async fn count(
    dispatcher: &Dispatcher,
    resource_path: &str,
    filter: Filter,
) -> Result<u64, RequestError> {
    let filter = filter.select("count");

    match dispatcher
        .dispatch(resource_path, DispatchOptions::get(Some(filter)))
        .await
    {
        Ok(payload) => extract_count(payload),
        Err(err) => match no_rows_signal(&err) {
            Some(NoRowsSignal::Structured) => {
                debug!(resource_path, "count read reported no rows; using 0");
                Ok(0)
            }
            Some(NoRowsSignal::Heuristic) => {
                warn!(
                    resource_path,
                    error = %err,
                    "count read failed and was treated as 0 rows by matching diagnostic text; \
                     the backend sent no structured error code"
                );
                Ok(0)
            }
            None => Err(err),
        },
    }
}

/// Runs one [`count`] per filter concurrently and returns results in input
/// order. The first failure aborts the whole batch.
pub async fn count_many(
    dispatcher: &Dispatcher,
    resource_path: &str,
    filters: Vec<Filter>,
) -> Result<Vec<u64>, RequestError> {
    try_join_all(
        filters
            .into_iter()
            .map(|filter| count(dispatcher, resource_path, filter)),
    )
    .await
}
