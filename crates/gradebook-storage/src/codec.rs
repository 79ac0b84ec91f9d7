//! Text encodings for the `eval_results` and `timestamp` columns.

use chrono::NaiveDateTime;
use gradebook_core::errors::StorageError;
use gradebook_core::RuleOutcomes;
use serde_json::Value;

const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const TIMESTAMP_READ_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Compact JSON object of rule name → passed.
pub fn encode_results(results: &RuleOutcomes) -> Result<String, StorageError> {
    serde_json::to_string(results).map_err(|e| StorageError::SqliteError {
        message: format!("encode eval_results: {e}"),
    })
}

/// Decode a persisted rule mapping.
///
/// Older rows may carry non-boolean values: an object passes when its
/// `passed` or `success` member is truthy, anything else by truthiness.
pub fn decode_results(id: i64, text: &str) -> Result<RuleOutcomes, StorageError> {
    let value: Value = serde_json::from_str(text).map_err(|e| StorageError::CorruptRow {
        id,
        message: format!("eval_results is not JSON: {e}"),
    })?;

    let Value::Object(entries) = value else {
        return Err(StorageError::CorruptRow {
            id,
            message: "eval_results is not a JSON object".to_string(),
        });
    };

    Ok(entries
        .into_iter()
        .map(|(name, value)| {
            let passed = match &value {
                Value::Object(fields) => {
                    fields.get("passed").is_some_and(is_truthy)
                        || fields.get("success").is_some_and(is_truthy)
                }
                other => is_truthy(other),
            };
            (name, passed)
        })
        .collect())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// ISO-8601 with microsecond precision, no offset.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_WRITE_FORMAT).to_string()
}

/// Accepts ISO-8601 with or without fractional seconds, `T` or space separated.
pub fn parse_timestamp(id: i64, text: &str) -> Result<NaiveDateTime, StorageError> {
    TIMESTAMP_READ_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| StorageError::CorruptRow {
            id,
            message: format!("unparseable timestamp {text:?}"),
        })
}
