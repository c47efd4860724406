use serde_json::Value;

use crate::{ObjectRecord, SnapshotError};

/// Parse an object snapshot into raw records.
///
/// Accepts either a bare JSON list of records or an object with an `objects`
/// list. Unknown record keys are ignored.
///
/// # Errors
///
/// Returns [`SnapshotError`] if the input is not JSON, has neither accepted
/// shape, or any element is not a record object.
pub fn parse_objects(input: &str) -> Result<Vec<ObjectRecord>, SnapshotError> {
    let document: Value = serde_json::from_str(input).map_err(SnapshotError::InvalidJson)?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("objects") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(SnapshotError::UnexpectedShape {
                    found: describe(&other),
                })
            }
            None => {
                return Err(SnapshotError::UnexpectedShape {
                    found: "an object without an 'objects' key",
                })
            }
        },
        other => {
            return Err(SnapshotError::UnexpectedShape {
                found: describe(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item)
                .map_err(|source| SnapshotError::InvalidRecord { index, source })
        })
        .collect()
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
