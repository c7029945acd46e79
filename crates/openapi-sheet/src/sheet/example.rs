//! Default example synthesis from flattened payload rows.
//!
//! Rows arrive in sequence order, so an `object` row is directly followed by
//! its deeper children. Each scalar type maps to a fixed placeholder value.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::PayloadRow;

/// Build a pretty-printed JSON example from payload rows.
///
/// Returns `Ok(None)` when there are no rows.
///
/// # Errors
///
/// Returns [`Error::UnsupportedType`] for a row type with no placeholder.
pub fn default_example(rows: &[PayloadRow]) -> Result<Option<String>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let mut cursor = 0;
    let object = build_object(rows, &mut cursor, 1)?;
    Ok(Some(serde_json::to_string_pretty(&Value::Object(object))?))
}

fn build_object(
    rows: &[PayloadRow],
    cursor: &mut usize,
    level: usize,
) -> Result<Map<String, Value>> {
    let mut object = Map::new();

    while let Some(row) = rows.get(*cursor) {
        if row.level < level {
            break;
        }
        *cursor += 1;
        if row.level > level {
            // Orphaned child of a row that has no object to hold it.
            continue;
        }

        let (is_array, element_type) = match row.ty.strip_prefix("array[") {
            Some(rest) => (true, rest.strip_suffix(']').unwrap_or(rest)),
            None => (false, row.ty.as_str()),
        };

        let element = if element_type == "object" {
            Value::Object(build_object(rows, cursor, level + 1)?)
        } else {
            placeholder(element_type)?
        };

        let value = if is_array {
            Value::Array(vec![element])
        } else {
            element
        };
        object.insert(row.name.clone(), value);
    }

    Ok(object)
}

fn placeholder(ty: &str) -> Result<Value> {
    let value = match ty {
        "string($date)" => Value::from("2023-12-31"),
        "string($date-time)" => Value::from("2023-12-31T00:00:00.000Z"),
        "boolean" => Value::Bool(true),
        t if t == "string" || t.starts_with("string(") => Value::from("string"),
        t if t == "integer" || t.starts_with("integer(") => Value::from(0),
        t if t == "number" || t.starts_with("number(") => Value::from(1),
        _ => {
            return Err(Error::UnsupportedType { ty: ty.to_string() });
        }
    };
    Ok(value)
}
