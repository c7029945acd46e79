//! Shared accessors over the untyped document tree.
//!
//! The parsed document is a [`serde_yaml_ng::Value`]. Every accessor here
//! returns `Option` instead of failing on a shape mismatch, so each caller
//! decides locally whether a missing node is an error or just "absent".

use serde_yaml_ng::{Mapping, Value};

use crate::error;

/// Stand-in for absent nodes.
pub static NULL: Value = Value::Null;

/// Known HTTP methods per the `OpenAPI` specification.
///
/// Path items can also contain `summary`, `description`, `parameters`, and
/// `servers` keys; those are not operations.
pub const HTTP_METHODS: &[&str] = &[
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Parse JSON or YAML document text into a value tree.
///
/// JSON is tried first so that documents which are valid JSON but awkward
/// YAML (tabs, long lines) still load. Key order is preserved either way.
///
/// # Errors
///
/// Returns [`Error::Yaml`](crate::Error::Yaml) when the text is neither
/// valid JSON nor valid YAML.
pub fn parse_document(text: &str) -> error::Result<Value> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => Ok(serde_yaml_ng::to_value(json)?),
        Err(_) => Ok(serde_yaml_ng::from_str(text)?),
    }
}

/// Render a mapping key as a string.
///
/// YAML allows unquoted numeric keys (`200:` under `responses`), which parse
/// as numbers; those are rendered with their decimal text.
pub fn key_str(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String value of `node[key]`.
pub fn str_field<'a>(node: &'a Value, key: &str) -> Option<&'a str> {
    node.get(key)?.as_str()
}

/// Mapping value of `node[key]`.
pub fn mapping_field<'a>(node: &'a Value, key: &str) -> Option<&'a Mapping> {
    node.get(key)?.as_mapping()
}

/// Boolean value of `node[key]`.
pub fn bool_field(node: &Value, key: &str) -> Option<bool> {
    node.get(key)?.as_bool()
}

/// The `$ref` string of a node, if it has one.
pub fn schema_ref(node: &Value) -> Option<&str> {
    str_field(node, "$ref")
}

/// Values of the node's `enum` list, converted for output.
pub fn enum_values(node: &Value) -> Option<Vec<serde_json::Value>> {
    let values = node.get("enum")?.as_sequence()?;
    Some(values.iter().map(to_json).collect())
}

/// Convert a document node into a JSON value.
///
/// Mapping keys go through [`key_str`]; keys with no string form are dropped.
/// YAML tags are discarded in favor of the tagged value.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => number_to_json(n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(seq) => seq.iter().map(to_json).collect(),
        Value::Mapping(map) => {
            let object: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .filter_map(|(k, v)| Some((key_str(k)?, to_json(v))))
                .collect();
            serde_json::Value::Object(object)
        }
        Value::Tagged(tagged) => to_json(&tagged.value),
    }
}

fn number_to_json(n: &serde_yaml_ng::Number) -> serde_json::Value {
    if let Some(i) = n.as_i64() {
        i.into()
    } else if let Some(u) = n.as_u64() {
        u.into()
    } else {
        n.as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

/// Pretty-print a document node as JSON text.
///
/// # Errors
///
/// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
pub fn to_pretty_json(value: &Value) -> error::Result<String> {
    Ok(serde_json::to_string_pretty(&to_json(value))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_and_keeps_key_order() {
        let doc = parse_document(r#"{"b": 1, "a": {"z": true, "y": null}}"#).unwrap();
        let keys: Vec<String> = doc
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(key_str)
            .collect();
        assert_eq!(keys, vec!["b", "a"]);
        let inner: Vec<String> = doc["a"]
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(key_str)
            .collect();
        assert_eq!(inner, vec!["z", "y"]);
    }

    #[test]
    fn parses_yaml() {
        let doc = parse_document("openapi: 3.0.1\ninfo:\n  title: Pets\n").unwrap();
        assert_eq!(str_field(&doc["info"], "title"), Some("Pets"));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_document("{{invalid yaml").is_err());
    }

    #[test]
    fn numeric_keys_render_as_text() {
        let doc: Value = serde_yaml_ng::from_str("200: ok\n404: missing\n").unwrap();
        let keys: Vec<String> = doc
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(key_str)
            .collect();
        assert_eq!(keys, vec!["200", "404"]);
    }

    #[test]
    fn to_json_converts_nested_values() {
        let doc: Value = serde_yaml_ng::from_str(
            "name: rex\nage: 3\nweight: 4.5\ntags: [a, b]\n1: numeric-key\n",
        )
        .unwrap();
        let json = to_json(&doc);
        assert_eq!(json["name"], "rex");
        assert_eq!(json["age"], 3);
        assert_eq!(json["weight"], 4.5);
        assert_eq!(json["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(json["1"], "numeric-key");
    }

    #[test]
    fn pretty_json_is_indented() {
        let doc: Value = serde_yaml_ng::from_str("id: 1\n").unwrap();
        assert_eq!(to_pretty_json(&doc).unwrap(), "{\n  \"id\": 1\n}");
    }

    #[test]
    fn accessors_tolerate_wrong_shapes() {
        let doc: Value = serde_yaml_ng::from_str("enum: not-a-list\n$ref: 3\n").unwrap();
        assert!(enum_values(&doc).is_none());
        assert!(schema_ref(&doc).is_none());
        assert!(mapping_field(&doc, "properties").is_none());
        assert!(bool_field(&doc, "deprecated").is_none());
    }
}
