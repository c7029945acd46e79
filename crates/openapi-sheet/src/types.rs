//! Display types for schema nodes.
//!
//! A schema node is rendered to one of:
//! - a primitive name (`string`, `integer`, `number`, `boolean`)
//! - `object` for nested objects and non-enum `$ref`s
//! - `array[T]` for arrays, where `T` is the item type (or `object`)
//! - `T($format)` for primitives that declare a `format`
//!
//! Enum wrappers referenced via `$ref` render as their base type, never `enum`.

use serde_yaml_ng::Value;

use crate::error::Result;
use crate::resolve::Resolver;
use crate::value::{enum_values, schema_ref, str_field, NULL};

/// The rendered type of a schema node plus what expansion it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaShape<'a> {
    /// Display type (e.g. `string($date)`, `array[object]`).
    pub ty: String,
    /// Allowed values, from the node itself or a referenced enum.
    pub enum_values: Option<Vec<serde_json::Value>>,
    /// Object reference whose properties nest under this node.
    ///
    /// Set for direct non-enum `$ref`s and for arrays of non-enum `$ref` items.
    pub child_ref: Option<&'a str>,
}

impl SchemaShape<'_> {
    fn leaf(ty: String, enum_values: Option<Vec<serde_json::Value>>) -> Self {
        Self {
            ty,
            enum_values,
            child_ref: None,
        }
    }
}

/// Describe a schema node: display type, enum values, and nested reference.
///
/// # Errors
///
/// Returns [`Error::Resolution`](crate::Error::Resolution) if the node or its
/// array items reference a schema that does not exist.
pub fn describe<'a>(schema: &'a Value, resolver: &Resolver<'a>) -> Result<SchemaShape<'a>> {
    let own_ref = schema_ref(schema);

    if let Some(found) = resolver.detect_enum(own_ref)? {
        return Ok(SchemaShape::leaf(
            decorate(&found.base_type, str_field(schema, "format")),
            Some(found.enum_values),
        ));
    }

    if let Some(reference) = own_ref {
        return Ok(SchemaShape {
            ty: "object".to_string(),
            enum_values: None,
            child_ref: Some(reference),
        });
    }

    let ty = infer_type(schema);
    if ty != "array" {
        return Ok(SchemaShape::leaf(
            decorate(&ty, str_field(schema, "format")),
            enum_values(schema),
        ));
    }

    let items = schema.get("items").unwrap_or(&NULL);
    let item_ref = schema_ref(items);

    if let Some(found) = resolver.detect_enum(item_ref)? {
        return Ok(SchemaShape::leaf(
            format!("array[{}]", found.base_type),
            Some(found.enum_values),
        ));
    }

    if let Some(reference) = item_ref {
        return Ok(SchemaShape {
            ty: "array[object]".to_string(),
            enum_values: None,
            child_ref: Some(reference),
        });
    }

    Ok(SchemaShape::leaf(
        format!("array[{}]", infer_type(items)),
        enum_values(items).or_else(|| enum_values(schema)),
    ))
}

/// Raw type name of a schema node, before any decoration.
///
/// Falls back, in order, to: the first non-`null` entry of a `type` list,
/// `object` when `properties` is present, the kind of the first `enum` value,
/// and finally `object`.
pub fn infer_type(schema: &Value) -> String {
    match schema.get("type") {
        Some(Value::String(ty)) => return ty.clone(),
        Some(Value::Sequence(types)) => {
            if let Some(ty) = types
                .iter()
                .filter_map(Value::as_str)
                .find(|ty| *ty != "null")
            {
                return ty.to_string();
            }
        }
        _ => {}
    }

    if schema.get("properties").is_some() {
        return "object".to_string();
    }

    let first_value = schema
        .get("enum")
        .and_then(Value::as_sequence)
        .and_then(|values| values.first());
    let kind = match first_value {
        Some(Value::String(_)) => "string",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(n)) if n.is_f64() => "number",
        Some(Value::Number(_)) => "integer",
        _ => "object",
    };
    kind.to_string()
}

/// Append `($format)` to primitive types.
///
/// Arrays and objects are never decorated.
pub fn decorate(ty: &str, format: Option<&str>) -> String {
    match format {
        Some(format) if ty != "object" && !ty.starts_with("array") => format!("{ty}(${format})"),
        _ => ty.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Value {
        serde_yaml_ng::from_str(
            r#"
components:
  schemas:
    Color:
      type: string
      enum: [RED, GREEN]
    Level:
      type: integer
      format: int32
      enum: [1, 2, 3]
    Pet:
      type: object
      properties:
        name:
          type: string
"#,
        )
        .unwrap()
    }

    struct Shape {
        ty: String,
        enum_values: Option<Vec<serde_json::Value>>,
        child_ref: Option<String>,
    }

    fn shape_of(doc: &Value, yaml: &str) -> Shape {
        let schema: Value = serde_yaml_ng::from_str(yaml).unwrap();
        let resolver = Resolver::new(doc);
        let shape = describe(&schema, &resolver).unwrap();
        Shape {
            ty: shape.ty,
            enum_values: shape.enum_values,
            child_ref: shape.child_ref.map(str::to_string),
        }
    }

    #[test]
    fn primitive_types() {
        let doc = doc();
        assert_eq!(shape_of(&doc, "type: integer").ty, "integer");
        assert_eq!(shape_of(&doc, "type: boolean").ty, "boolean");
    }

    #[test]
    fn format_decorates_primitives() {
        let doc = doc();
        assert_eq!(
            shape_of(&doc, "type: string\nformat: date-time").ty,
            "string($date-time)"
        );
        assert_eq!(
            shape_of(&doc, "type: integer\nformat: int64").ty,
            "integer($int64)"
        );
    }

    #[test]
    fn format_never_decorates_arrays_or_objects() {
        let doc = doc();
        assert_eq!(
            shape_of(&doc, "type: array\nformat: csv\nitems:\n  type: string").ty,
            "array[string]"
        );
        assert_eq!(shape_of(&doc, "type: object\nformat: map").ty, "object");
    }

    #[test]
    fn enum_ref_renders_base_type() {
        let doc = doc();
        let shape = shape_of(&doc, "$ref: '#/components/schemas/Color'");
        assert_eq!(shape.ty, "string");
        assert_eq!(shape.enum_values, Some(vec!["RED".into(), "GREEN".into()]));
        assert_eq!(shape.child_ref.as_deref(), None);
    }

    #[test]
    fn enum_ref_ignores_target_format() {
        let doc = doc();
        let shape = shape_of(&doc, "$ref: '#/components/schemas/Level'");
        assert_eq!(shape.ty, "integer");
        assert_eq!(shape.enum_values, Some(vec![1.into(), 2.into(), 3.into()]));

        let local = shape_of(&doc, "$ref: '#/components/schemas/Level'\nformat: int64");
        assert_eq!(local.ty, "integer($int64)");
    }

    #[test]
    fn object_ref_renders_object_and_threads_ref() {
        let doc = doc();
        let shape = shape_of(&doc, "$ref: '#/components/schemas/Pet'");
        assert_eq!(shape.ty, "object");
        assert_eq!(shape.child_ref.as_deref(), Some("#/components/schemas/Pet"));
        assert_eq!(shape.enum_values, None);
    }

    #[test]
    fn array_item_variants() {
        let doc = doc();

        let primitive = shape_of(&doc, "type: array\nitems:\n  type: string");
        assert_eq!(primitive.ty, "array[string]");
        assert_eq!(primitive.child_ref.as_deref(), None);

        let enums = shape_of(
            &doc,
            "type: array\nitems:\n  $ref: '#/components/schemas/Color'",
        );
        assert_eq!(enums.ty, "array[string]");
        assert_eq!(enums.enum_values, Some(vec!["RED".into(), "GREEN".into()]));

        let objects = shape_of(
            &doc,
            "type: array\nitems:\n  $ref: '#/components/schemas/Pet'",
        );
        assert_eq!(objects.ty, "array[object]");
        assert_eq!(objects.child_ref.as_deref(), Some("#/components/schemas/Pet"));
    }

    #[test]
    fn inline_item_enum_supplies_values() {
        let doc = doc();
        let shape = shape_of(
            &doc,
            "type: array\nitems:\n  type: string\n  enum: [asc, desc]",
        );
        assert_eq!(shape.ty, "array[string]");
        assert_eq!(shape.enum_values, Some(vec!["asc".into(), "desc".into()]));
    }

    #[test]
    fn direct_enum_is_kept() {
        let doc = doc();
        let shape = shape_of(&doc, "type: string\nenum: [A, B]");
        assert_eq!(shape.ty, "string");
        assert_eq!(shape.enum_values, Some(vec!["A".into(), "B".into()]));
    }

    #[test]
    fn infers_missing_types() {
        let yaml = |s: &str| -> Value { serde_yaml_ng::from_str(s).unwrap() };
        assert_eq!(infer_type(&yaml("type: [string, 'null']")), "string");
        assert_eq!(infer_type(&yaml("type: ['null', integer]")), "integer");
        assert_eq!(infer_type(&yaml("properties: {}")), "object");
        assert_eq!(infer_type(&yaml("enum: [1, 2]")), "integer");
        assert_eq!(infer_type(&yaml("enum: [1.5]")), "number");
        assert_eq!(infer_type(&yaml("enum: [true]")), "boolean");
        assert_eq!(infer_type(&yaml("description: anything")), "object");
    }

    #[test]
    fn unresolvable_item_ref_errors() {
        let doc = doc();
        let schema: Value =
            serde_yaml_ng::from_str("type: array\nitems:\n  $ref: '#/components/schemas/Nope'")
                .unwrap();
        let resolver = Resolver::new(&doc);
        assert!(describe(&schema, &resolver).is_err());
    }
}
