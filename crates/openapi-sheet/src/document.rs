//! Normalized document model and tag grouping.
//!
//! Every value here is built once, fully populated, and never mutated after
//! [`Document`] assembly. Operations with several tags are cloned into each
//! of their groups.

use serde::Serialize;
use serde_yaml_ng::Value;

use crate::value::str_field;

/// Root of a normalized `OpenAPI` document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The `openapi` version string (e.g. `3.0.1`).
    pub spec_version: Option<String>,
    /// `info.title`.
    pub title: Option<String>,
    /// `info.description`.
    pub description: Option<String>,
    /// One group per tag, in first-seen order.
    pub groups: Vec<Group>,
}

impl Document {
    /// Assemble a document from root metadata and extracted operations.
    pub(crate) fn assemble(root: &Value, operations: Vec<Operation>) -> Self {
        let info = |key: &str| {
            root.get("info")
                .and_then(|info| str_field(info, key))
                .map(str::to_string)
        };
        Self {
            spec_version: str_field(root, "openapi").map(str::to_string),
            title: info("title"),
            description: info("description"),
            groups: group_by_tag(operations),
        }
    }

    /// Iterate `(tag, operation)` pairs across all groups in order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.groups
            .iter()
            .flat_map(|g| g.operations.iter().map(move |op| (g.tag.as_str(), op)))
    }
}

/// Operations sharing one tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// The tag name.
    pub tag: String,
    /// Operations carrying this tag, in path-declaration order.
    pub operations: Vec<Operation>,
}

/// One `(path, method)` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Lowercase HTTP method as declared (`get`, `post`, ...).
    pub http_method: String,
    /// Path template (e.g. `/pets/{id}`).
    pub path: String,
    /// Operation summary.
    pub summary: Option<String>,
    /// Whether the operation is marked deprecated.
    pub deprecated: bool,
    /// Tags this operation is grouped under.
    pub tags: Vec<String>,
    /// `in: header` parameters.
    pub header_params: Vec<Field>,
    /// `in: path` parameters.
    pub path_params: Vec<Field>,
    /// `in: query` parameters.
    pub query_params: Vec<Field>,
    /// One payload per request body media type.
    pub request_payloads: Vec<Payload>,
    /// One payload per response status and media type.
    pub response_payloads: Vec<Payload>,
}

/// A parameter or a flattened payload property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Dotted 1-based nesting position (`1`, `1.2`, `1.2.1`).
    ///
    /// Only set for payload fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    /// Property or parameter name.
    pub name: String,
    /// Display type: a primitive name, `object`, `array[T]`, or `T($format)`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Declared description.
    pub description: Option<String>,
    /// Required flag; `None` when a parameter does not say.
    pub required: Option<bool>,
    /// Allowed values, declared directly or via an enum `$ref`.
    pub enum_values: Option<Vec<serde_json::Value>>,
    /// Declared `maxLength`.
    pub max_length: Option<u64>,
    /// Declared example value.
    pub example: Option<serde_json::Value>,
}

impl Field {
    /// Nesting depth, starting at 1 for top-level fields and parameters.
    #[must_use]
    pub fn level(&self) -> usize {
        self.sequence
            .as_deref()
            .map_or(1, |seq| seq.matches('.').count() + 1)
    }
}

/// A request body or response for one media type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    /// Response status code; `None` for request payloads.
    #[serde(rename = "httpCode", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Media type key (e.g. `application/json`); `None` for content-less responses.
    pub media_type: Option<String>,
    /// Response description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The `$ref` the fields were expanded from (the schema's own, or its
    /// array items'), when there is one.
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    /// Flattened schema fields; `None` for responses without `content`.
    pub fields: Option<Vec<Field>>,
    /// Named examples, pretty-printed as JSON.
    pub examples: Vec<PayloadExample>,
}

/// A named payload example.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadExample {
    /// Example key (or `example` for a singular example).
    pub name: String,
    /// Pretty-printed JSON text.
    pub value: String,
}

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// `in: header`.
    Header,
    /// `in: path`.
    Path,
    /// `in: query`.
    Query,
}

impl ParameterLocation {
    /// Parse an `in` value; `cookie` and unknown locations yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "header" => Some(Self::Header),
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            _ => None,
        }
    }
}

/// Bucket operations by tag, preserving first-seen tag order.
fn group_by_tag(operations: Vec<Operation>) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for operation in operations {
        for tag in &operation.tags {
            match groups.iter_mut().find(|g| &g.tag == tag) {
                Some(group) => group.operations.push(operation.clone()),
                None => groups.push(Group {
                    tag: tag.clone(),
                    operations: vec![operation.clone()],
                }),
            }
        }
    }
    groups
}
