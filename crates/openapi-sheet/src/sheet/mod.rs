//! Spreadsheet-oriented projection of a [`Document`].
//!
//! One [`SheetOperation`] per `(group, operation)` pair, shaped for a
//! row-per-field report template: parameters as flat rows with a nesting
//! level, `Y`/`N` required flags, enum values folded into descriptions, and
//! a JSON example per payload section.

mod example;

use serde::Serialize;

use crate::config::SheetConfig;
use crate::document::{Document, Field, Operation, ParameterLocation, Payload};

pub use example::default_example;

/// Sheet rows for a whole document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Document title.
    pub title: Option<String>,
    /// One entry per grouped operation.
    pub operations: Vec<SheetOperation>,
}

/// One operation as laid out on a sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct SheetOperation {
    /// Path template.
    pub path: String,
    /// Operation summary.
    pub summary: Option<String>,
    /// HTTP method as declared.
    pub http_method: String,
    /// Tag group this entry belongs to.
    pub group: String,
    /// Request content type.
    pub content_type: String,
    /// `deprecated` for deprecated operations.
    pub memo: Option<String>,
    /// Path, header and query parameters, in that order.
    pub other_parameters: Vec<OtherParameterRow>,
    /// Rows of the first request payload.
    pub request_parameters: Vec<PayloadRow>,
    /// Declared or synthesized request example.
    pub request_example: Option<String>,
    /// Rows of the success response payload.
    pub response_parameters: Vec<PayloadRow>,
    /// Declared or synthesized response example.
    pub response_example: Option<String>,
    /// Whether [`other_parameters`](Self::other_parameters) is non-empty.
    pub show_other_parameters: bool,
    /// Whether [`request_parameters`](Self::request_parameters) is non-empty.
    pub show_request_parameters: bool,
    /// Whether a request example exists.
    pub show_request_example: bool,
    /// Whether [`response_parameters`](Self::response_parameters) is non-empty.
    pub show_response_parameters: bool,
    /// Whether a response example exists.
    pub show_response_example: bool,
}

/// A path, header, or query parameter row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherParameterRow {
    /// Parameter location.
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    /// Parameter name.
    pub name: String,
    /// Display type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Declared `maxLength`.
    pub max_length: Option<u64>,
    /// `Y`, `N`, or absent.
    pub required: Option<&'static str>,
    /// Description with allowable values appended.
    pub description: Option<String>,
}

/// A flattened payload field row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadRow {
    /// Nesting depth, 1 for top-level fields.
    pub level: usize,
    /// Dotted sequence label.
    #[serde(rename = "levelValue")]
    pub sequence: Option<String>,
    /// Field name.
    pub name: String,
    /// Display type.
    #[serde(rename = "type")]
    pub ty: String,
    /// Declared `maxLength`.
    pub max_length: Option<u64>,
    /// `Y`, `N`, or absent; always absent on response rows.
    pub required: Option<&'static str>,
    /// Description with allowable values appended.
    pub description: Option<String>,
}

/// Project a document into sheet rows.
#[must_use]
pub fn build_sheet(document: &Document, config: &SheetConfig) -> Sheet {
    let operations = document
        .operations()
        .map(|(group, operation)| sheet_operation(group, operation, config))
        .collect();

    Sheet {
        title: document.title.clone(),
        operations,
    }
}

fn sheet_operation(group: &str, operation: &Operation, config: &SheetConfig) -> SheetOperation {
    let request = operation.request_payloads.first();
    let response = operation
        .response_payloads
        .iter()
        .find(|p| p.status.as_deref() == Some(config.success_status.as_str()));

    let other_parameters = other_parameters(operation);
    let (request_parameters, request_example) = payload_section(request, true);
    let (response_parameters, response_example) = payload_section(response, false);

    let content_type = request
        .and_then(|p| p.media_type.clone())
        .unwrap_or_else(|| config.content_type.clone());

    SheetOperation {
        path: operation.path.clone(),
        summary: operation.summary.clone(),
        http_method: operation.http_method.clone(),
        group: group.to_string(),
        content_type,
        memo: operation.deprecated.then(|| "deprecated".to_string()),
        show_other_parameters: !other_parameters.is_empty(),
        show_request_parameters: !request_parameters.is_empty(),
        show_request_example: request_example.as_deref().is_some_and(|e| !e.is_empty()),
        show_response_parameters: !response_parameters.is_empty(),
        show_response_example: response_example.as_deref().is_some_and(|e| !e.is_empty()),
        other_parameters,
        request_parameters,
        request_example,
        response_parameters,
        response_example,
    }
}

fn other_parameters(operation: &Operation) -> Vec<OtherParameterRow> {
    let buckets = [
        (ParameterLocation::Path, &operation.path_params),
        (ParameterLocation::Header, &operation.header_params),
        (ParameterLocation::Query, &operation.query_params),
    ];

    buckets
        .into_iter()
        .flat_map(|(location, params)| {
            params.iter().map(move |field| OtherParameterRow {
                location,
                name: field.name.clone(),
                ty: field.ty.clone(),
                max_length: field.max_length,
                required: field.required.map(yes_no),
                description: describe_field(field),
            })
        })
        .collect()
}

/// Rows and example for one payload; response rows carry no required flag.
fn payload_section(
    payload: Option<&Payload>,
    with_required: bool,
) -> (Vec<PayloadRow>, Option<String>) {
    let Some(payload) = payload else {
        return (Vec::new(), None);
    };

    let rows: Vec<PayloadRow> = payload
        .fields
        .iter()
        .flatten()
        .map(|field| PayloadRow {
            level: field.level(),
            sequence: field.sequence.clone(),
            name: field.name.clone(),
            ty: field.ty.clone(),
            max_length: field.max_length,
            required: field.required.filter(|_| with_required).map(yes_no),
            description: describe_field(field),
        })
        .collect();

    let example = match payload.examples.first() {
        Some(declared) => Some(declared.value.clone()),
        None => synthesize(&rows),
    };
    (rows, example)
}

fn synthesize(rows: &[PayloadRow]) -> Option<String> {
    match default_example(rows) {
        Ok(example) => example,
        Err(err) => {
            tracing::warn!(error = %err, "cannot synthesize default example");
            None
        }
    }
}

/// Description with enum values appended as `allowableValues`.
fn describe_field(field: &Field) -> Option<String> {
    let values = match &field.enum_values {
        Some(values) if !values.is_empty() => values,
        _ => return field.description.clone(),
    };

    let allowed = values
        .iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",");

    match field.description.as_deref() {
        Some(description) if !description.is_empty() => {
            Some(format!("{description} (allowableValues: {allowed})"))
        }
        _ => Some(format!("allowableValues: {allowed}")),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Y"
    } else {
        "N"
    }
}
