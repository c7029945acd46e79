//! Walk `paths` and build one [`Operation`] per `(path, method)` pair.
//!
//! Parameters are sorted into header/path/query buckets and typed with the
//! same rules as payload fields, but never expanded into sub-trees. Request
//! bodies and responses become one [`Payload`] per media type, with fields
//! flattened by [`FieldBuilder`].

use serde_yaml_ng::Value;

use crate::config::{ConvertConfig, MissingTags};
use crate::document::{Field, Operation, ParameterLocation, Payload, PayloadExample};
use crate::error::{Error, Result};
use crate::fields::FieldBuilder;
use crate::resolve::Resolver;
use crate::types::{describe, infer_type};
use crate::value::{
    bool_field, key_str, mapping_field, schema_ref, str_field, to_json, to_pretty_json,
    HTTP_METHODS, NULL,
};

/// Extracts operations from one document.
#[derive(Debug)]
pub struct Extractor<'r, 'a> {
    resolver: &'r Resolver<'a>,
    fields: FieldBuilder<'r, 'a>,
    config: &'r ConvertConfig,
}

impl<'r, 'a> Extractor<'r, 'a> {
    /// Create an extractor over a resolver.
    #[must_use]
    pub fn new(resolver: &'r Resolver<'a>, config: &'r ConvertConfig) -> Self {
        Self {
            resolver,
            fields: FieldBuilder::new(resolver, config.cycle_guard, config.max_depth),
            config,
        }
    }

    /// Extract every operation in path-declaration order.
    ///
    /// Path-item keys that are not HTTP methods (`parameters`, `summary`,
    /// `servers`, extensions) are skipped; shared path-level parameters are
    /// not merged into operations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] or [`Error::DepthLimit`] from schema
    /// expansion, and [`Error::MalformedInput`] for untagged operations when
    /// [`MissingTags::Fail`] is configured.
    pub fn operations(&self) -> Result<Vec<Operation>> {
        let Some(paths) = mapping_field(self.resolver.root(), "paths") else {
            return Ok(Vec::new());
        };

        let mut operations = Vec::new();
        for (path_key, path_item) in paths {
            let path = key_str(path_key).unwrap_or_default();
            let Some(path_map) = path_item.as_mapping() else {
                continue;
            };

            for (method_key, operation) in path_map {
                let method = key_str(method_key).unwrap_or_default();
                if !HTTP_METHODS.contains(&method.to_ascii_lowercase().as_str()) {
                    tracing::debug!(
                        path = %path,
                        key = %method,
                        "skipping non-operation path item key"
                    );
                    continue;
                }
                operations.push(self.operation(&path, &method, operation)?);
            }
        }
        Ok(operations)
    }

    fn operation(&self, path: &str, method: &str, operation: &'a Value) -> Result<Operation> {
        let tags = self.tags(path, method, operation)?;
        let (header_params, path_params, query_params) = self.parameters(operation)?;

        Ok(Operation {
            http_method: method.to_string(),
            path: path.to_string(),
            summary: str_field(operation, "summary").map(str::to_string),
            deprecated: bool_field(operation, "deprecated").unwrap_or(false),
            tags,
            header_params,
            path_params,
            query_params,
            request_payloads: self.request_payloads(operation)?,
            response_payloads: self.response_payloads(operation)?,
        })
    }

    fn tags(&self, path: &str, method: &str, operation: &Value) -> Result<Vec<String>> {
        let tags: Vec<String> = operation
            .get("tags")
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if !tags.is_empty() {
            return Ok(tags);
        }

        match self.config.missing_tags {
            MissingTags::Group => Ok(vec![self.config.untagged_group.clone()]),
            MissingTags::Fail => Err(Error::MalformedInput {
                location: format!("{} {path}", method.to_uppercase()),
                reason: "operation declares no tags".to_string(),
            }),
        }
    }

    fn parameters(&self, operation: &'a Value) -> Result<(Vec<Field>, Vec<Field>, Vec<Field>)> {
        let mut header = Vec::new();
        let mut path = Vec::new();
        let mut query = Vec::new();

        let declared = operation
            .get("parameters")
            .and_then(Value::as_sequence)
            .into_iter()
            .flatten();

        for parameter in declared {
            let parameter = self.resolver.follow(parameter)?;
            let name = str_field(parameter, "name").unwrap_or_default();
            let location_str = str_field(parameter, "in").unwrap_or_default();
            let Some(location) = ParameterLocation::parse(location_str) else {
                tracing::warn!(
                    name,
                    location = location_str,
                    "unsupported parameter location, dropping parameter"
                );
                continue;
            };

            let field = self.parameter_field(name, parameter)?;
            match location {
                ParameterLocation::Header => header.push(field),
                ParameterLocation::Path => path.push(field),
                ParameterLocation::Query => query.push(field),
            }
        }

        Ok((header, path, query))
    }

    fn parameter_field(&self, name: &str, parameter: &'a Value) -> Result<Field> {
        let schema = parameter.get("schema").unwrap_or(&NULL);
        let shape = describe(schema, self.resolver)?;

        Ok(Field {
            sequence: None,
            name: name.to_string(),
            ty: shape.ty,
            description: str_field(parameter, "description").map(str::to_string),
            required: bool_field(parameter, "required"),
            enum_values: shape.enum_values,
            max_length: schema.get("maxLength").and_then(Value::as_u64),
            example: parameter
                .get("example")
                .or_else(|| schema.get("example"))
                .map(to_json),
        })
    }

    fn request_payloads(&self, operation: &'a Value) -> Result<Vec<Payload>> {
        let Some(body) = operation.get("requestBody") else {
            return Ok(Vec::new());
        };
        let body = self.resolver.follow(body)?;
        let Some(content) = mapping_field(body, "content") else {
            return Ok(Vec::new());
        };

        content
            .iter()
            .map(|(media_type, media)| {
                let (reference, fields) = self.schema_fields(media.get("schema"))?;
                Ok(Payload {
                    status: None,
                    media_type: key_str(media_type),
                    description: None,
                    reference,
                    fields: Some(fields),
                    examples: self.examples(media)?,
                })
            })
            .collect()
    }

    fn response_payloads(&self, operation: &'a Value) -> Result<Vec<Payload>> {
        let Some(responses) = mapping_field(operation, "responses") else {
            return Ok(Vec::new());
        };

        let mut payloads = Vec::new();
        for (status, response) in responses {
            let status = key_str(status);
            let response = self.resolver.follow(response)?;
            let description = str_field(response, "description").map(str::to_string);

            let Some(content) = mapping_field(response, "content") else {
                payloads.push(Payload {
                    status,
                    media_type: None,
                    description,
                    reference: None,
                    fields: None,
                    examples: Vec::new(),
                });
                continue;
            };

            for (media_type, media) in content {
                let (reference, fields) = self.schema_fields(media.get("schema"))?;
                payloads.push(Payload {
                    status: status.clone(),
                    media_type: key_str(media_type),
                    description: description.clone(),
                    reference,
                    fields: Some(fields),
                    examples: self.examples(media)?,
                });
            }
        }
        Ok(payloads)
    }

    /// Flatten a media type's schema.
    ///
    /// A `$ref` root or an array of `$ref` items expands the referenced
    /// schema; an inline schema expands its own `properties`.
    fn schema_fields(&self, schema: Option<&'a Value>) -> Result<(Option<String>, Vec<Field>)> {
        let Some(schema) = schema else {
            return Ok((None, Vec::new()));
        };

        if let Some(reference) = schema_ref(schema) {
            return Ok((Some(reference.to_string()), self.fields.build(reference)?));
        }

        if infer_type(schema) == "array" {
            if let Some(item_ref) = schema.get("items").and_then(schema_ref) {
                return Ok((Some(item_ref.to_string()), self.fields.build(item_ref)?));
            }
        }

        Ok((None, self.fields.build_inline(schema)?))
    }

    fn examples(&self, media: &'a Value) -> Result<Vec<PayloadExample>> {
        let mut examples = Vec::new();

        if let Some(named) = mapping_field(media, "examples") {
            for (name, example) in named {
                let example = self.resolver.follow(example)?;
                let Some(value) = example.get("value") else {
                    continue;
                };
                examples.push(PayloadExample {
                    name: key_str(name).unwrap_or_default(),
                    value: to_pretty_json(value)?,
                });
            }
        }

        if let Some(value) = media.get("example") {
            examples.push(PayloadExample {
                name: "example".to_string(),
                value: to_pretty_json(value)?,
            });
        }

        Ok(examples)
    }
}
