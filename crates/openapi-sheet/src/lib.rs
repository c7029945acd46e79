#![allow(clippy::doc_markdown)] // README uses "OpenAPI" proper noun throughout
#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! ## API Reference

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod document;
mod error;
mod extract;
mod fields;
mod resolve;
mod sheet;
mod types;
mod value;

use serde_yaml_ng::Value;

pub use config::{
    ConvertConfig, CycleGuard, MissingTags, ProjectConfig, SheetConfig, DEFAULT_MAX_DEPTH,
    DEFAULT_UNTAGGED_GROUP,
};
pub use document::{Document, Field, Group, Operation, ParameterLocation, Payload, PayloadExample};
pub use error::{Error, Result};
pub use sheet::{build_sheet, OtherParameterRow, PayloadRow, Sheet, SheetOperation};
pub use value::parse_document;

/// Convert `OpenAPI` 3 document text (JSON or YAML) into a [`Document`].
///
/// # Errors
///
/// Returns [`Error::Yaml`] for unparseable input, [`Error::Resolution`] for
/// unresolvable references, [`Error::DepthLimit`] for runaway nesting, and
/// [`Error::MalformedInput`] for untagged operations under
/// [`MissingTags::Fail`].
pub fn convert(input: &str, config: &ConvertConfig) -> Result<Document> {
    let root = parse_document(input)?;
    convert_value(&root, config)
}

/// Convert an already-parsed document tree.
///
/// # Errors
///
/// Same as [`convert`], minus parse errors.
pub fn convert_value(root: &Value, config: &ConvertConfig) -> Result<Document> {
    let resolver = resolve::Resolver::new(root);
    let operations = extract::Extractor::new(&resolver, config).operations()?;
    tracing::debug!(operations = operations.len(), "extracted operations");
    Ok(Document::assemble(root, operations))
}

/// Internal types for advanced use and testing.
///
/// **Not covered by semver guarantees.** These re-exports are `#[doc(hidden)]`
/// and may change in any release, including patch versions.
#[doc(hidden)]
pub mod internal {
    pub use crate::extract::Extractor;
    pub use crate::fields::FieldBuilder;
    pub use crate::resolve::{RefEnum, Resolver};
    pub use crate::sheet::default_example;
    pub use crate::types::{decorate, describe, infer_type, SchemaShape};
}
