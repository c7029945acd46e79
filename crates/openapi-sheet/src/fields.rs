//! Flatten object schemas into ordered, sequenced field lists.
//!
//! Each property becomes one [`Field`]. A property that references another
//! object schema (directly or as array items) is immediately followed by that
//! schema's own fields, labeled under the parent's sequence:
//!
//! ```text
//! 1     id        integer
//! 2     owner     object
//! 2.1   name      string
//! 2.2   address   object
//! 2.2.1 city      string
//! 3     tags      array[string]
//! ```
//!
//! Consumers rebuild the tree from this flat list by sequence prefix, so a
//! parent row is always directly followed by its descendants.

use serde_yaml_ng::Value;

use crate::config::CycleGuard;
use crate::document::Field;
use crate::error::{Error, Result};
use crate::resolve::Resolver;
use crate::types::describe;
use crate::value::{key_str, mapping_field, str_field, to_json};

/// Expands schemas into [`Field`] lists for one document.
#[derive(Debug)]
pub struct FieldBuilder<'r, 'a> {
    resolver: &'r Resolver<'a>,
    guard: CycleGuard,
    max_depth: usize,
}

impl<'r, 'a> FieldBuilder<'r, 'a> {
    /// Create a builder over a resolver.
    #[must_use]
    pub fn new(resolver: &'r Resolver<'a>, guard: CycleGuard, max_depth: usize) -> Self {
        Self {
            resolver,
            guard,
            max_depth,
        }
    }

    /// Flatten the object schema behind `reference`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] for any unresolvable `$ref` in the tree,
    /// and [`Error::DepthLimit`] when nesting exceeds the configured depth.
    pub fn build(&self, reference: &'a str) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        self.expand_ref(reference, &mut Vec::new(), None, &mut fields)?;
        Ok(fields)
    }

    /// Flatten an inline object schema (one with its own `properties`).
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_inline(&self, schema: &'a Value) -> Result<Vec<Field>> {
        let mut fields = Vec::new();
        self.expand_properties(schema, &mut Vec::new(), None, &mut fields)?;
        Ok(fields)
    }

    fn expand_ref(
        &self,
        reference: &'a str,
        chain: &mut Vec<&'a str>,
        parent_seq: Option<&str>,
        out: &mut Vec<Field>,
    ) -> Result<()> {
        if self.guard.blocks(reference, chain) {
            tracing::debug!(reference, "reference cycle, not expanding");
            return Ok(());
        }
        if chain.len() >= self.max_depth {
            return Err(Error::DepthLimit {
                reference: reference.to_string(),
                limit: self.max_depth,
            });
        }

        let schema = self.resolver.resolve(reference)?;
        chain.push(reference);
        let result = self.expand_properties(schema, chain, parent_seq, out);
        chain.pop();
        result
    }

    fn expand_properties(
        &self,
        schema: &'a Value,
        chain: &mut Vec<&'a str>,
        parent_seq: Option<&str>,
        out: &mut Vec<Field>,
    ) -> Result<()> {
        let Some(properties) = mapping_field(schema, "properties") else {
            return Ok(());
        };
        let required = schema.get("required").and_then(Value::as_sequence);

        for (index, (key, property)) in properties.iter().enumerate() {
            let name = key_str(key).unwrap_or_default();
            let sequence = match parent_seq {
                Some(parent) => format!("{parent}.{}", index + 1),
                None => (index + 1).to_string(),
            };
            let is_required = required
                .is_some_and(|list| list.iter().any(|r| r.as_str() == Some(name.as_str())));

            let shape = describe(property, self.resolver)?;
            out.push(Field {
                sequence: Some(sequence.clone()),
                name,
                ty: shape.ty,
                description: str_field(property, "description").map(str::to_string),
                required: Some(is_required),
                enum_values: shape.enum_values,
                max_length: property.get("maxLength").and_then(Value::as_u64),
                example: property.get("example").map(to_json),
            });

            if let Some(child) = shape.child_ref {
                self.expand_ref(child, chain, Some(&sequence), out)?;
            }
        }
        Ok(())
    }
}
