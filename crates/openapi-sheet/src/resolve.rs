//! Local `$ref` resolution and enum detection.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_yaml_ng::Value;

use crate::error::{Error, Result};
use crate::types::infer_type;
use crate::value::{enum_values, key_str};

/// A referenced schema that only declares an allowed-values list.
#[derive(Debug, Clone, PartialEq)]
pub struct RefEnum {
    /// The enum schema's own type (e.g. `string`).
    pub base_type: String,
    /// Allowed values in declaration order.
    pub enum_values: Vec<serde_json::Value>,
}

/// Resolves `#/...` references against one parsed document.
///
/// Lookups are memoized per resolver; a resolver lives for a single
/// conversion and is never shared between documents.
#[derive(Debug)]
pub struct Resolver<'a> {
    root: &'a Value,
    cache: RefCell<HashMap<String, &'a Value>>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a document root.
    #[must_use]
    pub fn new(root: &'a Value) -> Self {
        Self {
            root,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The document root this resolver reads from.
    #[must_use]
    pub fn root(&self) -> &'a Value {
        self.root
    }

    /// Return the node a `$ref` points at.
    ///
    /// `#/components/schemas/Pet` descends `components` → `schemas` → `Pet`
    /// from the root. Pointer tokens are unescaped (`~1` is `/`, `~0` is `~`)
    /// and numeric tokens index into sequences.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] when the reference is not document-local
    /// or a token along the path does not exist.
    pub fn resolve(&self, reference: &str) -> Result<&'a Value> {
        if let Some(&node) = self.cache.borrow().get(reference) {
            return Ok(node);
        }

        let pointer = reference.strip_prefix('#').ok_or_else(|| {
            Error::resolution(reference, "only local '#/...' references are supported")
        })?;

        let mut node = self.root;
        for raw in pointer.split('/').skip_while(|t| t.is_empty()) {
            let token = raw.replace("~1", "/").replace("~0", "~");
            node = step(node, &token)
                .ok_or_else(|| Error::resolution(reference, format!("no node at '{token}'")))?;
        }

        self.cache.borrow_mut().insert(reference.to_string(), node);
        Ok(node)
    }

    /// Follow `node`'s own `$ref`, if any, one hop.
    ///
    /// Used for parameter, request body, response and example objects,
    /// which may be declared under `components` and referenced in place.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Resolution`] from [`resolve`](Self::resolve).
    pub fn follow(&self, node: &'a Value) -> Result<&'a Value> {
        match crate::value::schema_ref(node) {
            Some(reference) => self.resolve(reference),
            None => Ok(node),
        }
    }

    /// Check whether a reference points at an enum wrapper schema.
    ///
    /// Returns `None` when there is no reference or the target has no `enum`
    /// list.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Resolution`] when the reference does not resolve.
    pub fn detect_enum(&self, reference: Option<&str>) -> Result<Option<RefEnum>> {
        let Some(reference) = reference else {
            return Ok(None);
        };
        let node = self.resolve(reference)?;
        let Some(values) = enum_values(node) else {
            return Ok(None);
        };
        Ok(Some(RefEnum {
            base_type: infer_type(node),
            enum_values: values,
        }))
    }
}

fn step<'a>(node: &'a Value, token: &str) -> Option<&'a Value> {
    match node {
        Value::Mapping(map) => map.get(token).or_else(|| {
            map.iter()
                .find(|(k, _)| key_str(k).as_deref() == Some(token))
                .map(|(_, v)| v)
        }),
        Value::Sequence(seq) => seq.get(token.parse::<usize>().ok()?),
        Value::Tagged(tagged) => step(&tagged.value, token),
        _ => None,
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
    Pet:
      type: object
      properties:
        name:
          type: string
    Status:
      type: string
      enum: [AVAILABLE, SOLD]
    Level:
      type: integer
      format: int32
      enum: [1, 2, 3]
    a/b:
      type: string
    Untyped:
      enum: [x, y]
  responses:
    200:
      description: numeric key
servers:
  - url: https://one.example
  - url: https://two.example
"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_component_schema() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let pet = resolver.resolve("#/components/schemas/Pet").unwrap();
        assert_eq!(pet["type"].as_str(), Some("object"));
    }

    #[test]
    fn resolves_escaped_and_indexed_tokens() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let escaped = resolver.resolve("#/components/schemas/a~1b").unwrap();
        assert_eq!(escaped["type"].as_str(), Some("string"));
        let server = resolver.resolve("#/servers/1").unwrap();
        assert_eq!(server["url"].as_str(), Some("https://two.example"));
        let numeric = resolver.resolve("#/components/responses/200").unwrap();
        assert_eq!(numeric["description"].as_str(), Some("numeric key"));
    }

    #[test]
    fn missing_path_is_resolution_error() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let err = resolver.resolve("#/components/schemas/Nope").unwrap_err();
        assert!(matches!(
            err,
            Error::Resolution { ref reference, .. } if reference == "#/components/schemas/Nope"
        ));
    }

    #[test]
    fn external_reference_is_rejected() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let err = resolver.resolve("other.yaml#/components/schemas/Pet").unwrap_err();
        assert!(err.to_string().contains("only local"));
    }

    #[test]
    fn repeated_lookup_hits_cache() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let first = resolver.resolve("#/components/schemas/Pet").unwrap();
        let second = resolver.resolve("#/components/schemas/Pet").unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(resolver.cache.borrow().len(), 1);
    }

    #[test]
    fn detects_enum_wrappers() {
        let doc = doc();
        let resolver = Resolver::new(&doc);

        assert_eq!(resolver.detect_enum(None).unwrap(), None);
        assert_eq!(
            resolver
                .detect_enum(Some("#/components/schemas/Pet"))
                .unwrap(),
            None
        );

        let status = resolver
            .detect_enum(Some("#/components/schemas/Status"))
            .unwrap()
            .unwrap();
        assert_eq!(status.base_type, "string");
        assert_eq!(status.enum_values, vec!["AVAILABLE", "SOLD"]);

        let level = resolver
            .detect_enum(Some("#/components/schemas/Level"))
            .unwrap()
            .unwrap();
        assert_eq!(level.base_type, "integer");
        assert_eq!(level.enum_values, vec![1, 2, 3]);
    }

    #[test]
    fn untyped_enum_infers_type_from_values() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        let found = resolver
            .detect_enum(Some("#/components/schemas/Untyped"))
            .unwrap()
            .unwrap();
        assert_eq!(found.base_type, "string");
    }

    #[test]
    fn detect_enum_propagates_resolution_errors() {
        let doc = doc();
        let resolver = Resolver::new(&doc);
        assert!(resolver
            .detect_enum(Some("#/components/schemas/Gone"))
            .is_err());
    }
}
