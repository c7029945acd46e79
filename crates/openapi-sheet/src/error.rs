//! Typed error enum for the `openapi-sheet` library API.
//!
//! Library consumers can match on specific variants. The CLI (`main.rs`)
//! converts these to `anyhow::Error` at the binary boundary for richer
//! context messages.

/// Errors produced by `openapi-sheet` library operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File I/O failure (reading config or document files).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization failure.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A `$ref` does not point at a node inside the document.
    ///
    /// Aborts the whole conversion; no partial output is produced.
    #[error("cannot resolve $ref '{reference}': {reason}")]
    Resolution {
        /// The unresolved reference string.
        reference: String,
        /// Which part of the pointer failed.
        reason: String,
    },

    /// A required structural element is missing or has the wrong shape.
    #[error("malformed input at {location}: {reason}")]
    MalformedInput {
        /// Where in the document the problem was found (e.g. `GET /users`).
        location: String,
        /// What was expected.
        reason: String,
    },

    /// Schema expansion nested deeper than the configured limit.
    ///
    /// Usually a reference cycle longer than the active cycle guard detects.
    #[error("schema expansion exceeded depth {limit} at $ref '{reference}'")]
    DepthLimit {
        /// The reference being expanded when the limit was hit.
        reference: String,
        /// The configured maximum depth.
        limit: usize,
    },

    /// A field type with no default example value.
    ///
    /// Only raised while synthesizing examples; callers degrade to "no example".
    #[error("no default example for type '{ty}'")]
    UnsupportedType {
        /// The formatted field type.
        ty: String,
    },
}

impl Error {
    pub(crate) fn resolution(reference: &str, reason: impl Into<String>) -> Self {
        Self::Resolution {
            reference: reference.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the library's public API.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time assertion that `Error` is `Send + Sync`.
    /// Required for use in async contexts and across thread boundaries.
    const _: () = {
        const fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    };

    #[test]
    fn resolution_message_names_reference() {
        let err = Error::resolution("#/components/schemas/Missing", "no key 'Missing'");
        assert_eq!(
            err.to_string(),
            "cannot resolve $ref '#/components/schemas/Missing': no key 'Missing'"
        );
    }
}
