//! Error types for the wiregen-core library.
//!
//! This module provides error handling using the `thiserror` crate. Every
//! generation-time failure is fatal to its compilation: there is no partial
//! output and no retry, because each condition indicates a schema defect
//! that must be fixed at the source.

use thiserror::Error;

/// Result type alias for wiregen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for schema compilation
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A field's declared type is neither a scalar keyword nor resolvable
    /// through the scope chain to a message or enum definition
    #[error("unresolved type '{type_name}' for field '{field}' in message '{message}'")]
    UnresolvedType {
        /// Emitted name of the enclosing message
        message: String,
        /// Name of the offending field
        field: String,
        /// The declared type that failed to resolve
        type_name: String,
    },

    /// An explicit default literal cannot be cast to the field's declared
    /// type (the type is not in the supported cast table, or the literal
    /// does not parse as a value of that type)
    #[error("cannot cast default '{value}' of field '{field}' to type '{type_name}'")]
    UnsupportedDefaultCast {
        /// Name of the offending field
        field: String,
        /// The declared type of the field
        type_name: String,
        /// The default literal as written in the schema source
        value: String,
    },

    /// The schema carries a syntax version marker other than 2 or 3
    #[error("unsupported schema syntax version: {syntax}")]
    UnsupportedSyntax {
        /// The unsupported version marker
        syntax: u32,
    },
}

impl Error {
    /// Creates a new unresolved-type error
    pub fn unresolved_type(
        message: impl Into<String>,
        field: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnresolvedType {
            message: message.into(),
            field: field.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates a new unsupported-default-cast error
    pub fn unsupported_default_cast(
        field: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::UnsupportedDefaultCast {
            field: field.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_type_display() {
        let err = Error::unresolved_type("Envelope", "payload", "Missing");
        assert!(err.to_string().contains("unresolved type 'Missing'"));
        assert!(err.to_string().contains("Envelope"));
        assert!(err.to_string().contains("payload"));
    }

    #[test]
    fn test_unsupported_default_cast_display() {
        let err = Error::unsupported_default_cast("blob", "bytes", "abc");
        assert!(err.to_string().contains("cannot cast default 'abc'"));
        assert!(err.to_string().contains("bytes"));
    }
}
