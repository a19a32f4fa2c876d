//! Schema AST model.
//!
//! This module defines the parsed message-schema description consumed by the
//! generator. The textual schema parser that produces it is an external
//! collaborator; its output arrives either as in-memory values or as the
//! JSON form accepted by the CLI, which is why every node here derives
//! [`serde::Deserialize`].
//!
//! The model is input-only: the generator never mutates it. Resolved
//! defaults and qualified names live in the scope tree built by
//! [`crate::scope`].

use crate::error::Error;
use serde::Deserialize;

/// Schema language version of the source schema.
///
/// Affects whether explicit field defaults are honored: version 3 forbids
/// default overrides, so any explicit default in the options is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u32")]
pub enum SyntaxVersion {
    /// Version 2 syntax (explicit defaults permitted)
    Proto2,
    /// Version 3 syntax (explicit defaults ignored)
    Proto3,
}

impl SyntaxVersion {
    /// Returns the numeric syntax marker
    pub fn as_u32(&self) -> u32 {
        match self {
            SyntaxVersion::Proto2 => 2,
            SyntaxVersion::Proto3 => 3,
        }
    }
}

impl Default for SyntaxVersion {
    fn default() -> Self {
        SyntaxVersion::Proto2
    }
}

impl TryFrom<u32> for SyntaxVersion {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Error> {
        match value {
            2 => Ok(SyntaxVersion::Proto2),
            3 => Ok(SyntaxVersion::Proto3),
            _ => Err(Error::UnsupportedSyntax { syntax: value }),
        }
    }
}

/// A parsed schema: the synthetic top-level node.
///
/// Its immediate children are the top-level messages and enums; those are
/// the nodes bound into the export surface of the generated unit.
#[derive(Debug, Clone, Deserialize)]
pub struct Schema {
    /// Syntax version marker (defaults to version 2 when absent)
    #[serde(default)]
    pub syntax: SyntaxVersion,
    /// Top-level enum definitions, in declaration order
    #[serde(default)]
    pub enums: Vec<Enum>,
    /// Top-level message definitions, in declaration order
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// A message definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Simple (unqualified) name
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<Field>,
    /// Nested enum definitions, in declaration order
    #[serde(default)]
    pub enums: Vec<Enum>,
    /// Nested message definitions, in declaration order
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// An enum definition: an ordered mapping of symbolic names to integers.
#[derive(Debug, Clone, Deserialize)]
pub struct Enum {
    /// Simple (unqualified) name
    pub name: String,
    /// Symbol/value pairs in declaration order
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

impl Enum {
    /// Returns the integer bound to `symbol`, if present.
    pub fn value_of(&self, symbol: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|v| v.name == symbol)
            .map(|v| v.value)
    }
}

/// One symbolic value of an enum.
#[derive(Debug, Clone, Deserialize)]
pub struct EnumValue {
    /// Symbolic name
    pub name: String,
    /// Integer value encoded on the wire
    pub value: i64,
}

/// A field descriptor.
///
/// The wire tag is trusted to be positive and unique within its enclosing
/// message; duplicate tags are not rejected here, but the generated reader
/// dispatches to whichever branch appears first in declaration order (see
/// [`crate::MAX_FIELD_TAG`] for the valid tag ceiling).
#[derive(Debug, Clone, Deserialize)]
pub struct Field {
    /// Field name (becomes the object property in generated code)
    pub name: String,
    /// Wire tag number
    pub tag: u32,
    /// Declared type: a scalar keyword or a possibly-dotted type reference
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether the field is repeated
    #[serde(default)]
    pub repeated: bool,
    /// Field options
    #[serde(default)]
    pub options: FieldOptions,
}

impl Field {
    /// Returns the scalar type if the declared type is a scalar keyword.
    pub fn scalar(&self) -> Option<ScalarType> {
        ScalarType::from_keyword(&self.type_name)
    }

    /// True when the field uses the packed encoding (repeated and marked
    /// packed in its options).
    pub fn is_packed(&self) -> bool {
        self.repeated && self.options.packed
    }
}

/// Options attached to a field declaration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldOptions {
    /// Explicit default literal, as written in the schema source
    #[serde(default)]
    pub default: Option<String>,
    /// Packed-encoding flag
    #[serde(default)]
    pub packed: bool,
}

/// The closed set of scalar type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// IEEE 64-bit float
    Double,
    /// IEEE 32-bit float
    Float,
    /// Varint-encoded signed 32-bit integer
    Int32,
    /// Varint-encoded signed 64-bit integer
    Int64,
    /// Varint-encoded unsigned 32-bit integer
    Uint32,
    /// Varint-encoded unsigned 64-bit integer
    Uint64,
    /// Zig-zag-encoded signed 32-bit integer
    Sint32,
    /// Zig-zag-encoded signed 64-bit integer
    Sint64,
    /// Fixed-width unsigned 32-bit integer
    Fixed32,
    /// Fixed-width unsigned 64-bit integer
    Fixed64,
    /// Fixed-width signed 32-bit integer
    Sfixed32,
    /// Fixed-width signed 64-bit integer
    Sfixed64,
    /// Boolean
    Bool,
    /// UTF-8 string
    String,
    /// Raw byte sequence
    Bytes,
}

impl ScalarType {
    /// Parses a scalar keyword, returning `None` for anything else
    /// (a type reference to be resolved through the scope chain).
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "double" => Some(ScalarType::Double),
            "float" => Some(ScalarType::Float),
            "int32" => Some(ScalarType::Int32),
            "int64" => Some(ScalarType::Int64),
            "uint32" => Some(ScalarType::Uint32),
            "uint64" => Some(ScalarType::Uint64),
            "sint32" => Some(ScalarType::Sint32),
            "sint64" => Some(ScalarType::Sint64),
            "fixed32" => Some(ScalarType::Fixed32),
            "fixed64" => Some(ScalarType::Fixed64),
            "sfixed32" => Some(ScalarType::Sfixed32),
            "sfixed64" => Some(ScalarType::Sfixed64),
            "bool" => Some(ScalarType::Bool),
            "string" => Some(ScalarType::String),
            "bytes" => Some(ScalarType::Bytes),
            _ => None,
        }
    }

    /// Returns the schema keyword for this scalar type.
    pub fn as_keyword(&self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }

    /// True for every integer family (varint, zig-zag, fixed-width).
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::Int32
                | ScalarType::Int64
                | ScalarType::Uint32
                | ScalarType::Uint64
                | ScalarType::Sint32
                | ScalarType::Sint64
                | ScalarType::Fixed32
                | ScalarType::Fixed64
                | ScalarType::Sfixed32
                | ScalarType::Sfixed64
        )
    }

    /// True for the floating-point family.
    pub fn is_float(&self) -> bool {
        matches!(self, ScalarType::Float | ScalarType::Double)
    }
}
