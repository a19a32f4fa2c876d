//! Default value resolution.
//!
//! Computes, per field, the default value used when the field is absent on
//! the wire, honoring the schema-version rules: version 3 discards explicit
//! defaults, enum-typed fields default to the integer bound to the named
//! symbol (or 0), explicit scalar literals are cast to the declared type,
//! everything else gets the type's zero value, and repeated fields never
//! carry a default.

use super::{ScopeId, ScopeKind, ScopeTree};
use crate::error::{Error, Result};
use crate::schema::{Field, ScalarType, SyntaxVersion};

/// A resolved default value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Integer default (all integer families and enum values)
    Int(i64),
    /// Floating-point default
    Float(f64),
    /// Boolean default
    Bool(bool),
    /// String default
    Str(String),
}

impl DefaultValue {
    /// True for values that are falsy in the generated code (zero, empty
    /// string, `false`). The write guard for such defaults is the plain
    /// truthiness test, which already omits the default value.
    pub fn is_falsy(&self) -> bool {
        match self {
            DefaultValue::Int(v) => *v == 0,
            DefaultValue::Float(v) => *v == 0.0,
            DefaultValue::Bool(v) => !*v,
            DefaultValue::Str(s) => s.is_empty(),
        }
    }
}

/// A field descriptor enriched with its resolved default.
///
/// This is the pure-transform counterpart of the schema [`Field`]: the
/// input descriptor stays untouched and the computed default lives here.
#[derive(Debug)]
pub struct ResolvedField<'a> {
    /// The schema field
    pub field: &'a Field,
    /// Default applied when the field is absent on the wire; `None` when
    /// the field has no generated default (repeated fields, bytes and
    /// message-typed fields)
    pub default: Option<DefaultValue>,
}

/// Resolves one field's default within its enclosing message scope.
pub(super) fn resolve_field<'a>(
    tree: &ScopeTree<'a>,
    scope: ScopeId,
    field: &'a Field,
    syntax: SyntaxVersion,
) -> Result<ResolvedField<'a>> {
    // Version 3 does not support overriding defaults
    let explicit = match syntax {
        SyntaxVersion::Proto3 => None,
        SyntaxVersion::Proto2 => field.options.default.as_deref(),
    };

    let target = tree.resolve(scope, &field.type_name);
    let default = match target.map(|id| tree.kind(id)) {
        Some(ScopeKind::Enum(node)) => Some(DefaultValue::Int(
            explicit.and_then(|symbol| node.value_of(symbol)).unwrap_or(0),
        )),
        Some(_) => match explicit {
            Some(value) => {
                return Err(Error::unsupported_default_cast(
                    field.name.as_str(),
                    field.type_name.as_str(),
                    value,
                ))
            }
            None => None,
        },
        None => match (field.scalar(), explicit) {
            (Some(scalar), Some(value)) => Some(cast(scalar, value, field)?),
            (Some(scalar), None) => zero_default(scalar),
            (None, Some(value)) => {
                return Err(Error::unsupported_default_cast(
                    field.name.as_str(),
                    field.type_name.as_str(),
                    value,
                ))
            }
            // Unresolved reference without a default: left to the field
            // code generator, which raises the unresolved-type error
            (None, None) => None,
        },
    };

    // Defaults are not supported for repeated fields
    let default = if field.repeated { None } else { default };

    Ok(ResolvedField { field, default })
}

/// Casts an explicit default literal to the field's scalar type.
fn cast(scalar: ScalarType, value: &str, field: &Field) -> Result<DefaultValue> {
    let cast_err =
        || Error::unsupported_default_cast(field.name.as_str(), field.type_name.as_str(), value);

    match scalar {
        ScalarType::String => Ok(DefaultValue::Str(value.to_string())),
        ScalarType::Bool => Ok(DefaultValue::Bool(value == "true")),
        _ if scalar.is_float() => value
            .parse::<f64>()
            .map(DefaultValue::Float)
            .map_err(|_| cast_err()),
        _ if scalar.is_integer() => value
            .parse::<i64>()
            .map(DefaultValue::Int)
            .map_err(|_| cast_err()),
        // bytes is not in the cast table
        _ => Err(cast_err()),
    }
}

/// Returns the zero-value default for a scalar type.
fn zero_default(scalar: ScalarType) -> Option<DefaultValue> {
    match scalar {
        ScalarType::String => Some(DefaultValue::Str(String::new())),
        ScalarType::Bool => Some(DefaultValue::Bool(false)),
        ScalarType::Bytes => None,
        _ => Some(DefaultValue::Int(0)),
    }
}
