//! Type dispatch tables.
//!
//! Pure mappings from a field's declared scalar type to the wire-codec
//! runtime's primitive operation names, for both reading and writing.
//! Packed variants share the same primitive name with a `Packed` infix;
//! non-packed writes use the tagged `...Field` form.

use crate::schema::ScalarType;

/// Primitive operation name for a scalar type, shared by the read and
/// write tables.
pub(crate) fn primitive(scalar: ScalarType) -> &'static str {
    match scalar {
        ScalarType::String => "String",
        ScalarType::Float => "Float",
        ScalarType::Double => "Double",
        ScalarType::Bool => "Boolean",
        ScalarType::Uint32 | ScalarType::Uint64 | ScalarType::Int32 | ScalarType::Int64 => {
            "Varint"
        }
        ScalarType::Sint32 | ScalarType::Sint64 => "SVarint",
        ScalarType::Fixed32 => "Fixed32",
        ScalarType::Fixed64 => "Fixed64",
        ScalarType::Sfixed32 => "SFixed32",
        ScalarType::Sfixed64 => "SFixed64",
        ScalarType::Bytes => "Bytes",
    }
}

/// Cursor method name reading one value (or, packed, a whole sequence).
pub(crate) fn read_method(scalar: ScalarType, packed: bool) -> String {
    format!(
        "read{}{}",
        if packed { "Packed" } else { "" },
        primitive(scalar)
    )
}

/// Cursor method name writing one tagged value, or a packed sequence.
pub(crate) fn write_method(scalar: ScalarType, packed: bool) -> String {
    if packed {
        format!("writePacked{}", primitive(scalar))
    } else {
        format!("write{}Field", primitive(scalar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_varint_family_shares_a_primitive() {
        for scalar in [
            ScalarType::Int32,
            ScalarType::Int64,
            ScalarType::Uint32,
            ScalarType::Uint64,
        ] {
            assert_eq!(primitive(scalar), "Varint");
        }
        assert_eq!(primitive(ScalarType::Sint32), "SVarint");
        assert_eq!(primitive(ScalarType::Sint64), "SVarint");
    }

    #[test]
    fn test_read_methods() {
        assert_eq!(read_method(ScalarType::Uint32, false), "readVarint");
        assert_eq!(read_method(ScalarType::Sint64, true), "readPackedSVarint");
        assert_eq!(read_method(ScalarType::Bool, false), "readBoolean");
        assert_eq!(read_method(ScalarType::Sfixed64, false), "readSFixed64");
        assert_eq!(read_method(ScalarType::Bytes, false), "readBytes");
    }

    #[test]
    fn test_write_methods() {
        assert_eq!(write_method(ScalarType::Uint32, false), "writeVarintField");
        assert_eq!(write_method(ScalarType::Fixed64, false), "writeFixed64Field");
        assert_eq!(write_method(ScalarType::Fixed64, true), "writePackedFixed64");
        assert_eq!(write_method(ScalarType::String, false), "writeStringField");
        assert_eq!(write_method(ScalarType::Double, true), "writePackedDouble");
    }
}
