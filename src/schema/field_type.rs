//! Field type definitions
//!
//! Defines the semantic value domain of a field, which governs how values
//! are compared, coerced and rendered.

use serde::{Deserialize, Serialize};

/// Field data type
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 64-bit unsigned integer
    UnsignedLong,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Exact match keyword field
    #[default]
    Keyword,
    /// Full-text field, analyzed before indexing
    Text,
    /// Date/time field, rendered as epoch milliseconds
    Date,
    /// IPv4/IPv6 address or CIDR block
    Ip,
    /// Dotted semantic version
    Version,
    /// Boolean value
    Boolean,
}

/// Comparison family of a field type
///
/// Two values are only comparable when their field types share a family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeFamily {
    Numeric,
    String,
    Date,
    Ip,
    Version,
    Boolean,
}

impl FieldType {
    /// Get the comparison family
    pub fn family(&self) -> TypeFamily {
        match self {
            FieldType::Integer
            | FieldType::Long
            | FieldType::UnsignedLong
            | FieldType::Float
            | FieldType::Double => TypeFamily::Numeric,
            FieldType::Keyword | FieldType::Text => TypeFamily::String,
            FieldType::Date => TypeFamily::Date,
            FieldType::Ip => TypeFamily::Ip,
            FieldType::Version => TypeFamily::Version,
            FieldType::Boolean => TypeFamily::Boolean,
        }
    }

    /// Check if two field types can be compared with each other
    pub fn is_compatible(&self, other: &FieldType) -> bool {
        self.family() == other.family()
    }

    /// Check if this field type is analyzed (tokenized) before indexing
    pub fn is_analyzed(&self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Check if this field type supports range queries
    pub fn supports_range(&self) -> bool {
        !matches!(self, FieldType::Text | FieldType::Boolean)
    }

    /// Check if this field type holds floating point values
    pub fn is_floating(&self) -> bool {
        matches!(self, FieldType::Float | FieldType::Double)
    }

    /// Get the type name as used in mappings
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::UnsignedLong => "unsigned_long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Date => "date",
            FieldType::Ip => "ip",
            FieldType::Version => "version",
            FieldType::Boolean => "boolean",
        }
    }
}
