//! Primitive type mapping
//!
//! Two independent tables: UML primitive names to OpenAPI `{type, format}`
//! pairs, and type names to RDFS ranges. The tables deliberately disagree on
//! which names are known (`Identifier` has no OpenAPI entry but a bare RDFS
//! range), and that disagreement decides which diagnostic bucket an
//! unresolved name lands in for each format.

use std::fmt;

use super::{DiagnosticKind, ExportConfig};

/// An OpenAPI primitive: `type` plus optional `format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpenApiType {
    pub kind: &'static str,
    pub format: Option<&'static str>,
}

impl OpenApiType {
    pub const STRING: OpenApiType = OpenApiType::new("string");

    pub const fn new(kind: &'static str) -> Self {
        Self { kind, format: None }
    }

    pub const fn with_format(kind: &'static str, format: &'static str) -> Self {
        Self {
            kind,
            format: Some(format),
        }
    }
}

impl fmt::Display for OpenApiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Some(format) => write!(f, "{}/{}", self.kind, format),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// UML primitive name to OpenAPI type, in table order
pub const OPENAPI_TYPES: &[(&str, OpenApiType)] = &[
    ("Numeric", OpenApiType::new("number")),
    ("Indicator", OpenApiType::new("boolean")),
    ("Date", OpenApiType::with_format("string", "date")),
    ("DateTime", OpenApiType::with_format("string", "date-time")),
    ("Integer", OpenApiType::new("integer")),
    ("Int32", OpenApiType::with_format("integer", "int32")),
    ("Int64", OpenApiType::with_format("integer", "int64")),
    ("Number", OpenApiType::new("number")),
    ("Float", OpenApiType::with_format("number", "float")),
    ("Double", OpenApiType::with_format("number", "double")),
    ("Password", OpenApiType::with_format("string", "password")),
    ("Byte", OpenApiType::with_format("string", "byte")),
    ("Boolean", OpenApiType::new("boolean")),
    ("Binary", OpenApiType::with_format("string", "binary")),
];

/// Built-in RDFS range fallbacks for names without a configured rule
pub const RANGE_FALLBACKS: &[(&str, &str)] = &[
    ("Numeric", "xsd:string"),
    ("Identifier", "Identifier"),
    ("Code", "Code"),
    ("Text", "xsd:string"),
    ("Binary", "xsd:string"),
    ("Measure", "Measure"),
    ("Amount", "Amount"),
];

/// Look up a primitive in the OpenAPI table
pub fn openapi_primitive(name: &str) -> Option<OpenApiType> {
    OPENAPI_TYPES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, ty)| *ty)
}

/// Map a primitive name to its OpenAPI type; unknown names become `string`
pub fn map_to_openapi(name: &str) -> OpenApiType {
    openapi_primitive(name).unwrap_or(OpenApiType::STRING)
}

/// Map a type name to an RDFS range using the built-in fallbacks only
///
/// Names outside the fallback table are echoed back unchanged.
pub fn map_to_range(name: &str) -> String {
    RANGE_FALLBACKS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, range)| range.to_string())
        .unwrap_or_else(|| name.to_string())
}

/// A mapped value plus the diagnostic bucket it belongs in, if unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapped<T> {
    pub value: T,
    pub unresolved: Option<DiagnosticKind>,
}

impl<T> Mapped<T> {
    fn resolved(value: T) -> Self {
        Self {
            value,
            unresolved: None,
        }
    }
}

/// Configuration-aware type mapper
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    config: &'a ExportConfig,
}

impl<'a> TypeMapper<'a> {
    pub fn new(config: &'a ExportConfig) -> Self {
        Self { config }
    }

    /// Classify a name that neither table resolved
    pub fn classify(&self, name: &str) -> DiagnosticKind {
        if self.config.is_core_type(name) {
            DiagnosticKind::NotLinked
        } else {
            DiagnosticKind::Invalid
        }
    }

    /// OpenAPI type for a primitive name
    pub fn openapi(&self, name: &str) -> Mapped<OpenApiType> {
        match openapi_primitive(name) {
            Some(ty) => Mapped::resolved(ty),
            None => Mapped {
                value: OpenApiType::STRING,
                unresolved: Some(self.classify(name)),
            },
        }
    }

    /// RDFS range for a type name
    pub fn range(&self, name: &str) -> Mapped<String> {
        match self.config.range_rules.get(name) {
            Some(range) => Mapped::resolved(range.clone()),
            None => Mapped {
                value: map_to_range(name),
                unresolved: Some(self.classify(name)),
            },
        }
    }
}
