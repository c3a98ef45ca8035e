//! Export configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the stock behaviour. A configuration file only needs the keys it
//! overrides:
//!
//! ```json
//! {
//!   "reference_prefix": "#/components/schemas/",
//!   "core_types": ["Identifier", "Code", "Text"],
//!   "range_rules": { "Double": "xsd:double" },
//!   "vocabulary": { "title": "Orders vocabulary" }
//! }
//! ```

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use super::ExportError;

/// Top-level export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Value of the `openapi` key
    pub openapi_version: String,

    /// Prefix prepended to class names in `$ref` values
    pub reference_prefix: String,

    /// Inserted between the documentation line and the boilerplate message
    pub description_separator: String,

    /// Boilerplate appended to `info.description`
    pub description_message: String,

    /// Server URLs emitted under `servers`
    pub servers: Vec<String>,

    /// Semantic string subtypes reported as "not linked" rather than invalid
    pub core_types: Vec<String>,

    /// Type name to `rdfs:range` overrides, consulted before the fallbacks
    pub range_rules: IndexMap<String, String>,

    /// File name of the error log written next to the exported documents
    pub error_file_name: String,

    pub vocabulary: VocabularyConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.0.0".to_string(),
            reference_prefix: "#/components/schemas/".to_string(),
            description_separator: "<br><br>".to_string(),
            description_message: "This API specification was generated from a UML model."
                .to_string(),
            servers: Vec::new(),
            core_types: [
                "Amount",
                "Binary",
                "Code",
                "Date",
                "DateTime",
                "Identifier",
                "Indicator",
                "Measure",
                "Numeric",
                "Quantity",
                "Text",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            range_rules: IndexMap::new(),
            error_file_name: "error.txt".to_string(),
            vocabulary: VocabularyConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        serde_json::from_str(json).map_err(|e| ExportError::config(e.to_string()))
    }

    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExportError::config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn is_core_type(&self, name: &str) -> bool {
        self.core_types.iter().any(|t| t == name)
    }
}

/// Ontology metadata for the JSON-LD vocabulary
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// `@base` of the context and `@id` of the ontology node
    pub base: String,
    pub language: String,
    pub title: String,
    pub description: String,
    /// Literal `dc:date` value (`xsd:date`)
    pub date: String,
    pub see_also: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            base: "https://edi3.org/2019/11/vocab#".to_string(),
            language: "en".to_string(),
            title: "EDI3 ontology".to_string(),
            description:
                "This document describes the RDFS vocabulary used for EDI3 UN/CEFACT Standards."
                    .to_string(),
            date: "2019-11-29".to_string(),
            see_also: vec!["https://edi3.org/".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.reference_prefix, "#/components/schemas/");
        assert_eq!(config.error_file_name, "error.txt");
        assert!(config.is_core_type("Identifier"));
        assert!(!config.is_core_type("Double"));
        assert!(config.range_rules.is_empty());
        assert_eq!(config.vocabulary.date, "2019-11-29");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ExportConfig::from_json(
            r##"{"reference_prefix": "#/defs/", "vocabulary": {"title": "Orders"}}"##,
        )
        .unwrap();
        assert_eq!(config.reference_prefix, "#/defs/");
        assert_eq!(config.openapi_version, "3.0.0");
        assert_eq!(config.vocabulary.title, "Orders");
        assert_eq!(config.vocabulary.language, "en");
    }

    #[test]
    fn test_range_rules_preserve_order() {
        let config =
            ExportConfig::from_json(r#"{"range_rules": {"Double": "xsd:double", "Date": "xsd:date"}}"#)
                .unwrap();
        let keys: Vec<_> = config.range_rules.keys().cloned().collect();
        assert_eq!(keys, vec!["Double", "Date"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = ExportConfig::from_json("{ not json").unwrap_err();
        assert!(err.to_string().contains("Config error"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"servers": ["https://api.example.com"]}}"#).unwrap();
        let config = ExportConfig::from_file(file.path()).unwrap();
        assert_eq!(config.servers, vec!["https://api.example.com".to_string()]);
    }

    #[test]
    fn test_missing_file() {
        assert!(ExportConfig::from_file("/definitely/not/here.json").is_err());
    }
}
