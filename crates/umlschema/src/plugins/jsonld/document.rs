//! JSON-LD vocabulary document types

use serde::Serialize;

use crate::core::VocabularyConfig;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const DC: &str = "http://purl.org/dc/terms/";

/// Root JSON-LD document
#[derive(Debug, Clone, Serialize)]
pub struct JsonLdDocument {
    #[serde(rename = "@context")]
    pub context: Vec<Context>,
    #[serde(rename = "@graph")]
    pub graph: Graph,
}

/// The `@context` header
#[derive(Debug, Clone, Serialize)]
pub struct Context {
    #[serde(rename = "@version")]
    pub version: f64,
    #[serde(rename = "@base")]
    pub base: String,
    #[serde(rename = "@language")]
    pub language: String,
    pub rdf: String,
    pub rdfs: String,
    pub owl: String,
    pub xsd: String,
    pub dc: String,
    pub rdfs_classes: ReverseLink,
    pub rdfs_properties: ReverseLink,
    pub rdfs_datatypes: ReverseLink,
    pub rdfs_instances: ReverseLink,
}

impl Context {
    pub fn new(vocabulary: &VocabularyConfig) -> Self {
        Self {
            version: 1.1,
            base: vocabulary.base.clone(),
            language: vocabulary.language.clone(),
            rdf: RDF.to_string(),
            rdfs: RDFS.to_string(),
            owl: OWL.to_string(),
            xsd: XSD.to_string(),
            dc: DC.to_string(),
            rdfs_classes: ReverseLink::default(),
            rdfs_properties: ReverseLink::default(),
            rdfs_datatypes: ReverseLink::default(),
            rdfs_instances: ReverseLink::default(),
        }
    }
}

/// Term definition linking a graph array back to the ontology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseLink {
    #[serde(rename = "@reverse")]
    pub reverse: String,
    #[serde(rename = "@type")]
    pub kind: String,
}

impl Default for ReverseLink {
    fn default() -> Self {
        Self {
            reverse: "rdfs:isDefinedBy".to_string(),
            kind: "@id".to_string(),
        }
    }
}

/// The `@graph` node: ontology metadata plus the generated arrays
#[derive(Debug, Clone, Serialize)]
pub struct Graph {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "dc:title")]
    pub title: String,
    #[serde(rename = "dc:description")]
    pub description: String,
    #[serde(rename = "dc:date")]
    pub date: TypedLiteral,
    #[serde(rename = "rdfs:seeAlso")]
    pub see_also: Vec<String>,
    pub rdfs_classes: Vec<RdfsClass>,
    pub rdfs_properties: Vec<RdfsProperty>,
    pub rdfs_instances: Vec<RdfsInstance>,
}

impl Graph {
    pub fn new(vocabulary: &VocabularyConfig) -> Self {
        Self {
            id: vocabulary.base.clone(),
            kind: "owl:Ontology".to_string(),
            title: vocabulary.title.clone(),
            description: vocabulary.description.clone(),
            date: TypedLiteral {
                value: vocabulary.date.clone(),
                kind: "xsd:date".to_string(),
            },
            see_also: vocabulary.see_also.clone(),
            rdfs_classes: Vec::new(),
            rdfs_properties: Vec::new(),
            rdfs_instances: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedLiteral {
    #[serde(rename = "@value")]
    pub value: String,
    #[serde(rename = "@type")]
    pub kind: String,
}

/// An `rdfs:Class` entry
///
/// Classes always carry `rdfs:subClassOf`, possibly empty; enumeration
/// entries never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RdfsClass {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "rdfs:subClassOf", skip_serializing_if = "Option::is_none")]
    pub sub_class_of: Option<Vec<String>>,
}

impl RdfsClass {
    pub fn class(name: impl Into<String>, parents: Vec<String>) -> Self {
        Self {
            id: name.into(),
            kind: "rdfs:Class".to_string(),
            sub_class_of: Some(parents),
        }
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self {
            id: name.into(),
            kind: "rdfs:Class".to_string(),
            sub_class_of: None,
        }
    }
}

/// An `rdf:Property` entry, `@id` is `Class/property`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RdfsProperty {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
    #[serde(rename = "rdfs:domain")]
    pub domain: String,
    #[serde(rename = "rdfs:range")]
    pub range: String,
}

impl RdfsProperty {
    pub fn new(domain: &str, property: &str, range: impl Into<String>) -> Self {
        Self {
            id: format!("{}/{}", domain, property),
            kind: "rdf:Property".to_string(),
            domain: domain.to_string(),
            range: range.into(),
        }
    }
}

/// An enumeration literal, `@id` is `Enum/Literal` and `@type` the enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RdfsInstance {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(rename = "@type")]
    pub kind: String,
}

impl RdfsInstance {
    pub fn new(enumeration: &str, literal: &str) -> Self {
        Self {
            id: format!("{}/{}", enumeration, literal),
            kind: enumeration.to_string(),
        }
    }
}
