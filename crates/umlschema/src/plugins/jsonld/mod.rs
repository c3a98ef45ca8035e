//! JSON-LD plugin
//!
//! Derives an RDFS vocabulary from a package: classes, properties and
//! enumeration instances under a fixed ontology header.

mod assembler;
mod document;

use anyhow::Result;
use tracing::{info, span, Level};

pub use assembler::{
    attribute_range, build_document, build_rdfs_classes, build_rdfs_instances,
    build_rdfs_properties,
};
pub use document::{
    Context, Graph, JsonLdDocument, RdfsClass, RdfsInstance, RdfsProperty, ReverseLink,
    TypedLiteral, DC, OWL, RDF, RDFS, XSD,
};

use crate::core::{ExportContext, Exporter};

/// Exporter producing [`JsonLdDocument`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdExporter;

impl JsonLdExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for JsonLdExporter {
    type Output = JsonLdDocument;

    fn export(&self, ctx: &mut ExportContext<'_>) -> Result<JsonLdDocument> {
        let export_span = span!(Level::INFO, "export_jsonld", package = %ctx.target_name());
        let _enter = export_span.enter();

        let document = build_document(ctx)?;
        info!(
            classes = document.graph.rdfs_classes.len(),
            properties = document.graph.rdfs_properties.len(),
            instances = document.graph.rdfs_instances.len(),
            "JSON-LD export completed"
        );
        Ok(document)
    }

    fn name(&self) -> &'static str {
        "jsonld"
    }

    fn extension(&self) -> &'static str {
        "jsonld"
    }
}
