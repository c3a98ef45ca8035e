//! OpenAPI plugin
//!
//! Derives an OpenAPI 3 document from a package: class schemas under
//! `components.schemas` and one path per interface.

mod assembler;
mod document;
mod info;

use anyhow::Result;
use tracing::{info, span, Level};

pub use assembler::{
    attribute_schema, build_description, build_document, build_paths, build_request_body,
    build_schemas, http_method, write_query_parameters, EXCLUDED_PARAMETERS, HTTP_METHODS,
};
pub use document::{
    Components, Info, MediaType, OpenApiDocument, Operation, Parameter, PathItem, RequestBody,
    Response, Schema, Server,
};
pub use info::{build_info, parse_version};

use crate::core::{ExportContext, Exporter};

/// Exporter producing [`OpenApiDocument`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiExporter;

impl OpenApiExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for OpenApiExporter {
    type Output = OpenApiDocument;

    fn export(&self, ctx: &mut ExportContext<'_>) -> Result<OpenApiDocument> {
        let export_span = span!(Level::INFO, "export_openapi", package = %ctx.target_name());
        let _enter = export_span.enter();

        let document = build_document(ctx)?;
        info!(
            schemas = document.components.schemas.len(),
            paths = document.paths.len(),
            "OpenAPI export completed"
        );
        Ok(document)
    }

    fn name(&self) -> &'static str {
        "openapi"
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
