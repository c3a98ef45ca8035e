//! Exporter implementations for each output format
//!
//! Each plugin implements [`Exporter`](crate::core::Exporter) for its document
//! type; the orchestrator runs them over a model.

pub mod jsonld;
pub mod openapi;
pub mod orchestrator;

pub use jsonld::JsonLdExporter;
pub use openapi::OpenApiExporter;
pub use orchestrator::*;
