//! Core exporter trait
//!
//! Each output format implements [`Exporter`] over a fresh [`ExportContext`].

use anyhow::Result;
use serde::Serialize;

use super::ExportContext;

/// Trait for turning the export target of a context into a document
///
/// Implementations must not fail on unresolved types: those are recorded in
/// the context's diagnostics and the document is still produced.
pub trait Exporter: Send + Sync {
    /// The serializable document this exporter builds
    type Output: Serialize;

    /// Build the document for the context's export target
    fn export(&self, ctx: &mut ExportContext<'_>) -> Result<Self::Output>;

    /// Get the name of this exporter
    fn name(&self) -> &'static str;

    /// File extension of the written document, without the dot
    fn extension(&self) -> &'static str;
}
