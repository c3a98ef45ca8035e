//! umlschema - Derive OpenAPI and JSON-LD documents from UML models
//!
//! A library for reading a StarUML project and exporting one of its packages
//! as an OpenAPI 3 document and as an RDFS vocabulary in JSON-LD.
//!
//! # Quick Start
//!
//! ```rust
//! use umlschema::export_openapi;
//!
//! let project = r#"{
//!     "_type": "Project", "_id": "p",
//!     "ownedElements": [{
//!         "_type": "UMLPackage", "_id": "pkg", "name": "Orders",
//!         "ownedElements": [{
//!             "_type": "UMLClass", "_id": "c1", "name": "Order",
//!             "attributes": [{"_type": "UMLAttribute", "_id": "a1", "name": "total", "type": "Double"}]
//!         }]
//!     }]
//! }"#;
//!
//! let document = export_openapi(project, "Orders").unwrap();
//! assert!(document.components.schemas.contains_key("Order"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use umlschema::prelude::*;
//!
//! let mut model = Model::new();
//! let pkg = model.add_element(None, Package::new("pkg", "Orders")).unwrap();
//! model
//!     .add_element(
//!         Some(&pkg),
//!         Class::new("c1", "Order")
//!             .with_attribute(Attribute::new("a1", "code", TypeRef::name("Code"))),
//!     )
//!     .unwrap();
//!
//! // Run the JSON-LD exporter over a fresh context
//! let config = ExportConfig::default();
//! let mut ctx = ExportContext::new(&model, &config, &ExportTarget::package("Orders")).unwrap();
//! let document = JsonLdExporter::new().export(&mut ctx).unwrap();
//!
//! assert_eq!(document.graph.rdfs_properties[0].range, "Code");
//! assert_eq!(ctx.diagnostics.not_linked_types().len(), 1);
//! ```

pub mod core;
pub mod plugins;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Attribute, Class, ElementId, Enumeration, EnumerationLiteral, ExportConfig, ExportContext,
        ExportMode, ExportTarget, Exporter, Interface, Model, Operation, Package, Parameter,
        Repository, TypeRef,
    };
    pub use crate::plugins::jsonld::{JsonLdDocument, JsonLdExporter};
    pub use crate::plugins::openapi::{OpenApiDocument, OpenApiExporter};
    pub use crate::plugins::orchestrator::{ExportReport, Orchestrator};
}

/// Export a package of a StarUML project as an OpenAPI document
///
/// Uses the default configuration and exports every member of the package.
///
/// # Arguments
/// * `project` - Text of a `.mdj` project file
/// * `package` - Name or id of the package to export
///
/// # Returns
/// * `Ok(OpenApiDocument)` - The document; unresolved types fall back to `string`
/// * `Err` - If the project cannot be loaded or the package does not exist
pub fn export_openapi(
    project: &str,
    package: &str,
) -> anyhow::Result<plugins::openapi::OpenApiDocument> {
    use crate::plugins::orchestrator::Orchestrator;

    let model = load_model(project)?;
    let report = Orchestrator::default().export_openapi(&model, &ExportTarget::package(package))?;
    Ok(report.document)
}

/// Export a package of a StarUML project as a JSON-LD vocabulary
///
/// # Example
/// ```rust
/// use umlschema::export_jsonld;
///
/// let project = r#"{"_type": "Project", "ownedElements": [
///     {"_type": "UMLPackage", "_id": "pkg", "name": "Empty"}
/// ]}"#;
/// let document = export_jsonld(project, "Empty").unwrap();
/// assert!(document.graph.rdfs_classes.is_empty());
/// ```
pub fn export_jsonld(
    project: &str,
    package: &str,
) -> anyhow::Result<plugins::jsonld::JsonLdDocument> {
    use crate::plugins::orchestrator::Orchestrator;

    let model = load_model(project)?;
    let report = Orchestrator::default().export_jsonld(&model, &ExportTarget::package(package))?;
    Ok(report.document)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"{
        "_type": "Project",
        "_id": "p",
        "ownedElements": [{
            "_type": "UMLPackage",
            "_id": "pkg",
            "name": "Orders",
            "ownedElements": [{
                "_type": "UMLClass",
                "_id": "c1",
                "name": "Order",
                "attributes": [{"_type": "UMLAttribute", "_id": "a1", "name": "total", "type": "Double"}]
            }]
        }]
    }"#;

    #[test]
    fn test_export_openapi() {
        let document = export_openapi(PROJECT, "Orders").unwrap();
        let total = &document.components.schemas["Order"].properties["total"];
        assert_eq!(total.kind.as_deref(), Some("number"));
        assert_eq!(total.format.as_deref(), Some("double"));
    }

    #[test]
    fn test_export_jsonld() {
        let document = export_jsonld(PROJECT, "pkg").unwrap();
        assert_eq!(document.graph.rdfs_properties[0].id, "Order/total");
    }

    #[test]
    fn test_export_unknown_package() {
        assert!(export_openapi(PROJECT, "Billing").is_err());
    }

    #[test]
    fn test_export_invalid_project() {
        assert!(export_jsonld("[]", "Orders").is_err());
    }
}
