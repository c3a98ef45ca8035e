//! JSON-LD vocabulary assembly
//!
//! The class pass must run before the instance pass: it registers every
//! enumeration it emits as a class, and the instance pass skips those.

use anyhow::Result;
use tracing::{debug, span, trace, warn, Level};

use super::document::{Context, Graph, JsonLdDocument, RdfsClass, RdfsInstance, RdfsProperty};
use crate::core::{
    select_model_elements, Attribute, Class, ClassGraphBuilder, Element, ExportContext,
    ExportSet, Repository, TypeRef,
};

/// Build the JSON-LD vocabulary for the context's export target
pub fn build_document(ctx: &mut ExportContext<'_>) -> Result<JsonLdDocument> {
    let model = ctx.model;
    let config = ctx.config;
    let vocabulary = &config.vocabulary;

    let selected = select_model_elements(model, &ctx.package.id);
    if selected.is_empty() {
        warn!(package = %ctx.package.name, "Export target owns no classes, interfaces or enumerations");
    }
    let export_set = ClassGraphBuilder::new(model).expand_classes(&selected.classes);

    let mut graph = Graph::new(vocabulary);
    graph.rdfs_classes = build_rdfs_classes(ctx, &export_set)?;
    graph.rdfs_properties = build_rdfs_properties(ctx, &export_set)?;
    graph.rdfs_instances = build_rdfs_instances(ctx)?;

    debug!(
        classes = graph.rdfs_classes.len(),
        properties = graph.rdfs_properties.len(),
        instances = graph.rdfs_instances.len(),
        diagnostics = ctx.diagnostics.len(),
        "Assembled JSON-LD document"
    );

    Ok(JsonLdDocument {
        context: vec![Context::new(vocabulary)],
        graph,
    })
}

/// One entry per exported class, each followed by the enumerations its
/// attributes use that were not emitted yet
pub fn build_rdfs_classes<'a>(
    ctx: &mut ExportContext<'a>,
    classes: &ExportSet<'a>,
) -> Result<Vec<RdfsClass>> {
    let class_span = span!(Level::DEBUG, "build_rdfs_classes", classes = classes.len());
    let _enter = class_span.enter();

    let graph = ClassGraphBuilder::new(ctx.model);
    let mut entries = Vec::new();

    for class in classes.iter() {
        let parents = graph.resolve_parents(class)?;
        trace!(class = %class.name, parents = ?parents, "RDFS class");
        entries.push(RdfsClass::class(class.name.as_str(), parents));

        for enumeration in graph.enumerations_of(class) {
            if ctx.register_generated_enum(&enumeration.id) {
                trace!(enumeration = %enumeration.name, "Enumeration emitted as class");
                entries.push(RdfsClass::enumeration(enumeration.name.as_str()));
            }
        }
    }

    Ok(entries)
}

/// One property per attribute, plus one per named association owned by the class
pub fn build_rdfs_properties<'a>(
    ctx: &mut ExportContext<'a>,
    classes: &ExportSet<'a>,
) -> Result<Vec<RdfsProperty>> {
    let property_span = span!(Level::DEBUG, "build_rdfs_properties", classes = classes.len());
    let _enter = property_span.enter();

    let graph = ClassGraphBuilder::new(ctx.model);
    let mut entries = Vec::new();

    for class in classes.iter() {
        for attr in &class.attributes {
            let range = attribute_range(ctx, class, attr);
            entries.push(RdfsProperty::new(&class.name, &attr.name, range));
        }

        for assoc in graph.associations_of(class)? {
            if assoc.name.is_empty() {
                trace!(class = %class.name, association = %assoc.id, "Unnamed association skipped");
                continue;
            }
            match graph.association_target(assoc) {
                Some(target) => entries.push(RdfsProperty::new(&class.name, &assoc.name, target)),
                None => warn!(
                    class = %class.name,
                    association = %assoc.name,
                    target = %assoc.end2,
                    "Association target not found"
                ),
            }
        }
    }

    Ok(entries)
}

/// `rdfs:range` of an attribute
///
/// A reference to another element yields that element's name without any
/// lookup. A type name goes through the range rules and fallbacks, and is
/// recorded as a diagnostic unless a rule matched.
pub fn attribute_range(ctx: &mut ExportContext<'_>, class: &Class, attr: &Attribute) -> String {
    match &attr.type_ref {
        TypeRef::Element(id) => match ctx.model.get(id) {
            Some(element) => element.name().to_string(),
            None => {
                warn!(class = %class.name, attribute = %attr.name, reference = %id, "Attribute type not in model");
                ctx.diagnostics
                    .record_invalid_type(&class.name, &attr.id, &attr.name, id.as_str());
                id.to_string()
            }
        },
        TypeRef::Name(name) => {
            let mapped = ctx.type_mapper().range(name);
            if let Some(kind) = mapped.unresolved {
                trace!(class = %class.name, attribute = %attr.name, type_name = %name, %kind, "Range from fallback");
                ctx.diagnostics
                    .record(kind, &class.name, &attr.id, &attr.name, name);
            }
            mapped.value
        }
    }
}

/// Literals of every enumeration in the export target not already emitted
/// as a class
pub fn build_rdfs_instances(ctx: &ExportContext<'_>) -> Result<Vec<RdfsInstance>> {
    let mut entries = Vec::new();
    for element in ctx.model.descendants(&ctx.package.id) {
        let Element::Enumeration(enumeration) = element else {
            continue;
        };
        if ctx.is_generated_enum(&enumeration.id) {
            trace!(enumeration = %enumeration.name, "Already emitted as class");
            continue;
        }
        entries.extend(
            enumeration
                .literals
                .iter()
                .map(|literal| RdfsInstance::new(&enumeration.name, &literal.name)),
        );
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Association, Enumeration, EnumerationLiteral, ExportConfig, ExportTarget, Generalization,
        Model, Package,
    };

    fn model() -> Model {
        let mut model = Model::new();
        let root = model.add_element(None, Package::new("m", "Model")).unwrap();
        let pkg = model
            .add_element(Some(&root), Package::new("p1", "Orders"))
            .unwrap();
        model
            .add_element(
                Some(&pkg),
                Class::new("c1", "Order")
                    .with_attribute(Attribute::new("a1", "status", TypeRef::element("e1")))
                    .with_attribute(Attribute::new("a2", "total", TypeRef::name("Double")))
                    .with_attribute(Attribute::new("a3", "owner", TypeRef::element("c2")))
                    .with_attribute(Attribute::new("a4", "ref", TypeRef::name("Identifier")))
                    .with_attribute(Attribute::new("a5", "again", TypeRef::element("e1"))),
            )
            .unwrap();
        model
            .add_element(
                Some(&pkg),
                Enumeration::new("e1", "Status")
                    .with_literal(EnumerationLiteral::new("l1", "Open"))
                    .with_literal(EnumerationLiteral::new("l2", "Closed")),
            )
            .unwrap();
        model
            .add_element(
                Some(&pkg),
                Enumeration::new("e2", "Priority")
                    .with_literal(EnumerationLiteral::new("l3", "High"))
                    .with_literal(EnumerationLiteral::new("l4", "Low")),
            )
            .unwrap();
        model
            .add_element(Some(&root), Class::new("c2", "Customer"))
            .unwrap();
        model.add_element(Some(&root), Class::new("c9", "Entity")).unwrap();
        model
            .add_element(Some(&pkg), Generalization::new("g1", "c1", "c9"))
            .unwrap();
        model
            .add_element(Some(&pkg), Association::new("as1", "placedBy", "c1", "c2"))
            .unwrap();
        model
            .add_element(Some(&pkg), Association::new("as2", "", "c1", "c2"))
            .unwrap();
        model
    }

    fn export(model: &Model, config: &ExportConfig) -> (JsonLdDocument, usize, usize) {
        let mut ctx = ExportContext::new(model, config, &ExportTarget::package("Orders")).unwrap();
        let doc = build_document(&mut ctx).unwrap();
        let not_linked = ctx.diagnostics.not_linked_types().len();
        let invalid = ctx.diagnostics.invalid_types().len();
        (doc, not_linked, invalid)
    }

    #[test]
    fn test_classes_with_enumerations_once() {
        let model = model();
        let (doc, _, _) = export(&model, &ExportConfig::default());
        let ids: Vec<&str> = doc.graph.rdfs_classes.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["Order", "Status", "Customer"]);
        assert_eq!(doc.graph.rdfs_classes[0].sub_class_of, Some(vec!["Entity".to_string()]));
        assert_eq!(doc.graph.rdfs_classes[1].sub_class_of, None);
    }

    #[test]
    fn test_properties() {
        let model = model();
        let (doc, _, _) = export(&model, &ExportConfig::default());
        let props: Vec<(&str, &str)> = doc
            .graph
            .rdfs_properties
            .iter()
            .map(|p| (p.id.as_str(), p.range.as_str()))
            .collect();
        assert_eq!(
            props,
            vec![
                ("Order/status", "Status"),
                ("Order/total", "Double"),
                ("Order/owner", "Customer"),
                ("Order/ref", "Identifier"),
                ("Order/again", "Status"),
                ("Order/placedBy", "Customer"),
            ]
        );
        assert!(doc.graph.rdfs_properties.iter().all(|p| p.domain == "Order"));
    }

    #[test]
    fn test_instances_skip_generated_enumerations() {
        let model = model();
        let (doc, _, _) = export(&model, &ExportConfig::default());
        let ids: Vec<&str> = doc.graph.rdfs_instances.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["Priority/High", "Priority/Low"]);
        assert!(doc.graph.rdfs_instances.iter().all(|i| i.kind == "Priority"));
    }

    #[test]
    fn test_range_diagnostics() {
        let model = model();
        let (_, not_linked, invalid) = export(&model, &ExportConfig::default());
        // Identifier is a core type, Double is not
        assert_eq!(not_linked, 1);
        assert_eq!(invalid, 1);
    }

    #[test]
    fn test_range_rules_override_fallbacks() {
        let model = model();
        let mut config = ExportConfig::default();
        config.range_rules.insert("Double".to_string(), "xsd:double".to_string());

        let (doc, not_linked, invalid) = export(&model, &config);
        let total = doc
            .graph
            .rdfs_properties
            .iter()
            .find(|p| p.id == "Order/total")
            .unwrap();
        assert_eq!(total.range, "xsd:double");
        assert_eq!(not_linked, 1);
        assert_eq!(invalid, 0);
    }

    #[test]
    fn test_instances_from_resolved_package_only() {
        let mut model = Model::new();
        let root = model.add_element(None, Package::new("m", "Model")).unwrap();
        let first = model
            .add_element(Some(&root), Package::new("pa", "Orders"))
            .unwrap();
        let second = model
            .add_element(Some(&root), Package::new("pb", "Orders"))
            .unwrap();
        model
            .add_element(
                Some(&first),
                Enumeration::new("e1", "Color").with_literal(EnumerationLiteral::new("l1", "Red")),
            )
            .unwrap();
        model
            .add_element(
                Some(&second),
                Enumeration::new("e2", "Size").with_literal(EnumerationLiteral::new("l2", "Big")),
            )
            .unwrap();

        let config = ExportConfig::default();
        let mut ctx = ExportContext::new(&model, &config, &ExportTarget::package("pb")).unwrap();
        let doc = build_document(&mut ctx).unwrap();
        let ids: Vec<&str> = doc.graph.rdfs_instances.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["Size/Big"]);
    }

    #[test]
    fn test_context_and_graph_present() {
        let model = model();
        let (doc, _, _) = export(&model, &ExportConfig::default());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["@context"].as_array().unwrap().len(), 1);
        assert_eq!(value["@graph"]["@type"], "owl:Ontology");
    }
}
