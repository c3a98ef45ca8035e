//! StarUML project loader
//!
//! Reads the `.mdj` project format: a tree of JSON objects discriminated by
//! `_type`, identified by `_id`, with cross references written as
//! `{"$ref": "<id>"}`. Elements are registered in document order, so an owner
//! always exists before the elements it owns.

use std::path::Path;

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::{debug, info, span, trace, Level};

use super::{
    Association, Attribute, Class, Diagram, Element, ElementId, Enumeration, EnumerationLiteral,
    ExportError, Generalization, Interface, InterfaceRealization, Model, Operation, Package,
    Parameter, TypeRef, View,
};

type Node = Map<String, Value>;

/// Load a model from the text of a `.mdj` project file
pub fn load_model(json: &str) -> Result<Model> {
    let load_span = span!(Level::INFO, "load_model", input_len = json.len());
    let _enter = load_span.enter();

    let root: Value = serde_json::from_str(json)
        .map_err(|e| ExportError::model_load(format!("invalid JSON: {}", e)))?;
    let root = root
        .as_object()
        .ok_or_else(|| ExportError::model_load("project root is not an object"))?;

    let mut loader = Loader::default();
    loader.walk(root, None)?;

    info!(
        elements = loader.model.element_count(),
        views = loader.model.view_count(),
        "Loaded model"
    );
    Ok(loader.model)
}

/// Load a model from a `.mdj` file on disk
pub fn load_model_file(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        ExportError::model_load(format!("failed to read '{}': {}", path.display(), e))
    })?;
    load_model(&content)
}

#[derive(Default)]
struct Loader {
    model: Model,
}

impl Loader {
    fn walk(&mut self, node: &Node, owner: Option<&ElementId>) -> Result<()> {
        let type_name = str_field(node, "_type").unwrap_or_default();

        let added = match type_name {
            "Project" => None,
            "UMLModel" | "UMLPackage" => Some(self.add(owner, package(node)?)?),
            "UMLClass" => Some(self.add(owner, class(node)?)?),
            "UMLInterface" => Some(self.add(owner, interface(node)?)?),
            "UMLEnumeration" => Some(self.add(owner, enumeration(node)?)?),
            "UMLAssociation" => Some(self.add(owner, association(node)?)?),
            "UMLGeneralization" => Some(self.add(owner, generalization(node)?)?),
            "UMLInterfaceRealization" => Some(self.add(owner, realization(node)?)?),
            t if t.ends_with("Diagram") => {
                let id = self.add(owner, diagram(node)?)?;
                let before = self.model.view_count();
                for view in children(node, "ownedViews") {
                    self.collect_views(&id, view, true);
                }
                debug!(diagram = %id, views = self.model.view_count() - before, "Collected views");
                Some(id)
            }
            other => {
                trace!(type_name = other, "Skipping unsupported element");
                None
            }
        };

        let next_owner = added.as_ref().or(owner);
        for child in children(node, "ownedElements") {
            self.walk(child, next_owner)?;
        }
        Ok(())
    }

    fn add(&mut self, owner: Option<&ElementId>, element: impl Into<Element>) -> Result<ElementId> {
        self.model.add_element(owner, element)
    }

    /// Record every view under `node` that points at a model element
    ///
    /// A view nested in a hidden container is hidden as well.
    fn collect_views(&mut self, diagram: &ElementId, node: &Node, parent_visible: bool) {
        let visible = parent_visible && node.get("visible").and_then(Value::as_bool).unwrap_or(true);

        if let Some(model) = reference(node, "model") {
            trace!(model = %model, visible, "View");
            self.model.add_view(View::new(diagram.clone(), model, visible));
        }

        for (key, value) in node {
            if matches!(key.as_str(), "model" | "_parent") {
                continue;
            }
            match value {
                Value::Object(child) if child.contains_key("_type") => {
                    self.collect_views(diagram, child, visible);
                }
                Value::Array(items) => {
                    for child in items.iter().filter_map(Value::as_object) {
                        if child.contains_key("_type") {
                            self.collect_views(diagram, child, visible);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

fn str_field<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
    node.get(key).and_then(Value::as_str)
}

fn name(node: &Node) -> String {
    str_field(node, "name").unwrap_or_default().to_string()
}

/// Documentation text; an empty string counts as absent
fn documentation(node: &Node) -> Option<String> {
    str_field(node, "documentation")
        .filter(|doc| !doc.is_empty())
        .map(str::to_string)
}

fn children<'a>(node: &'a Node, key: &str) -> impl Iterator<Item = &'a Node> {
    node.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn reference(node: &Node, key: &str) -> Option<ElementId> {
    node.get(key)?
        .get("$ref")?
        .as_str()
        .map(ElementId::from)
}

fn require_id(node: &Node) -> Result<ElementId, ExportError> {
    str_field(node, "_id").map(ElementId::from).ok_or_else(|| {
        let type_name = str_field(node, "_type").unwrap_or("element");
        ExportError::model_load(format!("{} without _id", type_name))
    })
}

fn require_ref(node: &Node, key: &str, id: &ElementId) -> Result<ElementId, ExportError> {
    reference(node, key)
        .ok_or_else(|| ExportError::model_load(format!("element '{}' has no {} reference", id, key)))
}

fn type_ref(node: &Node) -> TypeRef {
    match node.get("type") {
        Some(Value::String(name)) => TypeRef::name(name.as_str()),
        Some(Value::Object(_)) => match reference(node, "type") {
            Some(id) => TypeRef::Element(id),
            None => TypeRef::default(),
        },
        _ => TypeRef::default(),
    }
}

fn package(node: &Node) -> Result<Package> {
    Ok(Package {
        id: require_id(node)?,
        name: name(node),
        documentation: documentation(node),
    })
}

fn attributes(node: &Node) -> Result<Vec<Attribute>> {
    children(node, "attributes")
        .map(|attr| {
            Ok(Attribute {
                id: require_id(attr)?,
                name: name(attr),
                type_ref: type_ref(attr),
                documentation: documentation(attr),
                multiplicity: str_field(attr, "multiplicity")
                    .filter(|m| !m.is_empty())
                    .map(str::to_string),
            })
        })
        .collect()
}

fn operations(node: &Node) -> Result<Vec<Operation>> {
    children(node, "operations")
        .map(|op| {
            let parameters = children(op, "parameters")
                .map(|param| {
                    Ok(Parameter {
                        id: require_id(param)?,
                        name: name(param),
                        type_ref: type_ref(param),
                        documentation: documentation(param),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(Operation {
                id: require_id(op)?,
                name: name(op),
                documentation: documentation(op),
                parameters,
            })
        })
        .collect()
}

fn class(node: &Node) -> Result<Class> {
    Ok(Class {
        id: require_id(node)?,
        name: name(node),
        documentation: documentation(node),
        attributes: attributes(node)?,
        operations: operations(node)?,
    })
}

fn interface(node: &Node) -> Result<Interface> {
    Ok(Interface {
        id: require_id(node)?,
        name: name(node),
        documentation: documentation(node),
        attributes: attributes(node)?,
        operations: operations(node)?,
    })
}

fn enumeration(node: &Node) -> Result<Enumeration> {
    let literals = children(node, "literals")
        .map(|literal| Ok(EnumerationLiteral::new(require_id(literal)?, name(literal))))
        .collect::<Result<Vec<_>>>()?;

    Ok(Enumeration {
        id: require_id(node)?,
        name: name(node),
        documentation: documentation(node),
        literals,
    })
}

fn association(node: &Node) -> Result<Association> {
    let id = require_id(node)?;
    let end = |key: &str| -> Result<ElementId, ExportError> {
        let end = node
            .get(key)
            .and_then(Value::as_object)
            .ok_or_else(|| ExportError::model_load(format!("association '{}' has no {}", id, key)))?;
        require_ref(end, "reference", &id)
    };
    let end1 = end("end1")?;
    let end2 = end("end2")?;

    Ok(Association::new(id, name(node), end1, end2))
}

fn generalization(node: &Node) -> Result<Generalization> {
    let id = require_id(node)?;
    let source = require_ref(node, "source", &id)?;
    let target = require_ref(node, "target", &id)?;
    Ok(Generalization::new(id, source, target))
}

fn realization(node: &Node) -> Result<InterfaceRealization> {
    let id = require_id(node)?;
    let source = require_ref(node, "source", &id)?;
    let target = require_ref(node, "target", &id)?;
    Ok(InterfaceRealization::new(id, source, target))
}

fn diagram(node: &Node) -> Result<Diagram> {
    Ok(Diagram::new(require_id(node)?, name(node)))
}
