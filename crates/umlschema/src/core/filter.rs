//! Model element selection and member visibility

use tracing::trace;

use super::{Class, ElementId, Element, Enumeration, ExportMode, Interface, Model, Repository};

/// Classes, interfaces and enumerations directly owned by a package
#[derive(Debug, Default)]
pub struct ModelElements<'a> {
    pub classes: Vec<&'a Class>,
    pub interfaces: Vec<&'a Interface>,
    pub enumerations: Vec<&'a Enumeration>,
}

impl ModelElements<'_> {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.interfaces.is_empty() && self.enumerations.is_empty()
    }
}

/// Partition a package's owned elements by kind in one pass
pub fn select_model_elements<'a>(model: &'a Model, package: &ElementId) -> ModelElements<'a> {
    let mut selected = ModelElements::default();

    for element in model.owned_elements(package) {
        match element {
            Element::Class(class) => selected.classes.push(class),
            Element::Interface(interface) => selected.interfaces.push(interface),
            Element::Enumeration(enumeration) => selected.enumerations.push(enumeration),
            _ => {}
        }
    }

    trace!(
        classes = selected.classes.len(),
        interfaces = selected.interfaces.len(),
        enumerations = selected.enumerations.len(),
        "Selected model elements"
    );
    selected
}

/// Whether a package owns no class, interface or enumeration
pub fn is_empty(model: &Model, package: &ElementId) -> bool {
    select_model_elements(model, package).is_empty()
}

/// Whether an attribute, operation or literal takes part in the export
///
/// Whole-package exports include every member. Diagram exports include a
/// member only if the diagram holds a view of it and that view is visible.
pub fn is_member_visible<R: Repository + ?Sized>(
    repository: &R,
    member: &ElementId,
    mode: &ExportMode,
) -> bool {
    match mode {
        ExportMode::Package => true,
        ExportMode::Diagram(diagram) => repository
            .views_of(member, diagram)
            .first()
            .is_some_and(|view| view.visible),
    }
}

/// Names of the literals of `enumeration` visible under `mode`
pub fn visible_literals<'a, R: Repository + ?Sized>(
    repository: &R,
    enumeration: &'a Enumeration,
    mode: &ExportMode,
) -> Vec<&'a str> {
    enumeration
        .literals
        .iter()
        .filter(|literal| is_member_visible(repository, &literal.id, mode))
        .map(|literal| literal.name.as_str())
        .collect()
}
