//! Model repository
//!
//! [`Model`] owns every element of a UML project together with its ownership
//! tree and diagram views. Exporters only read it through the [`Repository`]
//! trait, which mirrors the query surface a modeling tool exposes to plugins.

use std::collections::HashMap;

use anyhow::Result;
use indexmap::IndexMap;
use tracing::trace;

use super::{Class, Element, ElementId, Enumeration, ExportError, Package, Query, View};

/// Read-only query surface over a UML model
///
/// Implemented by [`Model`]; exporters are written against this trait so the
/// storage behind it can differ (an in-memory project file, a live tool).
pub trait Repository: Send + Sync {
    /// Look up an element by id
    fn get(&self, id: &ElementId) -> Option<&Element>;

    /// Select elements with a query such as `Orders::@UMLClass`
    fn select(&self, query: &str) -> Result<Vec<&Element>>;

    /// Views of a member or element on one diagram
    fn views_of(&self, id: &ElementId, diagram: &ElementId) -> Vec<&View>;

    /// The element that owns `id`; members resolve to their class
    fn owner_of(&self, id: &ElementId) -> Option<&Element>;
}

/// In-memory UML model
#[derive(Debug, Clone, Default)]
pub struct Model {
    elements: IndexMap<ElementId, Element>,
    owners: HashMap<ElementId, ElementId>,
    owned: IndexMap<ElementId, Vec<ElementId>>,
    members: HashMap<ElementId, ElementId>,
    views: Vec<View>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element, optionally owned by an existing element
    pub fn add_element(
        &mut self,
        owner: Option<&ElementId>,
        element: impl Into<Element>,
    ) -> Result<ElementId> {
        let element = element.into();
        let id = element.id().clone();

        if self.elements.contains_key(&id) || self.members.contains_key(&id) {
            return Err(ExportError::model_load(format!("duplicate element id '{}'", id)).into());
        }
        if let Some(owner) = owner {
            if !self.elements.contains_key(owner) {
                return Err(ExportError::unknown_element(owner.as_str()).into());
            }
            self.owners.insert(id.clone(), owner.clone());
            self.owned.entry(owner.clone()).or_default().push(id.clone());
        }

        for member in element.member_ids() {
            self.members.insert(member, id.clone());
        }

        trace!(id = %id, kind = %element.kind(), "Added element");
        self.elements.insert(id.clone(), element);
        Ok(id)
    }

    /// Record a view of an element or member on a diagram
    pub fn add_view(&mut self, view: View) {
        self.views.push(view);
    }

    pub fn get_class(&self, id: &ElementId) -> Option<&Class> {
        self.elements.get(id).and_then(Element::as_class)
    }

    pub fn get_enumeration(&self, id: &ElementId) -> Option<&Enumeration> {
        self.elements.get(id).and_then(Element::as_enumeration)
    }

    /// Elements directly owned by `id`, in insertion order
    pub fn owned_elements(&self, id: &ElementId) -> impl Iterator<Item = &Element> {
        self.owned
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|child| self.elements.get(child))
    }

    /// Every element transitively owned by `id`, depth first
    pub fn descendants(&self, id: &ElementId) -> Vec<&Element> {
        let mut result = Vec::new();
        let mut stack: Vec<&ElementId> = self.owned.get(id).into_iter().flatten().rev().collect();

        while let Some(current) = stack.pop() {
            if let Some(element) = self.elements.get(current) {
                result.push(element);
            }
            if let Some(children) = self.owned.get(current) {
                stack.extend(children.iter().rev());
            }
        }
        result
    }

    /// Find a package by id, falling back to the first package with that name
    pub fn find_package(&self, name_or_id: &str) -> Option<&Package> {
        let by_id = self.elements.get(&ElementId::from(name_or_id));
        if let Some(Element::Package(package)) = by_id {
            return Some(package);
        }
        self.packages().find(|p| p.name == name_or_id)
    }

    /// Find a diagram by id, falling back to name
    pub fn find_diagram(&self, name_or_id: &str) -> Option<&ElementId> {
        let id = ElementId::from(name_or_id);
        if let Some((key, Element::Diagram(_))) = self.elements.get_key_value(&id) {
            return Some(key);
        }
        self.elements
            .iter()
            .find(|(_, e)| matches!(e, Element::Diagram(d) if d.name == name_or_id))
            .map(|(key, _)| key)
    }

    /// Resolve a package path such as `["Model", "Orders"]`
    pub fn find_package_path(&self, path: &[String]) -> Option<&Package> {
        let (first, rest) = path.split_first()?;

        self.packages()
            .filter(|p| &p.name == first)
            .find_map(|start| {
                rest.iter().try_fold(start, |current, segment| {
                    self.owned_elements(&current.id).find_map(|child| match child {
                        Element::Package(p) if &p.name == segment => Some(p),
                        _ => None,
                    })
                })
            })
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.elements.values().filter_map(|e| match e {
            Element::Package(p) => Some(p),
            _ => None,
        })
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.owners.clear();
        self.owned.clear();
        self.members.clear();
        self.views.clear();
    }
}

impl Repository for Model {
    fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    fn select(&self, query: &str) -> Result<Vec<&Element>> {
        let query = Query::parse(query)?;
        let matches_kind = |e: &&Element| e.kind() == query.kind;

        let selected: Vec<&Element> = if query.is_scoped() {
            match self.find_package_path(&query.scope) {
                Some(package) => self
                    .descendants(&package.id)
                    .into_iter()
                    .filter(matches_kind)
                    .collect(),
                None => Vec::new(),
            }
        } else {
            self.elements.values().filter(matches_kind).collect()
        };

        trace!(kind = %query.kind, count = selected.len(), "Selected elements");
        Ok(selected)
    }

    fn views_of(&self, id: &ElementId, diagram: &ElementId) -> Vec<&View> {
        self.views
            .iter()
            .filter(|v| &v.model == id && &v.diagram == diagram)
            .collect()
    }

    fn owner_of(&self, id: &ElementId) -> Option<&Element> {
        self.members
            .get(id)
            .or_else(|| self.owners.get(id))
            .and_then(|owner| self.elements.get(owner))
    }
}
