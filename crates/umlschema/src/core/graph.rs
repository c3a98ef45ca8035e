//! Class graph construction
//!
//! Expands the classes owned by the export target with the classes their
//! attributes reference, and resolves inheritance and association edges.

use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{Association, Class, Element, ElementId, Enumeration, Model, Repository, TypeRef};

/// Deduplicated set of classes to export, roots first
#[derive(Debug, Clone, Default)]
pub struct ExportSet<'a> {
    classes: IndexMap<&'a ElementId, &'a Class>,
    root_count: usize,
}

impl<'a> ExportSet<'a> {
    /// Insert a class unless one with the same id is present
    fn insert(&mut self, class: &'a Class) -> bool {
        if self.classes.contains_key(&class.id) {
            return false;
        }
        self.classes.insert(&class.id, class);
        true
    }

    pub fn contains(&self, id: &ElementId) -> bool {
        self.classes.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Class> + '_ {
        self.classes.values().copied()
    }

    /// Classes discovered only through attribute types
    pub fn discovered(&self) -> impl Iterator<Item = &'a Class> + '_ {
        self.iter().skip(self.root_count)
    }

    pub fn names(&self) -> Vec<&'a str> {
        self.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Walks classes and their relationships in a model
#[derive(Debug, Clone, Copy)]
pub struct ClassGraphBuilder<'a> {
    model: &'a Model,
}

impl<'a> ClassGraphBuilder<'a> {
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Union of `roots` and every class referenced as an attribute type by a root
    pub fn expand_classes(&self, roots: &[&'a Class]) -> ExportSet<'a> {
        let mut set = ExportSet::default();
        for &root in roots {
            set.insert(root);
        }
        set.root_count = set.len();

        for root in roots {
            for attr in &root.attributes {
                let TypeRef::Element(id) = &attr.type_ref else {
                    continue;
                };
                if let Some(class) = self.model.get_class(id) {
                    if set.insert(class) {
                        trace!(class = %class.name, via = %attr.name, "Discovered referenced class");
                    }
                }
            }
        }

        debug!(
            roots = set.root_count,
            discovered = set.len() - set.root_count,
            "Expanded class graph"
        );
        set
    }

    /// Parent class names of `class`, in generalization order
    ///
    /// Multiple inheritance yields several names; duplicates are kept.
    pub fn resolve_parents(&self, class: &Class) -> Result<Vec<String>> {
        let parents = self
            .model
            .select("@UMLGeneralization")?
            .into_iter()
            .filter_map(|element| match element {
                Element::Generalization(edge) if edge.source == class.id => {
                    self.model.get(&edge.target).map(|target| target.name().to_string())
                }
                _ => None,
            })
            .collect();
        Ok(parents)
    }

    /// Associations whose owning end (`end1`) is `class`
    pub fn associations_of(&self, class: &Class) -> Result<Vec<&'a Association>> {
        let associations = self
            .model
            .select("@UMLAssociation")?
            .into_iter()
            .filter_map(|element| match element {
                Element::Association(assoc) if assoc.end1 == class.id => Some(assoc),
                _ => None,
            })
            .collect();
        Ok(associations)
    }

    /// Name of the class at the target end of `association`
    pub fn association_target(&self, association: &Association) -> Option<&'a str> {
        self.model.get(&association.end2).map(Element::name)
    }

    /// Enumerations used as attribute types of `class`, in attribute order
    pub fn enumerations_of(&self, class: &Class) -> Vec<&'a Enumeration> {
        class
            .attributes
            .iter()
            .filter_map(|attr| match &attr.type_ref {
                TypeRef::Element(id) => self.model.get_enumeration(id),
                TypeRef::Name(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attribute, EnumerationLiteral, Generalization, Package};

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
                    .with_attribute(Attribute::new("a1", "owner", TypeRef::element("c2")))
                    .with_attribute(Attribute::new("a2", "payer", TypeRef::element("c2")))
                    .with_attribute(Attribute::new("a3", "parent", TypeRef::element("c1")))
                    .with_attribute(Attribute::new("a4", "status", TypeRef::element("e1")))
                    .with_attribute(Attribute::new("a5", "total", TypeRef::name("Double"))),
            )
            .unwrap();
        model
            .add_element(
                Some(&root),
                Class::new("c2", "Customer")
                    .with_attribute(Attribute::new("a6", "address", TypeRef::element("c3"))),
            )
            .unwrap();
        model.add_element(Some(&root), Class::new("c3", "Address")).unwrap();
        model.add_element(Some(&root), Class::new("c4", "Entity")).unwrap();
        model.add_element(Some(&root), Class::new("c5", "Audited")).unwrap();
        model
            .add_element(
                Some(&root),
                Enumeration::new("e1", "Status").with_literal(EnumerationLiteral::new("l1", "Open")),
            )
            .unwrap();
        model
            .add_element(Some(&root), Generalization::new("g1", "c1", "c4"))
            .unwrap();
        model
            .add_element(Some(&root), Generalization::new("g2", "c1", "c5"))
            .unwrap();
        model
            .add_element(Some(&root), Generalization::new("g3", "c1", "c4"))
            .unwrap();
        model
            .add_element(Some(&root), Association::new("as1", "placedBy", "c1", "c2"))
            .unwrap();
        model
            .add_element(Some(&root), Association::new("as2", "orders", "c2", "c1"))
            .unwrap();
        model
    }

    #[test]
    fn test_expand_adds_referenced_classes_once() {
        let model = model();
        let builder = ClassGraphBuilder::new(&model);
        let order = model.get_class(&"c1".into()).unwrap();

        let set = builder.expand_classes(&[order]);
        assert_eq!(set.names(), vec!["Order", "Customer"]);
        assert_eq!(set.discovered().count(), 1);
    }

    #[test]
    fn test_expand_is_not_transitive() {
        let model = model();
        let builder = ClassGraphBuilder::new(&model);
        let order = model.get_class(&"c1".into()).unwrap();

        let set = builder.expand_classes(&[order]);
        assert!(!set.contains(&"c3".into()));
    }

    #[test]
    fn test_expand_is_idempotent() {
        let model = model();
        let builder = ClassGraphBuilder::new(&model);
        let order = model.get_class(&"c1".into()).unwrap();

        let first = builder.expand_classes(&[order]);
        let second = builder.expand_classes(&[order]);
        assert_eq!(first.names(), second.names());
    }

    #[test]
    fn test_resolve_parents_keeps_order_and_duplicates() {
        let model = model();
        let builder = ClassGraphBuilder::new(&model);
        let order = model.get_class(&"c1".into()).unwrap();

        let parents = builder.resolve_parents(order).unwrap();
        assert_eq!(parents, vec!["Entity", "Audited", "Entity"]);

        let customer = model.get_class(&"c2".into()).unwrap();
        assert!(builder.resolve_parents(customer).unwrap().is_empty());
    }

    #[test]
    fn test_associations_of_owning_end() {
        let model = model();
        let builder = ClassGraphBuilder::new(&model);
        let order = model.get_class(&"c1".into()).unwrap();

        let assocs = builder.associations_of(order).unwrap();
        assert_eq!(assocs.len(), 1);
        assert_eq!(assocs[0].name, "placedBy");
        assert_eq!(builder.association_target(assocs[0]), Some("Customer"));
    }

    #[test]
    fn test_enumerations_of() {
        let model = model();
        let builder = ClassGraphBuilder::new(&model);
        let order = model.get_class(&"c1".into()).unwrap();

        let enums = builder.enumerations_of(order);
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].name, "Status");
    }
}
