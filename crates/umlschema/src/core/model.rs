//! UML model element types
//!
//! The host application owns a polymorphic object graph; here every element
//! is one variant of the closed [`Element`] enum and every reference between
//! elements is an [`ElementId`] resolved through the owning
//! [`Model`](super::Model).

use std::fmt;

use serde::Serialize;

/// Stable identity of a model element or member
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Type of an attribute or parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A primitive or free-text type name (`Integer`, `Identifier`, ...)
    Name(String),
    /// A reference to another element, usually a class or enumeration
    Element(ElementId),
}

impl TypeRef {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    pub fn element(id: impl Into<ElementId>) -> Self {
        Self::Element(id.into())
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::Name(String::new())
    }
}

/// A class attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub id: ElementId,
    pub name: String,
    pub type_ref: TypeRef,
    pub documentation: Option<String>,
    pub multiplicity: Option<String>,
}

impl Attribute {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_ref,
            documentation: None,
            multiplicity: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.multiplicity = Some(multiplicity.into());
        self
    }

    /// True when the multiplicity allows more than one value (`*`, `0..*`, `1..*`)
    pub fn is_many(&self) -> bool {
        self.multiplicity
            .as_deref()
            .is_some_and(|m| m.trim_end().ends_with('*'))
    }
}

/// An operation parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub id: ElementId,
    pub name: String,
    pub type_ref: TypeRef,
    pub documentation: Option<String>,
}

impl Parameter {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            type_ref,
            documentation: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A class or interface operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: ElementId,
    pub name: String,
    pub documentation: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documentation: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }
}

/// A package: the unit selected as export target
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    pub id: ElementId,
    pub name: String,
    pub documentation: Option<String>,
}

impl Package {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documentation: None,
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }
}

/// A class in the model
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub id: ElementId,
    pub name: String,
    pub documentation: Option<String>,
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
}

impl Class {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documentation: None,
            attributes: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }
}

/// An interface: a contract whose operations become REST paths
#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub id: ElementId,
    pub name: String,
    pub documentation: Option<String>,
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
}

impl Interface {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documentation: None,
            attributes: Vec::new(),
            operations: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }
}

/// A single enumeration literal
#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationLiteral {
    pub id: ElementId,
    pub name: String,
}

impl EnumerationLiteral {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A closed set of named literals
#[derive(Debug, Clone, PartialEq)]
pub struct Enumeration {
    pub id: ElementId,
    pub name: String,
    pub documentation: Option<String>,
    pub literals: Vec<EnumerationLiteral>,
}

impl Enumeration {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            documentation: None,
            literals: Vec::new(),
        }
    }

    pub fn with_literal(mut self, literal: EnumerationLiteral) -> Self {
        self.literals.push(literal);
        self
    }
}

/// A directed relation `end1 -> end2`
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub id: ElementId,
    pub name: String,
    pub end1: ElementId,
    pub end2: ElementId,
}

impl Association {
    pub fn new(
        id: impl Into<ElementId>,
        name: impl Into<String>,
        end1: impl Into<ElementId>,
        end2: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            end1: end1.into(),
            end2: end2.into(),
        }
    }
}

/// An inheritance edge from `source` (child) to `target` (parent)
#[derive(Debug, Clone, PartialEq)]
pub struct Generalization {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
}

impl Generalization {
    pub fn new(
        id: impl Into<ElementId>,
        source: impl Into<ElementId>,
        target: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A realization of interface `target` by class `source`
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceRealization {
    pub id: ElementId,
    pub source: ElementId,
    pub target: ElementId,
}

impl InterfaceRealization {
    pub fn new(
        id: impl Into<ElementId>,
        source: impl Into<ElementId>,
        target: impl Into<ElementId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// A diagram owning views of model elements
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub id: ElementId,
    pub name: String,
}

impl Diagram {
    pub fn new(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One view of a model element or member on a diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub diagram: ElementId,
    pub model: ElementId,
    pub visible: bool,
}

impl View {
    pub fn new(diagram: impl Into<ElementId>, model: impl Into<ElementId>, visible: bool) -> Self {
        Self {
            diagram: diagram.into(),
            model: model.into(),
            visible,
        }
    }
}

/// Discriminant of [`Element`], also the `@Kind` part of a repository query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Package,
    Class,
    Interface,
    Enumeration,
    Association,
    Generalization,
    InterfaceRealization,
    Diagram,
}

impl ElementKind {
    /// Host type name, as written in queries (`UMLClass`, ...)
    pub fn type_name(self) -> &'static str {
        match self {
            ElementKind::Package => "UMLPackage",
            ElementKind::Class => "UMLClass",
            ElementKind::Interface => "UMLInterface",
            ElementKind::Enumeration => "UMLEnumeration",
            ElementKind::Association => "UMLAssociation",
            ElementKind::Generalization => "UMLGeneralization",
            ElementKind::InterfaceRealization => "UMLInterfaceRealization",
            ElementKind::Diagram => "UMLDiagram",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "UMLPackage" | "UMLModel" => Some(ElementKind::Package),
            "UMLClass" => Some(ElementKind::Class),
            "UMLInterface" => Some(ElementKind::Interface),
            "UMLEnumeration" => Some(ElementKind::Enumeration),
            "UMLAssociation" => Some(ElementKind::Association),
            "UMLGeneralization" => Some(ElementKind::Generalization),
            "UMLInterfaceRealization" => Some(ElementKind::InterfaceRealization),
            "UMLDiagram" | "UMLClassDiagram" => Some(ElementKind::Diagram),
            _ => None,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A model element
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Package(Package),
    Class(Class),
    Interface(Interface),
    Enumeration(Enumeration),
    Association(Association),
    Generalization(Generalization),
    InterfaceRealization(InterfaceRealization),
    Diagram(Diagram),
}

impl Element {
    pub fn id(&self) -> &ElementId {
        match self {
            Element::Package(e) => &e.id,
            Element::Class(e) => &e.id,
            Element::Interface(e) => &e.id,
            Element::Enumeration(e) => &e.id,
            Element::Association(e) => &e.id,
            Element::Generalization(e) => &e.id,
            Element::InterfaceRealization(e) => &e.id,
            Element::Diagram(e) => &e.id,
        }
    }

    /// Element name; relationships without a name yield an empty string
    pub fn name(&self) -> &str {
        match self {
            Element::Package(e) => &e.name,
            Element::Class(e) => &e.name,
            Element::Interface(e) => &e.name,
            Element::Enumeration(e) => &e.name,
            Element::Association(e) => &e.name,
            Element::Diagram(e) => &e.name,
            Element::Generalization(_) | Element::InterfaceRealization(_) => "",
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Package(_) => ElementKind::Package,
            Element::Class(_) => ElementKind::Class,
            Element::Interface(_) => ElementKind::Interface,
            Element::Enumeration(_) => ElementKind::Enumeration,
            Element::Association(_) => ElementKind::Association,
            Element::Generalization(_) => ElementKind::Generalization,
            Element::InterfaceRealization(_) => ElementKind::InterfaceRealization,
            Element::Diagram(_) => ElementKind::Diagram,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Element::Class(class) => Some(class),
            _ => None,
        }
    }

    pub fn as_enumeration(&self) -> Option<&Enumeration> {
        match self {
            Element::Enumeration(enumeration) => Some(enumeration),
            _ => None,
        }
    }

    /// Member ids carried by this element (attributes, operations, parameters, literals)
    pub(crate) fn member_ids(&self) -> Vec<ElementId> {
        let (attributes, operations): (&[Attribute], &[Operation]) = match self {
            Element::Class(c) => (&c.attributes, &c.operations),
            Element::Interface(i) => (&i.attributes, &i.operations),
            Element::Enumeration(e) => {
                return e.literals.iter().map(|l| l.id.clone()).collect();
            }
            _ => return Vec::new(),
        };

        let mut ids: Vec<ElementId> = attributes.iter().map(|a| a.id.clone()).collect();
        for operation in operations {
            ids.push(operation.id.clone());
            ids.extend(operation.parameters.iter().map(|p| p.id.clone()));
        }
        ids
    }
}

impl From<Package> for Element {
    fn from(value: Package) -> Self {
        Element::Package(value)
    }
}

impl From<Class> for Element {
    fn from(value: Class) -> Self {
        Element::Class(value)
    }
}

impl From<Interface> for Element {
    fn from(value: Interface) -> Self {
        Element::Interface(value)
    }
}

impl From<Enumeration> for Element {
    fn from(value: Enumeration) -> Self {
        Element::Enumeration(value)
    }
}

impl From<Association> for Element {
    fn from(value: Association) -> Self {
        Element::Association(value)
    }
}

impl From<Generalization> for Element {
    fn from(value: Generalization) -> Self {
        Element::Generalization(value)
    }
}

impl From<InterfaceRealization> for Element {
    fn from(value: InterfaceRealization) -> Self {
        Element::InterfaceRealization(value)
    }
}

impl From<Diagram> for Element {
    fn from(value: Diagram) -> Self {
        Element::Diagram(value)
    }
}
