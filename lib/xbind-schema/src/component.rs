//! Schema component types

use std::fmt;

use xbind_span::Locator;

use crate::customization::BindInfo;

/// Identity of a schema component inside its [`SchemaSet`](crate::SchemaSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(u32);

impl ComponentId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the component in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a complex type relates to its base type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    Extension,
    Restriction,
}

/// Compositor of a model group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compositor {
    Sequence,
    Choice,
    All,
}

impl Compositor {
    pub fn keyword(self) -> &'static str {
        match self {
            Compositor::Sequence => "sequence",
            Compositor::Choice => "choice",
            Compositor::All => "all",
        }
    }
}

/// An element declaration
#[derive(Debug, Clone, Default)]
pub struct ElementDecl {
    /// Declared type; `None` means `xs:anyType`
    pub ty: Option<ComponentId>,
    pub is_abstract: bool,
}

/// One occurrence of an element declaration or model group in a content model.
///
/// Occurrence belongs to the position, not to the term: two references to
/// the same global element may differ in whether they repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Particle {
    pub term: ComponentId,
    /// Whether the term may occur more than once at this position
    pub repeated: bool,
}

impl Particle {
    pub fn once(term: ComponentId) -> Self {
        Self {
            term,
            repeated: false,
        }
    }
}

/// A complex type definition
#[derive(Debug, Clone)]
pub struct ComplexType {
    pub base: Option<ComponentId>,
    pub derivation: Derivation,
    /// Particles: local elements, element references and model groups
    pub content: Vec<Particle>,
    pub attributes: Vec<ComponentId>,
    pub is_abstract: bool,
    /// For anonymous types, the element declaring them
    pub declaring_element: Option<ComponentId>,
}

impl Default for ComplexType {
    fn default() -> Self {
        Self {
            base: None,
            derivation: Derivation::Extension,
            content: Vec::new(),
            attributes: Vec::new(),
            is_abstract: false,
            declaring_element: None,
        }
    }
}

/// A simple type definition
#[derive(Debug, Clone, Default)]
pub struct SimpleType {
    /// Restriction base; `None` for the built-in types
    pub base: Option<ComponentId>,
    /// Set for the XML Schema built-in types
    pub builtin: Option<&'static str>,
}

/// An attribute declaration
#[derive(Debug, Clone, Default)]
pub struct AttributeDecl {
    /// Declared simple type; `None` means `xs:anySimpleType`
    pub ty: Option<ComponentId>,
}

/// A model group (sequence, choice or all)
#[derive(Debug, Clone)]
pub struct ModelGroup {
    pub compositor: Compositor,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone)]
pub enum ComponentKind {
    Element(ElementDecl),
    ComplexType(ComplexType),
    SimpleType(SimpleType),
    Attribute(AttributeDecl),
    ModelGroup(ModelGroup),
}

/// A node of the schema graph
#[derive(Debug, Clone)]
pub struct Component {
    pub kind: ComponentKind,
    /// Local name; `None` for anonymous types and model groups
    pub name: Option<String>,
    pub target_namespace: String,
    /// Whether the component is declared at the top level of its schema
    pub global: bool,
    pub locator: Option<Locator>,
    pub bind_info: BindInfo,
}

impl Component {
    pub(crate) fn new(kind: ComponentKind, name: Option<String>, target_namespace: &str) -> Self {
        Self {
            kind,
            name,
            target_namespace: target_namespace.to_string(),
            global: false,
            locator: None,
            bind_info: BindInfo::default(),
        }
    }

    /// True for named top-level declarations.
    ///
    /// Model groups are never declarations, even when they appear at the top
    /// level of a schema.
    pub fn is_global_declaration(&self) -> bool {
        self.global && !matches!(self.kind, ComponentKind::ModelGroup(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, ComponentKind::Element(_))
    }

    pub fn is_complex_type(&self) -> bool {
        matches!(self.kind, ComponentKind::ComplexType(_))
    }

    pub fn is_simple_type(&self) -> bool {
        matches!(self.kind, ComponentKind::SimpleType(_))
    }

    pub fn as_element(&self) -> Option<&ElementDecl> {
        match &self.kind {
            ComponentKind::Element(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn as_complex_type(&self) -> Option<&ComplexType> {
        match &self.kind {
            ComponentKind::ComplexType(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_simple_type(&self) -> Option<&SimpleType> {
        match &self.kind {
            ComponentKind::SimpleType(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeDecl> {
        match &self.kind {
            ComponentKind::Attribute(decl) => Some(decl),
            _ => None,
        }
    }

    /// The local name, or an empty string for anonymous components.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}
