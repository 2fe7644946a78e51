//! The set of schemas taking part in a compilation

use std::collections::HashMap;

use indexmap::IndexMap;
use xbind_span::Locator;

use crate::component::{
    ComplexType, Component, ComponentId, ComponentKind, SimpleType,
};
use crate::XML_SCHEMA_NS;

/// The XML Schema built-in simple types that are pre-seeded in every set.
pub const BUILTIN_SIMPLE_TYPES: &[&str] = &[
    "anySimpleType",
    "string",
    "normalizedString",
    "token",
    "boolean",
    "decimal",
    "integer",
    "int",
    "long",
    "short",
    "byte",
    "float",
    "double",
    "date",
    "dateTime",
    "time",
    "duration",
    "QName",
    "anyURI",
    "base64Binary",
    "hexBinary",
];

/// One schema document (or several sharing a target namespace)
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub target_namespace: String,
    pub locator: Option<Locator>,
    /// Package named by a schema-level customization
    pub package: Option<String>,
    /// Top-level components in declaration order
    pub components: Vec<ComponentId>,
}

/// All components of a compilation, keyed by [`ComponentId`]
#[derive(Debug, Clone)]
pub struct SchemaSet {
    components: Vec<Component>,
    schemas: IndexMap<String, Schema>,
    builtins: HashMap<&'static str, ComponentId>,
    any_type: ComponentId,
}

impl SchemaSet {
    /// Create a set holding only the XML Schema namespace with `xs:anyType`
    /// and the built-in simple types.
    pub fn new() -> Self {
        let mut set = Self {
            components: Vec::new(),
            schemas: IndexMap::new(),
            builtins: HashMap::new(),
            any_type: ComponentId::new(0),
        };

        let mut any_type = Component::new(
            ComponentKind::ComplexType(ComplexType::default()),
            Some("anyType".to_string()),
            XML_SCHEMA_NS,
        );
        any_type.global = true;
        set.any_type = set.insert(any_type);

        for &name in BUILTIN_SIMPLE_TYPES {
            let mut builtin = Component::new(
                ComponentKind::SimpleType(SimpleType {
                    base: None,
                    builtin: Some(name),
                }),
                Some(name.to_string()),
                XML_SCHEMA_NS,
            );
            builtin.global = true;
            let id = set.insert(builtin);
            set.builtins.insert(name, id);
        }

        set
    }

    pub(crate) fn insert(&mut self, component: Component) -> ComponentId {
        let id = ComponentId::new(self.components.len());
        let namespace = component.target_namespace.clone();
        let global = component.global;
        self.components.push(component);

        let schema = self.schema_mut(&namespace);
        if global {
            schema.components.push(id);
        }
        id
    }

    pub(crate) fn schema_mut(&mut self, namespace: &str) -> &mut Schema {
        self.schemas
            .entry(namespace.to_string())
            .or_insert_with(|| Schema {
                target_namespace: namespace.to_string(),
                ..Schema::default()
            })
    }

    pub(crate) fn component_mut(&mut self, id: ComponentId) -> &mut Component {
        &mut self.components[id.index()]
    }

    /// Get a component by id.
    ///
    /// # Panics
    ///
    /// Panics if the id was produced by a different set.
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.index()]
    }

    /// Iterate over every component, built-ins included.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.components
            .iter()
            .enumerate()
            .map(|(index, component)| (ComponentId::new(index), component))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the schema for a target namespace.
    pub fn schema(&self, namespace: &str) -> Option<&Schema> {
        self.schemas.get(namespace)
    }

    /// Iterate over the schemas in the order they were first mentioned.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    /// The universal `xs:anyType`.
    pub fn any_type(&self) -> ComponentId {
        self.any_type
    }

    /// Look up an XML Schema built-in simple type by local name.
    pub fn builtin(&self, name: &str) -> Option<ComponentId> {
        self.builtins.get(name).copied()
    }

    /// Find a global component by namespace and local name.
    ///
    /// Elements and types live in different symbol spaces; `want_type`
    /// selects which one to search.
    pub fn find_global(&self, namespace: &str, name: &str, want_type: bool) -> Option<ComponentId> {
        self.schema(namespace)?
            .components
            .iter()
            .copied()
            .find(|&id| {
                let component = self.component(id);
                component.name.as_deref() == Some(name)
                    && (component.is_element() != want_type)
                    && !matches!(component.kind, ComponentKind::ModelGroup(_))
            })
    }

    /// The type carried by an element declaration.
    ///
    /// Elements without an explicit type carry `xs:anyType`. Returns `None`
    /// when `element` is not an element declaration.
    pub fn element_type(&self, element: ComponentId) -> Option<ComponentId> {
        let decl = self.component(element).as_element()?;
        Some(decl.ty.unwrap_or(self.any_type))
    }

    /// Whether a type is anonymous and declared by the given element.
    pub fn is_anonymous_type_of(&self, ty: ComponentId, element: ComponentId) -> bool {
        match &self.component(ty).kind {
            ComponentKind::ComplexType(complex) => complex.declaring_element == Some(element),
            ComponentKind::SimpleType(_) => {
                let component = self.component(ty);
                component.name.is_none() && !component.global
            }
            _ => false,
        }
    }

    /// Direct structural children of a component.
    ///
    /// For an element this is its anonymous type (if any); for a complex type
    /// its attributes followed by its particles; for a model group its
    /// particles.
    pub fn children(&self, id: ComponentId) -> Vec<ComponentId> {
        match &self.component(id).kind {
            ComponentKind::Element(decl) => decl
                .ty
                .filter(|&ty| self.is_anonymous_type_of(ty, id))
                .into_iter()
                .collect(),
            ComponentKind::ComplexType(ty) => ty
                .attributes
                .iter()
                .copied()
                .chain(ty.content.iter().map(|particle| particle.term))
                .collect(),
            ComponentKind::ModelGroup(group) => {
                group.particles.iter().map(|particle| particle.term).collect()
            }
            ComponentKind::Attribute(attr) => attr
                .ty
                .filter(|&ty| !self.component(ty).global)
                .into_iter()
                .collect(),
            ComponentKind::SimpleType(_) => Vec::new(),
        }
    }

    /// Global declarations of user schemas, schema by schema, in declaration
    /// order. The XML Schema namespace itself is skipped.
    pub fn global_declarations(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.schemas
            .values()
            .filter(|schema| schema.target_namespace != XML_SCHEMA_NS)
            .flat_map(|schema| schema.components.iter().copied())
            .filter(|&id| self.component(id).is_global_declaration())
    }
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_builtins() {
        let set = SchemaSet::new();
        let any = set.component(set.any_type());
        assert_eq!(any.name.as_deref(), Some("anyType"));
        assert!(any.is_complex_type());
        assert_eq!(set.builtin("string").map(|id| set.component(id).is_simple_type()), Some(true));
        assert!(set.builtin("nope").is_none());
        assert_eq!(set.global_declarations().count(), 0);
    }
}
