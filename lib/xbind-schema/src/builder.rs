//! Programmatic construction of schema sets

use xbind_span::Locator;

use crate::component::{
    AttributeDecl, ComplexType, Component, ComponentId, ComponentKind, Compositor, Derivation,
    ElementDecl, ModelGroup, Particle, SimpleType,
};
use crate::customization::PropertyCustomization;
use crate::set::SchemaSet;

/// Builds a [`SchemaSet`] one component at a time.
///
/// Methods that attach a component to an owner (`local_element`,
/// `attribute`, `group`, ...) append it to the owner's content in call order.
///
/// # Panics
///
/// Attaching to an owner of the wrong kind (e.g. a local element to a simple
/// type) panics; this is a misuse of the builder, not a schema error.
pub struct SchemaSetBuilder {
    set: SchemaSet,
}

impl SchemaSetBuilder {
    pub fn new() -> Self {
        Self {
            set: SchemaSet::new(),
        }
    }

    /// Make sure a schema exists for the namespace.
    pub fn schema(&mut self, namespace: &str) -> &mut Self {
        self.set.schema_mut(namespace);
        self
    }

    /// Attach a package customization to the schema of a namespace.
    pub fn package(&mut self, namespace: &str, package: &str) -> &mut Self {
        self.set.schema_mut(namespace).package = Some(package.to_string());
        self
    }

    /// Record where the schema of a namespace was loaded from.
    pub fn schema_locator(&mut self, namespace: &str, locator: Locator) -> &mut Self {
        self.set.schema_mut(namespace).locator = Some(locator);
        self
    }

    /// Look up a built-in simple type.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not one of [`BUILTIN_SIMPLE_TYPES`](crate::BUILTIN_SIMPLE_TYPES).
    pub fn builtin(&self, name: &str) -> ComponentId {
        self.set
            .builtin(name)
            .unwrap_or_else(|| panic!("'{}' is not a built-in simple type", name))
    }

    pub fn any_type(&self) -> ComponentId {
        self.set.any_type()
    }

    /// Declare a global element. `ty` of `None` means `xs:anyType`.
    pub fn global_element(
        &mut self,
        namespace: &str,
        name: &str,
        ty: Option<ComponentId>,
    ) -> ComponentId {
        let mut component = Component::new(
            ComponentKind::Element(ElementDecl {
                ty,
                ..ElementDecl::default()
            }),
            Some(name.to_string()),
            namespace,
        );
        component.global = true;
        self.set.insert(component)
    }

    /// Declare a global (named) complex type with empty content.
    pub fn global_complex_type(&mut self, namespace: &str, name: &str) -> ComponentId {
        let mut component = Component::new(
            ComponentKind::ComplexType(ComplexType::default()),
            Some(name.to_string()),
            namespace,
        );
        component.global = true;
        self.set.insert(component)
    }

    /// Declare a global simple type restricting `base`.
    pub fn global_simple_type(
        &mut self,
        namespace: &str,
        name: &str,
        base: ComponentId,
    ) -> ComponentId {
        let mut component = Component::new(
            ComponentKind::SimpleType(SimpleType {
                base: Some(base),
                builtin: None,
            }),
            Some(name.to_string()),
            namespace,
        );
        component.global = true;
        self.set.insert(component)
    }

    /// Set (or replace) the declared type of an element.
    pub fn set_element_type(&mut self, element: ComponentId, ty: ComponentId) -> &mut Self {
        self.element_decl_mut(element).ty = Some(ty);
        self
    }

    /// Set (or replace) the restriction base of a simple type.
    pub fn set_simple_base(&mut self, ty: ComponentId, base: ComponentId) -> &mut Self {
        match &mut self.set.component_mut(ty).kind {
            ComponentKind::SimpleType(simple) => simple.base = Some(base),
            other => panic!("expected a simple type, found {:?}", other),
        }
        self
    }

    /// Give an element an anonymous complex type and return the type.
    pub fn anonymous_complex_type(&mut self, element: ComponentId) -> ComponentId {
        let namespace = self.set.component(element).target_namespace.clone();
        let ty = self.set.insert(Component::new(
            ComponentKind::ComplexType(ComplexType {
                declaring_element: Some(element),
                ..ComplexType::default()
            }),
            None,
            &namespace,
        ));
        self.element_decl_mut(element).ty = Some(ty);
        ty
    }

    /// Give an element an anonymous simple type restricting `base`.
    pub fn anonymous_simple_type(&mut self, element: ComponentId, base: ComponentId) -> ComponentId {
        let namespace = self.set.component(element).target_namespace.clone();
        let ty = self.set.insert(Component::new(
            ComponentKind::SimpleType(SimpleType {
                base: Some(base),
                builtin: None,
            }),
            None,
            &namespace,
        ));
        self.element_decl_mut(element).ty = Some(ty);
        ty
    }

    /// Declare a local element inside a complex type or model group.
    pub fn local_element(
        &mut self,
        owner: ComponentId,
        name: &str,
        ty: Option<ComponentId>,
    ) -> ComponentId {
        let namespace = self.set.component(owner).target_namespace.clone();
        let element = self.set.insert(Component::new(
            ComponentKind::Element(ElementDecl {
                ty,
                ..ElementDecl::default()
            }),
            Some(name.to_string()),
            &namespace,
        ));
        self.push_particle(owner, element);
        element
    }

    /// Reference a global element from a complex type or model group.
    pub fn element_ref(&mut self, owner: ComponentId, element: ComponentId) -> &mut Self {
        self.push_particle(owner, element);
        self
    }

    /// Declare an attribute on a complex type.
    pub fn attribute(
        &mut self,
        owner: ComponentId,
        name: &str,
        ty: Option<ComponentId>,
    ) -> ComponentId {
        let namespace = self.set.component(owner).target_namespace.clone();
        let attribute = self.set.insert(Component::new(
            ComponentKind::Attribute(AttributeDecl { ty }),
            Some(name.to_string()),
            &namespace,
        ));
        match &mut self.set.component_mut(owner).kind {
            ComponentKind::ComplexType(ty) => ty.attributes.push(attribute),
            other => panic!("cannot attach an attribute to {:?}", other),
        }
        attribute
    }

    /// Open a model group inside a complex type or another group.
    pub fn group(&mut self, owner: ComponentId, compositor: Compositor) -> ComponentId {
        let namespace = self.set.component(owner).target_namespace.clone();
        let group = self.set.insert(Component::new(
            ComponentKind::ModelGroup(ModelGroup {
                compositor,
                particles: Vec::new(),
            }),
            None,
            &namespace,
        ));
        self.push_particle(owner, group);
        group
    }

    /// Derive `ty` from `base` by extension.
    pub fn extend(&mut self, ty: ComponentId, base: ComponentId) -> &mut Self {
        self.derive(ty, base, Derivation::Extension)
    }

    /// Derive `ty` from `base` by restriction.
    pub fn restrict(&mut self, ty: ComponentId, base: ComponentId) -> &mut Self {
        self.derive(ty, base, Derivation::Restriction)
    }

    fn derive(&mut self, ty: ComponentId, base: ComponentId, derivation: Derivation) -> &mut Self {
        let complex = self.complex_type_mut(ty);
        complex.base = Some(base);
        complex.derivation = derivation;
        self
    }

    /// Mark an element declaration or complex type abstract.
    pub fn set_abstract(&mut self, id: ComponentId) -> &mut Self {
        match &mut self.set.component_mut(id).kind {
            ComponentKind::Element(decl) => decl.is_abstract = true,
            ComponentKind::ComplexType(ty) => ty.is_abstract = true,
            other => panic!("{:?} cannot be abstract", other),
        }
        self
    }

    /// Mark the most recent occurrence of `term` in `owner` as repeatable.
    pub fn set_repeated(&mut self, owner: ComponentId, term: ComponentId) -> &mut Self {
        let particles = match &mut self.set.component_mut(owner).kind {
            ComponentKind::ComplexType(ty) => &mut ty.content,
            ComponentKind::ModelGroup(group) => &mut group.particles,
            other => panic!("{:?} has no particles", other),
        };
        match particles.iter_mut().rev().find(|particle| particle.term == term) {
            Some(particle) => particle.repeated = true,
            None => panic!("{} does not occur in {}", term, owner),
        }
        self
    }

    pub fn set_locator(&mut self, id: ComponentId, locator: Locator) -> &mut Self {
        self.set.component_mut(id).locator = Some(locator);
        self
    }

    pub fn documentation(&mut self, id: ComponentId, text: &str) -> &mut Self {
        self.set.component_mut(id).bind_info.documentation = Some(text.to_string());
        self
    }

    pub fn class_name(&mut self, id: ComponentId, name: &str) -> &mut Self {
        self.set.component_mut(id).bind_info.class_name = Some(name.to_string());
        self
    }

    /// Attach a property customization. `name` of `None` only marks the
    /// declaration as customized.
    pub fn property(&mut self, id: ComponentId, name: Option<&str>) -> &mut Self {
        self.set.component_mut(id).bind_info.property = Some(PropertyCustomization {
            name: name.map(str::to_string),
        });
        self
    }

    pub fn build(self) -> SchemaSet {
        self.set
    }

    /// Read access to the set under construction.
    pub fn set(&self) -> &SchemaSet {
        &self.set
    }

    fn push_particle(&mut self, owner: ComponentId, term: ComponentId) {
        let particle = Particle::once(term);
        match &mut self.set.component_mut(owner).kind {
            ComponentKind::ComplexType(ty) => ty.content.push(particle),
            ComponentKind::ModelGroup(group) => group.particles.push(particle),
            other => panic!("cannot attach a particle to {:?}", other),
        }
    }

    fn element_decl_mut(&mut self, element: ComponentId) -> &mut ElementDecl {
        match &mut self.set.component_mut(element).kind {
            ComponentKind::Element(decl) => decl,
            other => panic!("expected an element declaration, found {:?}", other),
        }
    }

    fn complex_type_mut(&mut self, ty: ComponentId) -> &mut ComplexType {
        match &mut self.set.component_mut(ty).kind {
            ComponentKind::ComplexType(complex) => complex,
            other => panic!("expected a complex type, found {:?}", other),
        }
    }
}

impl Default for SchemaSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_type_links_back() {
        let mut builder = SchemaSetBuilder::new();
        let order = builder.global_element("urn:po", "order", None);
        let body = builder.anonymous_complex_type(order);
        let set = builder.build();

        assert_eq!(set.element_type(order), Some(body));
        assert!(set.is_anonymous_type_of(body, order));
        assert_eq!(set.children(order), vec![body]);
        assert!(!set.component(body).global);
    }

    #[test]
    fn test_particles_in_order() {
        let mut builder = SchemaSetBuilder::new();
        let string = builder.builtin("string");
        let ty = builder.global_complex_type("urn:po", "Item");
        let id = builder.attribute(ty, "id", Some(string));
        let name = builder.local_element(ty, "name", Some(string));
        let choice = builder.group(ty, Compositor::Choice);
        let a = builder.local_element(choice, "a", None);
        let set = builder.build();

        assert_eq!(set.children(ty), vec![id, name, choice]);
        assert_eq!(set.children(choice), vec![a]);
        assert_eq!(set.element_type(a), Some(set.any_type()));
        assert_eq!(set.find_global("urn:po", "Item", true), Some(ty));
        assert_eq!(set.find_global("urn:po", "Item", false), None);
    }

    #[test]
    fn test_repetition_is_per_occurrence() {
        let mut builder = SchemaSetBuilder::new();
        let note = builder.global_element("urn:po", "note", None);
        let ty = builder.global_complex_type("urn:po", "Notes");
        builder.element_ref(ty, note);
        builder.element_ref(ty, note).set_repeated(ty, note);
        let set = builder.build();

        let content = &set.component(ty).as_complex_type().unwrap().content;
        assert_eq!(content, &vec![Particle::once(note), Particle { term: note, repeated: true }]);
    }

    #[test]
    #[should_panic(expected = "does not occur in")]
    fn test_repeating_absent_term_panics() {
        let mut builder = SchemaSetBuilder::new();
        let note = builder.global_element("urn:po", "note", None);
        let ty = builder.global_complex_type("urn:po", "Notes");
        builder.set_repeated(ty, note);
    }

    #[test]
    #[should_panic(expected = "cannot attach a particle")]
    fn test_particle_on_simple_type_panics() {
        let mut builder = SchemaSetBuilder::new();
        let string = builder.builtin("string");
        builder.local_element(string, "oops", None);
    }
}
