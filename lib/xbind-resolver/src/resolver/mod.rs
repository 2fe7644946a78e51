//! The binding resolver
//!
//! One [`Resolver`] lives for one compilation run. It owns all run-scoped
//! state and hands itself to the collaborators so they can call back in
//! while proposing types or building bodies.

mod build;
mod package;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};
use xbind_model::{BuiltinLeaf, ClassId, ClassScope, Model, PackageId, TypeRef};
use xbind_reporting::{DiagnosticContext, IntoDiagnostic};
use xbind_schema::{component_name, ComponentId, ComponentKind, SchemaSet};

use crate::body::{BodyBuilder, PropertyBuilder};
use crate::config::ResolverConfig;
use crate::cycle::CycleDetector;
use crate::diagnostics::UnusedCustomizationWarning;
use crate::docs::{DocSynthesizer, SchemaFragmentDocs};
use crate::error::ResolveError;
use crate::naming::{NameConverter, StandardNameConverter};
use crate::policy::{Abstractifier, DefaultPolicy, MappingPolicy};
use crate::registry::{Binding, BindingRegistry, BoundElement, BuildQueue, BuiltSet};
use crate::scope::ScopeStack;

/// The component and class whose body is being built right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub component: ComponentId,
    pub class: ClassId,
}

pub struct Resolver<'a> {
    schema: &'a SchemaSet,
    diagnostics: &'a mut DiagnosticContext,
    config: ResolverConfig,
    model: Model,

    policy: Rc<dyn MappingPolicy>,
    body_builder: Rc<dyn BodyBuilder>,
    docs: Rc<dyn DocSynthesizer>,
    names: Rc<dyn NameConverter>,

    registry: BindingRegistry,
    queue: BuildQueue,
    built: BuiltSet,
    scopes: ScopeStack,
    bound_elements: HashMap<ComponentId, BoundElement>,

    packages: IndexMap<String, PackageId>,
    checked_package_names: HashSet<String>,
    acknowledged: HashSet<ComponentId>,

    proposing: CycleDetector<ComponentId>,
    building: CycleDetector<ComponentId>,
    cursor: Option<Cursor>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver with the default collaborators.
    pub fn new(
        schema: &'a SchemaSet,
        diagnostics: &'a mut DiagnosticContext,
        config: ResolverConfig,
    ) -> Self {
        // anyType is complete from the start
        let registry = BindingRegistry::seeded(Binding::new(
            schema.any_type(),
            TypeRef::Builtin(BuiltinLeaf::AnyType),
        ));

        Self {
            schema,
            diagnostics,
            config,
            model: Model::new(),
            policy: Rc::new(Abstractifier::new(DefaultPolicy)),
            body_builder: Rc::new(PropertyBuilder),
            docs: Rc::new(SchemaFragmentDocs),
            names: Rc::new(StandardNameConverter),
            registry,
            queue: BuildQueue::default(),
            built: BuiltSet::default(),
            scopes: ScopeStack::new(),
            bound_elements: HashMap::new(),
            packages: IndexMap::new(),
            checked_package_names: HashSet::new(),
            acknowledged: HashSet::new(),
            proposing: CycleDetector::new(),
            building: CycleDetector::new(),
            cursor: None,
        }
    }

    pub fn with_policy(mut self, policy: Rc<dyn MappingPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_body_builder(mut self, body_builder: Rc<dyn BodyBuilder>) -> Self {
        self.body_builder = body_builder;
        self
    }

    pub fn with_docs(mut self, docs: Rc<dyn DocSynthesizer>) -> Self {
        self.docs = docs;
        self
    }

    pub fn with_name_converter(mut self, names: Rc<dyn NameConverter>) -> Self {
        self.names = names;
        self
    }

    // ===== Binding entry points =====

    /// Bind a component to a type, deferring its body.
    ///
    /// Returns `None` when the mapping policy declines the component. A
    /// decline is not remembered, so asking again consults the policy again.
    pub fn bind_to_type(&mut self, component: ComponentId) -> Result<Option<TypeRef>, ResolveError> {
        self.resolve(component, false)
    }

    /// Bind a component and build its body before returning.
    pub fn bind_to_type_immediately(
        &mut self,
        component: ComponentId,
    ) -> Result<Option<TypeRef>, ResolveError> {
        self.resolve(component, true)
    }

    /// Bind an element declaration to a class or element wrapper.
    pub fn bind_element(&mut self, element: ComponentId) -> Result<Option<TypeRef>, ResolveError> {
        if !self.schema.component(element).is_element() {
            return Ok(None);
        }
        self.bind_to_type(element)
    }

    /// Bind a complex type to a class. With `cannot_be_delayed` the class
    /// body is complete when this returns.
    pub fn bind_complex_type(
        &mut self,
        ty: ComponentId,
        cannot_be_delayed: bool,
    ) -> Result<Option<ClassId>, ResolveError> {
        if !self.schema.component(ty).is_complex_type() {
            return Ok(None);
        }
        Ok(self.resolve(ty, cannot_be_delayed)?.and_then(TypeRef::as_class))
    }

    /// The type used for values of a schema type: a built-in leaf for simple
    /// types, the bound class for complex types.
    pub fn bind_schema_type(&mut self, ty: ComponentId) -> Result<Option<TypeRef>, ResolveError> {
        match &self.schema.component(ty).kind {
            ComponentKind::SimpleType(_) => Ok(Some(TypeRef::Builtin(self.simple_type_leaf(ty)))),
            ComponentKind::ComplexType(_) => self.bind_to_type(ty),
            _ => Ok(None),
        }
    }

    /// Whether an element declaration is bound, consulting the bound-element
    /// cache before falling back to [`bind_to_type`](Self::bind_to_type).
    pub fn is_bound(&mut self, element: ComponentId) -> Result<Option<TypeRef>, ResolveError> {
        if let Some(state) = self.bound_elements.get(&element) {
            return Ok(state.as_type());
        }
        self.bind_to_type(element)
    }

    /// Record the type of an element before its content is bound.
    pub fn mark_bound(&mut self, element: ComponentId, ty: TypeRef) {
        self.bound_elements.insert(element, BoundElement::Bound(ty));
    }

    /// Record that an element produces no type of its own.
    pub fn mark_unbound(&mut self, element: ComponentId) {
        self.bound_elements.insert(element, BoundElement::Unbound);
    }

    fn resolve(
        &mut self,
        component: ComponentId,
        cannot_be_delayed: bool,
    ) -> Result<Option<TypeRef>, ResolveError> {
        let binding = match self.registry.get(component).copied() {
            Some(binding) => binding,
            None => {
                let schema = self.schema;
                let info = schema.component(component);
                let proposal = if info.is_global_declaration() {
                    let package = self.package_for(&info.target_namespace);
                    self.with_scope(ClassScope::Package(package), |r| r.propose(component))??
                } else {
                    self.propose(component)?
                };

                let Some(target) = proposal else {
                    trace!(component = %component, "binding declined");
                    return Ok(None);
                };
                self.queue_build(component, target)?
            }
        };

        if cannot_be_delayed {
            if self.building.is_active(&component) {
                let mut path = self.building.current_path().to_vec();
                path.push(component);
                return Err(ResolveError::BuildCycle { path });
            }
            self.build(binding)?;
        }
        Ok(Some(binding.target))
    }

    fn propose(&mut self, component: ComponentId) -> Result<Option<TypeRef>, ResolveError> {
        if let Err(cycle) = self.proposing.enter(component) {
            return Err(ResolveError::ProposalCycle {
                path: cycle.into_path(),
            });
        }
        let policy = Rc::clone(&self.policy);
        let proposal = policy.propose(component, self);
        self.proposing.exit();
        proposal
    }

    /// Register a binding and queue its body.
    ///
    /// Registering the same target twice is a no-op that returns the
    /// existing binding. Built-in targets are registered but never queued.
    pub fn queue_build(
        &mut self,
        component: ComponentId,
        target: TypeRef,
    ) -> Result<Binding, ResolveError> {
        let binding = Binding::new(component, target);
        if self.registry.register(binding)? && !target.is_prebuilt() {
            debug!(component = %component, target = ?target, "binding queued");
            self.queue.push(binding);
        }
        Ok(binding)
    }

    /// Build queued bodies until the queue is empty. Returns how many
    /// bindings were taken off the queue.
    pub fn drain_queue(&mut self) -> Result<usize, ResolveError> {
        let mut processed = 0;
        while let Some(binding) = self.queue.pop() {
            self.build(binding)?;
            processed += 1;
        }
        debug!(processed, bindings = self.registry.len(), "build queue drained");
        Ok(processed)
    }

    // ===== Scopes =====

    /// Run `f` with `scope` pushed, popping it afterwards whatever `f`
    /// returns.
    pub fn with_scope<R>(
        &mut self,
        scope: ClassScope,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Result<R, ResolveError> {
        let depth = self.scopes.depth();
        self.scopes.push(scope)?;
        let result = f(self);
        self.scopes.pop_to(depth)?;
        Ok(result)
    }

    pub fn push_scope(&mut self, scope: ClassScope) -> Result<(), ResolveError> {
        self.scopes.push(scope)
    }

    pub fn pop_scope(&mut self) -> Result<ClassScope, ResolveError> {
        self.scopes.pop()
    }

    pub fn current_scope(&self) -> ClassScope {
        self.scopes.current()
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    // ===== Accessors =====

    pub fn current_component(&self) -> Option<ComponentId> {
        self.cursor.map(|cursor| cursor.component)
    }

    pub fn current_class(&self) -> Option<ClassId> {
        self.cursor.map(|cursor| cursor.class)
    }

    pub fn schema(&self) -> &'a SchemaSet {
        self.schema
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut Model {
        &mut self.model
    }

    pub fn names(&self) -> &dyn NameConverter {
        self.names.as_ref()
    }

    pub fn binding(&self, component: ComponentId) -> Option<Binding> {
        self.registry.get(component).copied()
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.registry.iter()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_built(&self, class: ClassId) -> bool {
        self.built.contains(class)
    }

    pub fn built_count(&self) -> usize {
        self.built.len()
    }

    pub fn report<D: IntoDiagnostic>(&mut self, diagnostic: D) {
        self.diagnostics.throw(diagnostic);
    }

    // ===== Customizations =====

    /// Mark the customization on a component as used.
    pub fn acknowledge(&mut self, component: ComponentId) {
        self.acknowledged.insert(component);
    }

    pub fn is_acknowledged(&self, component: ComponentId) -> bool {
        self.acknowledged.contains(&component)
    }

    /// Warn about every property customization nothing used.
    pub fn report_unacknowledged(&mut self) {
        let schema = self.schema;
        for (id, component) in schema.components() {
            if component.bind_info.property.is_none() || self.acknowledged.contains(&id) {
                continue;
            }
            debug!(component = %id, "unused customization");
            self.diagnostics.throw(UnusedCustomizationWarning {
                component: component_name(schema, id),
                locator: component.locator.clone(),
            });
        }
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    fn simple_type_leaf(&self, ty: ComponentId) -> BuiltinLeaf {
        let mut current = ty;
        // a base chain longer than the set is cyclic
        for _ in 0..self.schema.len() {
            let Some(simple) = self.schema.component(current).as_simple_type() else {
                break;
            };
            if let Some(name) = simple.builtin {
                return BuiltinLeaf::for_xsd_name(name).unwrap_or(BuiltinLeaf::AnySimpleType);
            }
            match simple.base {
                Some(base) => current = base,
                None => break,
            }
        }
        BuiltinLeaf::AnySimpleType
    }
}
