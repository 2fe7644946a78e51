//! Run-scoped bookkeeping: bindings, the build queue and the built set

use std::collections::HashSet;

use indexmap::IndexMap;
use xbind_model::{ClassId, TypeRef};
use xbind_schema::ComponentId;

use crate::error::ResolveError;

/// A schema component paired with the type it was bound to.
///
/// The pairing never changes once registered. Building the body happens
/// through [`Resolver::build`](crate::Resolver::build).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub component: ComponentId,
    pub target: TypeRef,
}

impl Binding {
    pub fn new(component: ComponentId, target: TypeRef) -> Self {
        Self { component, target }
    }

    pub fn class(&self) -> Option<ClassId> {
        self.target.as_class()
    }
}

/// What the bound-element cache knows about an element declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundElement {
    /// Bound to a class or an element wrapper
    Bound(TypeRef),
    /// Known not to produce any type of its own
    Unbound,
}

impl BoundElement {
    pub fn as_type(self) -> Option<TypeRef> {
        match self {
            BoundElement::Bound(ty) => Some(ty),
            BoundElement::Unbound => None,
        }
    }
}

/// Component → binding map holding at most one binding per component.
#[derive(Debug, Default)]
pub(crate) struct BindingRegistry {
    bindings: IndexMap<ComponentId, Binding>,
}

impl BindingRegistry {
    /// A registry already holding `binding`.
    pub fn seeded(binding: Binding) -> Self {
        let mut bindings = IndexMap::new();
        bindings.insert(binding.component, binding);
        Self { bindings }
    }

    pub fn get(&self, component: ComponentId) -> Option<&Binding> {
        self.bindings.get(&component)
    }

    /// Register a binding. Returns `Ok(false)` when the identical binding was
    /// already present.
    pub fn register(&mut self, binding: Binding) -> Result<bool, ResolveError> {
        match self.bindings.get(&binding.component) {
            Some(existing) if existing.target == binding.target => Ok(false),
            Some(existing) => Err(ResolveError::ConflictingBinding {
                component: binding.component,
                existing: existing.target,
                proposed: binding.target,
            }),
            None => {
                self.bindings.insert(binding.component, binding);
                Ok(true)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }
}

/// LIFO work list of bindings whose bodies are pending.
#[derive(Debug, Default)]
pub(crate) struct BuildQueue {
    pending: Vec<Binding>,
}

impl BuildQueue {
    pub fn push(&mut self, binding: Binding) {
        self.pending.push(binding);
    }

    pub fn pop(&mut self) -> Option<Binding> {
        self.pending.pop()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Classes whose body construction has started.
#[derive(Debug, Default)]
pub(crate) struct BuiltSet {
    built: HashSet<ClassId>,
}

impl BuiltSet {
    /// Claim a class for building; `false` when it was already claimed.
    pub fn claim(&mut self, class: ClassId) -> bool {
        self.built.insert(class)
    }

    pub fn contains(&self, class: ClassId) -> bool {
        self.built.contains(&class)
    }

    pub fn len(&self) -> usize {
        self.built.len()
    }
}
