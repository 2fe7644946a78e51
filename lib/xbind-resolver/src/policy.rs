//! Mapping policies: which components become which types

use tracing::debug;
use xbind_model::{ClassId, ClassScope, TypeRef};
use xbind_schema::{ComponentId, ComponentKind};

use crate::error::ResolveError;
use crate::resolver::Resolver;

/// Decides how a single component maps to a generated type.
///
/// A policy allocates the type (without a body) and returns it, or
/// declines with `None`. It may call back into the resolver, for instance
/// to ask whether an element is bound, but must not register or queue
/// bindings itself.
pub trait MappingPolicy {
    fn propose(
        &self,
        component: ComponentId,
        resolver: &mut Resolver<'_>,
    ) -> Result<Option<TypeRef>, ResolveError>;
}

/// The standard mapping.
///
/// - Global elements with an anonymous complex type, or with a class-name
///   customization, become classes named after the element.
/// - Other global elements become element wrappers around their type.
/// - Named complex types become classes.
/// - Anonymous complex types share the class of their element, or get a
///   class named after the element when it has none.
/// - Local elements, simple types, attributes and groups produce nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl MappingPolicy for DefaultPolicy {
    fn propose(
        &self,
        component: ComponentId,
        resolver: &mut Resolver<'_>,
    ) -> Result<Option<TypeRef>, ResolveError> {
        let schema = resolver.schema();
        let info = schema.component(component);

        match &info.kind {
            ComponentKind::Element(_) if !info.global => {
                resolver.mark_unbound(component);
                Ok(None)
            }
            ComponentKind::Element(_) => global_element(component, resolver),
            ComponentKind::ComplexType(ty) => match ty.declaring_element {
                Some(element) if info.name.is_none() => {
                    if let Some(TypeRef::Class(class)) = resolver.is_bound(element)? {
                        return Ok(Some(class.into()));
                    }
                    Ok(Some(allocate_class(resolver, element).into()))
                }
                _ => Ok(Some(allocate_class(resolver, component).into())),
            },
            _ => Ok(None),
        }
    }
}

fn global_element(
    element: ComponentId,
    resolver: &mut Resolver<'_>,
) -> Result<Option<TypeRef>, ResolveError> {
    let schema = resolver.schema();
    let info = schema.component(element);
    let ty = schema.element_type(element);

    let anonymous_complex = ty.is_some_and(|ty| {
        schema.is_anonymous_type_of(ty, element) && schema.component(ty).is_complex_type()
    });
    if anonymous_complex || info.bind_info.class_name.is_some() {
        return Ok(Some(allocate_class(resolver, element).into()));
    }

    let scope = placement(resolver, &info.target_namespace);
    let wrapper = resolver
        .model_mut()
        .new_element(info.name_or_empty(), &info.target_namespace, scope);
    // visible before the content type is bound, which may refer back here
    resolver.mark_bound(element, wrapper.into());

    if let Some(ty) = ty {
        let content = resolver.bind_schema_type(ty)?;
        resolver.model_mut().element_mut(wrapper).content = content;
    }
    debug!(component = %element, "element wrapper allocated");
    Ok(Some(wrapper.into()))
}

/// Allocate a class named after `named` (its class-name customization
/// first) in the current scope.
fn allocate_class(resolver: &mut Resolver<'_>, named: ComponentId) -> ClassId {
    let info = resolver.schema().component(named);
    let name = match &info.bind_info.class_name {
        Some(name) => name.clone(),
        None => resolver.names().to_class_name(info.name_or_empty()),
    };
    let scope = placement(resolver, &info.target_namespace);
    let class = resolver.model_mut().new_class(name, scope);
    debug!(
        component = %named,
        class = %resolver.model().full_name(class),
        "class allocated"
    );
    class
}

/// The current scope, with the root replaced by the namespace's package.
fn placement(resolver: &mut Resolver<'_>, namespace: &str) -> ClassScope {
    match resolver.current_scope() {
        ClassScope::Root => ClassScope::Package(resolver.package_for(namespace)),
        scope => scope,
    }
}

/// Wraps a policy so abstract declarations bind the abstract way: abstract
/// elements produce nothing and abstract complex types produce abstract
/// classes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Abstractifier<P> {
    inner: P,
}

impl<P> Abstractifier<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: MappingPolicy> MappingPolicy for Abstractifier<P> {
    fn propose(
        &self,
        component: ComponentId,
        resolver: &mut Resolver<'_>,
    ) -> Result<Option<TypeRef>, ResolveError> {
        let schema = resolver.schema();
        match &schema.component(component).kind {
            ComponentKind::Element(decl) if decl.is_abstract => Ok(None),
            ComponentKind::ComplexType(ty) if ty.is_abstract => {
                let proposal = self.inner.propose(component, resolver)?;
                if let Some(TypeRef::Class(class)) = proposal {
                    resolver.model_mut().class_mut(class).set_abstract();
                }
                Ok(proposal)
            }
            _ => self.inner.propose(component, resolver),
        }
    }
}
