//! Body builders: filling a class once it has been allocated

use xbind_model::{BuiltinLeaf, ClassId, Property, PropertyKind, TypeRef};
use xbind_schema::{ComplexType, ComponentId, ComponentKind, Particle};

use crate::error::ResolveError;
use crate::resolver::Resolver;

/// Fills in the body of a class.
///
/// Called once per class with the class scope pushed. Nested declarations
/// are bound by calling back into the resolver, which queues them.
pub trait BodyBuilder {
    fn build_body(
        &self,
        component: ComponentId,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError>;
}

/// Turns content models into properties.
///
/// Local elements, element references and attributes each become a
/// property. A complex type derived by extension gets its base bound
/// immediately and recorded as the base class; simple content becomes a
/// `value` property.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyBuilder;

impl BodyBuilder for PropertyBuilder {
    fn build_body(
        &self,
        component: ComponentId,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        let schema = resolver.schema();
        let ty = match &schema.component(component).kind {
            ComponentKind::Element(_) => schema.element_type(component),
            ComponentKind::ComplexType(_) => Some(component),
            _ => None,
        };
        let Some(ty) = ty else {
            return Ok(());
        };

        match &schema.component(ty).kind {
            ComponentKind::SimpleType(_) => {
                let value = resolver.bind_schema_type(ty)?;
                add_property(resolver, class, Property::new("value", PropertyKind::Value, value));
                Ok(())
            }
            // an element class over a named type extends that type's class
            ComponentKind::ComplexType(_) if ty != component && !schema.is_anonymous_type_of(ty, component) => {
                if let Some(base) = resolver.bind_complex_type(ty, true)? {
                    resolver.model_mut().class_mut(class).set_base(base);
                }
                Ok(())
            }
            ComponentKind::ComplexType(complex) => self.complex_content(complex, class, resolver),
            _ => Ok(()),
        }
    }
}

impl PropertyBuilder {
    fn complex_content(
        &self,
        complex: &ComplexType,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        let schema = resolver.schema();

        if let Some(base) = complex.base.filter(|&base| base != schema.any_type()) {
            if schema.component(base).is_simple_type() {
                let value = resolver.bind_schema_type(base)?;
                add_property(resolver, class, Property::new("value", PropertyKind::Value, value));
            } else if let Some(base) = resolver.bind_complex_type(base, true)? {
                resolver.model_mut().class_mut(class).set_base(base);
            }
        }

        for particle in &complex.content {
            self.particle(particle, class, resolver)?;
        }
        for &attribute in &complex.attributes {
            self.attribute(attribute, class, resolver)?;
        }
        Ok(())
    }

    fn particle(
        &self,
        particle: &Particle,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        let schema = resolver.schema();
        let term = particle.term;
        let info = schema.component(term);

        match &info.kind {
            ComponentKind::Element(_) if info.global => {
                let ty = resolver.is_bound(term)?;
                let name = property_name(resolver, term);
                add_property(
                    resolver,
                    class,
                    Property::new(name, PropertyKind::Reference, ty).repeated(particle.repeated),
                );
            }
            ComponentKind::Element(_) => {
                let ty = match schema.element_type(term) {
                    Some(ty) => resolver.bind_schema_type(ty)?,
                    None => None,
                };
                let name = property_name(resolver, term);
                add_property(
                    resolver,
                    class,
                    Property::new(name, PropertyKind::Element, ty).repeated(particle.repeated),
                );
            }
            ComponentKind::ModelGroup(group) => {
                for nested in &group.particles {
                    self.particle(nested, class, resolver)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn attribute(
        &self,
        attribute: ComponentId,
        class: ClassId,
        resolver: &mut Resolver<'_>,
    ) -> Result<(), ResolveError> {
        let schema = resolver.schema();
        let ty = match schema.component(attribute).as_attribute() {
            Some(decl) => decl.ty,
            None => return Ok(()),
        };
        let ty = match ty {
            Some(ty) => resolver.bind_schema_type(ty)?,
            None => Some(TypeRef::Builtin(BuiltinLeaf::AnySimpleType)),
        };
        let name = property_name(resolver, attribute);
        add_property(resolver, class, Property::new(name, PropertyKind::Attribute, ty));
        Ok(())
    }
}

/// The customized property name if there is one (acknowledging the
/// customization), otherwise the converted declaration name.
fn property_name(resolver: &mut Resolver<'_>, component: ComponentId) -> String {
    let info = resolver.schema().component(component);
    match &info.bind_info.property {
        Some(customization) => {
            resolver.acknowledge(component);
            match &customization.name {
                Some(name) => name.clone(),
                None => resolver.names().to_property_name(info.name_or_empty()),
            }
        }
        None => resolver.names().to_property_name(info.name_or_empty()),
    }
}

fn add_property(resolver: &mut Resolver<'_>, class: ClassId, property: Property) {
    resolver.model_mut().class_mut(class).add_property(property);
}
