use crate::component::{ComponentId, ComponentKind};
use crate::set::SchemaSet;

/// Human readable name of a component, used in generated documentation and
/// diagnostics.
///
/// ```
/// use xbind_schema::{component_name, SchemaSetBuilder};
///
/// let mut builder = SchemaSetBuilder::new();
/// let order = builder.global_element("urn:po", "order", None);
/// let body = builder.anonymous_complex_type(order);
/// let set = builder.build();
///
/// assert_eq!(component_name(&set, order), "element \"order\"");
/// assert_eq!(component_name(&set, body), "anonymous complex type of element \"order\"");
/// ```
pub fn component_name(set: &SchemaSet, id: ComponentId) -> String {
    let component = set.component(id);
    let named = |what: &str| match &component.name {
        Some(name) => format!("{} \"{}\"", what, name),
        None => format!("anonymous {}", what),
    };

    match &component.kind {
        ComponentKind::Element(_) => named("element"),
        ComponentKind::Attribute(_) => named("attribute"),
        ComponentKind::SimpleType(_) => named("simple type"),
        ComponentKind::ComplexType(ty) => match (&component.name, ty.declaring_element) {
            (None, Some(element)) => format!(
                "anonymous complex type of {}",
                component_name(set, element)
            ),
            _ => named("complex type"),
        },
        ComponentKind::ModelGroup(group) => format!("model group ({})", group.compositor.keyword()),
    }
}
