//! Binding customizations attached to schema components

/// Customizations found at a declaration site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindInfo {
    /// Documentation text to put on the generated type
    pub documentation: Option<String>,
    /// Explicit name for the generated class
    pub class_name: Option<String>,
    pub property: Option<PropertyCustomization>,
}

impl BindInfo {
    pub fn is_empty(&self) -> bool {
        self.documentation.is_none() && self.class_name.is_none() && self.property.is_none()
    }
}

/// Customizes the property generated for a declaration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyCustomization {
    /// Explicit property name
    pub name: Option<String>,
}
