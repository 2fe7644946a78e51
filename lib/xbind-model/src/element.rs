use crate::types::{ClassScope, TypeRef};

/// A generated element wrapper: a named, namespaced holder of a value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub name: String,
    pub namespace: String,
    pub scope: ClassScope,
    /// Type of the wrapped value, filled in once it is bound
    pub content: Option<TypeRef>,
}

impl ElementInfo {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, scope: ClassScope) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            scope,
            content: None,
        }
    }
}
