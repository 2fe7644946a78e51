use crate::ids::ClassId;
use crate::types::{ClassScope, TypeRef};

/// What a property was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Element,
    Attribute,
    /// Text content of a simple-content type
    Value,
    /// Reference to a global element
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub kind: PropertyKind,
    /// `None` while the property type could not be bound
    pub ty: Option<TypeRef>,
    pub repeated: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PropertyKind, ty: Option<TypeRef>) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            repeated: false,
        }
    }

    pub fn repeated(mut self, repeated: bool) -> Self {
        self.repeated = repeated;
        self
    }
}

/// A generated class.
///
/// The resolver allocates the class with a name and scope first; the body
/// (base class, constructors, documentation, properties) is filled in later
/// when its binding is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    pub name: String,
    pub scope: ClassScope,
    pub is_abstract: bool,
    pub base: Option<ClassId>,
    /// Parameter names of the synthesized constructors
    pub constructors: Vec<Vec<String>>,
    pub doc: Option<String>,
    pub properties: Vec<Property>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>, scope: ClassScope) -> Self {
        Self {
            name: name.into(),
            scope,
            is_abstract: false,
            base: None,
            constructors: Vec::new(),
            doc: None,
            properties: Vec::new(),
        }
    }

    pub fn add_constructor<I, S>(&mut self, params: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let params: Vec<String> = params.into_iter().map(Into::into).collect();
        if !self.constructors.contains(&params) {
            self.constructors.push(params);
        }
    }

    /// Append a paragraph to the documentation.
    pub fn append_doc(&mut self, text: &str) {
        match &mut self.doc {
            Some(doc) => {
                doc.push_str("\n\n");
                doc.push_str(text);
            }
            None => self.doc = Some(text.to_string()),
        }
    }

    pub fn set_abstract(&mut self) {
        self.is_abstract = true;
    }

    pub fn set_base(&mut self, base: ClassId) {
        self.base = Some(base);
    }

    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_doc() {
        let mut class = ClassInfo::new("Order", ClassScope::Root);
        class.append_doc("first");
        class.append_doc("second");
        assert_eq!(class.doc.as_deref(), Some("first\n\nsecond"));
    }

    #[test]
    fn test_constructors_are_unique() {
        let mut class = ClassInfo::new("Order", ClassScope::Root);
        class.add_constructor(["value"]);
        class.add_constructor(["value"]);
        class.add_constructor(Vec::<String>::new());
        assert_eq!(class.constructors.len(), 2);
    }
}
