use crate::ids::{ClassId, ElementId, PackageId};

/// Built-in leaf types. These exist before any binding happens and never
/// have a body to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinLeaf {
    AnyType,
    AnySimpleType,
    String,
    Boolean,
    Decimal,
    Integer,
    Int,
    Long,
    Short,
    Byte,
    Float,
    Double,
    Calendar,
    Duration,
    QName,
    Uri,
    Binary,
}

impl BuiltinLeaf {
    /// Map an XML Schema built-in type name to its leaf.
    pub fn for_xsd_name(name: &str) -> Option<BuiltinLeaf> {
        let leaf = match name {
            "anyType" => BuiltinLeaf::AnyType,
            "anySimpleType" => BuiltinLeaf::AnySimpleType,
            "string" | "normalizedString" | "token" => BuiltinLeaf::String,
            "boolean" => BuiltinLeaf::Boolean,
            "decimal" => BuiltinLeaf::Decimal,
            "integer" => BuiltinLeaf::Integer,
            "int" => BuiltinLeaf::Int,
            "long" => BuiltinLeaf::Long,
            "short" => BuiltinLeaf::Short,
            "byte" => BuiltinLeaf::Byte,
            "float" => BuiltinLeaf::Float,
            "double" => BuiltinLeaf::Double,
            "date" | "dateTime" | "time" => BuiltinLeaf::Calendar,
            "duration" => BuiltinLeaf::Duration,
            "QName" => BuiltinLeaf::QName,
            "anyURI" => BuiltinLeaf::Uri,
            "base64Binary" | "hexBinary" => BuiltinLeaf::Binary,
            _ => return None,
        };
        Some(leaf)
    }

    /// Name of the leaf in generated code.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinLeaf::AnyType => "Object",
            BuiltinLeaf::AnySimpleType => "Object",
            BuiltinLeaf::String => "String",
            BuiltinLeaf::Boolean => "boolean",
            BuiltinLeaf::Decimal => "BigDecimal",
            BuiltinLeaf::Integer => "BigInteger",
            BuiltinLeaf::Int => "int",
            BuiltinLeaf::Long => "long",
            BuiltinLeaf::Short => "short",
            BuiltinLeaf::Byte => "byte",
            BuiltinLeaf::Float => "float",
            BuiltinLeaf::Double => "double",
            BuiltinLeaf::Calendar => "Calendar",
            BuiltinLeaf::Duration => "Duration",
            BuiltinLeaf::QName => "QName",
            BuiltinLeaf::Uri => "URI",
            BuiltinLeaf::Binary => "byte[]",
        }
    }
}

/// A generated type: the thing a schema component binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Class(ClassId),
    Element(ElementId),
    Builtin(BuiltinLeaf),
}

impl TypeRef {
    pub fn as_class(self) -> Option<ClassId> {
        match self {
            TypeRef::Class(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_element(self) -> Option<ElementId> {
        match self {
            TypeRef::Element(id) => Some(id),
            _ => None,
        }
    }

    /// Built-in leaves are complete from the start and never queued.
    pub fn is_prebuilt(self) -> bool {
        matches!(self, TypeRef::Builtin(_))
    }
}

impl From<ClassId> for TypeRef {
    fn from(id: ClassId) -> Self {
        TypeRef::Class(id)
    }
}

impl From<ElementId> for TypeRef {
    fn from(id: ElementId) -> Self {
        TypeRef::Element(id)
    }
}

impl From<BuiltinLeaf> for TypeRef {
    fn from(leaf: BuiltinLeaf) -> Self {
        TypeRef::Builtin(leaf)
    }
}

/// Where a newly allocated type is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassScope {
    /// Bottom of the scope stack; nothing encloses the type
    #[default]
    Root,
    Package(PackageId),
    /// Nested inside another class
    Class(ClassId),
}

impl ClassScope {
    pub fn is_root(self) -> bool {
        matches!(self, ClassScope::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xsd_names() {
        assert_eq!(BuiltinLeaf::for_xsd_name("token"), Some(BuiltinLeaf::String));
        assert_eq!(BuiltinLeaf::for_xsd_name("dateTime"), Some(BuiltinLeaf::Calendar));
        assert_eq!(BuiltinLeaf::for_xsd_name("Address"), None);
        assert!(TypeRef::from(BuiltinLeaf::AnyType).is_prebuilt());
    }
}
