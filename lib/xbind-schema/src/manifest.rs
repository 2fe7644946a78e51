//! TOML schema manifests
//!
//! A manifest is a compact, declarative description of a schema set. It is
//! what the `xbind` command line works on; real schema documents are turned
//! into a [`SchemaSet`] by other front ends.
//!
//! ```toml
//! [[schema]]
//! namespace = "urn:po"
//! package = "com.example.po"
//! location = "po.xsd"
//!
//! [[schema.complex_type]]
//! name = "Address"
//! line = 4
//!
//! [[schema.complex_type.element]]
//! name = "street"
//! type = "xs:string"
//!
//! [[schema.element]]
//! name = "shipTo"
//! type = "Address"
//! ```
//!
//! Type names are resolved as `xs:local` (XML Schema built-ins),
//! `{namespace}local`, or a bare local name in the enclosing schema.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use xbind_span::Locator;

use crate::builder::SchemaSetBuilder;
use crate::component::ComponentId;
use crate::set::SchemaSet;

/// Errors raised while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown type '{name}' referenced from namespace '{namespace}'")]
    UnknownType { name: String, namespace: String },

    #[error("unknown element '{name}' referenced from namespace '{namespace}'")]
    UnknownElement { name: String, namespace: String },

    #[error("element in namespace '{namespace}' has neither a name nor a ref")]
    UnnamedElement { namespace: String },

    #[error("reference to '{reference}' in namespace '{namespace}' cannot also set '{key}'")]
    ConflictingReference {
        reference: String,
        key: &'static str,
        namespace: String,
    },

    #[error("top-level element '{name}' in namespace '{namespace}' cannot be repeated")]
    RepeatedTopLevel { name: String, namespace: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default, rename = "schema")]
    schemas: Vec<SchemaDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDef {
    namespace: String,
    package: Option<String>,
    location: Option<String>,
    #[serde(default, rename = "element")]
    elements: Vec<ElementDef>,
    #[serde(default, rename = "complex_type")]
    complex_types: Vec<ComplexTypeDef>,
    #[serde(default, rename = "simple_type")]
    simple_types: Vec<SimpleTypeDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ElementDef {
    name: Option<String>,
    #[serde(rename = "ref")]
    reference: Option<String>,
    #[serde(rename = "type")]
    ty: Option<String>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default)]
    repeated: bool,
    doc: Option<String>,
    class: Option<String>,
    property: Option<String>,
    line: Option<u32>,
    complex_type: Option<Box<ComplexTypeDef>>,
}

impl ElementDef {
    /// First key that only makes sense on a declaration, not on a reference.
    fn declaration_key(&self) -> Option<&'static str> {
        [
            ("name", self.name.is_some()),
            ("type", self.ty.is_some()),
            ("complex_type", self.complex_type.is_some()),
            ("abstract", self.is_abstract),
            ("doc", self.doc.is_some()),
            ("class", self.class.is_some()),
            ("property", self.property.is_some()),
            ("line", self.line.is_some()),
        ]
        .into_iter()
        .find_map(|(key, present)| present.then_some(key))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ComplexTypeDef {
    name: Option<String>,
    base: Option<String>,
    #[serde(default)]
    derivation: DerivationDef,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    doc: Option<String>,
    class: Option<String>,
    line: Option<u32>,
    #[serde(default, rename = "element")]
    elements: Vec<ElementDef>,
    #[serde(default, rename = "attribute")]
    attributes: Vec<AttributeDef>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DerivationDef {
    #[default]
    Extension,
    Restriction,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttributeDef {
    name: String,
    #[serde(rename = "type")]
    ty: Option<String>,
    line: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SimpleTypeDef {
    name: String,
    base: String,
    line: Option<u32>,
}

/// Read and parse a manifest file.
pub fn load_manifest(path: &Path) -> Result<SchemaSet, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_manifest(&text, &path.display().to_string())
}

/// Parse manifest text. `source_name` is used for locators of schemas that
/// do not name a `location`.
pub fn parse_manifest(text: &str, source_name: &str) -> Result<SchemaSet, ManifestError> {
    let manifest: Manifest = toml::from_str(text)?;
    let mut loader = Loader {
        builder: SchemaSetBuilder::new(),
    };

    // Named components first so references can point forward
    let mut declared = Vec::new();
    for schema in &manifest.schemas {
        declared.push(loader.declare(schema, source_name));
    }

    for (schema, globals) in manifest.schemas.iter().zip(declared) {
        loader.define(schema, source_name, globals)?;
    }

    Ok(loader.builder.build())
}

struct Globals {
    complex_types: Vec<ComponentId>,
    simple_types: Vec<ComponentId>,
    elements: Vec<ComponentId>,
}

struct Loader {
    builder: SchemaSetBuilder,
}

impl Loader {
    fn declare(&mut self, schema: &SchemaDef, source_name: &str) -> Globals {
        let ns = schema.namespace.as_str();
        let document = schema.location.as_deref().unwrap_or(source_name);
        self.builder.schema(ns).schema_locator(
            ns,
            Locator {
                system_id: Some(document.to_string()),
                ..Locator::default()
            },
        );
        if let Some(package) = &schema.package {
            self.builder.package(ns, package);
        }

        let placeholder = self.builder.builtin("anySimpleType");
        let simple_types = schema
            .simple_types
            .iter()
            .map(|def| {
                let id = self.builder.global_simple_type(ns, &def.name, placeholder);
                self.locate(id, document, def.line);
                id
            })
            .collect();

        let complex_types = schema
            .complex_types
            .iter()
            .map(|def| {
                let name = def.name.as_deref().unwrap_or_default();
                let id = self.builder.global_complex_type(ns, name);
                self.locate(id, document, def.line);
                id
            })
            .collect();

        let elements = schema
            .elements
            .iter()
            .map(|def| {
                let name = def.name.as_deref().unwrap_or_default();
                let id = self.builder.global_element(ns, name, None);
                self.locate(id, document, def.line);
                id
            })
            .collect();

        Globals {
            complex_types,
            simple_types,
            elements,
        }
    }

    fn define(
        &mut self,
        schema: &SchemaDef,
        source_name: &str,
        globals: Globals,
    ) -> Result<(), ManifestError> {
        let ns = schema.namespace.as_str();
        let document = schema.location.as_deref().unwrap_or(source_name);

        for (def, id) in schema.simple_types.iter().zip(globals.simple_types) {
            let base = self.resolve_type(ns, &def.base)?;
            self.builder.set_simple_base(id, base);
        }

        for (def, id) in schema.complex_types.iter().zip(globals.complex_types) {
            self.complex_type(ns, document, def, id)?;
        }

        for (def, id) in schema.elements.iter().zip(globals.elements) {
            if def.repeated {
                return Err(ManifestError::RepeatedTopLevel {
                    name: def.name.clone().unwrap_or_default(),
                    namespace: ns.to_string(),
                });
            }
            self.element_body(ns, document, def, id)?;
        }

        Ok(())
    }

    fn complex_type(
        &mut self,
        ns: &str,
        document: &str,
        def: &ComplexTypeDef,
        id: ComponentId,
    ) -> Result<(), ManifestError> {
        if let Some(base) = &def.base {
            let base = self.resolve_type(ns, base)?;
            match def.derivation {
                DerivationDef::Extension => self.builder.extend(id, base),
                DerivationDef::Restriction => self.builder.restrict(id, base),
            };
        }
        if def.is_abstract {
            self.builder.set_abstract(id);
        }
        if let Some(doc) = &def.doc {
            self.builder.documentation(id, doc);
        }
        if let Some(class) = &def.class {
            self.builder.class_name(id, class);
        }

        for element in &def.elements {
            let term = match &element.reference {
                Some(reference) => {
                    if let Some(key) = element.declaration_key() {
                        return Err(ManifestError::ConflictingReference {
                            reference: reference.clone(),
                            key,
                            namespace: ns.to_string(),
                        });
                    }
                    let target = self.resolve_element(ns, reference)?;
                    self.builder.element_ref(id, target);
                    target
                }
                None => {
                    let name = element.name.as_deref().ok_or_else(|| {
                        ManifestError::UnnamedElement {
                            namespace: ns.to_string(),
                        }
                    })?;
                    let local = self.builder.local_element(id, name, None);
                    self.locate(local, document, element.line);
                    self.element_body(ns, document, element, local)?;
                    local
                }
            };
            if element.repeated {
                self.builder.set_repeated(id, term);
            }
        }

        for attribute in &def.attributes {
            let ty = match &attribute.ty {
                Some(ty) => Some(self.resolve_type(ns, ty)?),
                None => None,
            };
            let attr = self.builder.attribute(id, &attribute.name, ty);
            self.locate(attr, document, attribute.line);
        }

        Ok(())
    }

    fn element_body(
        &mut self,
        ns: &str,
        document: &str,
        def: &ElementDef,
        id: ComponentId,
    ) -> Result<(), ManifestError> {
        if let Some(anonymous) = &def.complex_type {
            let ty = self.builder.anonymous_complex_type(id);
            self.locate(ty, document, anonymous.line.or(def.line));
            self.complex_type(ns, document, anonymous, ty)?;
        } else if let Some(ty) = &def.ty {
            let ty = self.resolve_type(ns, ty)?;
            self.builder.set_element_type(id, ty);
        }

        if def.is_abstract {
            self.builder.set_abstract(id);
        }
        if let Some(doc) = &def.doc {
            self.builder.documentation(id, doc);
        }
        if let Some(class) = &def.class {
            self.builder.class_name(id, class);
        }
        if let Some(property) = &def.property {
            self.builder.property(id, Some(property));
        }
        Ok(())
    }

    fn locate(&mut self, id: ComponentId, document: &str, line: Option<u32>) {
        if let Some(line) = line {
            self.builder.set_locator(id, Locator::at(document, line));
        }
    }

    fn resolve_type(&self, ns: &str, name: &str) -> Result<ComponentId, ManifestError> {
        let unknown = || ManifestError::UnknownType {
            name: name.to_string(),
            namespace: ns.to_string(),
        };
        if let Some(local) = name.strip_prefix("xs:") {
            return self.builder.set().builtin(local).ok_or_else(unknown);
        }
        let (namespace, local) = split_qualified(ns, name);
        self.builder
            .set()
            .find_global(namespace, local, true)
            .ok_or_else(unknown)
    }

    fn resolve_element(&self, ns: &str, name: &str) -> Result<ComponentId, ManifestError> {
        let (namespace, local) = split_qualified(ns, name);
        self.builder
            .set()
            .find_global(namespace, local, false)
            .ok_or_else(|| ManifestError::UnknownElement {
                name: name.to_string(),
                namespace: ns.to_string(),
            })
    }
}

/// Split `{namespace}local`, defaulting to the enclosing namespace.
fn split_qualified<'a>(ns: &'a str, name: &'a str) -> (&'a str, &'a str) {
    name.strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .unwrap_or((ns, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PURCHASE_ORDER: &str = r#"
[[schema]]
namespace = "urn:po"
package = "com.example.po"
location = "po.xsd"

[[schema.simple_type]]
name = "SKU"
base = "xs:string"

[[schema.complex_type]]
name = "Address"
line = 4

[[schema.complex_type.element]]
name = "street"
type = "xs:string"

[[schema.complex_type.attribute]]
name = "country"
type = "xs:string"

[[schema.element]]
name = "comment"
type = "xs:string"

[[schema.element]]
name = "order"
line = 12

[schema.element.complex_type]

[[schema.element.complex_type.element]]
name = "shipTo"
type = "Address"

[[schema.element.complex_type.element]]
ref = "comment"
repeated = true

[[schema.element.complex_type.element]]
name = "sku"
type = "SKU"
"#;

    #[test]
    fn test_parse_purchase_order() {
        let set = parse_manifest(PURCHASE_ORDER, "inline.toml").unwrap();
        let schema = set.schema("urn:po").unwrap();
        assert_eq!(schema.package.as_deref(), Some("com.example.po"));

        let address = set.find_global("urn:po", "Address", true).unwrap();
        assert_eq!(set.children(address).len(), 2);
        assert_eq!(
            set.component(address).locator,
            Some(Locator::at("po.xsd", 4))
        );

        let order = set.find_global("urn:po", "order", false).unwrap();
        let body = set.element_type(order).unwrap();
        assert!(set.is_anonymous_type_of(body, order));

        let comment = set.find_global("urn:po", "comment", false).unwrap();
        assert!(set.children(body).contains(&comment));
        let content = &set.component(body).as_complex_type().unwrap().content;
        let occurrences: Vec<_> = content.iter().map(|particle| particle.repeated).collect();
        assert_eq!(occurrences, vec![false, true, false]);

        let sku = set.find_global("urn:po", "SKU", true).unwrap();
        let base = set.component(sku).as_simple_type().unwrap().base;
        assert_eq!(base, set.builtin("string"));
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let text = r#"
[[schema]]
namespace = "urn:x"

[[schema.element]]
name = "a"
type = "Missing"
"#;
        let err = parse_manifest(text, "x.toml").unwrap_err();
        assert!(matches!(err, ManifestError::UnknownType { ref name, .. } if name == "Missing"));
    }

    #[test]
    fn test_qualified_reference_across_schemas() {
        let text = r#"
[[schema]]
namespace = "urn:a"

[[schema.element]]
name = "a"
type = "{urn:b}B"

[[schema]]
namespace = "urn:b"

[[schema.complex_type]]
name = "B"
"#;
        let set = parse_manifest(text, "x.toml").unwrap();
        let a = set.find_global("urn:a", "a", false).unwrap();
        let b = set.find_global("urn:b", "B", true).unwrap();
        assert_eq!(set.element_type(a), Some(b));
    }

    #[test]
    fn test_reference_keys_are_rejected() {
        let text = r#"
[[schema]]
namespace = "urn:x"

[[schema.element]]
name = "note"

[[schema.complex_type]]
name = "Notes"

[[schema.complex_type.element]]
ref = "note"
type = "xs:string"
"#;
        let err = parse_manifest(text, "x.toml").unwrap_err();
        assert!(matches!(
            err,
            ManifestError::ConflictingReference { ref reference, key: "type", .. } if reference == "note"
        ));
    }

    #[test]
    fn test_top_level_repetition_is_rejected() {
        let text = r#"
[[schema]]
namespace = "urn:x"

[[schema.element]]
name = "note"
repeated = true
"#;
        let err = parse_manifest(text, "x.toml").unwrap_err();
        assert!(matches!(err, ManifestError::RepeatedTopLevel { ref name, .. } if name == "note"));
    }
}
