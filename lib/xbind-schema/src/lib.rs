//! Schema model for the xbind binding compiler
//!
//! This crate holds the input side of a compilation: an arena of schema
//! components (element declarations, complex and simple types, attributes
//! and model groups) grouped into per-namespace schemas, together with the
//! binding customizations attached to them.
//!
//! Components are addressed by [`ComponentId`]. Identity comparison of ids is
//! identity comparison of declarations, and nothing in this crate hands out
//! references between components, so cyclic schema graphs need no special
//! ownership handling.
//!
//! # Usage
//!
//! ```
//! use xbind_schema::SchemaSetBuilder;
//!
//! let mut builder = SchemaSetBuilder::new();
//! let address = builder.global_complex_type("urn:example", "Address");
//! let string = builder.builtin("string");
//! builder.local_element(address, "street", Some(string));
//! builder.global_element("urn:example", "address", Some(address));
//! let schema = builder.build();
//!
//! assert_eq!(schema.global_declarations().count(), 2);
//! ```

mod builder;
mod component;
mod customization;
pub mod manifest;
mod name;
mod set;
mod writer;

pub use builder::SchemaSetBuilder;
pub use component::{
    AttributeDecl, ComplexType, Component, ComponentId, ComponentKind, Compositor, Derivation,
    ElementDecl, ModelGroup, Particle, SimpleType,
};
pub use customization::{BindInfo, PropertyCustomization};
pub use manifest::{load_manifest, parse_manifest, ManifestError};
pub use name::component_name;
pub use set::{Schema, SchemaSet, BUILTIN_SIMPLE_TYPES};
pub use writer::write_fragment;

/// Namespace of the XML Schema language itself.
pub const XML_SCHEMA_NS: &str = "http://www.w3.org/2001/XMLSchema";
