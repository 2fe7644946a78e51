//! Generated-type model for the xbind binding compiler
//!
//! The output side of a compilation: packages, classes and element wrappers
//! allocated by the resolver. Everything is stored in arenas inside a
//! [`Model`] and referred to by copyable ids, so classes can point at each
//! other (base classes, property types, nesting) without owning each other.

mod class;
pub mod debug;
mod element;
mod ids;
mod model;
pub mod naming;
mod types;

pub use class::{ClassInfo, Property, PropertyKind};
pub use element::ElementInfo;
pub use ids::{ClassId, ElementId, PackageId};
pub use model::Model;
pub use types::{BuiltinLeaf, ClassScope, TypeRef};
