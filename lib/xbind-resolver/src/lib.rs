//! Binding resolution for schema-to-type compilation
//!
//! The [`Resolver`] decides which schema components become generated types,
//! allocates those types in a [`Model`](xbind_model::Model), and builds
//! their bodies exactly once, in a consistent order, even when the schema
//! graph is cyclic.
//!
//! ## Architecture
//!
//! - A memoizing registry maps each component to at most one [`Binding`].
//! - New bindings go onto a LIFO build queue; [`Resolver::drain_queue`]
//!   builds bodies until the queue is empty, picking up whatever building
//!   discovers along the way.
//! - A scope stack decides where new classes are placed. Global
//!   declarations are proposed under their package; bodies are built under
//!   their own class (nested mode) or its enclosing scope (top-level mode).
//! - The actual structural decisions are delegated to injectable
//!   collaborators: a [`MappingPolicy`] proposes types, a [`BodyBuilder`]
//!   fills class bodies, a [`DocSynthesizer`] writes documentation, and a
//!   [`NameConverter`] derives names.
//!
//! Non-fatal problems (reserved class names, malformed package names,
//! unused customizations) are reported to a
//! [`DiagnosticContext`](xbind_reporting::DiagnosticContext). Broken
//! internal invariants abort with a [`ResolveError`].

mod body;
mod config;
mod cycle;
mod diagnostics;
mod docs;
mod error;
mod naming;
mod policy;
mod registry;
mod resolver;
mod scope;

pub use body::{BodyBuilder, PropertyBuilder};
pub use config::{ConfigError, LocalScoping, ResolverConfig};
pub use cycle::{Cycle, CycleDetector};
pub use diagnostics::{
    IncorrectPackageNameError, ReservedClassNameError, UnusedCustomizationWarning,
};
pub use docs::{DocSynthesizer, SchemaFragmentDocs};
pub use error::ResolveError;
pub use naming::{NameConverter, StandardNameConverter};
pub use policy::{Abstractifier, DefaultPolicy, MappingPolicy};
pub use registry::{Binding, BoundElement};
pub use resolver::{Cursor, Resolver};
pub use scope::ScopeStack;
