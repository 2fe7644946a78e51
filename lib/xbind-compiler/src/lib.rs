//! # xbind compiler
//!
//! High-level compilation API: give it a schema set (or a schema manifest),
//! optionally a configuration and custom collaborators, and get back the
//! generated type model together with the diagnostics raised on the way.
//!
//! ## Example
//!
//! ```
//! use xbind_compiler::Compilation;
//!
//! let compilation = Compilation::builder()
//!     .manifest(
//!         "po.toml",
//!         r#"
//! [[schema]]
//! namespace = "http://www.example.com/po"
//!
//! [[schema.complex_type]]
//! name = "Address"
//!
//! [[schema.complex_type.element]]
//! name = "street"
//! type = "xs:string"
//! "#,
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(!compilation.has_errors());
//! assert!(compilation.class("com.example.po.Address").is_some());
//! ```

mod builder;
mod compilation;

pub use builder::CompilationBuilder;
pub use compilation::{Compilation, CompileError};

// Re-export commonly used types from dependencies
pub use xbind_model::{ClassId, Model, TypeRef};
pub use xbind_reporting::{Diagnostic, DiagnosticContext, IntoDiagnostic, Label, Severity};
pub use xbind_resolver::{ResolveError, ResolverConfig};
pub use xbind_schema::SchemaSet;
