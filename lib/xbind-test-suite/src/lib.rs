//! xbind Test Suite
//!
//! A fluent test API for the binding compiler.
//!
//! # Example
//!
//! ```
//! use xbind_test_suite::*;
//!
//! Test::new(
//!     r#"
//! [[schema]]
//! namespace = "urn:example:po"
//!
//! [[schema.complex_type]]
//! name = "Address"
//!
//! [[schema.complex_type.element]]
//! name = "street"
//! type = "xs:string"
//! "#,
//! )
//! .expect(Compiles)
//! .expect(Class::new("example.po.Address").has(Behavior::Property("street", "String")));
//! ```
//!
//! Classes are looked up by fully qualified name; nested classes include the
//! names of their outer classes (`example.po.Order.Item`).

use std::rc::Rc;

use pretty_assertions::StrComparison;
use xbind_compiler::{Compilation, CompileError};
use xbind_model::debug::{format_model, format_type};
use xbind_model::{ClassInfo, Model, PropertyKind};
use xbind_reporting::MessageKey;
use xbind_resolver::{MappingPolicy, NameConverter, ResolverConfig};
use xbind_schema::SchemaSet;

// Re-export commonly used types
pub use xbind_model::PropertyKind as Kind;
pub use xbind_resolver::{
    IncorrectPackageNameError, LocalScoping, ReservedClassNameError, ResolveError,
    UnusedCustomizationWarning,
};
pub use xbind_schema::SchemaSetBuilder;

/// Test context containing compilation results
pub struct TestContext {
    pub result: Result<Compilation, CompileError>,
}

impl TestContext {
    fn compilation(&self) -> Result<&Compilation, String> {
        self.result
            .as_ref()
            .map_err(|e| format!("Compilation aborted: {}", e))
    }
}

enum Input {
    Manifest(String),
    Schema(SchemaSet),
}

/// A test case that can be run against the binding compiler
pub struct Test {
    input: Option<Input>,
    sources: Vec<(String, String)>,
    config: ResolverConfig,
    policy: Option<Rc<dyn MappingPolicy>>,
    names: Option<Rc<dyn NameConverter>>,
    context: Option<TestContext>,
}

impl Test {
    /// Create a new test from a schema manifest
    pub fn new(manifest: &str) -> Self {
        Self::from_input(Input::Manifest(manifest.to_string()))
    }

    /// Create a test from a schema set built in code
    pub fn with_schema(schema: SchemaSet) -> Self {
        Self::from_input(Input::Schema(schema))
    }

    fn from_input(input: Input) -> Self {
        Test {
            input: Some(input),
            sources: Vec::new(),
            config: ResolverConfig::default(),
            policy: None,
            names: None,
            context: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_policy(mut self, policy: impl MappingPolicy + 'static) -> Self {
        self.policy = Some(Rc::new(policy));
        self
    }

    pub fn with_name_converter(mut self, names: impl NameConverter + 'static) -> Self {
        self.names = Some(Rc::new(names));
        self
    }

    /// Register the text of a schema document so diagnostics get labels
    pub fn with_source(mut self, name: &str, text: &str) -> Self {
        self.sources.push((name.to_string(), text.to_string()));
        self
    }

    /// Compile the test input and store the result
    fn compile(&mut self) {
        let Some(input) = self.input.take() else {
            return; // Already compiled
        };

        let mut builder = Compilation::builder().config(self.config.clone());
        builder = match input {
            Input::Manifest(text) => builder.manifest("test.toml", text),
            Input::Schema(schema) => builder.schema(schema),
        };
        for (name, text) in self.sources.drain(..) {
            builder = builder.add_source(name, text);
        }
        if let Some(policy) = self.policy.take() {
            builder = builder.policy(policy);
        }
        if let Some(names) = self.names.take() {
            builder = builder.name_converter(names);
        }

        self.context = Some(TestContext {
            result: builder.build(),
        });
    }

    /// Apply an expectation to this test
    pub fn expect<E: Expectable>(mut self, expectation: E) -> Self {
        self.compile();
        let Some(ctx) = self.context.as_ref() else {
            panic!("test was not compiled");
        };
        if let Err(e) = expectation.check(ctx) {
            // Emit diagnostics for context
            if let Ok(compilation) = &ctx.result {
                if !compilation.diagnostics().is_empty() {
                    eprintln!("\n--- Compiler Diagnostics ---");
                    compilation.diagnostics().emit().ok();
                }
            }
            panic!("Expectation failed: {}", e);
        }
        self
    }
}

/// Trait for test expectations
pub trait Expectable {
    fn check(&self, ctx: &TestContext) -> Result<(), String>;
}

/// Expects compilation to finish with no error diagnostics (warnings are fine)
pub struct Compiles;

impl Expectable for Compiles {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let compilation = ctx.compilation()?;
        if compilation.has_errors() {
            let errors: Vec<_> = compilation
                .diagnostics()
                .diagnostics()
                .iter()
                .map(|d| d.message.as_str())
                .collect();
            Err(format!(
                "Expected compilation to succeed, but got errors: {:?}",
                errors
            ))
        } else {
            Ok(())
        }
    }
}

/// Expects the compilation to abort with an error whose message contains
/// the given text
pub struct FailsWith(pub &'static str);

impl Expectable for FailsWith {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        match &ctx.result {
            Ok(_) => Err(format!(
                "Expected compilation to abort with '{}', but it finished",
                self.0
            )),
            Err(e) if e.to_string().contains(self.0) => Ok(()),
            Err(e) => Err(format!(
                "Expected an abort containing '{}', but got '{}'",
                self.0, e
            )),
        }
    }
}

/// Expects the compilation to abort on a resolver invariant
pub struct Aborts(pub fn(&ResolveError) -> bool);

impl Expectable for Aborts {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        match &ctx.result {
            Err(CompileError::Resolve(error)) if (self.0)(error) => Ok(()),
            Err(other) => Err(format!("Compilation aborted with unexpected error: {}", other)),
            Ok(_) => Err("Expected compilation to abort, but it finished".to_string()),
        }
    }
}

/// Expects an error diagnostic containing a specific message
pub struct HasError(pub &'static str);

impl Expectable for HasError {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let compilation = ctx.compilation()?;
        if !compilation.has_errors() {
            return Err("Expected an error, but compilation succeeded".to_string());
        }

        let has_matching_error = compilation
            .diagnostics()
            .diagnostics()
            .iter()
            .any(|diag| diag.message.contains(self.0));

        if has_matching_error {
            Ok(())
        } else {
            let actual: Vec<_> = compilation
                .diagnostics()
                .diagnostics()
                .iter()
                .map(|d| d.message.as_str())
                .collect();
            Err(format!(
                "Expected an error containing '{}', but got: {:?}",
                self.0, actual
            ))
        }
    }
}

/// Expects at least one diagnostic with a message key
pub struct HasDiagnostic(pub MessageKey);

impl Expectable for HasDiagnostic {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let compilation = ctx.compilation()?;
        if compilation.diagnostics().count(self.0) > 0 {
            Ok(())
        } else {
            Err(format!("Expected a '{}' diagnostic, but found none", self.0))
        }
    }
}

/// Expects exactly N diagnostics with a message key
pub struct DiagnosticCount(pub MessageKey, pub usize);

impl Expectable for DiagnosticCount {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let actual = ctx.compilation()?.diagnostics().count(self.0);
        if actual == self.1 {
            Ok(())
        } else {
            Err(format!(
                "Expected {} '{}' diagnostic(s), but got {}",
                self.1, self.0, actual
            ))
        }
    }
}

/// Expects the printed model tree to match exactly
pub struct ModelTree(pub &'static str);

impl Expectable for ModelTree {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let actual = format_model(ctx.compilation()?.model());
        let expected = self.0.trim_start_matches('\n');
        if actual == expected {
            Ok(())
        } else {
            Err(format!(
                "Model tree differs:\n{}",
                StrComparison::new(expected, &actual)
            ))
        }
    }
}

/// Class expectation with chainable behavior checks
pub struct Class {
    path: String,
    behaviors: Vec<Behavior>,
    negated_behaviors: Vec<Behavior>,
}

impl Class {
    /// Create a new class expectation for a fully qualified class name
    pub fn new(path: &str) -> Self {
        Class {
            path: path.to_string(),
            behaviors: Vec::new(),
            negated_behaviors: Vec::new(),
        }
    }

    /// Assert the class has a specific behavior/property
    pub fn has(mut self, behavior: Behavior) -> Self {
        self.behaviors.push(behavior);
        self
    }

    /// Assert the class does NOT have a specific behavior/property
    pub fn not(mut self, behavior: Behavior) -> Self {
        self.negated_behaviors.push(behavior);
        self
    }
}

impl Expectable for Class {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let compilation = ctx.compilation()?;
        let model = compilation.model();
        let (_, class) = compilation.class(&self.path).ok_or_else(|| {
            let known: Vec<String> = model.classes().map(|(id, _)| model.full_name(id)).collect();
            format!("Class '{}' not found; classes are {:?}", self.path, known)
        })?;

        for behavior in &self.behaviors {
            behavior.check(&self.path, model, class)?;
        }

        for behavior in &self.negated_behaviors {
            if behavior.check(&self.path, model, class).is_ok() {
                return Err(format!(
                    "Class '{}' should NOT have {:?}, but it does",
                    self.path, behavior
                ));
            }
        }

        Ok(())
    }
}

/// Properties a generated class can have
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Property with the given name and formatted type
    Property(&'static str, &'static str),
    /// Property with the given name and kind
    PropertyIs(&'static str, PropertyKind),
    /// Property that may occur more than once
    Repeated(&'static str),
    /// Expected number of properties
    PropertyCount(usize),
    IsAbstract,
    /// Fully qualified name of the base class
    Extends(&'static str),
    /// A constructor with these parameter names
    Constructor(&'static [&'static str]),
    ConstructorCount(usize),
    /// Documentation containing the text
    DocContains(&'static str),
    NoDoc,
}

impl Behavior {
    fn check(&self, path: &str, model: &Model, class: &ClassInfo) -> Result<(), String> {
        let property = |name: &str| {
            class
                .property(name)
                .ok_or_else(|| format!("Class '{}' has no property '{}'", path, name))
        };

        match self {
            Behavior::Property(name, expected) => {
                let actual = property(name)?
                    .ty
                    .map(|ty| format_type(model, ty))
                    .unwrap_or_else(|| "?".to_string());
                if actual != *expected {
                    return Err(format!(
                        "Property '{}.{}' has type {}, expected {}",
                        path, name, actual, expected
                    ));
                }
                Ok(())
            }
            Behavior::PropertyIs(name, expected) => {
                let actual = property(name)?.kind;
                if actual != *expected {
                    return Err(format!(
                        "Property '{}.{}' is {:?}, expected {:?}",
                        path, name, actual, expected
                    ));
                }
                Ok(())
            }
            Behavior::Repeated(name) => {
                if !property(name)?.repeated {
                    return Err(format!("Property '{}.{}' is not repeated", path, name));
                }
                Ok(())
            }
            Behavior::PropertyCount(expected) => {
                let count = class.properties.len();
                if count != *expected {
                    return Err(format!(
                        "Class '{}' has {} property(ies), expected {}",
                        path, count, expected
                    ));
                }
                Ok(())
            }
            Behavior::IsAbstract => {
                if !class.is_abstract {
                    return Err(format!("Class '{}' is not abstract", path));
                }
                Ok(())
            }
            Behavior::Extends(expected) => {
                let actual = class.base.map(|base| model.full_name(base));
                if actual.as_deref() != Some(*expected) {
                    return Err(format!(
                        "Class '{}' extends {:?}, expected {}",
                        path, actual, expected
                    ));
                }
                Ok(())
            }
            Behavior::Constructor(params) => {
                let found = class
                    .constructors
                    .iter()
                    .any(|ctor| ctor.iter().map(String::as_str).eq(params.iter().copied()));
                if !found {
                    return Err(format!(
                        "Class '{}' has no constructor ({}); constructors are {:?}",
                        path,
                        params.join(", "),
                        class.constructors
                    ));
                }
                Ok(())
            }
            Behavior::ConstructorCount(expected) => {
                let count = class.constructors.len();
                if count != *expected {
                    return Err(format!(
                        "Class '{}' has {} constructor(s), expected {}",
                        path, count, expected
                    ));
                }
                Ok(())
            }
            Behavior::DocContains(text) => match &class.doc {
                Some(doc) if doc.contains(text) => Ok(()),
                Some(doc) => Err(format!(
                    "Documentation of '{}' does not contain '{}':\n{}",
                    path, text, doc
                )),
                None => Err(format!("Class '{}' has no documentation", path)),
            },
            Behavior::NoDoc => match &class.doc {
                None => Ok(()),
                Some(_) => Err(format!("Class '{}' has documentation", path)),
            },
        }
    }
}

/// Element wrapper expectation
pub struct Element {
    path: String,
    content: Option<&'static str>,
}

impl Element {
    /// Create a new expectation for an element wrapper by qualified name
    pub fn new(path: &str) -> Self {
        Element {
            path: path.to_string(),
            content: None,
        }
    }

    /// Assert the formatted type of the wrapped value
    pub fn content(mut self, ty: &'static str) -> Self {
        self.content = Some(ty);
        self
    }
}

impl Expectable for Element {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let model = ctx.compilation()?.model();
        let (_, element) = model
            .elements()
            .find(|(id, _)| model.element_full_name(*id) == self.path)
            .ok_or_else(|| format!("Element '{}' not found", self.path))?;

        if let Some(expected) = self.content {
            let actual = element
                .content
                .map(|ty| format_type(model, ty))
                .unwrap_or_else(|| "?".to_string());
            if actual != expected {
                return Err(format!(
                    "Element '{}' wraps {}, expected {}",
                    self.path, actual, expected
                ));
            }
        }
        Ok(())
    }
}

/// Expects no class with the given name to exist
pub struct NoClass(pub &'static str);

impl Expectable for NoClass {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        match ctx.compilation()?.class(self.0) {
            Some(_) => Err(format!("Class '{}' should not exist", self.0)),
            None => Ok(()),
        }
    }
}

/// Expects no element wrapper with the given qualified name to exist
pub struct NoElement(pub &'static str);

impl Expectable for NoElement {
    fn check(&self, ctx: &TestContext) -> Result<(), String> {
        let model = ctx.compilation()?.model();
        if model
            .elements()
            .any(|(id, _)| model.element_full_name(id) == self.0)
        {
            Err(format!("Element '{}' should not exist", self.0))
        } else {
            Ok(())
        }
    }
}
