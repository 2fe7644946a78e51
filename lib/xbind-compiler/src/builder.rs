use std::fs;
use std::io;
use std::rc::Rc;

use xbind_resolver::{BodyBuilder, DocSynthesizer, MappingPolicy, NameConverter, ResolverConfig};
use xbind_schema::SchemaSet;

use crate::compilation::{Compilation, CompileError};

/// Where the schema set comes from
pub(crate) enum SchemaInput {
    Set(SchemaSet),
    Manifest { name: String, text: String },
}

/// Collaborators replacing the resolver defaults
#[derive(Default)]
pub(crate) struct Collaborators {
    pub policy: Option<Rc<dyn MappingPolicy>>,
    pub body_builder: Option<Rc<dyn BodyBuilder>>,
    pub docs: Option<Rc<dyn DocSynthesizer>>,
    pub names: Option<Rc<dyn NameConverter>>,
}

/// Builder for creating a `Compilation`.
///
/// Supply the schema set (directly or as a manifest), optionally the
/// documents it was read from so diagnostics can point into them, then call
/// `build()`.
#[derive(Default)]
pub struct CompilationBuilder {
    schema: Option<SchemaInput>,
    sources: Vec<(String, String)>,
    config: ResolverConfig,
    collaborators: Collaborators,
}

impl CompilationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile an already constructed schema set.
    pub fn schema(mut self, schema: SchemaSet) -> Self {
        self.schema = Some(SchemaInput::Set(schema));
        self
    }

    /// Compile the schema set described by a TOML manifest.
    pub fn manifest(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.schema = Some(SchemaInput::Manifest {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    /// Register the text of a schema document.
    ///
    /// Diagnostics on declarations located in a registered document get a
    /// source label; others only mention the position.
    pub fn add_source(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.sources.push((name.into(), source.into()));
        self
    }

    /// Register a schema document read from disk, named by its path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn add_file(mut self, path: impl AsRef<std::path::Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        self.sources.push((path.display().to_string(), source));
        Ok(self)
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn policy(mut self, policy: Rc<dyn MappingPolicy>) -> Self {
        self.collaborators.policy = Some(policy);
        self
    }

    pub fn body_builder(mut self, body_builder: Rc<dyn BodyBuilder>) -> Self {
        self.collaborators.body_builder = Some(body_builder);
        self
    }

    pub fn docs(mut self, docs: Rc<dyn DocSynthesizer>) -> Self {
        self.collaborators.docs = Some(docs);
        self
    }

    pub fn name_converter(mut self, names: Rc<dyn NameConverter>) -> Self {
        self.collaborators.names = Some(names);
        self
    }

    /// Build the compilation.
    ///
    /// Binds every global element and complex type, drains the build queue
    /// and reports unused customizations. Schema problems end up in the
    /// diagnostics; only a malformed manifest or a broken resolver
    /// invariant is an `Err`.
    pub fn build(self) -> Result<Compilation, CompileError> {
        let schema = match self.schema {
            Some(SchemaInput::Set(schema)) => schema,
            Some(SchemaInput::Manifest { name, text }) => xbind_schema::parse_manifest(&text, &name)?,
            None => SchemaSet::new(),
        };
        Compilation::compile(schema, self.sources, self.config, self.collaborators)
    }
}
