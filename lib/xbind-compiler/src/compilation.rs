use thiserror::Error;
use tracing::info;
use xbind_model::{ClassId, ClassInfo, Model};
use xbind_reporting::DiagnosticContext;
use xbind_resolver::{ResolveError, Resolver, ResolverConfig};
use xbind_schema::{ComponentId, ManifestError, SchemaSet};

use crate::builder::Collaborators;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("internal resolver error: {0}")]
    Resolve(#[from] ResolveError),
}

/// A finished binding run.
///
/// Holds the schema set that was compiled, the generated model, and the
/// diagnostics. Created via `Compilation::builder()`.
pub struct Compilation {
    schema: SchemaSet,
    model: Model,
    diagnostics: DiagnosticContext,
}

impl Compilation {
    /// Create a new compilation builder.
    pub fn builder() -> crate::CompilationBuilder {
        crate::CompilationBuilder::new()
    }

    pub(crate) fn compile(
        schema: SchemaSet,
        sources: Vec<(String, String)>,
        config: ResolverConfig,
        collaborators: Collaborators,
    ) -> Result<Self, CompileError> {
        let mut diagnostics = DiagnosticContext::new();
        for (name, source) in sources {
            diagnostics.add_file(name, source);
        }

        let model = {
            let mut resolver = Resolver::new(&schema, &mut diagnostics, config);
            if let Some(policy) = collaborators.policy {
                resolver = resolver.with_policy(policy);
            }
            if let Some(body_builder) = collaborators.body_builder {
                resolver = resolver.with_body_builder(body_builder);
            }
            if let Some(docs) = collaborators.docs {
                resolver = resolver.with_docs(docs);
            }
            if let Some(names) = collaborators.names {
                resolver = resolver.with_name_converter(names);
            }

            let declarations: Vec<ComponentId> = schema
                .global_declarations()
                .filter(|&id| {
                    let component = schema.component(id);
                    component.is_element() || component.is_complex_type()
                })
                .collect();
            info!(declarations = declarations.len(), "binding global declarations");

            for declaration in declarations {
                resolver.bind_to_type(declaration)?;
            }
            let built = resolver.drain_queue()?;
            resolver.report_unacknowledged();
            info!(built, classes = resolver.model().class_count(), "binding finished");
            resolver.into_model()
        };

        Ok(Self {
            schema,
            model,
            diagnostics,
        })
    }

    pub fn schema(&self) -> &SchemaSet {
        &self.schema
    }

    /// The generated model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn diagnostics(&self) -> &DiagnosticContext {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Look a class up by its fully qualified name.
    pub fn class(&self, full_name: &str) -> Option<(ClassId, &ClassInfo)> {
        let id = self.model.find_class(full_name)?;
        Some((id, self.model.class(id)))
    }
}
