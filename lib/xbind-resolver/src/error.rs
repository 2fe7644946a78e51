use thiserror::Error;
use xbind_model::TypeRef;
use xbind_schema::ComponentId;

/// Broken internal invariants. Any of these aborts the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("component {component} is already bound to {existing:?}, cannot rebind it to {proposed:?}")]
    ConflictingBinding {
        component: ComponentId,
        existing: TypeRef,
        proposed: TypeRef,
    },

    #[error("scope popped with nothing pushed")]
    ScopeUnderflow,

    #[error("the root scope cannot be pushed")]
    RootScopePushed,

    #[error("unbalanced scope stack: expected depth {expected}, found {found}")]
    UnbalancedScope { expected: usize, found: usize },

    #[error("cyclic immediate build: {}", format_path(path))]
    BuildCycle { path: Vec<ComponentId> },

    #[error("cyclic type proposal: {}", format_path(path))]
    ProposalCycle { path: Vec<ComponentId> },
}

fn format_path(path: &[ComponentId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
