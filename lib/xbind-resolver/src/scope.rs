use xbind_model::ClassScope;

use crate::error::ResolveError;

/// Stack of placement scopes with a root sentinel at the bottom.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    stack: Vec<ClassScope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            stack: vec![ClassScope::Root],
        }
    }

    /// The innermost scope; the root sentinel when nothing is pushed.
    pub fn current(&self) -> ClassScope {
        self.stack.last().copied().unwrap_or_default()
    }

    pub fn push(&mut self, scope: ClassScope) -> Result<(), ResolveError> {
        if scope.is_root() {
            return Err(ResolveError::RootScopePushed);
        }
        self.stack.push(scope);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<ClassScope, ResolveError> {
        if self.stack.len() <= 1 {
            return Err(ResolveError::ScopeUnderflow);
        }
        self.stack.pop().ok_or(ResolveError::ScopeUnderflow)
    }

    /// Number of pushed scopes, not counting the sentinel.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Pop back down to `depth`, failing if the stack is not exactly one
    /// scope deeper.
    pub(crate) fn pop_to(&mut self, depth: usize) -> Result<(), ResolveError> {
        if self.depth() != depth + 1 {
            return Err(ResolveError::UnbalancedScope {
                expected: depth + 1,
                found: self.depth(),
            });
        }
        self.pop().map(|_| ())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xbind_model::Model;

    #[test]
    fn test_root_sentinel() {
        let mut scopes = ScopeStack::new();
        assert_eq!(scopes.current(), ClassScope::Root);
        assert_eq!(scopes.pop(), Err(ResolveError::ScopeUnderflow));
        assert_eq!(scopes.push(ClassScope::Root), Err(ResolveError::RootScopePushed));
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_push_pop() {
        let mut model = Model::new();
        let package = ClassScope::Package(model.package("com.example"));
        let mut scopes = ScopeStack::new();
        scopes.push(package).unwrap();
        assert_eq!(scopes.current(), package);
        assert_eq!(scopes.depth(), 1);
        assert_eq!(scopes.pop(), Ok(package));
        assert_eq!(scopes.current(), ClassScope::Root);
    }

    #[test]
    fn test_pop_to_detects_imbalance() {
        let mut model = Model::new();
        let package = ClassScope::Package(model.package("a"));
        let mut scopes = ScopeStack::new();
        scopes.push(package).unwrap();
        scopes.push(package).unwrap();
        assert_eq!(
            scopes.pop_to(0),
            Err(ResolveError::UnbalancedScope {
                expected: 1,
                found: 2
            })
        );
        assert!(scopes.pop_to(1).is_ok());
        assert_eq!(scopes.depth(), 1);
    }
}
