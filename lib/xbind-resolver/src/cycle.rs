//! In-progress tracking for recursive resolution
//!
//! The resolver keeps one detector for type proposals and one for body
//! construction. Entering a component that is already on the path means the
//! recursion would never terminate.
//!
//! ```
//! use xbind_resolver::CycleDetector;
//!
//! let mut detector = CycleDetector::new();
//! detector.enter("A").unwrap();
//! detector.enter("B").unwrap();
//!
//! let cycle = detector.enter("A").unwrap_err();
//! assert_eq!(cycle.path(), &["A", "B", "A"]);
//! assert_eq!(cycle.cycle(), &["A", "B"]);
//! ```

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// A detected cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle<T> {
    /// Path from the start of the traversal; the last node repeats the node
    /// at `start`.
    path: Vec<T>,
    start: usize,
}

impl<T: Clone + Debug> Cycle<T> {
    pub fn path(&self) -> &[T] {
        &self.path
    }

    /// The nodes taking part in the cycle, without the repeated one.
    pub fn cycle(&self) -> &[T] {
        &self.path[self.start..self.path.len().saturating_sub(1)]
    }

    pub fn is_self_cycle(&self) -> bool {
        self.path.len() - self.start == 2
    }

    pub fn into_path(self) -> Vec<T> {
        self.path
    }
}

/// Tracks the nodes currently being processed.
///
/// Every successful [`enter`](Self::enter) must be paired with an
/// [`exit`](Self::exit).
#[derive(Debug)]
pub struct CycleDetector<T> {
    active: HashSet<T>,
    stack: Vec<T>,
}

impl<T: Clone + Eq + Hash + Debug> CycleDetector<T> {
    pub fn new() -> Self {
        Self {
            active: HashSet::new(),
            stack: Vec::new(),
        }
    }

    /// Enter a node, or return the cycle it would close.
    pub fn enter(&mut self, node: T) -> Result<(), Cycle<T>> {
        if self.active.contains(&node) {
            let start = self.stack.iter().position(|n| n == &node).unwrap_or(0);
            let mut path = self.stack.clone();
            path.push(node);
            return Err(Cycle { path, start });
        }

        self.active.insert(node.clone());
        self.stack.push(node);
        Ok(())
    }

    /// Leave the most recently entered node and return it.
    pub fn exit(&mut self) -> Option<T> {
        let node = self.stack.pop()?;
        self.active.remove(&node);
        Some(node)
    }

    pub fn is_active(&self, node: &T) -> bool {
        self.active.contains(node)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current_path(&self) -> &[T] {
        &self.stack
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

impl<T: Clone + Eq + Hash + Debug> Default for CycleDetector<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cycle() {
        let mut detector = CycleDetector::new();
        assert!(detector.enter(1).is_ok());
        assert!(detector.enter(2).is_ok());
        assert_eq!(detector.exit(), Some(2));
        assert_eq!(detector.exit(), Some(1));
        assert!(detector.is_empty());
        assert_eq!(detector.exit(), None);
    }

    #[test]
    fn test_self_cycle() {
        let mut detector = CycleDetector::new();
        detector.enter("A").unwrap();
        let cycle = detector.enter("A").unwrap_err();
        assert!(cycle.is_self_cycle());
        assert_eq!(cycle.cycle(), &["A"]);
        // a failed enter leaves the path untouched
        assert_eq!(detector.current_path(), &["A"]);
    }

    #[test]
    fn test_cycle_in_middle() {
        let mut detector = CycleDetector::new();
        detector.enter("X").unwrap();
        detector.enter("A").unwrap();
        detector.enter("B").unwrap();
        let cycle = detector.enter("A").unwrap_err();
        assert_eq!(cycle.path(), &["X", "A", "B", "A"]);
        assert_eq!(cycle.cycle(), &["A", "B"]);
        assert!(!cycle.is_self_cycle());
    }

    #[test]
    fn test_reenter_after_exit() {
        let mut detector = CycleDetector::new();
        detector.enter("A").unwrap();
        detector.exit();
        assert!(detector.enter("A").is_ok());
        assert!(detector.is_active(&"A"));
    }
}
