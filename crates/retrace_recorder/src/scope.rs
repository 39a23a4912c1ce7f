//! Save/restore stack tracking.
//!
//! Every scope-opening call (an explicit save, or an operation such as a clip
//! that is wrapped in an implicit save) pushes an entry. An explicit restore
//! unwinds implicit entries until it reaches the explicit save it matches.

use serde::Serialize;

/// An open scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SaveStackEntry {
    /// Operation that opened the scope.
    pub operation: &'static str,
    /// Log index of that operation.
    pub index: u64,
}

/// Stack of currently open scopes, innermost last.
#[derive(Clone, Debug, Default)]
pub struct SaveStack {
    entries: Vec<SaveStackEntry>,
}

impl SaveStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: SaveStackEntry) {
        self.entries.push(entry);
    }

    /// Unwind for one explicit restore.
    ///
    /// Pops until an entry opened by `save_operation` is popped (inclusive) or
    /// the stack is empty. Returns how many implicit scopes were popped; each
    /// needs its own restore on the surface.
    pub fn close_scope(&mut self, save_operation: &str) -> usize {
        let mut implicit = 0;
        while let Some(entry) = self.entries.pop() {
            if entry.operation == save_operation {
                break;
            }
            implicit += 1;
        }
        implicit
    }

    /// Open scopes whose index lies strictly between `from` and `to`.
    pub fn open_between(&self, from: u64, to: u64) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.index > from && entry.index < to)
            .count()
    }

    pub fn entries(&self) -> &[SaveStackEntry] {
        &self.entries
    }

    /// Number of open scopes
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(ops: &[(&'static str, u64)]) -> SaveStack {
        let mut stack = SaveStack::new();
        for &(operation, index) in ops {
            stack.push(SaveStackEntry { operation, index });
        }
        stack
    }

    #[test]
    fn test_restore_unwinds_implicit_scopes() {
        let mut s = stack(&[("save", 2), ("clip", 3), ("clip", 5)]);
        assert_eq!(s.close_scope("save"), 2);
        assert!(s.is_empty());
    }

    #[test]
    fn test_restore_stops_at_innermost_save() {
        let mut s = stack(&[("save", 2), ("save", 3), ("clip", 4)]);
        assert_eq!(s.close_scope("save"), 1);
        assert_eq!(s.entries(), &[SaveStackEntry { operation: "save", index: 2 }]);
    }

    #[test]
    fn test_restore_on_empty_stack() {
        let mut s = SaveStack::new();
        assert_eq!(s.close_scope("save"), 0);
    }

    #[test]
    fn test_open_between_is_exclusive() {
        let s = stack(&[("clip", 2), ("save", 4), ("clip", 6)]);
        assert_eq!(s.open_between(2, 6), 1);
        assert_eq!(s.open_between(1, 7), 3);
        assert_eq!(s.open_between(6, 2), 0);
    }
}
