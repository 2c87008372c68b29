//! Linear undo/redo over element snapshots.

use crate::shapes::Element;

/// Default number of snapshots kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A bounded stack of full element-collection snapshots with a cursor.
///
/// The cursor always points at a valid snapshot. Undo and redo only move it;
/// a commit drops everything past the cursor before pushing.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Vec<Element>>,
    cursor: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Vec::new(), DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Start a history whose only snapshot is `base`.
    pub fn new(base: Vec<Element>, limit: usize) -> Self {
        Self {
            snapshots: vec![base],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Discard all snapshots and restart from `base`.
    pub fn reset(&mut self, base: Vec<Element>) {
        self.snapshots.clear();
        self.snapshots.push(base);
        self.cursor = 0;
    }

    /// Push a new snapshot, discarding the redo branch.
    pub fn commit(&mut self, elements: Vec<Element>) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(elements);
        if self.snapshots.len() > self.limit {
            let excess = self.snapshots.len() - self.limit;
            self.snapshots.drain(..excess);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back. Returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<&[Element]> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.snapshots[self.cursor])
    }

    /// Step forward. Returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<&[Element]> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.snapshots[self.cursor])
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &[Element] {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Freehand, Rectangle};
    use kurbo::Point;

    fn rect(id: &str) -> Element {
        Element::Rectangle(Rectangle::new(id.into(), Point::new(0.0, 0.0), 10.0, 10.0))
    }

    #[test]
    fn test_new_history_has_nothing_to_undo() {
        let mut history = History::default();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert!(history.current().is_empty());
    }

    #[test]
    fn test_commit_undo_redo_round_trip() {
        let mut history = History::default();
        let before = history.current().to_vec();
        let path = Element::Freehand(Freehand::from_points(
            "p".into(),
            vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(100.0, 0.0)],
        ));
        let after = vec![path];
        history.commit(after.clone());

        assert_eq!(history.undo().unwrap(), before.as_slice());
        assert_eq!(history.redo().unwrap(), after.as_slice());
        assert_eq!(history.cursor(), 1);
    }

    #[test]
    fn test_commit_discards_redo_branch() {
        let mut history = History::default();
        history.commit(vec![rect("a")]);
        history.commit(vec![rect("a"), rect("b")]);
        history.undo();
        assert!(history.can_redo());

        history.commit(vec![rect("a"), rect("c")]);
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current()[1].id().as_str(), "c");
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut history = History::new(Vec::new(), 3);
        for i in 0..5 {
            history.commit(vec![rect(&i.to_string())]);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(history.current()[0].id().as_str(), "4");

        history.undo();
        history.undo();
        assert!(!history.can_undo());
        assert_eq!(history.current()[0].id().as_str(), "2");
    }

    #[test]
    fn test_reset() {
        let mut history = History::default();
        history.commit(vec![rect("a")]);
        history.reset(vec![rect("b")]);
        assert_eq!(history.len(), 1);
        assert!(!history.can_undo());
        assert_eq!(history.current()[0].id().as_str(), "b");
    }
}
