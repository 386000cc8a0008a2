// src/project/history.rs

/// A saved state plus the human description of the edit that produced it.
#[derive(Debug, Clone)]
pub struct HistoryEntry<T> {
    pub state: T,
    pub description: String,
}

/// Two-stack undo/redo over full state snapshots. The bottom of the undo
/// stack is the baseline and can never be undone away: with only one entry
/// present, `undo` returns None.
#[derive(Debug)]
pub struct EditHistory<T> {
    undo_stack: Vec<HistoryEntry<T>>,
    redo_stack: Vec<HistoryEntry<T>>,
    max_history: usize,
}

impl<T> EditHistory<T> {
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Records a new state. Any redoable future is discarded, and the
    /// oldest entry is evicted once the stack exceeds `max_history`.
    pub fn push(&mut self, state: T, description: impl Into<String>) {
        self.redo_stack.clear();
        self.undo_stack.push(HistoryEntry {
            state,
            description: description.into(),
        });
        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Steps back one state, returning the state now current.
    pub fn undo(&mut self) -> Option<&T> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let entry = self.undo_stack.pop().unwrap_or_else(|| unreachable!());
        self.redo_stack.push(entry);
        self.undo_stack.last().map(|e| &e.state)
    }

    /// Steps forward one state, returning the state now current.
    pub fn redo(&mut self) -> Option<&T> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry);
        self.undo_stack.last().map(|e| &e.state)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Description of the edit an `undo` would revert.
    pub fn get_undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.undo_stack.last().map(|e| e.description.as_str())
    }

    /// Description of the edit a `redo` would reapply.
    pub fn get_redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|e| e.description.as_str())
    }

    pub fn current(&self) -> Option<&T> {
        self.undo_stack.last().map(|e| &e.state)
    }

    /// Number of states that can still be undone.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len().saturating_sub(1)
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Empties both stacks. Callers wanting a fresh baseline push the
    /// current state again afterwards.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with(states: &[&str]) -> EditHistory<String> {
        let mut history = EditHistory::new(50);
        for state in states {
            history.push(state.to_string(), format!("set {state}"));
        }
        history
    }

    #[test]
    fn test_undo_redo_walks_the_timeline() {
        let mut history = history_with(&["P1", "P2", "P3"]);

        assert_eq!(history.undo(), Some(&"P2".to_string()));
        assert_eq!(history.undo(), Some(&"P1".to_string()));
        assert_eq!(history.undo(), None, "baseline must survive");

        assert_eq!(history.redo(), Some(&"P2".to_string()));
        assert_eq!(history.redo(), Some(&"P3".to_string()));
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_push_discards_redo_future() {
        let mut history = history_with(&["P1", "P2", "P3"]);
        history.undo();
        history.undo();
        assert!(history.can_redo());

        history.push("P4".to_string(), "set P4");
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), Some(&"P4".to_string()));
    }

    #[test]
    fn test_max_history_evicts_oldest() {
        let mut history = EditHistory::new(3);
        for n in 1..=5 {
            history.push(format!("P{n}"), format!("set P{n}"));
        }
        // only P3..P5 survive, so two steps remain undoable
        assert_eq!(history.undo_count(), 2);
        assert_eq!(history.undo(), Some(&"P4".to_string()));
        assert_eq!(history.undo(), Some(&"P3".to_string()));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn test_descriptions_track_pending_operations() {
        let mut history = history_with(&["P1", "P2"]);
        assert_eq!(history.get_undo_description(), Some("set P2"));
        assert_eq!(history.get_redo_description(), None);

        history.undo();
        assert_eq!(history.get_undo_description(), None);
        assert_eq!(history.get_redo_description(), Some("set P2"));
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut history = history_with(&["P1", "P2"]);
        history.undo();
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current(), None);
        assert_eq!(history.undo_count(), 0);
    }

    #[test]
    fn test_single_state_is_not_undoable() {
        let mut history = history_with(&["P1"]);
        assert!(!history.can_undo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), Some(&"P1".to_string()));
    }
}
