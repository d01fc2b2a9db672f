/// Linear undo/redo over full snapshots.
#[derive(Debug, Clone)]
pub struct History<T> {
    past: Vec<T>,
    future: Vec<T>,
    limit: Option<usize>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T> History<T> {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Records the state before a mutation and discards the redo branch.
    pub fn record(&mut self, before: T) {
        self.past.push(before);
        self.future.clear();
        if let Some(limit) = self.limit {
            if self.past.len() > limit {
                let excess = self.past.len() - limit;
                self.past.drain(..excess);
            }
        }
    }

    /// Returns the state to restore, taking `current` onto the redo stack.
    pub fn undo(&mut self, current: T) -> Result<T, T> {
        match self.past.pop() {
            Some(previous) => {
                self.future.push(current);
                Ok(previous)
            }
            None => Err(current),
        }
    }

    pub fn redo(&mut self, current: T) -> Result<T, T> {
        match self.future.pop() {
            Some(next) => {
                self.past.push(current);
                Ok(next)
            }
            None => Err(current),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_then_redo_walks_both_stacks() {
        let mut history = History::default();
        history.record(0);
        history.record(1);

        assert_eq!(history.undo(2), Ok(1));
        assert_eq!(history.undo(1), Ok(0));
        assert_eq!(history.undo(0), Err(0));
        assert_eq!(history.redo(0), Ok(1));
        assert_eq!(history.redo(1), Ok(2));
        assert_eq!(history.redo(2), Err(2));
    }

    #[test]
    fn recording_discards_redo_branch() {
        let mut history = History::default();
        history.record("a");
        assert_eq!(history.undo("b"), Ok("a"));
        assert!(history.can_redo());

        history.record("a");
        assert!(!history.can_redo());
    }

    #[test]
    fn limit_drops_oldest_entries() {
        let mut history = History::new(Some(2));
        for i in 0..5 {
            history.record(i);
        }
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.undo(5), Ok(4));
        assert_eq!(history.undo(4), Ok(3));
        assert!(!history.can_undo());
    }
}
