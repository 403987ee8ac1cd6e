const MAX_HISTORY_SIZE: usize = 100;

/// Linear undo/redo history of editor states
#[derive(Debug)]
pub struct History<T> {
    entries: Vec<T>,
    current_index: Option<usize>,
}

impl<T> History<T> {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
            current_index: None,
        }
    }

    /// Start a history with a single state
    pub fn with_initial(state: T) -> Self {
        let mut history = History::new();
        history.push(state);
        history
    }

    /// Record a new state
    /// This clears any redo states and adds the new entry
    pub fn push(&mut self, state: T) {
        // If we're in the middle of history, truncate everything after current position
        if let Some(idx) = self.current_index {
            self.entries.truncate(idx + 1);
        }

        self.entries.push(state);

        if self.entries.len() > MAX_HISTORY_SIZE {
            self.entries.remove(0);
        }

        self.current_index = Some(self.entries.len() - 1);
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.current_index, Some(idx) if idx > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.current_index, Some(idx) if idx + 1 < self.entries.len())
    }

    /// Step back one state
    /// Returns the state to restore, or None at the oldest entry
    pub fn go_back(&mut self) -> Option<&T> {
        if let Some(idx) = self.current_index
            && idx > 0
        {
            self.current_index = Some(idx - 1);
            return self.entries.get(idx - 1);
        }
        None
    }

    /// Step forward one state
    /// Returns the state to restore, or None at the newest entry
    pub fn go_forward(&mut self) -> Option<&T> {
        if let Some(idx) = self.current_index
            && idx + 1 < self.entries.len()
        {
            self.current_index = Some(idx + 1);
            return self.entries.get(idx + 1);
        }
        None
    }

    /// Get the current state without moving
    pub fn current(&self) -> Option<&T> {
        self.current_index.and_then(|idx| self.entries.get(idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
