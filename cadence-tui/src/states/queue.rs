use ratatui::widgets::ListState;

/// Selection in the pending queue list
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    pub list_state: ListState,
    len: usize,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow a new queue length, keeping the selection in range
    pub fn sync(&mut self, len: usize, focus: Option<usize>) {
        self.len = len;
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let selected = match self.list_state.selected() {
            Some(i) => i.min(len - 1),
            None => focus.unwrap_or(0),
        };
        self.list_state.select(Some(selected));
    }

    pub fn next(&mut self) {
        if self.len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn prev(&mut self) {
        if self.len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    /// Get currently selected queue index
    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected()
    }
}
