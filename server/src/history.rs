use roulette_protocol::{DrawResult, HISTORY_LIMIT};
use std::collections::VecDeque;

/// Most-recent-first record of revealed outcomes, capped at
/// [`HISTORY_LIMIT`]. Entries are never edited once appended.
#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: VecDeque<DrawResult>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: DrawResult) {
        self.entries.push_front(record);
        self.entries.truncate(HISTORY_LIMIT);
    }

    pub fn snapshot(&self) -> Vec<DrawResult> {
        self.entries.iter().cloned().collect()
    }
}
