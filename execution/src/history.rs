use std::collections::VecDeque;

use baccarat_types::table::RoundSummary;

/// Bounded log of resolved rounds, oldest first.
#[derive(Clone, Debug)]
pub struct HistoryLog {
    capacity: usize,
    entries: VecDeque<RoundSummary>,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Rebuild from persisted entries, keeping only the newest `capacity`.
    pub fn from_entries(capacity: usize, entries: Vec<RoundSummary>) -> Self {
        let mut log = Self::new(capacity);
        for entry in entries {
            log.push(entry);
        }
        log
    }

    /// Append a summary, returning the evicted oldest entry when full.
    pub fn push(&mut self, summary: RoundSummary) -> Option<RoundSummary> {
        if self.capacity == 0 {
            return Some(summary);
        }
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(summary);
        evicted
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundSummary> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<RoundSummary> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
