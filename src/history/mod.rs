//! Calculation history.
//!
//! Newest entries come first and the list is capped at
//! [`HISTORY_CAPACITY`]; older entries fall off the end.

mod entry;
mod export;

pub use entry::HistoryEntry;
pub use export::{ExportRow, render_table};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum number of entries kept.
pub const HISTORY_CAPACITY: usize = 50;

/// Ordered, bounded list of history entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore from persisted entries, enforcing the cap.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_CAPACITY);
        Self { entries }
    }

    /// Prepend an entry, evicting the oldest past the cap.
    pub fn push_front(&mut self, mut entry: HistoryEntry) {
        if let Some(newest) = self.entries.first() {
            entry.ensure_after(&newest.id);
        }
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Remove the entry with `id`.
    pub fn remove(&mut self, id: &str) -> Result<HistoryEntry> {
        let index = self.position(id)?;
        Ok(self.entries.remove(index))
    }

    /// Replace the expression and result of the entry with `id`.
    pub fn replace(&mut self, id: &str, expression: String, result: String) -> Result<()> {
        let index = self.position(id)?;
        let entry = &mut self.entries[index];
        entry.expression = expression;
        entry.result = result;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Numbered rows for reporting, newest first.
    pub fn export_rows(&self) -> Result<Vec<ExportRow>> {
        if self.entries.is_empty() {
            return Err(Error::EmptyHistory);
        }
        Ok(self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| ExportRow {
                index: i + 1,
                expression: entry.expression.clone(),
                result: entry.result.clone(),
            })
            .collect())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| Error::EntryNotFound(id.to_string()))
    }
}
