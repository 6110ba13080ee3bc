//! Open/closed tracking for disclosure sections.

use std::collections::HashMap;

/// Map from section key to open flag. Unseen keys are closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    open: HashMap<String, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `key` and return the new value.
    pub fn toggle(&mut self, key: impl Into<String>) -> bool {
        let entry = self.open.entry(key.into()).or_insert(false);
        *entry = !*entry;
        *entry
    }

    pub fn is_open(&self, key: &str) -> bool {
        self.open.get(key).copied().unwrap_or(false)
    }

    /// Close every section.
    pub fn reset(&mut self) {
        self.open.clear();
    }

    /// Number of keys seen so far
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Key of a whole section
pub fn section_key(section: &str) -> String {
    section.to_string()
}

/// Key of one row inside a section
pub fn row_key(section: &str, name: &str, position: usize) -> String {
    format!("{}-{}-{}", section, name, position)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_toggle_opens() {
        let mut state = ExpansionState::new();
        assert!(!state.is_open("Highly Relevant"));
        assert!(state.toggle("Highly Relevant"));
        assert!(state.is_open("Highly Relevant"));
    }

    #[test]
    fn test_second_toggle_closes_without_pruning() {
        let mut state = ExpansionState::new();
        state.toggle("k");
        assert!(!state.toggle("k"));
        assert!(!state.is_open("k"));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_reset_closes_everything() {
        let mut state = ExpansionState::new();
        state.toggle("a");
        state.toggle("b");
        state.reset();
        assert!(state.is_empty());
        assert!(!state.is_open("a"));
    }

    #[test]
    fn test_row_key_includes_position() {
        assert_eq!(row_key("Not Relevant", "memo.pdf", 2), "Not Relevant-memo.pdf-2");
        assert_ne!(row_key("S", "dup.pdf", 0), row_key("S", "dup.pdf", 1));
        assert_eq!(section_key("Failed to Process"), "Failed to Process");
    }
}
