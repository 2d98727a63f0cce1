//! Local free-text search over loaded notes.
//!
//! Matching is a case-insensitive substring test over title, content,
//! and category name. It never touches the network.

use crate::models::Note;

/// A lowercased search term, prepared once per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(term: &str) -> Self {
        Self(term.to_lowercase())
    }

    /// An empty term matches every note.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn matches(&self, note: &Note) -> bool {
        if self.is_empty() {
            return true;
        }
        note.title.to_lowercase().contains(&self.0)
            || note.content.to_lowercase().contains(&self.0)
            || note
                .category_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&self.0))
    }
}

/// Return the notes matching `term`, preserving order.
pub fn filter_notes<'a>(notes: &'a [Note], term: &str) -> Vec<&'a Note> {
    let term = SearchTerm::new(term);
    notes.iter().filter(|note| term.matches(note)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
