//! Entities exchanged with the notes API.
//!
//! [`Note`] and [`Category`] mirror the server's snake_case JSON. The
//! request body for note writes ([`NoteDraft`]) uses the server's
//! camelCase field names instead.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// A note as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category_id: Option<DbId>,
    /// Denormalised category name joined in by the server.
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    pub created_at: Timestamp,
}

impl Note {
    /// Merge the editable fields of `draft` into this note.
    ///
    /// `category_name` is the display name of the draft's category as
    /// known locally; pass `None` when the category is unknown or unset.
    pub fn apply_draft(&mut self, draft: &NoteDraft, category_name: Option<String>) {
        self.title = draft.title.clone();
        self.content = draft.content.clone();
        self.category_id = draft.category_id;
        self.category_name = category_name;
    }
}

/// A note category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
}

/// Editable note fields sent on create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    /// `None` serialises as `null` (uncategorised).
    pub category_id: Option<DbId>,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category_id: Option<DbId>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category_id,
        }
    }
}

/// Aggregate note statistics.
///
/// The shape is owned by the server; the client only stores and
/// replaces it, never patches it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(pub serde_json::Value);

impl Stats {
    /// Look up a top-level field of the stats object.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

/// Find the display name of `category_id` in `categories`.
pub fn category_name(categories: &[Category], category_id: Option<DbId>) -> Option<String> {
    let id = category_id?;
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
