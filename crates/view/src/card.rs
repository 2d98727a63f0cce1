//! Display projection of a note for list rendering.

use notekeeper_core::models::Note;
use notekeeper_core::types::DbId;
use serde::Serialize;

/// Label shown for notes without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Creation date format, e.g. `Mar 4, 2024`.
pub const CREATED_DATE_FORMAT: &str = "%b %-d, %Y";

/// A note prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteCard {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub category_label: String,
    pub created_label: String,
    pub is_archived: bool,
}

impl From<&Note> for NoteCard {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            category_label: note
                .category_name
                .clone()
                .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
            created_label: note.created_at.format(CREATED_DATE_FORMAT).to_string(),
            is_archived: note.is_archived,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn card_formats_date_and_category_fallback() {
        let note = Note {
            id: 1,
            title: "Title".into(),
            content: "Body".into(),
            category_id: None,
            category_name: None,
            is_archived: false,
            created_at: Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap(),
        };

        let card = NoteCard::from(&note);

        assert_eq!(card.category_label, "Uncategorized");
        assert_eq!(card.created_label, "Mar 4, 2024");
    }
}
