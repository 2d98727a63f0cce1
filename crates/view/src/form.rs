//! Form drafts held by the view controller.

use chrono::NaiveDate;
use notekeeper_core::filter::{DateRange, FilterSelection};
use notekeeper_core::models::{Note, NoteDraft};
use notekeeper_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Editable note fields as the add/edit forms hold them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    pub category_id: Option<DbId>,
}

impl NoteForm {
    /// Seed a form with a note's current values.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            category_id: note.category_id,
        }
    }

    pub fn to_draft(&self) -> NoteDraft {
        NoteDraft::new(self.title.clone(), self.content.clone(), self.category_id)
    }
}

/// Filter criteria staged in the filter modal before "apply".
///
/// Bounds are held separately so the user can fill them one at a time;
/// a range is only produced once both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDraft {
    pub category_id: Option<DbId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterDraft {
    /// Overlay the staged criteria onto `base`, keeping its archived flag.
    pub fn merge_into(&self, base: &FilterSelection) -> FilterSelection {
        FilterSelection {
            category_id: self.category_id,
            is_archived: base.is_archived,
            date_range: DateRange::from_bounds(self.start_date, self.end_date),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
