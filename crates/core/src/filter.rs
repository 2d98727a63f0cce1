//! Filter selection used to scope a notes listing.
//!
//! A [`FilterSelection`] is plain data: changing it never triggers a
//! fetch. It is encoded into `GET /notes` query parameters by
//! [`FilterSelection::query_pairs`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PARAM_CATEGORY_ID: &str = "categoryId";
pub const PARAM_IS_ARCHIVED: &str = "isArchived";
pub const PARAM_START_DATE: &str = "startDate";
pub const PARAM_END_DATE: &str = "endDate";

/// Wire format of date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// An inclusive creation-date range. Both bounds are always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Build a range only when both bounds are present.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// Criteria scoping a notes load.
///
/// The default selection shows every active (non-archived) note.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub category_id: Option<DbId>,
    pub is_archived: bool,
    pub date_range: Option<DateRange>,
}

impl FilterSelection {
    /// Default selection with the given archived flag.
    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived,
            ..Self::default()
        }
    }

    /// Whether a note with this archived state belongs in the listing.
    pub fn includes_archived_state(&self, note_is_archived: bool) -> bool {
        self.is_archived == note_is_archived
    }

    /// Encode the selection as query parameters.
    ///
    /// `isArchived` is always present. `categoryId` is present only when
    /// set, and the date pair only when a range is set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);

        if let Some(category_id) = self.category_id {
            pairs.push((PARAM_CATEGORY_ID, category_id.to_string()));
        }
        pairs.push((PARAM_IS_ARCHIVED, self.is_archived.to_string()));
        if let Some(range) = &self.date_range {
            pairs.push((PARAM_START_DATE, range.start.format(DATE_FORMAT).to_string()));
            pairs.push((PARAM_END_DATE, range.end.format(DATE_FORMAT).to_string()));
        }

        pairs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
