//! Transient UI state for the notes page.
//!
//! The controller holds four independent pieces of state (add draft,
//! edit draft, delete target, filter draft) plus modal visibility and the
//! search term. None of them touch the store until a submit, confirm, or
//! apply action is invoked, and every modal transition resets its draft
//! so stale values never reach a freshly opened form.

use notekeeper_client::api::NotesApi;
use notekeeper_core::error::CoreError;
use notekeeper_core::models::Note;
use notekeeper_core::search::SearchTerm;
use notekeeper_core::types::DbId;
use notekeeper_core::validation::validate_note_draft;
use notekeeper_store::{MutationResult, ResourceStore, StoreFailure};

use crate::card::NoteCard;
use crate::form::{FilterDraft, NoteForm};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a form submission did not complete.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Submit was invoked while the corresponding modal was closed.
    #[error("Nothing to submit")]
    NothingToSubmit,

    /// The draft failed form-layer validation; no request was sent.
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// The store reported a failed request.
    #[error(transparent)]
    Failed(#[from] StoreFailure),
}

// ---------------------------------------------------------------------------
// Edit modal
// ---------------------------------------------------------------------------

/// Edit modal state machine.
///
/// `Closed` → (selection) → `Open` → (submit success | cancel) → `Closed`.
/// A failed submit stays `Open` with the draft intact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditModal {
    #[default]
    Closed,
    Open { note_id: DbId, draft: NoteForm },
}

impl EditModal {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

// ---------------------------------------------------------------------------
// ViewController
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ViewController {
    add_open: bool,
    add_draft: NoteForm,
    edit: EditModal,
    delete_target: Option<Note>,
    filter_open: bool,
    filter_draft: FilterDraft,
    search_term: String,
    /// Note requested for editing (e.g. by a deep link); cleared when the
    /// edit modal closes.
    selected_note_id: Option<DbId>,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- search ----

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// The store's notes narrowed by the search term.
    pub fn visible_notes<'a, A: NotesApi>(&self, store: &'a ResourceStore<A>) -> Vec<&'a Note> {
        let term = SearchTerm::new(&self.search_term);
        store.notes().iter().filter(|n| term.matches(n)).collect()
    }

    /// [`visible_notes`](Self::visible_notes) projected for display.
    pub fn visible_cards<A: NotesApi>(&self, store: &ResourceStore<A>) -> Vec<NoteCard> {
        self.visible_notes(store)
            .into_iter()
            .map(NoteCard::from)
            .collect()
    }

    // ---- add modal ----

    pub fn is_add_modal_open(&self) -> bool {
        self.add_open
    }

    pub fn add_draft(&self) -> &NoteForm {
        &self.add_draft
    }

    pub fn add_draft_mut(&mut self) -> &mut NoteForm {
        &mut self.add_draft
    }

    pub fn open_add_modal(&mut self) {
        self.add_draft = NoteForm::default();
        self.add_open = true;
    }

    pub fn close_add_modal(&mut self) {
        self.add_open = false;
        self.add_draft = NoteForm::default();
    }

    /// Validate the add draft and create the note. Closes the modal on
    /// success; keeps it open with the draft on failure.
    pub async fn submit_add<A: NotesApi>(
        &mut self,
        store: &mut ResourceStore<A>,
    ) -> Result<(), SubmitError> {
        if !self.add_open {
            return Err(SubmitError::NothingToSubmit);
        }
        let draft = self.add_draft.to_draft();
        validate_note_draft(&draft)?;

        store.create_note(&draft).await?;
        self.close_add_modal();
        Ok(())
    }

    // ---- edit modal ----

    pub fn edit_modal(&self) -> &EditModal {
        &self.edit
    }

    /// The edit draft, while the edit modal is open.
    pub fn edit_draft_mut(&mut self) -> Option<&mut NoteForm> {
        match &mut self.edit {
            EditModal::Open { draft, .. } => Some(draft),
            EditModal::Closed => None,
        }
    }

    pub fn selected_note_id(&self) -> Option<DbId> {
        self.selected_note_id
    }

    /// Open the edit modal seeded with `note`'s current values.
    pub fn open_edit_modal(&mut self, note: &Note) {
        self.edit = EditModal::Open {
            note_id: note.id,
            draft: NoteForm::from_note(note),
        };
    }

    /// Cancel editing: reset the draft and drop any selection.
    pub fn close_edit_modal(&mut self) {
        self.edit = EditModal::Closed;
        self.selected_note_id = None;
    }

    /// Record a selection event for `id` and open the edit modal if the
    /// note is loaded.
    ///
    /// If the note is not loaded yet the selection stays pending and
    /// [`sync_selection`](Self::sync_selection) opens it once it arrives.
    /// While another note is being edited the selection is refused and
    /// the current one is kept.
    pub fn select_note<A: NotesApi>(
        &mut self,
        id: DbId,
        store: &ResourceStore<A>,
    ) -> Result<(), CoreError> {
        if let EditModal::Open { note_id, .. } = &self.edit {
            if *note_id == id {
                return Ok(());
            }
            return Err(CoreError::Conflict(format!(
                "Note {note_id} is already being edited"
            )));
        }

        self.selected_note_id = Some(id);
        if self.sync_selection(store) {
            Ok(())
        } else {
            Err(CoreError::NotFound { entity: "note", id })
        }
    }

    /// Open the edit modal for a pending selection. Returns whether it was
    /// opened by this call. Does nothing while the modal is already open.
    pub fn sync_selection<A: NotesApi>(&mut self, store: &ResourceStore<A>) -> bool {
        if self.edit.is_open() {
            return false;
        }
        let Some(note) = self.selected_note_id.and_then(|id| store.note(id)) else {
            return false;
        };
        self.open_edit_modal(note);
        true
    }

    /// Validate the edit draft and update the note. Closes the modal on
    /// success; a failure leaves it open with the draft intact.
    pub async fn submit_edit<A: NotesApi>(
        &mut self,
        store: &mut ResourceStore<A>,
    ) -> Result<(), SubmitError> {
        let EditModal::Open { note_id, draft } = &self.edit else {
            return Err(SubmitError::NothingToSubmit);
        };
        let note_id = *note_id;
        let draft = draft.to_draft();
        validate_note_draft(&draft)?;

        if let Err(failure) = store.update_note(note_id, &draft).await {
            tracing::debug!(note_id, reason = failure.reason(), "Edit submit failed, keeping draft");
            return Err(failure.into());
        }
        self.close_edit_modal();
        Ok(())
    }

    // ---- delete confirmation ----

    pub fn delete_target(&self) -> Option<&Note> {
        self.delete_target.as_ref()
    }

    pub fn open_delete_modal(&mut self, note: &Note) {
        self.delete_target = Some(note.clone());
    }

    pub fn close_delete_modal(&mut self) {
        self.delete_target = None;
    }

    /// Delete the confirmation target. Closes on success.
    pub async fn confirm_delete<A: NotesApi>(
        &mut self,
        store: &mut ResourceStore<A>,
    ) -> Result<(), SubmitError> {
        let Some(id) = self.delete_target.as_ref().map(|n| n.id) else {
            return Err(SubmitError::NothingToSubmit);
        };
        store.delete_note(id).await?;
        self.close_delete_modal();
        Ok(())
    }

    // ---- archive ----

    pub async fn archive<A: NotesApi>(
        &self,
        id: DbId,
        store: &mut ResourceStore<A>,
    ) -> MutationResult {
        store.archive_note(id).await
    }

    // ---- filter modal ----

    pub fn is_filter_modal_open(&self) -> bool {
        self.filter_open
    }

    pub fn filter_draft(&self) -> &FilterDraft {
        &self.filter_draft
    }

    pub fn filter_draft_mut(&mut self) -> &mut FilterDraft {
        &mut self.filter_draft
    }

    /// Open the filter modal. The staged draft is kept between openings.
    pub fn open_filter_modal(&mut self) {
        self.filter_open = true;
    }

    pub fn close_filter_modal(&mut self) {
        self.filter_open = false;
    }

    /// Merge the staged draft into the store's selection, load it, and
    /// close the filter modal. Returns whether the load was applied.
    pub async fn apply_filters<A: NotesApi>(&mut self, store: &mut ResourceStore<A>) -> bool {
        let selection = self.filter_draft.merge_into(store.filter());
        tracing::debug!(?selection, "Applying staged filters");
        let applied = store.apply_filter(selection).await;
        self.filter_open = false;
        applied
    }

    /// Reset the draft and load the default selection.
    pub async fn clear_filters<A: NotesApi>(&mut self, store: &mut ResourceStore<A>) -> bool {
        self.filter_draft = FilterDraft::default();
        let applied = store.reset_filter(false).await;
        self.filter_open = false;
        applied
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
