//! In-memory [`NotesApi`] for tests.
//!
//! [`FakeNotesApi`] behaves like a small notes server: it filters
//! listings, assigns ids, and computes stats from its own data. Every
//! call is logged by name, and individual endpoints can be told to fail.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{TimeZone, Utc};
use notekeeper_client::api::{CreateNoteResponse, NotesApi};
use notekeeper_client::error::{ApiError, ApiResult};
use notekeeper_core::filter::FilterSelection;
use notekeeper_core::models::{category_name, Category, Note, NoteDraft, Stats};
use notekeeper_core::types::DbId;

/// A failure the fake can be told to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeFailure {
    Unauthorized,
    Status { status: u16, message: Option<String> },
}

impl FakeFailure {
    fn to_error(&self) -> ApiError {
        match self {
            Self::Unauthorized => ApiError::Unauthorized {
                message: Some("Invalid token".to_string()),
            },
            Self::Status { status, message } => ApiError::Api {
                status: *status,
                message: message.clone(),
            },
        }
    }
}

/// What `POST /notes` answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreateReply {
    #[default]
    FullNote,
    IdOnly,
    Empty,
}

#[derive(Debug, Default)]
struct FakeState {
    notes: Vec<Note>,
    categories: Vec<Category>,
    next_id: DbId,
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, FakeFailure>,
    create_reply: CreateReply,
    update_returns_note: bool,
}

/// Shared-handle fake notes server. Clones observe the same data.
#[derive(Debug, Clone, Default)]
pub struct FakeNotesApi {
    state: Arc<Mutex<FakeState>>,
}

/// Build a note with a fixed creation date on `day` of March 2024.
pub fn sample_note(id: DbId, title: &str, day: u32) -> Note {
    Note {
        id,
        title: title.to_string(),
        content: format!("{title} content"),
        category_id: None,
        category_name: None,
        is_archived: false,
        created_at: Utc
            .with_ymd_and_hms(2024, 3, day, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now),
    }
}

impl FakeNotesApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(self, notes: Vec<Note>) -> Self {
        {
            let mut state = self.lock();
            state.next_id = notes.iter().map(|n| n.id).max().unwrap_or(0);
            state.notes = notes;
        }
        self
    }

    pub fn with_categories(self, categories: Vec<Category>) -> Self {
        self.lock().categories = categories;
        self
    }

    pub fn set_create_reply(&self, reply: CreateReply) {
        self.lock().create_reply = reply;
    }

    pub fn set_update_returns_note(&self, returns_note: bool) {
        self.lock().update_returns_note = returns_note;
    }

    /// Make every call to `endpoint` fail until [`clear_failure`](Self::clear_failure).
    pub fn fail(&self, endpoint: &'static str, failure: FakeFailure) {
        self.lock().failures.insert(endpoint, failure);
    }

    pub fn clear_failure(&self, endpoint: &'static str) {
        self.lock().failures.remove(endpoint);
    }

    /// Endpoint names in call order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.lock().calls.iter().filter(|c| **c == endpoint).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Server-side copy of a note.
    pub fn server_note(&self, id: DbId) -> Option<Note> {
        self.lock().notes.iter().find(|n| n.id == id).cloned()
    }

    /// Server-side edit that the client does not see.
    pub fn server_edit(&self, id: DbId, title: &str) {
        if let Some(note) = self.lock().notes.iter_mut().find(|n| n.id == id) {
            note.title = title.to_string();
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Record the call and return the configured failure, if any.
    fn enter(&self, endpoint: &'static str) -> ApiResult<MutexGuard<'_, FakeState>> {
        let mut state = self.lock();
        state.calls.push(endpoint);
        match state.failures.get(endpoint) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(state),
        }
    }

    fn not_found(entity: &str) -> ApiError {
        ApiError::Api {
            status: 404,
            message: Some(format!("{entity} not found")),
        }
    }
}

fn matches_filter(note: &Note, filter: &FilterSelection) -> bool {
    if !filter.includes_archived_state(note.is_archived) {
        return false;
    }
    if filter.category_id.is_some() && note.category_id != filter.category_id {
        return false;
    }
    if let Some(range) = &filter.date_range {
        let day = note.created_at.date_naive();
        if day < range.start || day > range.end {
            return false;
        }
    }
    true
}

impl NotesApi for FakeNotesApi {
    async fn list_notes(&self, filter: &FilterSelection) -> ApiResult<Vec<Note>> {
        let state = self.enter("list_notes")?;
        Ok(state
            .notes
            .iter()
            .filter(|n| matches_filter(n, filter))
            .cloned()
            .collect())
    }

    async fn get_note(&self, id: DbId) -> ApiResult<Note> {
        let state = self.enter("get_note")?;
        state
            .notes
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found("Note"))
    }

    async fn note_stats(&self) -> ApiResult<Stats> {
        let state = self.enter("note_stats")?;
        let archived = state.notes.iter().filter(|n| n.is_archived).count();
        Ok(Stats(serde_json::json!({
            "total": state.notes.len(),
            "archived": archived,
            "active": state.notes.len() - archived,
            "categories": state.categories.len(),
        })))
    }

    async fn create_note(&self, draft: &NoteDraft) -> ApiResult<CreateNoteResponse> {
        let mut state = self.enter("create_note")?;
        state.next_id += 1;
        let note = Note {
            id: state.next_id,
            title: draft.title.clone(),
            content: draft.content.clone(),
            category_id: draft.category_id,
            category_name: category_name(&state.categories, draft.category_id),
            is_archived: false,
            created_at: Utc::now(),
        };
        state.notes.insert(0, note.clone());

        Ok(match state.create_reply {
            CreateReply::FullNote => CreateNoteResponse {
                note: Some(note),
                note_id: None,
            },
            CreateReply::IdOnly => CreateNoteResponse {
                note: None,
                note_id: Some(note.id),
            },
            CreateReply::Empty => CreateNoteResponse::default(),
        })
    }

    async fn update_note(&self, id: DbId, draft: &NoteDraft) -> ApiResult<Option<Note>> {
        let mut state = self.enter("update_note")?;
        let name = category_name(&state.categories, draft.category_id);
        let returns_note = state.update_returns_note;
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Self::not_found("Note"))?;
        note.apply_draft(draft, name);
        Ok(returns_note.then(|| note.clone()))
    }

    async fn delete_note(&self, id: DbId) -> ApiResult<()> {
        let mut state = self.enter("delete_note")?;
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        if state.notes.len() == before {
            return Err(Self::not_found("Note"));
        }
        Ok(())
    }

    async fn archive_note(&self, id: DbId) -> ApiResult<()> {
        let mut state = self.enter("archive_note")?;
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Self::not_found("Note"))?;
        note.is_archived = true;
        Ok(())
    }

    async fn unarchive_note(&self, id: DbId) -> ApiResult<()> {
        let mut state = self.enter("unarchive_note")?;
        let note = state
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| Self::not_found("Note"))?;
        note.is_archived = false;
        Ok(())
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let state = self.enter("list_categories")?;
        Ok(state.categories.clone())
    }

    async fn create_category(&self, name: &str) -> ApiResult<()> {
        let mut state = self.enter("create_category")?;
        let id = state.categories.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        state.categories.push(Category {
            id,
            name: name.to_string(),
        });
        Ok(())
    }

    async fn update_category(&self, id: DbId, name: &str) -> ApiResult<()> {
        let mut state = self.enter("update_category")?;
        let category = state
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| Self::not_found("Category"))?;
        category.name = name.to_string();
        Ok(())
    }

    async fn delete_category(&self, id: DbId) -> ApiResult<()> {
        let mut state = self.enter("delete_category")?;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Err(Self::not_found("Category"));
        }
        Ok(())
    }
}
