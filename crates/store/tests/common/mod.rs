use std::future::pending;

use notekeeper_client::api::{CreateNoteResponse, NotesApi};
use notekeeper_client::error::ApiResult;
use notekeeper_core::filter::FilterSelection;
use notekeeper_core::models::{Category, Note, NoteDraft, Stats};
use notekeeper_core::types::DbId;
use notekeeper_store::testing::{sample_note, FakeNotesApi};
use notekeeper_store::ResourceStore;

/// A fake server holding three active notes and two categories.
pub fn seeded_api() -> FakeNotesApi {
    let mut work = sample_note(3, "Quarterly plan", 3);
    work.category_id = Some(1);
    work.category_name = Some("Work".to_string());

    FakeNotesApi::new()
        .with_notes(vec![
            work,
            sample_note(2, "Rust intro", 2),
            sample_note(1, "Go basics", 1),
        ])
        .with_categories(vec![
            Category { id: 1, name: "Work".to_string() },
            Category { id: 2, name: "Home".to_string() },
        ])
}

/// A store over [`seeded_api`] that has completed one default load.
pub async fn loaded_store() -> ResourceStore<FakeNotesApi> {
    let mut store = ResourceStore::new(seeded_api());
    let filter = store.filter().clone();
    assert!(store.load(&filter).await);
    store.api().clear_calls();
    store
}

pub fn ids(store: &ResourceStore<FakeNotesApi>) -> Vec<i64> {
    store.notes().iter().map(|n| n.id).collect()
}

/// A server that accepts every request and never answers.
pub struct UnresponsiveApi;

impl NotesApi for UnresponsiveApi {
    async fn list_notes(&self, _filter: &FilterSelection) -> ApiResult<Vec<Note>> {
        pending().await
    }

    async fn get_note(&self, _id: DbId) -> ApiResult<Note> {
        pending().await
    }

    async fn note_stats(&self) -> ApiResult<Stats> {
        pending().await
    }

    async fn create_note(&self, _draft: &NoteDraft) -> ApiResult<CreateNoteResponse> {
        pending().await
    }

    async fn update_note(&self, _id: DbId, _draft: &NoteDraft) -> ApiResult<Option<Note>> {
        pending().await
    }

    async fn delete_note(&self, _id: DbId) -> ApiResult<()> {
        pending().await
    }

    async fn archive_note(&self, _id: DbId) -> ApiResult<()> {
        pending().await
    }

    async fn unarchive_note(&self, _id: DbId) -> ApiResult<()> {
        pending().await
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        pending().await
    }

    async fn create_category(&self, _name: &str) -> ApiResult<()> {
        pending().await
    }

    async fn update_category(&self, _id: DbId, _name: &str) -> ApiResult<()> {
        pending().await
    }

    async fn delete_category(&self, _id: DbId) -> ApiResult<()> {
        pending().await
    }
}
