//! The resource store: local view of notes, categories, and stats.
//!
//! All operations take `&mut self`, so at most one request sequence is
//! in flight per store and a second mutation cannot start until the
//! first resolves. Callers that share a store across tasks wrap it in a
//! `tokio::sync::Mutex`. Dropping an operation's future before it
//! resolves discards the response without touching local state; the
//! loading flag is cleared on the way out.

use notekeeper_client::api::NotesApi;
use notekeeper_client::credential::CredentialHandle;
use notekeeper_client::error::ApiError;
use notekeeper_core::filter::FilterSelection;
use notekeeper_core::models::{category_name, Category, Note, NoteDraft, Stats};
use notekeeper_core::types::DbId;
use tokio::sync::broadcast;

use crate::events::{StoreEvent, EVENT_CHANNEL_CAPACITY};
use crate::failure::{MutationResult, Operation, StoreFailure};

/// In-memory view of the server's notes, categories, and stats.
pub struct ResourceStore<A> {
    api: A,
    notes: Vec<Note>,
    categories: Vec<Category>,
    stats: Option<Stats>,
    loading: bool,
    filter: FilterSelection,
    /// Most recent failed load; cleared by the next successful load.
    last_failure: Option<StoreFailure>,
    events: broadcast::Sender<StoreEvent>,
}

impl<A: NotesApi> ResourceStore<A> {
    /// Create an empty store with the default (active notes) selection.
    pub fn new(api: A) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            notes: Vec::new(),
            categories: Vec::new(),
            stats: None,
            loading: false,
            filter: FilterSelection::default(),
            last_failure: None,
            events,
        }
    }

    // ---- read access ----

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn note(&self, id: DbId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The current filter selection (possibly not yet applied).
    pub fn filter(&self) -> &FilterSelection {
        &self.filter
    }

    pub fn last_failure(&self) -> Option<&StoreFailure> {
        self.last_failure.as_ref()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // ---- loads ----

    /// Wait for the injected credential, then load with the default
    /// selection.
    ///
    /// Returns `false` without issuing requests if the credential source
    /// goes away before a credential appears.
    pub async fn initial_load(&mut self, credentials: &mut CredentialHandle) -> bool {
        if credentials.wait_until_available().await.is_none() {
            tracing::warn!("Credential source closed before a credential was provided");
            return false;
        }
        tracing::info!("Credential available, running initial load");

        let filter = FilterSelection::default();
        self.filter = filter.clone();
        self.load(&filter).await
    }

    /// Fetch notes for `filter`, categories, and stats, and replace all
    /// three collections.
    ///
    /// Nothing is applied unless all three requests succeed. On failure the
    /// prior state is kept and the failure is recorded in
    /// [`last_failure`](Self::last_failure). Returns whether the new state
    /// was applied.
    pub async fn load(&mut self, filter: &FilterSelection) -> bool {
        tracing::debug!(?filter, "Loading notes, categories, and stats");

        let (notes, categories, stats) = {
            let Self {
                api,
                loading,
                events,
                ..
            } = &mut *self;
            let _loading = LoadingGuard::start(loading, events);
            tokio::join!(
                api.list_notes(filter),
                api.list_categories(),
                api.note_stats(),
            )
        };

        let first_error = [
            (Operation::LoadNotes, notes.as_ref().err()),
            (Operation::LoadCategories, categories.as_ref().err()),
            (Operation::LoadStats, stats.as_ref().err()),
        ]
        .into_iter()
        .find_map(|(operation, err)| err.map(|e| (operation, e)));

        if let Some((operation, err)) = first_error {
            self.record_load_failure(operation, err);
            return false;
        }

        if let (Ok(notes), Ok(categories), Ok(stats)) = (notes, categories, stats) {
            self.replace_notes(notes);
            self.replace_categories(categories);
            self.replace_stats(stats);
        }
        self.last_failure = None;
        true
    }

    /// Replace the filter selection. Never fetches.
    pub fn set_filter(&mut self, selection: FilterSelection) {
        tracing::debug!(?selection, "Filter selection updated (not applied)");
        self.filter = selection;
    }

    /// Replace the filter selection and load with it.
    pub async fn apply_filter(&mut self, selection: FilterSelection) -> bool {
        self.set_filter(selection.clone());
        self.load(&selection).await
    }

    /// Reset to the default selection with the given archived flag, then
    /// load.
    pub async fn reset_filter(&mut self, is_archived: bool) -> bool {
        self.apply_filter(FilterSelection::archived(is_archived)).await
    }

    /// Reload notes for the current selection, categories, and stats.
    ///
    /// Unlike [`load`](Self::load), each collection is applied on its own:
    /// a failed stats request does not prevent fresh notes from landing.
    pub async fn refresh(&mut self) {
        let filter = self.filter.clone();
        tracing::debug!(?filter, "Refreshing from server");

        let (notes, categories, stats) = {
            let Self {
                api,
                loading,
                events,
                ..
            } = &mut *self;
            let _loading = LoadingGuard::start(loading, events);
            tokio::join!(
                api.list_notes(&filter),
                api.list_categories(),
                api.note_stats(),
            )
        };

        match notes {
            Ok(notes) => {
                self.replace_notes(notes);
                self.last_failure = None;
            }
            Err(e) => self.record_load_failure(Operation::LoadNotes, &e),
        }
        match categories {
            Ok(categories) => self.replace_categories(categories),
            Err(e) => self.record_load_failure(Operation::LoadCategories, &e),
        }
        match stats {
            Ok(stats) => self.replace_stats(stats),
            Err(e) => self.record_load_failure(Operation::LoadStats, &e),
        }
    }

    /// Reload the full category collection.
    pub async fn reload_categories(&mut self) -> bool {
        match self.api.list_categories().await {
            Ok(categories) => {
                self.replace_categories(categories);
                true
            }
            Err(e) => {
                self.record_load_failure(Operation::LoadCategories, &e);
                false
            }
        }
    }

    /// Reload stats.
    pub async fn reload_stats(&mut self) -> bool {
        match self.api.note_stats().await {
            Ok(stats) => {
                self.replace_stats(stats);
                true
            }
            Err(e) => {
                self.record_load_failure(Operation::LoadStats, &e);
                false
            }
        }
    }

    // ---- note mutations ----

    /// Create a note and prepend it to the collection.
    ///
    /// When the server answers with only the new id, the note is fetched
    /// separately. If that fetch fails the creation still counts as a
    /// success; the note shows up on the next load.
    pub async fn create_note(&mut self, draft: &NoteDraft) -> MutationResult {
        let response = match self.api.create_note(draft).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail(Operation::CreateNote, &e)),
        };

        let created = match (response.note, response.note_id) {
            (Some(note), _) => Some(note),
            (None, Some(id)) => match self.api.get_note(id).await {
                Ok(note) => Some(note),
                Err(e) => {
                    tracing::warn!(note_id = id, error = %e, "Created note could not be fetched");
                    None
                }
            },
            (None, None) => {
                tracing::warn!("Create response carried neither a note nor an id");
                None
            }
        };

        if let Some(note) = created {
            tracing::info!(note_id = note.id, "Note created");
            self.notes.retain(|n| n.id != note.id);
            self.notes.insert(0, note);
        }

        self.reload_stats().await;
        Ok(())
    }

    /// Update a note, replacing the local copy in place.
    ///
    /// If the server does not return the updated note, the draft is merged
    /// into the local copy. That merge is not reconciled with the server
    /// and can drift under concurrent edits from another session.
    pub async fn update_note(&mut self, id: DbId, draft: &NoteDraft) -> MutationResult {
        let updated = match self.api.update_note(id, draft).await {
            Ok(updated) => updated,
            Err(e) => return Err(self.fail(Operation::UpdateNote, &e)),
        };

        match updated {
            Some(note) => {
                if let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) {
                    *slot = note;
                }
            }
            None => {
                let name = category_name(&self.categories, draft.category_id);
                if let Some(slot) = self.notes.iter_mut().find(|n| n.id == id) {
                    slot.apply_draft(draft, name);
                }
            }
        }

        tracing::info!(note_id = id, "Note updated");
        Ok(())
    }

    /// Delete a note and drop it from the collection.
    pub async fn delete_note(&mut self, id: DbId) -> MutationResult {
        if let Err(e) = self.api.delete_note(id).await {
            return Err(self.fail(Operation::DeleteNote, &e));
        }

        self.notes.retain(|n| n.id != id);
        tracing::info!(note_id = id, "Note deleted");

        self.reload_stats().await;
        Ok(())
    }

    /// Archive a note. It leaves the collection when the current selection
    /// shows active notes.
    pub async fn archive_note(&mut self, id: DbId) -> MutationResult {
        if let Err(e) = self.api.archive_note(id).await {
            return Err(self.fail(Operation::ArchiveNote, &e));
        }
        self.apply_archived_state(id, true);
        self.reload_stats().await;
        Ok(())
    }

    /// Unarchive a note. It leaves the collection when the current
    /// selection shows archived notes.
    pub async fn unarchive_note(&mut self, id: DbId) -> MutationResult {
        if let Err(e) = self.api.unarchive_note(id).await {
            return Err(self.fail(Operation::UnarchiveNote, &e));
        }
        self.apply_archived_state(id, false);
        self.reload_stats().await;
        Ok(())
    }

    // ---- category mutations ----

    /// Create a category, then reload all categories from the server.
    pub async fn create_category(&mut self, name: &str) -> MutationResult {
        if let Err(e) = self.api.create_category(name).await {
            return Err(self.fail(Operation::CreateCategory, &e));
        }
        tracing::info!(name, "Category created");
        self.reload_categories().await;
        Ok(())
    }

    /// Rename a category, then reload all categories from the server.
    pub async fn update_category(&mut self, id: DbId, name: &str) -> MutationResult {
        if let Err(e) = self.api.update_category(id, name).await {
            return Err(self.fail(Operation::UpdateCategory, &e));
        }
        tracing::info!(category_id = id, name, "Category renamed");
        self.reload_categories().await;
        Ok(())
    }

    /// Delete a category, then reload all categories from the server.
    pub async fn delete_category(&mut self, id: DbId) -> MutationResult {
        if let Err(e) = self.api.delete_category(id).await {
            return Err(self.fail(Operation::DeleteCategory, &e));
        }
        tracing::info!(category_id = id, "Category deleted");
        self.reload_categories().await;
        Ok(())
    }

    // ---- private helpers ----

    fn apply_archived_state(&mut self, id: DbId, is_archived: bool) {
        if self.filter.includes_archived_state(is_archived) {
            if let Some(note) = self.notes.iter_mut().find(|n| n.id == id) {
                note.is_archived = is_archived;
            }
        } else {
            self.notes.retain(|n| n.id != id);
        }
        tracing::info!(note_id = id, is_archived, "Note archive state changed");
    }

    fn replace_notes(&mut self, notes: Vec<Note>) {
        let count = notes.len();
        self.notes = notes;
        self.publish(StoreEvent::NotesReplaced { count });
    }

    fn replace_categories(&mut self, categories: Vec<Category>) {
        let count = categories.len();
        self.categories = categories;
        self.publish(StoreEvent::CategoriesReplaced { count });
    }

    fn replace_stats(&mut self, stats: Stats) {
        self.stats = Some(stats);
        self.publish(StoreEvent::StatsReplaced);
    }

    /// Log and publish a mutation failure, returning it for the caller.
    fn fail(&self, operation: Operation, err: &ApiError) -> StoreFailure {
        let failure = StoreFailure::from_api(operation, err);
        self.log_api_error(operation, err);
        self.report(&failure);
        failure
    }

    fn record_load_failure(&mut self, operation: Operation, err: &ApiError) {
        let failure = StoreFailure::from_api(operation, err);
        self.log_api_error(operation, err);
        self.report(&failure);
        self.last_failure = Some(failure);
    }

    fn log_api_error(&self, operation: Operation, err: &ApiError) {
        if err.is_unauthorized() {
            tracing::warn!(%operation, error = %err, "Notes API rejected the credential");
        } else {
            tracing::error!(%operation, error = %err, "Notes API request failed");
        }
    }

    fn report(&self, failure: &StoreFailure) {
        let operation = failure.operation();
        if failure.is_unauthorized() {
            self.publish(StoreEvent::AuthorizationFailed { operation });
        }
        self.publish(StoreEvent::OperationFailed {
            operation,
            reason: failure.reason().to_string(),
        });
    }

    fn publish(&self, event: StoreEvent) {
        // Zero receivers is not an error.
        let _ = self.events.send(event);
    }
}

/// Holds the loading flag up for the duration of a request batch and
/// clears it on drop, including when the owning future is cancelled.
struct LoadingGuard<'a> {
    loading: &'a mut bool,
    events: &'a broadcast::Sender<StoreEvent>,
}

impl<'a> LoadingGuard<'a> {
    fn start(loading: &'a mut bool, events: &'a broadcast::Sender<StoreEvent>) -> Self {
        if !*loading {
            *loading = true;
            let _ = events.send(StoreEvent::LoadingChanged { loading: true });
        }
        Self { loading, events }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if *self.loading {
            *self.loading = false;
            let _ = self.events.send(StoreEvent::LoadingChanged { loading: false });
        }
    }
}
