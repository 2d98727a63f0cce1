//! Integration tests for [`ViewController`] driving a store over the
//! in-memory API.

use assert_matches::assert_matches;
use chrono::NaiveDate;
use notekeeper_core::error::CoreError;
use notekeeper_core::filter::{DateRange, FilterSelection};
use notekeeper_core::models::Category;
use notekeeper_store::testing::{sample_note, FakeFailure, FakeNotesApi};
use notekeeper_store::{ResourceStore, StoreFailure};
use notekeeper_view::form::NoteForm;
use notekeeper_view::{EditModal, SubmitError, ViewController};

async fn page() -> (ViewController, ResourceStore<FakeNotesApi>) {
    let mut rust = sample_note(2, "Rust intro", 2);
    rust.category_id = Some(1);
    rust.category_name = Some("Work".to_string());

    let api = FakeNotesApi::new()
        .with_notes(vec![rust, sample_note(1, "Go basics", 1)])
        .with_categories(vec![Category {
            id: 1,
            name: "Work".to_string(),
        }]);
    let mut store = ResourceStore::new(api);
    assert!(store.load(&FilterSelection::default()).await);
    store.api().clear_calls();

    (ViewController::new(), store)
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_filters_locally_without_requests() {
    let (mut view, store) = page().await;

    view.set_search_term("go");
    let titles: Vec<&str> = view
        .visible_notes(&store)
        .iter()
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Go basics"]);

    view.set_search_term("WORK");
    assert_eq!(view.visible_cards(&store)[0].title, "Rust intro");

    view.set_search_term("");
    assert_eq!(view.visible_notes(&store).len(), 2);

    assert!(store.api().calls().is_empty());
}

// ---------------------------------------------------------------------------
// Add modal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_submit_creates_note_and_closes() {
    let (mut view, mut store) = page().await;

    view.open_add_modal();
    *view.add_draft_mut() = NoteForm {
        title: "Shopping".into(),
        content: "milk".into(),
        category_id: None,
    };
    view.submit_add(&mut store).await.unwrap();

    assert!(!view.is_add_modal_open());
    assert_eq!(view.add_draft(), &NoteForm::default());
    assert_eq!(store.notes()[0].title, "Shopping");
}

#[tokio::test]
async fn invalid_add_draft_sends_nothing() {
    let (mut view, mut store) = page().await;

    view.open_add_modal();
    view.add_draft_mut().title = "   ".into();
    view.add_draft_mut().content = "body".into();
    let err = view.submit_add(&mut store).await.unwrap_err();

    assert_matches!(err, SubmitError::Invalid(CoreError::Validation(_)));
    assert!(view.is_add_modal_open());
    assert!(store.api().calls().is_empty());
}

#[tokio::test]
async fn failed_add_keeps_modal_and_draft() {
    let (mut view, mut store) = page().await;
    store.api().fail(
        "create_note",
        FakeFailure::Status {
            status: 500,
            message: None,
        },
    );

    view.open_add_modal();
    view.add_draft_mut().title = "Keep me".into();
    view.add_draft_mut().content = "please".into();
    let err = view.submit_add(&mut store).await.unwrap_err();

    assert_matches!(err, SubmitError::Failed(ref f) if f.reason() == "Failed to create note");
    assert!(view.is_add_modal_open());
    assert_eq!(view.add_draft().title, "Keep me");
}

#[tokio::test]
async fn submit_with_closed_modal_is_rejected() {
    let (mut view, mut store) = page().await;

    assert_matches!(
        view.submit_add(&mut store).await,
        Err(SubmitError::NothingToSubmit)
    );
    assert_matches!(
        view.submit_edit(&mut store).await,
        Err(SubmitError::NothingToSubmit)
    );
    assert_matches!(
        view.confirm_delete(&mut store).await,
        Err(SubmitError::NothingToSubmit)
    );
}

// ---------------------------------------------------------------------------
// Edit modal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn selecting_a_note_opens_edit_with_its_values() {
    let (mut view, store) = page().await;

    view.select_note(2, &store).unwrap();

    assert_eq!(
        view.edit_modal(),
        &EditModal::Open {
            note_id: 2,
            draft: NoteForm {
                title: "Rust intro".into(),
                content: "Rust intro content".into(),
                category_id: Some(1),
            },
        }
    );
    assert_eq!(view.selected_note_id(), Some(2));
}

#[tokio::test]
async fn pending_selection_opens_after_load() {
    let api = FakeNotesApi::new().with_notes(vec![sample_note(5, "Old idea", 5)]);
    let mut store = ResourceStore::new(api);
    let mut view = ViewController::new();

    let err = view.select_note(5, &store).unwrap_err();
    assert_matches!(err, CoreError::NotFound { id: 5, .. });
    assert!(!view.edit_modal().is_open());
    assert_eq!(view.selected_note_id(), Some(5));

    assert!(store.load(&FilterSelection::default()).await);

    assert!(view.sync_selection(&store));
    assert_matches!(view.edit_modal(), EditModal::Open { note_id: 5, .. });
    assert!(!view.sync_selection(&store));
}

#[tokio::test]
async fn failed_edit_stays_open_with_draft() {
    let (mut view, mut store) = page().await;
    store.api().fail(
        "update_note",
        FakeFailure::Status {
            status: 409,
            message: Some("Note was modified".into()),
        },
    );

    view.select_note(1, &store).unwrap();
    view.edit_draft_mut().unwrap().title = "Go advanced".into();
    let err = view.submit_edit(&mut store).await.unwrap_err();

    assert_matches!(err, SubmitError::Failed(StoreFailure::Request { .. }));
    assert_matches!(
        view.edit_modal(),
        EditModal::Open { note_id: 1, draft } if draft.title == "Go advanced"
    );
    assert_eq!(store.note(1).unwrap().title, "Go basics");

    store.api().clear_failure("update_note");
    view.submit_edit(&mut store).await.unwrap();

    assert_eq!(view.edit_modal(), &EditModal::Closed);
    assert_eq!(view.selected_note_id(), None);
    assert_eq!(store.note(1).unwrap().title, "Go advanced");
}

#[tokio::test]
async fn cancel_edit_discards_draft() {
    let (mut view, store) = page().await;

    view.select_note(1, &store).unwrap();
    view.edit_draft_mut().unwrap().content = "scratch".into();
    view.close_edit_modal();
    view.select_note(1, &store).unwrap();

    assert_matches!(
        view.edit_modal(),
        EditModal::Open { draft, .. } if draft.content == "Go basics content"
    );
}

#[tokio::test]
async fn selecting_another_note_while_editing_is_refused() {
    let (mut view, store) = page().await;

    view.select_note(1, &store).unwrap();
    view.edit_draft_mut().unwrap().title = "Go in depth".into();

    let err = view.select_note(2, &store).unwrap_err();
    assert_matches!(err, CoreError::Conflict(_));
    assert_eq!(view.selected_note_id(), Some(1));
    assert_matches!(
        view.edit_modal(),
        EditModal::Open { note_id: 1, draft } if draft.title == "Go in depth"
    );

    view.select_note(1, &store).unwrap();
    assert_matches!(
        view.edit_modal(),
        EditModal::Open { draft, .. } if draft.title == "Go in depth"
    );
}

// ---------------------------------------------------------------------------
// Delete and archive
// ---------------------------------------------------------------------------

#[tokio::test]
async fn confirm_delete_removes_note_and_closes() {
    let (mut view, mut store) = page().await;
    let target = store.note(2).unwrap().clone();

    view.open_delete_modal(&target);
    view.confirm_delete(&mut store).await.unwrap();

    assert!(view.delete_target().is_none());
    assert!(store.note(2).is_none());
}

#[tokio::test]
async fn failed_delete_keeps_target() {
    let (mut view, mut store) = page().await;
    let target = store.note(2).unwrap().clone();
    store.api().fail("delete_note", FakeFailure::Unauthorized);

    view.open_delete_modal(&target);
    let err = view.confirm_delete(&mut store).await.unwrap_err();

    assert_matches!(err, SubmitError::Failed(ref f) if f.is_unauthorized());
    assert_eq!(view.delete_target().map(|n| n.id), Some(2));
    assert!(store.note(2).is_some());
}

#[tokio::test]
async fn archive_removes_from_active_list() {
    let (view, mut store) = page().await;

    view.archive(1, &mut store).await.unwrap();

    assert!(view.visible_notes(&store).iter().all(|n| n.id != 1));
}

// ---------------------------------------------------------------------------
// Filter modal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn staged_filter_has_no_effect_until_applied() {
    let (mut view, mut store) = page().await;

    view.open_filter_modal();
    view.filter_draft_mut().category_id = Some(1);
    view.filter_draft_mut().start_date = Some(date(1));
    view.filter_draft_mut().end_date = Some(date(31));

    assert!(store.api().calls().is_empty());
    assert_eq!(store.filter(), &FilterSelection::default());
    assert_eq!(store.notes().len(), 2);

    assert!(view.apply_filters(&mut store).await);

    assert!(!view.is_filter_modal_open());
    assert_eq!(store.api().call_count("list_notes"), 1);
    assert_eq!(
        store.filter(),
        &FilterSelection {
            category_id: Some(1),
            is_archived: false,
            date_range: Some(DateRange::new(date(1), date(31))),
        }
    );
    assert_eq!(store.notes().iter().map(|n| n.id).collect::<Vec<_>>(), vec![2]);
}

#[tokio::test]
async fn half_filled_date_range_is_not_applied() {
    let (mut view, mut store) = page().await;

    view.filter_draft_mut().start_date = Some(date(2));
    view.apply_filters(&mut store).await;

    assert_eq!(store.filter().date_range, None);
    assert_eq!(store.notes().len(), 2);
}

#[tokio::test]
async fn clear_filters_resets_draft_and_selection() {
    let (mut view, mut store) = page().await;
    view.filter_draft_mut().category_id = Some(1);
    view.apply_filters(&mut store).await;

    view.clear_filters(&mut store).await;

    assert_eq!(view.filter_draft().category_id, None);
    assert_eq!(store.filter(), &FilterSelection::default());
    assert_eq!(store.notes().len(), 2);
}

#[tokio::test]
async fn filter_edits_do_not_touch_open_edit_draft() {
    let (mut view, store) = page().await;

    view.select_note(2, &store).unwrap();
    view.open_filter_modal();
    view.filter_draft_mut().category_id = Some(99);

    assert_matches!(
        view.edit_modal(),
        EditModal::Open { draft, .. } if draft.category_id == Some(1)
    );
}
