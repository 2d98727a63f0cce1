//! View controller for the notes page.
//!
//! [`controller::ViewController`] owns transient UI state (modal
//! visibility, form drafts, the staged filter, the search term) and
//! reaches server state only through a
//! [`ResourceStore`](notekeeper_store::ResourceStore).

pub mod card;
pub mod controller;
pub mod form;

pub use controller::{EditModal, SubmitError, ViewController};
