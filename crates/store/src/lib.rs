//! Client-side resource store for notes, categories, and stats.
//!
//! [`store::ResourceStore`] is the single writer of the three
//! server-derived collections. Every mutation goes through the
//! [`NotesApi`](notekeeper_client::api::NotesApi) capability and is
//! applied locally only after the server confirms it.

pub mod events;
pub mod failure;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use failure::{MutationResult, Operation, StoreFailure};
pub use store::ResourceStore;
