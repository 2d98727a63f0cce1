//! Change notifications published by the resource store.
//!
//! Outer collaborators (a session manager reacting to authorization
//! failures, a renderer watching the loading flag) subscribe through
//! [`ResourceStore::subscribe`](crate::store::ResourceStore::subscribe).

use serde::Serialize;

use crate::failure::Operation;

/// Broadcast channel capacity for store events.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// A state change or failure observed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The loading flag changed.
    LoadingChanged { loading: bool },

    /// The note collection was replaced wholesale by a load.
    NotesReplaced { count: usize },

    /// The category collection was replaced by a reload.
    CategoriesReplaced { count: usize },

    /// Stats were replaced by a reload.
    StatsReplaced,

    /// The API rejected the credential. Re-authentication is left to the
    /// subscriber.
    AuthorizationFailed { operation: Operation },

    /// Any failed operation, including authorization failures.
    OperationFailed { operation: Operation, reason: String },
}
