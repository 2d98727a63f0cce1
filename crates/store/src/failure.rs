//! Structured failures reported by the resource store.

use std::fmt;

use notekeeper_client::error::ApiError;
use serde::Serialize;

/// A store operation that talks to the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadNotes,
    LoadCategories,
    LoadStats,
    CreateNote,
    UpdateNote,
    DeleteNote,
    ArchiveNote,
    UnarchiveNote,
    CreateCategory,
    UpdateCategory,
    DeleteCategory,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadNotes => "load_notes",
            Self::LoadCategories => "load_categories",
            Self::LoadStats => "load_stats",
            Self::CreateNote => "create_note",
            Self::UpdateNote => "update_note",
            Self::DeleteNote => "delete_note",
            Self::ArchiveNote => "archive_note",
            Self::UnarchiveNote => "unarchive_note",
            Self::CreateCategory => "create_category",
            Self::UpdateCategory => "update_category",
            Self::DeleteCategory => "delete_category",
        }
    }

    /// Message shown when the server does not supply one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::LoadNotes => "Failed to load notes",
            Self::LoadCategories => "Failed to load categories",
            Self::LoadStats => "Failed to load stats",
            Self::CreateNote => "Failed to create note",
            Self::UpdateNote => "Failed to update note",
            Self::DeleteNote => "Failed to delete note",
            Self::ArchiveNote => "Failed to archive note",
            Self::UnarchiveNote => "Failed to unarchive note",
            Self::CreateCategory => "Failed to create category",
            Self::UpdateCategory => "Failed to update category",
            Self::DeleteCategory => "Failed to delete category",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a store operation failed. Local state is unchanged whenever one
/// of these is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreFailure {
    /// The API rejected (or never received) the credential.
    #[error("{reason}")]
    Unauthorized { operation: Operation, reason: String },

    /// Network failure or a non-2xx response other than 401.
    #[error("{reason}")]
    Request { operation: Operation, reason: String },
}

/// Result of a store mutation.
pub type MutationResult<T = ()> = Result<T, StoreFailure>;

impl StoreFailure {
    /// Classify an API error, preferring the server's message over the
    /// operation's fallback text.
    pub fn from_api(operation: Operation, err: &ApiError) -> Self {
        let reason = err
            .server_message()
            .unwrap_or(operation.fallback_message())
            .to_string();

        if err.is_unauthorized() {
            Self::Unauthorized { operation, reason }
        } else {
            Self::Request { operation, reason }
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Unauthorized { operation, .. } | Self::Request { operation, .. } => *operation,
        }
    }

    /// Human-readable reason suitable for display.
    pub fn reason(&self) -> &str {
        match self {
            Self::Unauthorized { reason, .. } | Self::Request { reason, .. } => reason,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
