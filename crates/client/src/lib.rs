//! HTTP client for the notes REST API.
//!
//! [`api::NotesApi`] is the capability the resource store depends on;
//! [`api::HttpNotesApi`] implements it over [`reqwest`] with bearer
//! authentication supplied by an injected [`credential::CredentialHandle`].

pub mod api;
pub mod config;
pub mod credential;
pub mod error;
