//! Shared data model for the notekeeper client.
//!
//! Holds the entity types exchanged with the notes API, the filter
//! selection and its query encoding, local search matching, and the
//! form-layer validation helpers.

pub mod error;
pub mod filter;
pub mod models;
pub mod search;
pub mod types;
pub mod validation;
