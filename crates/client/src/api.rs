//! REST API client for the notes service.
//!
//! [`NotesApi`] describes every endpoint the resource store consumes.
//! [`HttpNotesApi`] implements it over [`reqwest`], attaching the
//! injected bearer credential to each request.

use std::future::Future;

use notekeeper_core::filter::FilterSelection;
use notekeeper_core::models::{Category, Note, NoteDraft, Stats};
use notekeeper_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::credential::CredentialHandle;
use crate::error::{ApiError, ApiResult};

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct NotesEnvelope {
    notes: Vec<Note>,
}

#[derive(Debug, Deserialize)]
struct NoteEnvelope {
    note: Note,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    stats: Stats,
}

#[derive(Debug, Deserialize)]
struct CategoriesEnvelope {
    categories: Vec<Category>,
}

#[derive(Debug, Default, Deserialize)]
struct UpdateNoteResponse {
    note: Option<Note>,
}

/// Response of `POST /notes`.
///
/// The server returns either the created note, only its id, or both.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreateNoteResponse {
    pub note: Option<Note>,
    #[serde(rename = "noteId")]
    pub note_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// ---------------------------------------------------------------------------
// NotesApi
// ---------------------------------------------------------------------------

/// The remote notes API as seen by the resource store.
pub trait NotesApi: Send + Sync {
    /// `GET /notes` scoped by `filter`.
    fn list_notes(
        &self,
        filter: &FilterSelection,
    ) -> impl Future<Output = ApiResult<Vec<Note>>> + Send;

    /// `GET /notes/{id}`.
    fn get_note(&self, id: DbId) -> impl Future<Output = ApiResult<Note>> + Send;

    /// `GET /notes/stats`.
    fn note_stats(&self) -> impl Future<Output = ApiResult<Stats>> + Send;

    /// `POST /notes`.
    fn create_note(
        &self,
        draft: &NoteDraft,
    ) -> impl Future<Output = ApiResult<CreateNoteResponse>> + Send;

    /// `PUT /notes/{id}`. Returns the server's updated note when it sends one.
    fn update_note(
        &self,
        id: DbId,
        draft: &NoteDraft,
    ) -> impl Future<Output = ApiResult<Option<Note>>> + Send;

    /// `DELETE /notes/{id}`.
    fn delete_note(&self, id: DbId) -> impl Future<Output = ApiResult<()>> + Send;

    /// `PUT /notes/{id}/archive`.
    fn archive_note(&self, id: DbId) -> impl Future<Output = ApiResult<()>> + Send;

    /// `PUT /notes/{id}/unarchive`.
    fn unarchive_note(&self, id: DbId) -> impl Future<Output = ApiResult<()>> + Send;

    /// `GET /categories`.
    fn list_categories(&self) -> impl Future<Output = ApiResult<Vec<Category>>> + Send;

    /// `POST /categories`.
    fn create_category(&self, name: &str) -> impl Future<Output = ApiResult<()>> + Send;

    /// `PUT /categories/{id}`.
    fn update_category(&self, id: DbId, name: &str)
        -> impl Future<Output = ApiResult<()>> + Send;

    /// `DELETE /categories/{id}`.
    fn delete_category(&self, id: DbId) -> impl Future<Output = ApiResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// HttpNotesApi
// ---------------------------------------------------------------------------

/// HTTP client for a notes server.
pub struct HttpNotesApi {
    client: reqwest::Client,
    api_url: String,
    credentials: CredentialHandle,
}

impl HttpNotesApi {
    /// Build a client from configuration, applying the request timeout.
    pub fn new(config: &ClientConfig, credentials: CredentialHandle) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone(), credentials))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// * `api_url` - Base URL including the `/api` prefix.
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        credentials: CredentialHandle,
    ) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            credentials,
        }
    }

    /// Base URL this client targets.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Attach the bearer credential and send. Fails without sending when
    /// no credential is available.
    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<reqwest::Response> {
        let Some(token) = self.credentials.current() else {
            return Err(ApiError::Unauthorized {
                message: Some("No credential available".to_string()),
            });
        };

        let response = request.bearer_auth(token.expose()).send().await?;
        Self::ensure_success(response).await
    }

    /// Map non-2xx responses to [`ApiError`], extracting the server's
    /// `message` field when the body carries one.
    async fn ensure_success(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized { message });
        }
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Parse a required JSON body.
    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        Ok(response.json::<T>().await?)
    }

    /// Parse a body the server may omit. An empty or unrecognised body
    /// yields `T::default()`; the write itself already succeeded.
    async fn parse_optional<T: DeserializeOwned + Default>(
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let url = response.url().path().to_string();
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        match serde_json::from_str(&body) {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                tracing::warn!(
                    path = %url,
                    error = %e,
                    "Write succeeded but its response body could not be parsed",
                );
                Ok(T::default())
            }
        }
    }
}

impl NotesApi for HttpNotesApi {
    async fn list_notes(&self, filter: &FilterSelection) -> ApiResult<Vec<Note>> {
        let request = self
            .client
            .get(self.url("/notes"))
            .query(&filter.query_pairs());
        let response = self.send(request).await?;
        let envelope: NotesEnvelope = Self::parse_response(response).await?;
        Ok(envelope.notes)
    }

    async fn get_note(&self, id: DbId) -> ApiResult<Note> {
        let request = self.client.get(self.url(&format!("/notes/{id}")));
        let response = self.send(request).await?;
        let envelope: NoteEnvelope = Self::parse_response(response).await?;
        Ok(envelope.note)
    }

    async fn note_stats(&self) -> ApiResult<Stats> {
        let request = self.client.get(self.url("/notes/stats"));
        let response = self.send(request).await?;
        let envelope: StatsEnvelope = Self::parse_response(response).await?;
        Ok(envelope.stats)
    }

    async fn create_note(&self, draft: &NoteDraft) -> ApiResult<CreateNoteResponse> {
        let request = self.client.post(self.url("/notes")).json(draft);
        let response = self.send(request).await?;
        Self::parse_optional(response).await
    }

    async fn update_note(&self, id: DbId, draft: &NoteDraft) -> ApiResult<Option<Note>> {
        let request = self.client.put(self.url(&format!("/notes/{id}"))).json(draft);
        let response = self.send(request).await?;
        let parsed: UpdateNoteResponse = Self::parse_optional(response).await?;
        Ok(parsed.note)
    }

    async fn delete_note(&self, id: DbId) -> ApiResult<()> {
        let request = self.client.delete(self.url(&format!("/notes/{id}")));
        self.send(request).await?;
        Ok(())
    }

    async fn archive_note(&self, id: DbId) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/notes/{id}/archive")))
            .json(&serde_json::json!({}));
        self.send(request).await?;
        Ok(())
    }

    async fn unarchive_note(&self, id: DbId) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/notes/{id}/unarchive")))
            .json(&serde_json::json!({}));
        self.send(request).await?;
        Ok(())
    }

    async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let request = self.client.get(self.url("/categories"));
        let response = self.send(request).await?;
        let envelope: CategoriesEnvelope = Self::parse_response(response).await?;
        Ok(envelope.categories)
    }

    async fn create_category(&self, name: &str) -> ApiResult<()> {
        let request = self
            .client
            .post(self.url("/categories"))
            .json(&serde_json::json!({ "name": name }));
        self.send(request).await?;
        Ok(())
    }

    async fn update_category(&self, id: DbId, name: &str) -> ApiResult<()> {
        let request = self
            .client
            .put(self.url(&format!("/categories/{id}")))
            .json(&serde_json::json!({ "name": name }));
        self.send(request).await?;
        Ok(())
    }

    async fn delete_category(&self, id: DbId) -> ApiResult<()> {
        let request = self.client.delete(self.url(&format!("/categories/{id}")));
        self.send(request).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
