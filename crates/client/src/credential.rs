//! Injected bearer credential.
//!
//! The credential is owned by an external session collaborator, which
//! holds the [`CredentialSetter`]. The API client and the store only see
//! a [`CredentialHandle`]: they read the current value and can await it
//! becoming available, but never store or mutate it.

use std::fmt;

use tokio::sync::watch;

/// An opaque bearer token. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Create a linked setter/handle pair seeded with `initial`.
pub fn credential_channel(initial: Option<BearerToken>) -> (CredentialSetter, CredentialHandle) {
    let (tx, rx) = watch::channel(initial);
    (CredentialSetter { tx }, CredentialHandle { rx })
}

/// Write side, held by whoever owns the session.
#[derive(Debug)]
pub struct CredentialSetter {
    tx: watch::Sender<Option<BearerToken>>,
}

impl CredentialSetter {
    /// Publish a new credential (e.g. after sign-in).
    pub fn set(&self, token: BearerToken) {
        self.tx.send_replace(Some(token));
    }

    /// Withdraw the credential (e.g. after sign-out).
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

/// Read side, cloned into every consumer.
#[derive(Debug, Clone)]
pub struct CredentialHandle {
    rx: watch::Receiver<Option<BearerToken>>,
}

impl CredentialHandle {
    /// A handle whose value never changes.
    pub fn fixed(token: Option<BearerToken>) -> Self {
        let (_setter, handle) = credential_channel(token);
        handle
    }

    /// The credential as of now.
    pub fn current(&self) -> Option<BearerToken> {
        self.rx.borrow().clone()
    }

    pub fn is_available(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until a credential is present and return it.
    ///
    /// Returns immediately if one is already set. Returns `None` if the
    /// setter is dropped while no credential is set.
    pub async fn wait_until_available(&mut self) -> Option<BearerToken> {
        match self.rx.wait_for(Option::is_some).await {
            Ok(token) => (*token).clone(),
            Err(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
