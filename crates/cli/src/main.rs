//! `notekeeper` -- terminal front end for the notes API.
//!
//! Loads notes, categories, and stats through the resource store, applies
//! an optional local search, and prints the resulting note cards.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default                     | Description                    |
//! |------------------------------|----------|-----------------------------|--------------------------------|
//! | `NOTES_API_URL`              | no       | `http://localhost:5001/api` | Base URL of the notes API      |
//! | `NOTES_API_TOKEN`            | yes      | --                          | Bearer token for every request |
//! | `NOTES_REQUEST_TIMEOUT_SECS` | no       | `30`                        | Per-request timeout            |
//! | `NOTES_SHOW_ARCHIVED`        | no       | `false`                     | List archived notes instead    |
//!
//! Usage: `notekeeper [SEARCH]`

mod options;
mod render;

use anyhow::{bail, Context};
use notekeeper_client::api::HttpNotesApi;
use notekeeper_client::config::ClientConfig;
use notekeeper_client::credential::CredentialHandle;
use notekeeper_store::events::StoreEvent;
use notekeeper_store::ResourceStore;
use notekeeper_view::ViewController;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use options::Options;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notekeeper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = ClientConfig::from_env().context("Invalid notes API configuration")?;
    let options = Options::from_env().context("Invalid command line")?;
    tracing::info!(
        api_url = %config.api_url,
        timeout_secs = config.request_timeout.as_secs(),
        show_archived = options.show_archived,
        "Loaded client configuration",
    );

    let mut credentials = CredentialHandle::fixed(config.api_token.clone());
    if !credentials.is_available() {
        bail!("NOTES_API_TOKEN must be set");
    }

    // --- Store ---
    let api = HttpNotesApi::new(&config, credentials.clone())
        .context("Failed to build HTTP client")?;
    let mut store = ResourceStore::new(api);
    let event_log = tokio::spawn(log_events(store.subscribe()));

    let loaded = if options.show_archived {
        store.reset_filter(true).await
    } else {
        store.initial_load(&mut credentials).await
    };
    if !loaded {
        let reason = store
            .last_failure()
            .map(|failure| failure.reason().to_string())
            .unwrap_or_else(|| "no credential available".to_string());
        bail!("Failed to load notes: {reason}");
    }

    // --- Render ---
    let mut view = ViewController::new();
    view.set_search_term(options.search);

    if let Some(summary) = render::render_stats(store.stats()) {
        println!("{summary}\n");
    }
    print!("{}", render::render_cards(&view.visible_cards(&store)));

    drop(store);
    let _ = event_log.await;
    Ok(())
}

/// Trace store events until the store is dropped.
async fn log_events(mut rx: tokio::sync::broadcast::Receiver<StoreEvent>) {
    loop {
        match rx.recv().await {
            Ok(event) => tracing::debug!(?event, "Store event"),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Store event log lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
