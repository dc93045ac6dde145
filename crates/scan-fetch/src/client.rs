//! HTTP data client with retries

use crate::{ExponentialBackoff, FetchConfig, FetchError, FetchResult, RetryPolicy};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use scan_core::{DailyDocument, Entity, Series, SnapshotDocument, Symbol};
use scan_state::AppState;
use wasm_bindgen_futures::spawn_local;

// ============================================================================
// DATA CLIENT
// ============================================================================

/// Client for the snapshot and daily JSON documents
#[derive(Debug, Clone)]
pub struct DataClient<P: RetryPolicy = ExponentialBackoff> {
    config: FetchConfig<P>,
}

impl DataClient {
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }
}

impl Default for DataClient {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: RetryPolicy> DataClient<P> {
    pub fn with_config(config: FetchConfig<P>) -> Self {
        Self { config }
    }

    /// Set data root URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn config(&self) -> &FetchConfig<P> {
        &self.config
    }

    /// Fetch and decode `snapshot.json`
    pub async fn fetch_snapshot(&self) -> FetchResult<SnapshotDocument> {
        let text = self.fetch_text(&self.config.snapshot_url()).await?;
        Ok(SnapshotDocument::from_json(&text)?)
    }

    /// Fetch and decode `daily/{symbol}.json`
    pub async fn fetch_series(&self, symbol: &Symbol) -> FetchResult<Series> {
        let text = self.fetch_text(&self.config.daily_url(symbol)).await?;
        let doc = DailyDocument::from_json(&text)?;
        if &doc.symbol != symbol {
            tracing::warn!("requested {} but document is for {}", symbol, doc.symbol);
        }
        Ok(doc.to_series()?)
    }

    /// GET `url`, retrying transient failures per the retry policy
    async fn fetch_text(&self, url: &str) -> FetchResult<String> {
        let policy = &self.config.retry_policy;
        let mut attempt = 0u32;

        loop {
            tracing::debug!("GET {}", url);

            match fetch_once(url).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_retryable() && policy.should_retry(attempt) => {
                    let delay = policy.delay_ms(attempt);
                    tracing::warn!("{} ({}), retrying in {}ms (attempt {})", url, e, delay, attempt + 1);
                    TimeoutFuture::new(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!("GET {} failed: {}", url, e);
                    return Err(e);
                }
            }
        }
    }
}

async fn fetch_once(url: &str) -> FetchResult<String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(|e| FetchError::Network(e.to_string()))
}

// ============================================================================
// STATE INTEGRATION
// ============================================================================

/// Load the snapshot into `state` (spawns async task)
pub fn load_snapshot<P: RetryPolicy + 'static>(client: DataClient<P>, state: AppState) {
    state.market.begin_load();

    spawn_local(async move {
        let result = client.fetch_snapshot().await;
        state.market.finish_load(result);

        if client.config.auto_select_first {
            if let Some(ticket) = state.select_first() {
                let result = client.fetch_series(&ticket.symbol).await;
                state.selection.finish(&ticket, result);
            }
        }
    });
}

/// Select `entity` and load its daily series (spawns async task).
///
/// Selecting again before this load finishes makes its result stale; the
/// state layer drops it.
pub fn select_entity<P: RetryPolicy + 'static>(client: DataClient<P>, state: AppState, entity: Entity) {
    let ticket = state.select(entity);

    spawn_local(async move {
        let result = client.fetch_series(&ticket.symbol).await;
        state.selection.finish(&ticket, result);
    });
}

// ============================================================================
// TESTS
// ============================================================================
