//! Reactive snapshot state: the stock list and the screener controls over it

use crate::screener::{filter_and_sort, ExchangeFilter, ScreenerControls, SortOrder, DISPLAY_LIMIT};
use leptos::prelude::*;
use scan_core::{Entity, LoadState, Metric, SnapshotDocument};

/// Reactive market list state
#[derive(Clone, Copy)]
pub struct MarketState {
    /// Latest snapshot document
    pub snapshot: RwSignal<LoadState<SnapshotDocument>>,
    /// Filter and sort inputs
    pub controls: RwSignal<ScreenerControls>,
}

impl MarketState {
    pub fn new() -> Self {
        Self {
            snapshot: RwSignal::new(LoadState::Idle),
            controls: RwSignal::new(ScreenerControls::default()),
        }
    }

    // ========================================================================
    // Snapshot Loading
    // ========================================================================

    pub fn begin_load(&self) {
        tracing::debug!("snapshot load started");
        self.snapshot.set(LoadState::Loading);
    }

    /// Store the outcome of a snapshot load
    pub fn finish_load<E: std::fmt::Display>(&self, result: Result<SnapshotDocument, E>) {
        match &result {
            Ok(doc) => tracing::info!("snapshot loaded: {} stocks, updated {}", doc.stocks.len(), doc.updated),
            Err(e) => tracing::warn!("snapshot load failed: {}", e),
        }
        self.snapshot.set(result.into());
    }

    /// Number of entities in the loaded snapshot
    pub fn total(&self) -> usize {
        self.snapshot.with(|s| s.ready().map_or(0, |doc| doc.stocks.len()))
    }

    /// Snapshot `updated` label, if loaded
    pub fn updated(&self) -> Option<String> {
        self.snapshot.with(|s| s.ready().map(|doc| doc.updated.clone()))
    }

    // ========================================================================
    // Screener Controls
    // ========================================================================

    pub fn set_exchange(&self, exchange: ExchangeFilter) {
        self.controls.update(|c| c.exchange = exchange);
    }

    pub fn set_threshold(&self, metric: Metric, value: f64) {
        self.controls.update(|c| c.thresholds.set(metric, value));
    }

    /// Sort by `key`, flipping the order when it is already the sort key
    pub fn sort_by(&self, key: Metric) {
        self.controls.update(|c| c.sort_by(key));
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.controls.update(|c| c.sort_order = order);
    }

    pub fn reset_controls(&self) {
        self.controls.set(ScreenerControls::default());
    }

    // ========================================================================
    // Screened List
    // ========================================================================

    /// Every entity passing the controls, in sort order
    pub fn screened(&self) -> Vec<Entity> {
        let controls = self.controls.get();
        self.snapshot.with(|s| {
            s.ready().map_or_else(Vec::new, |doc| {
                filter_and_sort(&doc.stocks, &controls).into_iter().cloned().collect()
            })
        })
    }
}

impl Default for MarketState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// COMPUTED SIGNALS
// ============================================================================

/// Derived screener signals
#[derive(Clone, Copy)]
pub struct MarketComputed {
    /// Entities passing the controls, in sort order
    pub screened: Memo<Vec<Entity>>,
    /// First [`DISPLAY_LIMIT`] screened entities
    pub displayed: Memo<Vec<Entity>>,
    pub match_count: Memo<usize>,
}

impl MarketComputed {
    pub fn new(state: &MarketState) -> Self {
        let state = *state;
        let screened = Memo::new(move |_| state.screened());

        Self {
            screened,
            displayed: Memo::new(move |_| {
                screened.with(|list| list.iter().take(DISPLAY_LIMIT).cloned().collect())
            }),
            match_count: Memo::new(move |_| screened.with(Vec::len)),
        }
    }
}
