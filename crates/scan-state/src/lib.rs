//! # scan-state
//!
//! Reactive state for the VN stock scanner.
//! Uses Leptos signals so the list and charts re-render only what changed.
//!
//! - `screener` - Pure filter/sort engine and its controls
//! - `market` - Snapshot load state and screener signals
//! - `selection` - Selected stock, its series and stale-load guard

pub mod market;
pub mod screener;
pub mod selection;

pub use market::*;
pub use screener::*;
pub use selection::*;

use leptos::prelude::*;
use scan_core::Entity;

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Global application state with reactive signals
#[derive(Clone, Copy)]
pub struct AppState {
    /// Snapshot and screener controls
    pub market: MarketState,
    /// Derived screener lists
    pub computed: MarketComputed,
    /// Selected stock and its daily series
    pub selection: SelectionState,
}

impl AppState {
    pub fn new() -> Self {
        let market = MarketState::new();
        Self {
            computed: MarketComputed::new(&market),
            market,
            selection: SelectionState::new(),
        }
    }

    /// Select a stock row; the returned ticket must accompany its series load
    pub fn select(&self, entity: Entity) -> LoadTicket {
        self.selection.select(entity)
    }

    /// Select the first displayed row when nothing is selected yet
    pub fn select_first(&self) -> Option<LoadTicket> {
        if self.selection.selected.with_untracked(Option::is_some) {
            return None;
        }
        let first = self.computed.displayed.with_untracked(|list| list.first().cloned())?;
        Some(self.select(first))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// CONTEXT HELPERS
// ============================================================================

/// Provide app state context to component tree
pub fn provide_app_state() -> AppState {
    let state = AppState::new();
    provide_context(state);
    state
}

/// Use app state from context
pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}

/// Try to get app state from context (returns None if not provided)
pub fn try_use_app_state() -> Option<AppState> {
    use_context::<AppState>()
}
