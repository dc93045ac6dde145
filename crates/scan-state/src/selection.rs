//! Selected stock and its daily series
//!
//! Every selection bumps a generation counter and hands out a [`LoadTicket`].
//! A completed load only lands if its ticket is still current, so a slow
//! response for an earlier pick never overwrites a newer one.

use leptos::prelude::*;
use scan_core::{Entity, LoadState, Series, Symbol};

/// Proof of which selection a series load belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub symbol: Symbol,
}

/// Reactive selection state
#[derive(Clone, Copy)]
pub struct SelectionState {
    pub selected: RwSignal<Option<Entity>>,
    pub series: RwSignal<LoadState<Series>>,
    generation: RwSignal<u64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self {
            selected: RwSignal::new(None),
            series: RwSignal::new(LoadState::Idle),
            generation: RwSignal::new(0),
        }
    }

    /// Select `entity` and mark its series as loading
    pub fn select(&self, entity: Entity) -> LoadTicket {
        let generation = self.generation.get_untracked() + 1;
        let ticket = LoadTicket {
            generation,
            symbol: entity.symbol.clone(),
        };

        tracing::debug!("selected {} (generation {})", ticket.symbol, generation);
        self.generation.set(generation);
        self.selected.set(Some(entity));
        self.series.set(LoadState::Loading);
        ticket
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.generation.get_untracked()
    }

    /// Store a finished load. Returns `false` when the ticket is stale and the
    /// result was dropped.
    pub fn finish<E: std::fmt::Display>(&self, ticket: &LoadTicket, result: Result<Series, E>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                "discarding stale series for {} (generation {}, current {})",
                ticket.symbol,
                ticket.generation,
                self.generation.get_untracked()
            );
            return false;
        }

        match &result {
            Ok(series) => match series.date_range() {
                Some((first, last)) => {
                    tracing::info!("series loaded: {} ({} bars, {} to {})", ticket.symbol, series.len(), first, last)
                }
                None => tracing::info!("series loaded: {} (no bars)", ticket.symbol),
            },
            Err(e) => tracing::warn!("series load failed for {}: {}", ticket.symbol, e),
        }
        self.series.set(result.into());
        true
    }

    /// Drop the selection; any load in flight becomes stale
    pub fn clear(&self) {
        self.generation.update(|g| *g += 1);
        self.selected.set(None);
        self.series.set(LoadState::Idle);
    }

    pub fn selected_symbol(&self) -> Option<Symbol> {
        self.selected.with(|s| s.as_ref().map(|e| e.symbol.clone()))
    }

    pub fn is_selected(&self, symbol: &Symbol) -> bool {
        self.selected.with(|s| s.as_ref().is_some_and(|e| &e.symbol == symbol))
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new()
    }
}
