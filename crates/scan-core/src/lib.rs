//! # scan-core
//!
//! Core domain types for the VN stock scanner.
//! Implements Strategy pattern for formatting numeric fields that may be absent.

pub mod bar;
pub mod entity;
pub mod error;

pub use bar::*;
pub use entity::*;
pub use error::*;

use serde::{Deserialize, Serialize};

/// Text shown in place of a missing numeric value
pub const PLACEHOLDER: &str = "-";

// ============================================================================
// STRATEGY PATTERN: Formatters
// ============================================================================

/// Strategy trait for price formatting
pub trait PriceFormatter: Send + Sync {
    fn format(&self, price: f64) -> String;

    /// Format an optional price, falling back to [`PLACEHOLDER`]
    fn format_opt(&self, price: Option<f64>) -> String {
        price.map_or_else(|| PLACEHOLDER.to_string(), |p| self.format(p))
    }
}

/// Strategy trait for large number formatting (volumes, money flow)
pub trait LargeNumberFormatter: Send + Sync {
    fn format(&self, num: f64) -> String;

    fn format_opt(&self, num: Option<f64>) -> String {
        num.map_or_else(|| PLACEHOLDER.to_string(), |n| self.format(n))
    }
}

/// Price formatter with configurable decimals.
///
/// Prices on HOSE/HNX/UPCOM are quoted in thousands of VND, so two decimals
/// cover every tick size.
#[derive(Debug, Clone)]
pub struct DecimalPriceFormatter {
    pub decimals: usize,
}

impl Default for DecimalPriceFormatter {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl PriceFormatter for DecimalPriceFormatter {
    fn format(&self, price: f64) -> String {
        if price >= 10_000.0 {
            format!("{:.0}", price)
        } else {
            format!("{:.prec$}", price, prec = self.decimals)
        }
    }
}

/// Compact formatter for large numbers (K, M, B suffixes)
#[derive(Debug, Clone, Default)]
pub struct CompactNumberFormatter;

impl LargeNumberFormatter for CompactNumberFormatter {
    fn format(&self, num: f64) -> String {
        let abs = num.abs();
        let sign = if num < 0.0 { "-" } else { "" };

        if abs >= 1_000_000_000.0 {
            format!("{}{:.2}B", sign, abs / 1_000_000_000.0)
        } else if abs >= 1_000_000.0 {
            format!("{}{:.2}M", sign, abs / 1_000_000.0)
        } else if abs >= 1_000.0 {
            format!("{}{:.2}K", sign, abs / 1_000.0)
        } else {
            format!("{}{:.0}", sign, abs)
        }
    }
}

/// Percentage formatter for convergence metrics
#[derive(Debug, Clone, Default)]
pub struct PercentFormatter;

impl PriceFormatter for PercentFormatter {
    fn format(&self, value: f64) -> String {
        format!("{:.2}%", value)
    }
}

// ============================================================================
// CORE VALUE TYPES
// ============================================================================

/// Ticker symbol (e.g., "VNM", "FPT"), always upper-case
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Daily document path relative to the data root
    pub fn daily_path(&self) -> String {
        format!("daily/{}.json", self.0)
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

// ============================================================================
// LOAD STATE FSM
// ============================================================================

/// Lifecycle of an asynchronously retrieved document
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading...",
            Self::Ready(_) => "Ready",
            Self::Failed(_) => "No data available",
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for LoadState<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

// ============================================================================
// COLOR CONSTANTS
// ============================================================================

pub mod colors {
    pub const UP: &str = "#22c55e";
    pub const DOWN: &str = "#ef4444";
    pub const NEUTRAL: &str = "#888888";
    pub const MA5: &str = "#f59e0b";
    pub const MA20: &str = "#3b82f6";
    pub const MA60: &str = "#a855f7";
    pub const BG_PANEL: &str = "#141414";
    pub const BORDER: &str = "#2a2a2a";
    pub const TEXT_PRIMARY: &str = "#fafafa";
    pub const TEXT_MUTED: &str = "#888888";
    pub const GRID: &str = "#1f1f1f";

    pub fn up_alpha(alpha: f64) -> String {
        format!("rgba(34, 197, 94, {:.2})", alpha)
    }

    pub fn down_alpha(alpha: f64) -> String {
        format!("rgba(239, 68, 68, {:.2})", alpha)
    }

    pub fn neutral_alpha(alpha: f64) -> String {
        format!("rgba(136, 136, 136, {:.2})", alpha)
    }
}
