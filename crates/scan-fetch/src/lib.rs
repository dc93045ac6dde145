//! # scan-fetch
//!
//! Loads the snapshot and per-symbol daily documents over HTTP.
//! Uses Strategy pattern for retry backoff policies.

pub mod client;

pub use client::*;

use scan_core::{DataError, Symbol};

/// Default data root, relative to the page
pub const DEFAULT_DATA_URL: &str = "data";

// ============================================================================
// STRATEGY PATTERN: Retry Policy
// ============================================================================

/// Strategy trait for retry backoff
pub trait RetryPolicy: Send + Sync + Clone {
    /// Calculate delay in milliseconds before retry `attempt` (0-indexed)
    fn delay_ms(&self, attempt: u32) -> u32;

    /// Whether retry `attempt` may run
    fn should_retry(&self, attempt: u32) -> bool;
}

/// Exponential backoff retry policy
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Delay before the first retry (ms)
    pub initial_delay_ms: u32,
    /// Maximum delay between attempts (ms)
    pub max_delay_ms: u32,
    /// Multiplier for each subsequent attempt
    pub multiplier: f64,
    /// Retries after the first request (0 = never retry)
    pub max_retries: u32,
    /// Add jitter to delay
    pub jitter: bool,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 8000,
            multiplier: 2.0,
            max_retries: 3,
            jitter: true,
        }
    }
}

impl ExponentialBackoff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_delay(mut self, ms: u32) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    pub fn max_delay(mut self, ms: u32) -> Self {
        self.max_delay_ms = ms;
        self
    }

    pub fn multiplier(mut self, m: f64) -> Self {
        self.multiplier = m;
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Single request, no retries
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

impl RetryPolicy for ExponentialBackoff {
    fn delay_ms(&self, attempt: u32) -> u32 {
        let base_delay = self.initial_delay_ms as f64 * self.multiplier.powi(attempt as i32);
        let mut delay = (base_delay as u32).min(self.max_delay_ms);

        // ±20%, derived from the attempt number
        if self.jitter {
            let jitter_range = delay / 5;
            let jitter = ((attempt * 7919) % (jitter_range * 2 + 1)) as i32 - jitter_range as i32;
            delay = (delay as i32 + jitter).max(100) as u32;
        }

        delay
    }

    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Linear backoff retry policy
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    pub initial_delay_ms: u32,
    pub increment_ms: u32,
    pub max_delay_ms: u32,
    pub max_retries: u32,
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            increment_ms: 500,
            max_delay_ms: 5000,
            max_retries: 3,
        }
    }
}

impl RetryPolicy for LinearBackoff {
    fn delay_ms(&self, attempt: u32) -> u32 {
        (self.initial_delay_ms + self.increment_ms * attempt).min(self.max_delay_ms)
    }

    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

/// Constant delay retry policy
#[derive(Debug, Clone)]
pub struct ConstantDelay {
    pub delay_ms: u32,
    pub max_retries: u32,
}

impl Default for ConstantDelay {
    fn default() -> Self {
        Self {
            delay_ms: 1000,
            max_retries: 2,
        }
    }
}

impl RetryPolicy for ConstantDelay {
    fn delay_ms(&self, _attempt: u32) -> u32 {
        self.delay_ms
    }

    fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Decode(#[from] DataError),
}

impl FetchError {
    /// Transient failures worth another attempt: network errors and 5xx
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) => false,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

// ============================================================================
// FETCH CONFIGURATION
// ============================================================================

/// Data client configuration, generic over the retry strategy
#[derive(Debug, Clone)]
pub struct FetchConfig<P: RetryPolicy = ExponentialBackoff> {
    /// Directory holding `snapshot.json` and `daily/`
    pub base_url: String,
    pub retry_policy: P,
    /// Select the top screened row once the snapshot arrives
    pub auto_select_first: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DATA_URL.to_string(),
            retry_policy: ExponentialBackoff::default(),
            auto_select_first: true,
        }
    }
}

impl FetchConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl<P: RetryPolicy> FetchConfig<P> {
    /// Swap the retry strategy
    pub fn with_policy<Q: RetryPolicy>(self, policy: Q) -> FetchConfig<Q> {
        FetchConfig {
            base_url: self.base_url,
            retry_policy: policy,
            auto_select_first: self.auto_select_first,
        }
    }

    pub fn auto_select_first(mut self, enabled: bool) -> Self {
        self.auto_select_first = enabled;
        self
    }

    fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn snapshot_url(&self) -> String {
        format!("{}/snapshot.json", self.base())
    }

    pub fn daily_url(&self, symbol: &Symbol) -> String {
        format!("{}/{}", self.base(), symbol.daily_path())
    }
}
