//! # scan-charts
//!
//! Interactive price/volume charting engine for the VN stock scanner.
//!
//! ## Architecture
//!
//! Rendering is split into a pure half and an executing half:
//! - renderers turn `(bars, view range, surface)` into a [`DrawList`]
//! - the Leptos components execute a draw list as SVG and feed pointer events
//!   back through the [`interaction`] state machine
//!
//! ## Modules
//!
//! - `chartkit` - Core primitives: scales, paths, formatters
//! - `mapper` - Price/index to pixel mapping
//! - `viewport` - Visible window state machine (zoom, pan, reset)
//! - `draw` - Draw commands
//! - `price` / `volume` - Chart renderers
//! - `interaction` - Pointer events to tooltip/drag/viewport transitions
//! - `component` - SVG chart components

pub mod chartkit;
pub mod component;
pub mod draw;
pub mod interaction;
pub mod mapper;
pub mod price;
pub mod viewport;
pub mod volume;

pub use chartkit::*;
pub use component::*;
pub use draw::*;
pub use interaction::*;
pub use mapper::*;
pub use price::*;
pub use viewport::*;
pub use volume::*;

// Re-export colors from scan-core for convenience
pub use scan_core::colors;

/// Chart margin configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartMargin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl ChartMargin {
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn uniform(margin: f64) -> Self {
        Self::new(margin, margin, margin, margin)
    }

    /// Legend row on top, price labels on the right
    pub const fn right_axis() -> Self {
        Self::new(24.0, 60.0, 20.0, 10.0)
    }
}

impl Default for ChartMargin {
    fn default() -> Self {
        Self::right_axis()
    }
}

/// Chart dimensions with margin handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: ChartMargin,
}

impl ChartDimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: ChartMargin::default(),
        }
    }

    pub fn with_margin(mut self, margin: ChartMargin) -> Self {
        self.margin = margin;
        self
    }

    /// Inner width (excluding margins)
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(0.0)
    }

    /// Inner height (excluding margins)
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn left(&self) -> f64 {
        self.margin.left
    }

    pub fn top(&self) -> f64 {
        self.margin.top
    }

    /// Right edge of the plot area
    pub fn right(&self) -> f64 {
        self.margin.left + self.inner_width()
    }

    /// Bottom edge of the plot area
    pub fn bottom(&self) -> f64 {
        self.margin.top + self.inner_height()
    }

    /// ViewBox string for SVG
    pub fn viewbox(&self) -> String {
        format!("0 0 {} {}", self.width, self.height)
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self::new(900.0, 420.0)
    }
}
