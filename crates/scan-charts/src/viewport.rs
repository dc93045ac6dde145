//! Visible window over a bar series
//!
//! [`ViewRange`] is an immutable value; every [`Viewport`] operation returns a
//! fresh range instead of mutating the current one.

/// Viewport tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Smallest number of visible bars
    pub min_window: usize,
    /// Bars shown when a series is first opened
    pub default_window: usize,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    /// Drag distance that moves the window by one bar (independent of zoom)
    pub pan_pixels_per_bar: f64,
    /// Bars added/removed by the expand and contract buttons
    pub step: usize,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_window: 20,
            default_window: 60,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            pan_pixels_per_bar: 10.0,
            step: 20,
        }
    }
}

impl ViewportConfig {
    pub fn default_window(mut self, bars: usize) -> Self {
        self.default_window = bars;
        self
    }

    pub fn step(mut self, bars: usize) -> Self {
        self.step = bars;
        self
    }

    pub fn pan_sensitivity(mut self, pixels_per_bar: f64) -> Self {
        self.pan_pixels_per_bar = pixels_per_bar;
        self
    }
}

/// Half-open index window `start..end` into a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ViewRange {
    pub start: usize,
    pub end: usize,
}

impl ViewRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) as f64 / 2.0
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

impl std::fmt::Display for ViewRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Zoom direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Scrolling down (positive delta) zooms out
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 { Self::Out } else { Self::In }
    }

    pub fn factor(&self, config: &ViewportConfig) -> f64 {
        match self {
            Self::In => config.zoom_in_factor,
            Self::Out => config.zoom_out_factor,
        }
    }
}

/// Rounds halves toward positive infinity (`-2.5 -> -2`, `2.5 -> 3`)
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Transition functions over [`ViewRange`] for a series of `len` bars
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    len: usize,
    config: ViewportConfig,
}

impl Viewport {
    pub fn new(len: usize) -> Self {
        Self::with_config(len, ViewportConfig::default())
    }

    pub fn with_config(len: usize, config: ViewportConfig) -> Self {
        Self { len, config }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Smallest window this series can show
    pub fn min_len(&self) -> usize {
        self.config.min_window.min(self.len)
    }

    /// Most recent `default_window` bars
    pub fn initialize(&self) -> ViewRange {
        ViewRange::new(self.len.saturating_sub(self.config.default_window), self.len)
    }

    /// Whole series
    pub fn reset(&self) -> ViewRange {
        ViewRange::new(0, self.len)
    }

    /// Resize by the zoom factor around the current center
    pub fn zoom(&self, range: ViewRange, direction: ZoomDirection) -> ViewRange {
        if self.is_empty() {
            return ViewRange::default();
        }

        let n = self.len as f64;
        let target = round_half_up(range.len() as f64 * direction.factor(&self.config))
            .max(self.config.min_window as f64)
            .min(n);

        let start = round_half_up(range.center() - target / 2.0).clamp(0.0, n) as usize;
        let end = (start + target as usize).min(self.len);

        let next = self.settle(start, end);
        tracing::trace!("zoom {:?}: {} -> {}", direction, range, next);
        next
    }

    /// Shift by a drag distance in pixels.
    ///
    /// All or nothing: if either edge would be clamped the range is returned
    /// unchanged, so the window sticks at the series bounds.
    pub fn pan_by_pixels(&self, range: ViewRange, delta_px: f64) -> ViewRange {
        let delta = round_half_up(delta_px / self.config.pan_pixels_per_bar) as i64;
        if delta == 0 {
            return range;
        }

        let start = (range.start as i64 + delta).max(0);
        let end = (range.end as i64 + delta).min(self.len as i64);

        if end - start == range.len() as i64 {
            ViewRange::new(start as usize, end as usize)
        } else {
            range
        }
    }

    /// Widen by the configured step, keeping the newest bar pinned
    pub fn expand(&self, range: ViewRange) -> ViewRange {
        self.expand_by(range, self.config.step)
    }

    /// Narrow by the configured step, keeping the newest bar pinned
    pub fn contract(&self, range: ViewRange) -> ViewRange {
        self.contract_by(range, self.config.step)
    }

    pub fn expand_by(&self, range: ViewRange, step: usize) -> ViewRange {
        if self.is_empty() {
            return ViewRange::default();
        }

        let target = (range.len() + step).max(self.config.min_window).min(self.len);
        let end = range.end.min(self.len);
        let start = end.saturating_sub(target);
        // at the left edge the window grows to the right instead
        let end = (start + target).min(self.len);

        self.settle(start, end)
    }

    pub fn contract_by(&self, range: ViewRange, step: usize) -> ViewRange {
        if self.is_empty() {
            return ViewRange::default();
        }

        let target = range
            .len()
            .saturating_sub(step)
            .max(self.config.min_window)
            .min(self.len);
        let end = range.end.min(self.len);
        let start = end.saturating_sub(target);

        self.settle(start, end)
    }

    /// Widen a window left short by edge clamping back to `min_len`
    fn settle(&self, start: usize, end: usize) -> ViewRange {
        let min = self.min_len();
        let end = end.min(self.len);
        let start = start.min(end);

        if end - start >= min {
            return ViewRange::new(start, end);
        }

        let start = end.saturating_sub(min);
        ViewRange::new(start, (start + min).min(self.len))
    }
}
