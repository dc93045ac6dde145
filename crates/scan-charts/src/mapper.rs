//! Coordinate mapping between chart values and surface pixels
//!
//! Two horizontal layouts exist on purpose: [`CandleLayout`] positions drawn
//! candles with uniform gaps, while [`HitLayout`] slices the plot into equal
//! columns for pointer hit-testing. They drift apart as the window gets sparse.

use crate::{
    chartkit::{LinearScale, Scale},
    ChartDimensions,
};
use scan_core::Bar;

/// Multiplier applied to the lowest visible value
pub const PRICE_FLOOR_PAD: f64 = 0.99;
/// Multiplier applied to the highest visible value
pub const PRICE_CEIL_PAD: f64 = 1.01;

pub const MIN_CANDLE_WIDTH: f64 = 2.0;
pub const MAX_CANDLE_WIDTH: f64 = 12.0;
/// Space reserved next to each candle before clamping its width
pub const CANDLE_SPACING: f64 = 2.0;

// ============================================================================
// PRICE AXIS
// ============================================================================

/// Vertical price mapping for a visible window
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMapper {
    min_price: f64,
    max_price: f64,
    scale: LinearScale,
}

impl PriceMapper {
    /// Padded price range over high, low and price averages of `bars`.
    ///
    /// `None` when no bar carries any of those values.
    pub fn from_bars(bars: &[Bar], dims: &ChartDimensions) -> Option<Self> {
        let (min, max) = bars
            .iter()
            .flat_map(Bar::price_extremes)
            .fold(None, |acc: Option<(f64, f64)>, p| match acc {
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
                None => Some((p, p)),
            })?;

        Some(Self::new(min * PRICE_FLOOR_PAD, max * PRICE_CEIL_PAD, dims))
    }

    pub fn new(min_price: f64, max_price: f64, dims: &ChartDimensions) -> Self {
        let scale = LinearScale::new()
            .domain(min_price, max_price)
            .range(dims.bottom(), dims.top());

        Self {
            min_price,
            max_price,
            scale,
        }
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    /// `top + (1 - (p - min) / (max - min)) * chart_height`
    pub fn price_to_y(&self, price: f64) -> f64 {
        self.scale.scale(price)
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        self.scale.invert(y)
    }

    /// `count` evenly spaced `(y, price)` grid rows, from `max_price` down to `min_price`
    pub fn grid(&self, count: usize) -> Vec<(f64, f64)> {
        LinearScale::new()
            .domain(self.max_price, self.min_price)
            .ticks(count)
            .into_iter()
            .map(|price| (self.price_to_y(price), price))
            .collect()
    }
}

// ============================================================================
// VOLUME AXIS
// ============================================================================

/// Vertical volume mapping, normalised to the largest visible volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeMapper {
    max_volume: f64,
    top: f64,
    chart_height: f64,
}

impl VolumeMapper {
    pub fn from_bars(bars: &[Bar], dims: &ChartDimensions) -> Self {
        let max_volume = bars.iter().map(Bar::volume).fold(0.0, f64::max);
        Self {
            max_volume,
            top: dims.top(),
            chart_height: dims.inner_height(),
        }
    }

    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }

    /// `(v / max_volume) * chart_height`, zero when nothing traded
    pub fn bar_height(&self, volume: f64) -> f64 {
        if self.max_volume <= 0.0 {
            return 0.0;
        }
        volume / self.max_volume * self.chart_height
    }

    /// Top pixel of a bar (or average point) standing on the baseline
    pub fn volume_to_y(&self, volume: f64) -> f64 {
        self.baseline() - self.bar_height(volume)
    }

    pub fn baseline(&self) -> f64 {
        self.top + self.chart_height
    }

    /// `count` evenly spaced `(y, volume)` grid rows, from the maximum down to zero
    pub fn grid(&self, count: usize) -> Vec<(f64, f64)> {
        let scale = LinearScale::new()
            .domain(0.0, 1.0)
            .range(self.baseline(), self.top);

        LinearScale::new()
            .domain(1.0, 0.0)
            .ticks(count)
            .into_iter()
            .map(|ratio| (scale.scale(ratio), ratio * self.max_volume))
            .collect()
    }
}

// ============================================================================
// HORIZONTAL LAYOUTS
// ============================================================================

/// Gapped candle layout used for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandleLayout {
    left: f64,
    candle_width: f64,
    gap: f64,
    count: usize,
}

impl CandleLayout {
    pub fn new(count: usize, dims: &ChartDimensions) -> Option<Self> {
        if count == 0 {
            return None;
        }

        let chart_width = dims.inner_width();
        let n = count as f64;
        let candle_width = (chart_width / n - CANDLE_SPACING).clamp(MIN_CANDLE_WIDTH, MAX_CANDLE_WIDTH);
        let gap = (chart_width - candle_width * n) / (n + 1.0);

        Some(Self {
            left: dims.left(),
            candle_width,
            gap,
            count,
        })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn candle_width(&self) -> f64 {
        self.candle_width
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    /// Left edge of the candle at visible index `i`
    pub fn x(&self, i: usize) -> f64 {
        self.left + self.gap + i as f64 * (self.candle_width + self.gap)
    }

    pub fn center(&self, i: usize) -> f64 {
        self.x(i) + self.candle_width / 2.0
    }
}

/// Uniform column layout used for pointer hit-testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitLayout {
    left: f64,
    bar_width: f64,
    count: usize,
}

impl HitLayout {
    pub fn new(count: usize, dims: &ChartDimensions) -> Option<Self> {
        let chart_width = dims.inner_width();
        if count == 0 || chart_width <= 0.0 {
            return None;
        }

        Some(Self {
            left: dims.left(),
            bar_width: chart_width / count as f64,
            count,
        })
    }

    pub fn bar_width(&self) -> f64 {
        self.bar_width
    }

    /// Visible index under `x`, if any
    pub fn index_at(&self, x: f64) -> Option<usize> {
        let index = ((x - self.left) / self.bar_width).floor();
        (index >= 0.0 && index < self.count as f64).then_some(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartMargin;

    fn dims() -> ChartDimensions {
        ChartDimensions::new(520.0, 240.0).with_margin(ChartMargin::new(20.0, 10.0, 20.0, 10.0))
    }

    #[test]
    fn test_price_range_is_padded() {
        let mut bar = Bar::new("2024-01-01").with_ohlc(100.0, 110.0, 95.0, 105.0);
        bar.ma60 = Some(90.0);
        let mapper = PriceMapper::from_bars(&[bar], &dims()).unwrap();

        assert!((mapper.min_price() - 89.1).abs() < 1e-9);
        assert!((mapper.max_price() - 111.1).abs() < 1e-9);
    }

    #[test]
    fn test_price_to_y_matches_formula() {
        let d = dims();
        let mapper = PriceMapper::new(100.0, 200.0, &d);

        assert_eq!(mapper.price_to_y(200.0), d.top());
        assert_eq!(mapper.price_to_y(100.0), d.bottom());
        assert_eq!(mapper.price_to_y(150.0), d.top() + 0.5 * d.inner_height());
        assert_eq!(mapper.y_to_price(d.bottom()), 100.0);
    }

    #[test]
    fn test_no_price_values_no_mapper() {
        assert!(PriceMapper::from_bars(&[], &dims()).is_none());
        assert!(PriceMapper::from_bars(&[Bar::new("2024-01-01")], &dims()).is_none());
    }

    #[test]
    fn test_grid_runs_from_max_to_min() {
        let d = dims();
        let grid = PriceMapper::new(100.0, 200.0, &d).grid(5);

        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], (d.top(), 200.0));
        assert_eq!(grid[2], (d.top() + 100.0, 150.0));
        assert_eq!(grid[4], (d.bottom(), 100.0));
    }

    #[test]
    fn test_candle_width_is_capped() {
        let sparse = CandleLayout::new(5, &dims()).unwrap();
        assert_eq!(sparse.candle_width(), MAX_CANDLE_WIDTH);

        let dense = CandleLayout::new(400, &dims()).unwrap();
        assert_eq!(dense.candle_width(), MIN_CANDLE_WIDTH);
    }

    #[test]
    fn test_candles_evenly_spaced() {
        let d = dims();
        let layout = CandleLayout::new(20, &d).unwrap();

        let step = layout.x(1) - layout.x(0);
        assert!((layout.x(19) - layout.x(18) - step).abs() < 1e-9);
        // trailing gap equals leading gap
        let trailing = d.right() - (layout.x(19) + layout.candle_width());
        assert!((trailing - layout.gap()).abs() < 1e-9);
    }

    #[test]
    fn test_hit_layout_index() {
        let layout = HitLayout::new(10, &dims()).unwrap();
        assert_eq!(layout.bar_width(), 50.0);
        assert_eq!(layout.index_at(10.0), Some(0));
        assert_eq!(layout.index_at(59.9), Some(0));
        assert_eq!(layout.index_at(60.0), Some(1));
        assert_eq!(layout.index_at(509.9), Some(9));
        assert_eq!(layout.index_at(510.0), None);
        assert_eq!(layout.index_at(9.0), None);
    }

    #[test]
    fn test_volume_mapping() {
        let d = dims();
        let bars = [
            Bar::new("2024-01-01").with_volume(500),
            Bar::new("2024-01-02").with_volume(1000),
        ];
        let mapper = VolumeMapper::from_bars(&bars, &d);

        assert_eq!(mapper.max_volume(), 1000.0);
        assert_eq!(mapper.bar_height(500.0), d.inner_height() / 2.0);
        assert_eq!(mapper.volume_to_y(1000.0), d.top());
        assert_eq!(mapper.grid(5)[4], (d.bottom(), 0.0));
    }

    #[test]
    fn test_zero_volume_has_no_height() {
        let mapper = VolumeMapper::from_bars(&[Bar::new("2024-01-01")], &dims());
        assert_eq!(mapper.bar_height(0.0), 0.0);
    }
}
