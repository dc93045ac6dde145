//! # chartkit
//!
//! Core chart primitives: scales, path builders, axis label formatters.

use scan_core::{CompactNumberFormatter, DecimalPriceFormatter, LargeNumberFormatter, PriceFormatter};
use std::fmt::Write;

// ============================================================================
// STRATEGY PATTERN: Scale Trait
// ============================================================================

/// Strategy trait for scales (maps domain values to range values)
pub trait Scale: Send + Sync {
    /// Scale a value from domain to range
    fn scale(&self, value: f64) -> f64;

    /// Inverse scale (range to domain)
    fn invert(&self, value: f64) -> f64;

    /// Generate `count` evenly spaced values from the domain start to its end
    fn ticks(&self, count: usize) -> Vec<f64>;
}

// ============================================================================
// LINEAR SCALE
// ============================================================================

/// Linear scale (D3-style continuous scale)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new() -> Self {
        Self {
            domain: (0.0, 1.0),
            range: (0.0, 1.0),
        }
    }

    pub fn domain(mut self, min: f64, max: f64) -> Self {
        self.domain = (min, max);
        self
    }

    pub fn range(mut self, min: f64, max: f64) -> Self {
        self.range = (min, max);
        self
    }

}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl Scale for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (d_max - d_min).abs() < f64::EPSILON {
            return (r_min + r_max) / 2.0;
        }

        let normalized = (value - d_min) / (d_max - d_min);
        r_min + normalized * (r_max - r_min)
    }

    fn invert(&self, value: f64) -> f64 {
        let (d_min, d_max) = self.domain;
        let (r_min, r_max) = self.range;

        if (r_max - r_min).abs() < f64::EPSILON {
            return (d_min + d_max) / 2.0;
        }

        let normalized = (value - r_min) / (r_max - r_min);
        d_min + normalized * (d_max - d_min)
    }

    fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, end) = self.domain;
        if count <= 1 {
            return vec![start];
        }

        let step = (end - start) / (count - 1) as f64;
        (0..count).map(|i| start + step * i as f64).collect()
    }
}

// ============================================================================
// PATH BUILDER (fluent API)
// ============================================================================

/// SVG path builder with fluent API
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    commands: String,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self {
            commands: String::with_capacity(256),
        }
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "M{:.2},{:.2}", x, y);
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        let _ = write!(self.commands, "L{:.2},{:.2}", x, y);
        self
    }

    pub fn build(self) -> String {
        self.commands
    }
}

/// Generate an open polyline path through `points`
pub fn line_path(points: &[(f64, f64)]) -> String {
    let Some((&(x, y), rest)) = points.split_first() else {
        return String::new();
    };

    rest.iter()
        .fold(PathBuilder::new().move_to(x, y), |builder, &(x, y)| builder.line_to(x, y))
        .build()
}

// ============================================================================
// FORMATTERS
// ============================================================================

/// Format price for axis labels
pub fn format_price(price: f64) -> String {
    DecimalPriceFormatter::default().format(price)
}

/// Format volume for axis labels
pub fn format_volume(volume: f64) -> String {
    CompactNumberFormatter.format(volume)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new()
            .domain(0.0, 100.0)
            .range(0.0, 500.0);

        assert_eq!(scale.scale(0.0), 0.0);
        assert_eq!(scale.scale(50.0), 250.0);
        assert_eq!(scale.scale(100.0), 500.0);
    }

    #[test]
    fn test_inverted_range_invert() {
        let scale = LinearScale::new()
            .domain(0.0, 100.0)
            .range(500.0, 0.0);

        assert_eq!(scale.scale(100.0), 0.0);
        assert_eq!(scale.invert(250.0), 50.0);
    }

    #[test]
    fn test_ticks_interpolate_domain() {
        let scale = LinearScale::new().domain(110.0, 90.0);
        assert_eq!(scale.ticks(5), vec![110.0, 105.0, 100.0, 95.0, 90.0]);
        assert_eq!(scale.ticks(1), vec![110.0]);
    }

    #[test]
    fn test_path_builder() {
        let path = PathBuilder::new()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .line_to(200.0, 50.5)
            .build();

        assert_eq!(path, "M0.00,0.00L100.00,100.00L200.00,50.50");
    }

    #[test]
    fn test_line_path() {
        assert_eq!(line_path(&[]), "");
        assert_eq!(line_path(&[(0.0, 0.0), (50.0, 25.5)]), "M0.00,0.00L50.00,25.50");
    }

    #[test]
    fn test_axis_formatters() {
        assert_eq!(format_price(23.456), "23.46");
        assert_eq!(format_volume(2_500_000.0), "2.50M");
    }
}
