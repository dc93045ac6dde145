//! Stock screener: exchange filter, metric thresholds and sort
//!
//! Pure functions over a slice of entities. The reactive layer only stores the
//! [`ScreenerControls`] and re-runs [`filter_and_sort`] when they change.

use scan_core::{Entity, Exchange, Metric};
use serde::{Deserialize, Serialize};

/// Entities shown in the list at once
pub const DISPLAY_LIMIT: usize = 100;

// ============================================================================
// EXCHANGE FILTER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExchangeFilter {
    #[default]
    All,
    Only(Exchange),
}

impl ExchangeFilter {
    pub fn matches(&self, exchange: Exchange) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == exchange,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Only(exchange) => exchange.label(),
        }
    }

    /// Options in selector order
    pub fn all() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(Exchange::all().iter().copied().map(Self::Only))
            .collect()
    }

    /// Parse a selector label, `None` for unknown labels
    pub fn from_label(label: &str) -> Option<Self> {
        Self::all().into_iter().find(|f| f.label() == label)
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Upper bounds on the four convergence metrics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub ma_converge: f64,
    pub va_converge: f64,
    pub ma5_20: f64,
    pub ma20_60: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            ma_converge: 10.0,
            va_converge: 50.0,
            ma5_20: 5.0,
            ma20_60: 8.0,
        }
    }
}

impl Thresholds {
    /// Metrics with a ceiling, paired with that ceiling
    pub fn limits(&self) -> [(Metric, f64); 4] {
        [
            (Metric::MaConverge, self.ma_converge),
            (Metric::VaConverge, self.va_converge),
            (Metric::Ma5_20, self.ma5_20),
            (Metric::Ma20_60, self.ma20_60),
        ]
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.limits().into_iter().find(|(m, _)| *m == metric).map(|(_, v)| v)
    }

    /// Replace the ceiling for `metric`; metrics without a ceiling are ignored
    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::MaConverge => self.ma_converge = value,
            Metric::VaConverge => self.va_converge = value,
            Metric::Ma5_20 => self.ma5_20 = value,
            Metric::Ma20_60 => self.ma20_60 = value,
            _ => {}
        }
    }

    /// No metric above its ceiling. Absent metrics pass.
    pub fn passes(&self, entity: &Entity) -> bool {
        self.limits()
            .into_iter()
            .all(|(metric, limit)| !entity.metric(metric).is_some_and(|v| v > limit))
    }
}

// ============================================================================
// SORTING
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

// ============================================================================
// CONTROLS
// ============================================================================

/// Every user-adjustable screener input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenerControls {
    pub exchange: ExchangeFilter,
    pub thresholds: Thresholds,
    pub sort_key: Metric,
    pub sort_order: SortOrder,
}

impl Default for ScreenerControls {
    fn default() -> Self {
        Self {
            exchange: ExchangeFilter::All,
            thresholds: Thresholds::default(),
            sort_key: Metric::MaConverge,
            sort_order: SortOrder::Ascending,
        }
    }
}

impl ScreenerControls {
    pub fn accepts(&self, entity: &Entity) -> bool {
        self.exchange.matches(entity.exchange) && self.thresholds.passes(entity)
    }

    /// Clicking the active column flips the order; another column sorts ascending
    pub fn sort_by(&mut self, key: Metric) {
        if self.sort_key == key {
            self.sort_order = self.sort_order.toggle();
        } else {
            self.sort_key = key;
            self.sort_order = SortOrder::Ascending;
        }
    }
}

/// Entities accepted by `controls`, ordered by the sort key.
///
/// Absent sort values order as zero. The sort is stable but callers should not
/// rely on the order of ties. The full result is returned; capping at
/// [`DISPLAY_LIMIT`] is left to the caller.
pub fn filter_and_sort<'a>(entities: &'a [Entity], controls: &ScreenerControls) -> Vec<&'a Entity> {
    let key = |e: &Entity| e.metric(controls.sort_key).unwrap_or(0.0);

    let mut result: Vec<&Entity> = entities.iter().filter(|e| controls.accepts(e)).collect();
    result.sort_by(|a, b| match controls.sort_order {
        SortOrder::Ascending => key(a).total_cmp(&key(b)),
        SortOrder::Descending => key(b).total_cmp(&key(a)),
    });

    tracing::trace!(
        "screener kept {} of {} ({} {})",
        result.len(),
        entities.len(),
        controls.sort_key.label(),
        controls.sort_order.arrow()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::{AdmfStats, AdmfWindow};

    fn entity(symbol: &str, exchange: Exchange) -> Entity {
        Entity::new(symbol, exchange)
    }

    fn symbols(list: &[&Entity]) -> Vec<String> {
        list.iter().map(|e| e.symbol.to_string()).collect()
    }

    #[test]
    fn test_metric_above_threshold_is_excluded() {
        let mut e = entity("VNM", Exchange::Hose);
        e.va_converge = Some(60.0);

        let entities = [e];
        assert!(filter_and_sort(&entities, &ScreenerControls::default()).is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut e = entity("VNM", Exchange::Hose);
        e.ma_converge = Some(10.0);

        let entities = [e];
        assert_eq!(filter_and_sort(&entities, &ScreenerControls::default()).len(), 1);
    }

    #[test]
    fn test_absent_metrics_pass() {
        let entities = [entity("ABC", Exchange::Upcom)];
        assert_eq!(filter_and_sort(&entities, &ScreenerControls::default()).len(), 1);
    }

    #[test]
    fn test_exchange_filter() {
        let entities = [
            entity("VNM", Exchange::Hose),
            entity("SHS", Exchange::Hnx),
            entity("BSR", Exchange::Upcom),
        ];
        let controls = ScreenerControls {
            exchange: ExchangeFilter::Only(Exchange::Hnx),
            ..Default::default()
        };

        assert_eq!(symbols(&filter_and_sort(&entities, &controls)), vec!["SHS"]);
    }

    #[test]
    fn test_absent_sort_value_orders_as_zero() {
        let mut a = entity("AAA", Exchange::Hose);
        a.price = Some(10.0);
        let b = entity("BBB", Exchange::Hose);
        let mut c = entity("CCC", Exchange::Hose);
        c.price = Some(5.0);

        let entities = [a, b, c];
        let mut controls = ScreenerControls {
            sort_key: Metric::Price,
            ..Default::default()
        };
        assert_eq!(symbols(&filter_and_sort(&entities, &controls)), vec!["BBB", "CCC", "AAA"]);

        controls.sort_order = SortOrder::Descending;
        assert_eq!(symbols(&filter_and_sort(&entities, &controls)), vec!["AAA", "CCC", "BBB"]);
    }

    #[test]
    fn test_negative_values_sort_below_absent() {
        let mut a = entity("NEG", Exchange::Hose);
        a.admf = Some(-3.0);
        let b = entity("NIL", Exchange::Hose);

        let entities = [b, a];
        let controls = ScreenerControls {
            sort_key: Metric::Admf,
            ..Default::default()
        };
        assert_eq!(symbols(&filter_and_sort(&entities, &controls)), vec!["NEG", "NIL"]);
    }

    #[test]
    fn test_unknown_exchange_only_under_all() {
        let entities = [entity("VNM", Exchange::Hose), entity("XYZ", Exchange::Unknown)];

        let all = ScreenerControls::default();
        assert_eq!(symbols(&filter_and_sort(&entities, &all)), vec!["VNM", "XYZ"]);

        for exchange in Exchange::all() {
            let only = ScreenerControls {
                exchange: ExchangeFilter::Only(*exchange),
                ..Default::default()
            };
            assert!(!symbols(&filter_and_sort(&entities, &only)).contains(&"XYZ".to_string()));
        }
        assert_eq!(ExchangeFilter::from_label("UNKNOWN"), None);
    }

    #[test]
    fn test_sort_by_admf_crossings() {
        let stats = |crosses| AdmfStats {
            zero_cross_count: crosses,
            avg_distance: 20.0,
            max_distance: 100.0,
            pct_near_zero: 30.0,
        };
        let mut a = entity("AAA", Exchange::Hose);
        a.admf_1m = Some(stats(2));
        let mut b = entity("BBB", Exchange::Hose);
        b.admf_1m = Some(stats(7));
        let c = entity("CCC", Exchange::Hose);

        let mut controls = ScreenerControls::default();
        controls.sort_by(Metric::AdmfCrosses(AdmfWindow::OneMonth));
        controls.sort_order = SortOrder::Descending;

        let entities = [a, b, c];
        assert_eq!(symbols(&filter_and_sort(&entities, &controls)), vec!["BBB", "AAA", "CCC"]);
    }

    #[test]
    fn test_sort_by_toggles_active_column() {
        let mut controls = ScreenerControls::default();
        controls.sort_by(Metric::MaConverge);
        assert_eq!(controls.sort_order, SortOrder::Descending);

        controls.sort_by(Metric::Volume);
        assert_eq!(controls.sort_key, Metric::Volume);
        assert_eq!(controls.sort_order, SortOrder::Ascending);
    }

    #[test]
    fn test_thresholds_accessors() {
        let mut thresholds = Thresholds::default();
        thresholds.set(Metric::Ma20_60, 3.5);
        thresholds.set(Metric::Price, 99.0);

        assert_eq!(thresholds.get(Metric::Ma20_60), Some(3.5));
        assert_eq!(thresholds.get(Metric::Price), None);
    }

    #[test]
    fn test_exchange_filter_labels() {
        assert_eq!(ExchangeFilter::from_label("ALL"), Some(ExchangeFilter::All));
        assert_eq!(ExchangeFilter::from_label("UPCOM"), Some(ExchangeFilter::Only(Exchange::Upcom)));
        assert_eq!(ExchangeFilter::from_label("NYSE"), None);
        assert_eq!(ExchangeFilter::all().len(), 4);
    }
}
