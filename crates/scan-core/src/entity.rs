//! Stock snapshot rows and the snapshot document

use crate::{
    CompactNumberFormatter, DataResult, DecimalPriceFormatter, LargeNumberFormatter, PercentFormatter,
    PriceFormatter, Symbol,
};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Listing exchange. Any other listing code decodes as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exchange {
    #[serde(rename = "HOSE")]
    Hose,
    #[serde(rename = "HNX")]
    Hnx,
    #[serde(rename = "UPCOM")]
    Upcom,
    #[serde(rename = "UNKNOWN", other)]
    Unknown,
}

impl Exchange {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hose => "HOSE",
            Self::Hnx => "HNX",
            Self::Upcom => "UPCOM",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Exchanges offered as filters
    pub fn all() -> &'static [Self] {
        &[Self::Hose, Self::Hnx, Self::Upcom]
    }

    /// Lenient decode: non-string codes become `Unknown`
    pub fn from_value(value: &Value) -> Self {
        Self::deserialize(value).unwrap_or(Self::Unknown)
    }
}

/// Optional exchange field that never fails its document
pub(crate) fn lenient_exchange<'de, D>(deserializer: D) -> Result<Option<Exchange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|v| Exchange::from_value(&v)))
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Trailing window of an ADMF zero-crossing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdmfWindow {
    OneMonth,
    TwoMonths,
    ThreeMonths,
    FourMonths,
}

impl AdmfWindow {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneMonth => "1M",
            Self::TwoMonths => "2M",
            Self::ThreeMonths => "3M",
            Self::FourMonths => "4M",
        }
    }

    /// Trading sessions covered by the window
    pub fn sessions(&self) -> usize {
        match self {
            Self::OneMonth => 22,
            Self::TwoMonths => 44,
            Self::ThreeMonths => 66,
            Self::FourMonths => 88,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::OneMonth, Self::TwoMonths, Self::ThreeMonths, Self::FourMonths]
    }
}

/// How ADMF oscillated around zero over one window.
///
/// Distances are percentages of the window's largest absolute ADMF.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdmfStats {
    pub zero_cross_count: u32,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub pct_near_zero: f64,
}

/// Numeric column of a snapshot row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Price,
    Volume,
    Ma5_20,
    Ma20_60,
    Ma5_60,
    MaConverge,
    VaConverge,
    Admf,
    /// Zero crossings of ADMF within the window
    AdmfCrosses(AdmfWindow),
    /// Share of the window where ADMF sat near zero
    AdmfNearZero(AdmfWindow),
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Price => "Price",
            Self::Volume => "Volume",
            Self::Ma5_20 => "MA5-20",
            Self::Ma20_60 => "MA20-60",
            Self::Ma5_60 => "MA5-60",
            Self::MaConverge => "MA converge",
            Self::VaConverge => "VA converge",
            Self::Admf => "ADMF",
            Self::AdmfCrosses(window) => match window {
                AdmfWindow::OneMonth => "ADMF crosses 1M",
                AdmfWindow::TwoMonths => "ADMF crosses 2M",
                AdmfWindow::ThreeMonths => "ADMF crosses 3M",
                AdmfWindow::FourMonths => "ADMF crosses 4M",
            },
            Self::AdmfNearZero(window) => match window {
                AdmfWindow::OneMonth => "ADMF near zero 1M",
                AdmfWindow::TwoMonths => "ADMF near zero 2M",
                AdmfWindow::ThreeMonths => "ADMF near zero 3M",
                AdmfWindow::FourMonths => "ADMF near zero 4M",
            },
        }
    }

    pub fn all() -> &'static [Self] {
        use AdmfWindow::*;
        &[
            Self::Price,
            Self::Volume,
            Self::Ma5_20,
            Self::Ma20_60,
            Self::Ma5_60,
            Self::MaConverge,
            Self::VaConverge,
            Self::Admf,
            Self::AdmfCrosses(OneMonth),
            Self::AdmfCrosses(TwoMonths),
            Self::AdmfCrosses(ThreeMonths),
            Self::AdmfCrosses(FourMonths),
            Self::AdmfNearZero(OneMonth),
            Self::AdmfNearZero(TwoMonths),
            Self::AdmfNearZero(ThreeMonths),
            Self::AdmfNearZero(FourMonths),
        ]
    }
}

/// Latest snapshot of one listed stock.
///
/// Convergence metrics are percentage spreads computed upstream; any of them
/// may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub symbol: Symbol,
    pub exchange: Exchange,
    pub price: Option<f64>,
    pub volume: Option<u64>,
    pub ma5_20: Option<f64>,
    pub ma20_60: Option<f64>,
    #[serde(rename = "maConverge")]
    pub ma_converge: Option<f64>,
    #[serde(rename = "vaConverge")]
    pub va_converge: Option<f64>,
    pub ma5_60: Option<f64>,
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub admf: Option<f64>,
    /// ADMF profiles; null when the window lacks data
    pub admf_1m: Option<AdmfStats>,
    pub admf_2m: Option<AdmfStats>,
    pub admf_3m: Option<AdmfStats>,
    pub admf_4m: Option<AdmfStats>,
}

impl Entity {
    /// Row with only identity fields set
    pub fn new(symbol: impl Into<Symbol>, exchange: Exchange) -> Self {
        Self {
            symbol: symbol.into(),
            exchange,
            price: None,
            volume: None,
            ma5_20: None,
            ma20_60: None,
            ma_converge: None,
            va_converge: None,
            ma5_60: None,
            ma5: None,
            ma20: None,
            ma60: None,
            admf: None,
            admf_1m: None,
            admf_2m: None,
            admf_3m: None,
            admf_4m: None,
        }
    }

    pub fn admf_stats(&self, window: AdmfWindow) -> Option<&AdmfStats> {
        match window {
            AdmfWindow::OneMonth => self.admf_1m.as_ref(),
            AdmfWindow::TwoMonths => self.admf_2m.as_ref(),
            AdmfWindow::ThreeMonths => self.admf_3m.as_ref(),
            AdmfWindow::FourMonths => self.admf_4m.as_ref(),
        }
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Price => self.price,
            Metric::Volume => self.volume.map(|v| v as f64),
            Metric::Ma5_20 => self.ma5_20,
            Metric::Ma20_60 => self.ma20_60,
            Metric::Ma5_60 => self.ma5_60,
            Metric::MaConverge => self.ma_converge,
            Metric::VaConverge => self.va_converge,
            Metric::Admf => self.admf,
            Metric::AdmfCrosses(window) => self.admf_stats(window).map(|s| s.zero_cross_count as f64),
            Metric::AdmfNearZero(window) => self.admf_stats(window).map(|s| s.pct_near_zero),
        }
    }

    /// Display text for a list cell, `-` when absent
    pub fn display(&self, metric: Metric) -> String {
        let value = self.metric(metric);
        match metric {
            Metric::Price => DecimalPriceFormatter::default().format_opt(value),
            Metric::Volume | Metric::Admf | Metric::AdmfCrosses(_) => CompactNumberFormatter.format_opt(value),
            _ => PercentFormatter.format_opt(value),
        }
    }
}

/// Snapshot payload listing every scanned stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub updated: String,
    #[serde(default)]
    pub generated: Option<String>,
    #[serde(rename = "totalStocks")]
    pub total_stocks: usize,
    #[serde(deserialize_with = "lenient_rows")]
    pub stocks: Vec<Entity>,
}

/// Decode rows one at a time, dropping the ones that fail
fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<Entity>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Vec::<Value>::deserialize(deserializer)?;
    let total = rows.len();
    let stocks: Vec<Entity> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| match Entity::deserialize(&row) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!("snapshot row {} skipped: {}", i, e);
                None
            }
        })
        .collect();

    if stocks.len() != total {
        tracing::warn!("snapshot: kept {} of {} rows", stocks.len(), total);
    }
    Ok(stocks)
}

impl SnapshotDocument {
    pub fn from_json(json: &str) -> DataResult<Self> {
        let doc: Self = serde_json::from_str(json)?;
        if doc.total_stocks != doc.stocks.len() {
            tracing::warn!(
                "snapshot reports {} stocks but lists {}",
                doc.total_stocks,
                doc.stocks.len()
            );
        }
        Ok(doc)
    }

    /// Trading date the snapshot was taken for
    pub fn updated_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.updated, "%Y-%m-%d").ok()
    }

    /// Generation time; the upstream writer emits a naive local ISO timestamp
    pub fn generated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.generated.as_deref()?;
        DateTime::<FixedOffset>::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_local())
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
            .ok()
    }

    pub fn find(&self, symbol: &Symbol) -> Option<&Entity> {
        self.stocks.iter().find(|e| &e.symbol == symbol)
    }
}
