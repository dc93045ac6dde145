//! Daily bar (OHLCV + moving averages) types for charting

use crate::{colors, DataError, DataResult, Exchange, Symbol};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// COLUMNS
// ============================================================================

/// Named column of a per-symbol daily document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Date,
    Open,
    High,
    Low,
    Close,
    Volume,
    Ma5,
    Ma20,
    Ma60,
    Va5,
    Va20,
    Va60,
    Admf,
}

impl Column {
    /// Column name as written by the upstream fetcher
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Open => "o",
            Self::High => "h",
            Self::Low => "l",
            Self::Close => "c",
            Self::Volume => "v",
            Self::Ma5 => "ma5",
            Self::Ma20 => "ma20",
            Self::Ma60 => "ma60",
            Self::Va5 => "va5",
            Self::Va20 => "va20",
            Self::Va60 => "va60",
            Self::Admf => "admf",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::Date, Self::Open, Self::High, Self::Low, Self::Close, Self::Volume,
            Self::Ma5, Self::Ma20, Self::Ma60, Self::Va5, Self::Va20, Self::Va60, Self::Admf,
        ]
    }
}

// ============================================================================
// AVERAGE LINES
// ============================================================================

/// Pre-computed moving average carried by a bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AverageLine {
    Ma5,
    Ma20,
    Ma60,
    Va5,
    Va20,
    Va60,
}

impl AverageLine {
    /// Price moving averages, drawn on the price chart
    pub const PRICE: [Self; 3] = [Self::Ma5, Self::Ma20, Self::Ma60];
    /// Volume moving averages, drawn on the volume chart
    pub const VOLUME: [Self; 3] = [Self::Va5, Self::Va20, Self::Va60];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ma5 => "MA5",
            Self::Ma20 => "MA20",
            Self::Ma60 => "MA60",
            Self::Va5 => "VA5",
            Self::Va20 => "VA20",
            Self::Va60 => "VA60",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Ma5 | Self::Va5 => colors::MA5,
            Self::Ma20 | Self::Va20 => colors::MA20,
            Self::Ma60 | Self::Va60 => colors::MA60,
        }
    }

    pub fn value(&self, bar: &Bar) -> Option<f64> {
        match self {
            Self::Ma5 => bar.ma5,
            Self::Ma20 => bar.ma20,
            Self::Ma60 => bar.ma60,
            Self::Va5 => bar.va5,
            Self::Va20 => bar.va20,
            Self::Va60 => bar.va60,
        }
    }
}

// ============================================================================
// BAR
// ============================================================================

/// Candle direction, keyed by `close >= open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn color(&self) -> &'static str {
        match self {
            Self::Up => colors::UP,
            Self::Down => colors::DOWN,
        }
    }

    pub fn color_alpha(&self, alpha: f64) -> String {
        match self {
            Self::Up => colors::up_alpha(alpha),
            Self::Down => colors::down_alpha(alpha),
        }
    }
}

/// One trading day. Every numeric field may be absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bar {
    /// Ordinal date key (`YYYY-MM-DD`)
    pub date: String,
    pub o: Option<f64>,
    pub h: Option<f64>,
    pub l: Option<f64>,
    pub c: Option<f64>,
    pub v: Option<u64>,
    pub ma5: Option<f64>,
    pub ma20: Option<f64>,
    pub ma60: Option<f64>,
    pub va5: Option<f64>,
    pub va20: Option<f64>,
    pub va60: Option<f64>,
    /// Accumulation/distribution money flow
    pub admf: Option<f64>,
}

impl Bar {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    pub fn with_ohlc(mut self, o: f64, h: f64, l: f64, c: f64) -> Self {
        self.o = Some(o);
        self.h = Some(h);
        self.l = Some(l);
        self.c = Some(c);
        self
    }

    pub fn with_volume(mut self, v: u64) -> Self {
        self.v = Some(v);
        self
    }

    /// Open/high/low/close, only when all four are present
    pub fn ohlc(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.o?, self.h?, self.l?, self.c?))
    }

    pub fn direction(&self) -> Option<Direction> {
        let (o, c) = (self.o?, self.c?);
        Some(if c >= o { Direction::Up } else { Direction::Down })
    }

    pub fn is_up(&self) -> bool {
        self.direction() == Some(Direction::Up)
    }

    pub fn body_top(&self) -> Option<f64> {
        Some(self.o?.max(self.c?))
    }

    pub fn body_bottom(&self) -> Option<f64> {
        Some(self.o?.min(self.c?))
    }

    /// Volume as f64, zero when absent
    pub fn volume(&self) -> f64 {
        self.v.map_or(0.0, |v| v as f64)
    }

    /// Values that bound the price axis: high, low and the price averages
    pub fn price_extremes(&self) -> impl Iterator<Item = f64> + '_ {
        [self.h, self.l, self.ma5, self.ma20, self.ma60]
            .into_iter()
            .flatten()
    }

    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Date for display (`dd/mm/yyyy`), raw key when unparsable
    pub fn display_date(&self) -> String {
        self.naive_date()
            .map_or_else(|| self.date.clone(), |d| d.format("%d/%m/%Y").to_string())
    }

    fn set(&mut self, column: Column, value: &Value) {
        match column {
            Column::Date => {}
            Column::Open => self.o = as_f64(value),
            Column::High => self.h = as_f64(value),
            Column::Low => self.l = as_f64(value),
            Column::Close => self.c = as_f64(value),
            Column::Volume => self.v = as_u64(value),
            Column::Ma5 => self.ma5 = as_f64(value),
            Column::Ma20 => self.ma20 = as_f64(value),
            Column::Ma60 => self.ma60 = as_f64(value),
            Column::Va5 => self.va5 = as_f64(value),
            Column::Va20 => self.va20 = as_f64(value),
            Column::Va60 => self.va60 = as_f64(value),
            Column::Admf => self.admf = as_f64(value),
        }
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) if n.is_u64() => n.as_u64(),
        _ => as_f64(value).filter(|v| *v >= 0.0).map(|v| v.round() as u64),
    }
}

fn as_date(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ============================================================================
// SERIES
// ============================================================================

/// Bars for one symbol, strictly ascending by date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub symbol: Symbol,
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series, ordering by date and dropping repeated dates
    pub fn new(symbol: Symbol, mut bars: Vec<Bar>) -> Self {
        bars.sort_by(|a, b| a.date.cmp(&b.date));
        let before = bars.len();
        bars.dedup_by(|later, earlier| later.date == earlier.date);
        if bars.len() != before {
            tracing::debug!("{}: dropped {} duplicate dates", symbol, before - bars.len());
        }

        Self { symbol, bars }
    }

    pub fn empty(symbol: Symbol) -> Self {
        Self {
            symbol,
            bars: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    /// Bars in `start..end`, clamped to the series bounds
    pub fn window(&self, start: usize, end: usize) -> &[Bar] {
        let end = end.min(self.bars.len());
        let start = start.min(end);
        &self.bars[start..end]
    }

    /// The most recent `n` bars
    pub fn tail(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// First and last date keys
    pub fn date_range(&self) -> Option<(&str, &str)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.date.as_str(), last.date.as_str())),
            _ => None,
        }
    }
}

// ============================================================================
// DAILY DOCUMENT
// ============================================================================

/// Per-symbol daily payload: column names plus positional rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyDocument {
    pub symbol: Symbol,
    #[serde(default, deserialize_with = "crate::entity::lenient_exchange")]
    pub exchange: Option<Exchange>,
    #[serde(default)]
    pub updated: Option<String>,
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl DailyDocument {
    pub fn from_json(json: &str) -> DataResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Zip every row against `columns` by name.
    ///
    /// Unknown columns are ignored and unlisted fields stay absent. Rows without
    /// a usable date are skipped.
    pub fn to_series(&self) -> DataResult<Series> {
        let mut date_pos = None;
        let mut positions = Vec::with_capacity(self.columns.len());

        for (pos, name) in self.columns.iter().enumerate() {
            match Column::from_name(name.trim()) {
                Some(Column::Date) => date_pos = Some(pos),
                Some(column) => positions.push((pos, column)),
                None => tracing::trace!("{}: ignoring column `{}`", self.symbol, name),
            }
        }

        let date_pos = date_pos.ok_or_else(|| DataError::MissingColumn {
            symbol: self.symbol.to_string(),
            column: Column::Date.name(),
        })?;

        let mut bars = Vec::with_capacity(self.data.len());
        let mut skipped = 0usize;

        for row in &self.data {
            let Some(date) = row.get(date_pos).and_then(as_date) else {
                skipped += 1;
                continue;
            };

            let mut bar = Bar::new(date);
            for &(pos, column) in &positions {
                if let Some(value) = row.get(pos) {
                    bar.set(column, value);
                }
            }
            bars.push(bar);
        }

        if skipped > 0 {
            tracing::warn!("{}: skipped {} rows without a date", self.symbol, skipped);
        }

        Ok(Series::new(self.symbol.clone(), bars))
    }
}
