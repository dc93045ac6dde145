//! Candlestick price chart renderer
//!
//! Paint order: background, grid with price labels, MA5/MA20/MA60 lines,
//! candles (wick then body), legend.

use crate::{
    chartkit::format_price,
    draw::{ChartStyle, DrawCommand, DrawList, TextAnchor},
    mapper::{CandleLayout, PriceMapper},
    viewport::ViewRange,
    ChartDimensions,
};
use scan_core::{AverageLine, Bar, Direction, Series};

/// Smallest body height so flat candles stay visible
pub const MIN_BODY_HEIGHT: f64 = 1.0;

const LEGEND_SPACING: f64 = 60.0;
const SWATCH_WIDTH: f64 = 12.0;
const SWATCH_HEIGHT: f64 = 3.0;

/// Render the visible window of `series` as a candlestick chart.
///
/// An empty window (or one without any price values) produces an empty list.
pub fn render_price_chart(
    series: &Series,
    range: ViewRange,
    dims: &ChartDimensions,
    style: &ChartStyle,
) -> DrawList {
    let bars = series.window(range.start, range.end);
    let mut list = DrawList::new();

    let (Some(mapper), Some(layout)) = (
        PriceMapper::from_bars(bars, dims),
        CandleLayout::new(bars.len(), dims),
    ) else {
        return list;
    };

    clear(&mut list, dims, style);
    grid(&mut list, &mapper.grid(style.grid_lines), dims, style, format_price);

    for line in AverageLine::PRICE {
        if let Some(cmd) = average_polyline(bars, line, &layout, |v| mapper.price_to_y(v), style) {
            list.push(cmd);
        }
    }

    for (i, bar) in bars.iter().enumerate() {
        candle(&mut list, i, bar, &layout, &mapper, style);
    }

    legend(&mut list, &AverageLine::PRICE, dims, style);
    list
}

fn candle(
    list: &mut DrawList,
    i: usize,
    bar: &Bar,
    layout: &CandleLayout,
    mapper: &PriceMapper,
    style: &ChartStyle,
) {
    let Some((o, h, l, c)) = bar.ohlc() else {
        return;
    };

    let direction = if c >= o { Direction::Up } else { Direction::Down };
    let color = direction.color().to_string();
    let x_center = layout.center(i);

    list.push(DrawCommand::Line {
        x1: x_center,
        y1: mapper.price_to_y(h),
        x2: x_center,
        y2: mapper.price_to_y(l),
        color: color.clone(),
        width: style.wick_width,
        dashed: false,
    });

    let body_y = mapper.price_to_y(o.max(c));
    let body_h = (mapper.price_to_y(o.min(c)) - body_y).max(MIN_BODY_HEIGHT);

    list.push(DrawCommand::Rect {
        x: layout.x(i),
        y: body_y,
        width: layout.candle_width(),
        height: body_h,
        fill: color.clone(),
        stroke: Some(color),
    });
}

// ============================================================================
// SHARED PAINT STEPS
// ============================================================================

pub(crate) fn clear(list: &mut DrawList, dims: &ChartDimensions, style: &ChartStyle) {
    list.push(DrawCommand::Clear {
        width: dims.width,
        height: dims.height,
        color: style.background.clone(),
    });
}

/// Dashed horizontal rules with a label right of the plot area
pub(crate) fn grid(
    list: &mut DrawList,
    rows: &[(f64, f64)],
    dims: &ChartDimensions,
    style: &ChartStyle,
    label: impl Fn(f64) -> String,
) {
    for &(y, value) in rows {
        list.push(DrawCommand::Line {
            x1: dims.left(),
            y1: y,
            x2: dims.right(),
            y2: y,
            color: style.grid.clone(),
            width: 1.0,
            dashed: true,
        });
        list.push(DrawCommand::Text {
            x: dims.right() + 6.0,
            y: y + style.font_size * 0.35,
            text: label(value),
            color: style.text.clone(),
            size: style.font_size,
            anchor: TextAnchor::Start,
        });
    }
}

/// Polyline through every bar that has a value for `line`.
///
/// Bars without a value are skipped, so a run of gaps becomes one straight
/// chord between its neighbours. Fewer than two points draw nothing.
pub(crate) fn average_polyline(
    bars: &[Bar],
    line: AverageLine,
    layout: &CandleLayout,
    to_y: impl Fn(f64) -> f64,
    style: &ChartStyle,
) -> Option<DrawCommand> {
    let points: Vec<(f64, f64)> = bars
        .iter()
        .enumerate()
        .filter_map(|(i, bar)| line.value(bar).map(|v| (layout.center(i), to_y(v))))
        .collect();

    (points.len() >= 2).then(|| DrawCommand::Polyline {
        points,
        color: line.color().to_string(),
        width: style.average_width,
    })
}

/// Colour swatch and label per average line, in the top margin
pub(crate) fn legend(list: &mut DrawList, lines: &[AverageLine], dims: &ChartDimensions, style: &ChartStyle) {
    let y = dims.top() / 2.0;

    for (k, line) in lines.iter().enumerate() {
        let x = dims.left() + k as f64 * LEGEND_SPACING;

        list.push(DrawCommand::Rect {
            x,
            y: y - SWATCH_HEIGHT / 2.0,
            width: SWATCH_WIDTH,
            height: SWATCH_HEIGHT,
            fill: line.color().to_string(),
            stroke: None,
        });
        list.push(DrawCommand::Text {
            x: x + SWATCH_WIDTH + 4.0,
            y: y + style.font_size * 0.35,
            text: line.label().to_string(),
            color: style.text.clone(),
            size: style.font_size,
            anchor: TextAnchor::Start,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::segments;
    use scan_core::{colors, Symbol};

    fn dims() -> ChartDimensions {
        ChartDimensions::new(600.0, 300.0)
    }

    fn series(bars: Vec<Bar>) -> Series {
        Series::new(Symbol::new("VNM"), bars)
    }

    fn day(i: usize) -> Bar {
        let base = 50.0 + i as f64;
        Bar::new(format!("2024-01-{:02}", i + 1)).with_ohlc(base, base + 2.0, base - 2.0, base + 1.0)
    }

    fn body_fills(list: &DrawList) -> Vec<&str> {
        list.rects()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect { fill, stroke: Some(_), .. } => Some(fill.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_window_draws_nothing() {
        let s = series((0..5).map(day).collect());
        assert!(render_price_chart(&s, ViewRange::new(2, 2), &dims(), &ChartStyle::default()).is_empty());
        assert!(render_price_chart(&series(vec![]), ViewRange::default(), &dims(), &ChartStyle::default()).is_empty());
    }

    #[test]
    fn test_paint_order() {
        let s = series((0..10).map(day).collect());
        let list = render_price_chart(&s, ViewRange::new(0, 10), &dims(), &ChartStyle::default());

        assert!(matches!(list.commands()[0], DrawCommand::Clear { .. }));
        assert!(matches!(list.commands()[1], DrawCommand::Line { dashed: true, .. }));
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(&texts[texts.len() - 3..], &["MA5", "MA20", "MA60"]);
    }

    #[test]
    fn test_grid_labels_interpolate_price_range() {
        let s = series((0..10).map(day).collect());
        let list = render_price_chart(&s, ViewRange::new(0, 10), &dims(), &ChartStyle::default());

        let dashed = list
            .commands()
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { dashed: true, .. }))
            .count();
        assert_eq!(dashed, 5);

        // high of the last bar is 61, low of the first is 48
        let labels: Vec<_> = list.texts().take(5).collect();
        assert_eq!(labels[0], format_price(61.0 * 1.01));
        assert_eq!(labels[4], format_price(48.0 * 0.99));
    }

    #[test]
    fn test_absent_average_is_bridged() {
        let mut bars: Vec<Bar> = (0..4).map(day).collect();
        bars[0].ma5 = Some(50.0);
        bars[3].ma5 = Some(53.0);
        let s = series(bars);
        let d = dims();

        let list = render_price_chart(&s, ViewRange::new(0, 4), &d, &ChartStyle::default());
        let lines = list.polylines(colors::MA5);
        assert_eq!(lines.len(), 1);

        let segs: Vec<_> = segments(lines[0]).collect();
        assert_eq!(segs.len(), 1);

        let layout = CandleLayout::new(4, &d).unwrap();
        assert_eq!((segs[0].0).0, layout.center(0));
        assert_eq!((segs[0].1).0, layout.center(3));
    }

    #[test]
    fn test_single_point_average_not_drawn() {
        let mut bars: Vec<Bar> = (0..4).map(day).collect();
        bars[2].ma20 = Some(52.0);
        let list = render_price_chart(&series(bars), ViewRange::new(0, 4), &dims(), &ChartStyle::default());
        assert!(list.polylines(colors::MA20).is_empty());
    }

    #[test]
    fn test_candle_colors_and_flat_body() {
        let bars = vec![
            Bar::new("2024-01-01").with_ohlc(10.0, 12.0, 9.0, 11.0),
            Bar::new("2024-01-02").with_ohlc(11.0, 11.5, 9.5, 10.0),
            Bar::new("2024-01-03").with_ohlc(10.0, 10.5, 9.5, 10.0),
        ];
        let list = render_price_chart(&series(bars), ViewRange::new(0, 3), &dims(), &ChartStyle::default());

        assert_eq!(body_fills(&list), vec![colors::UP, colors::DOWN, colors::UP]);

        let flat = list
            .rects()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect { height, stroke: Some(_), .. } => Some(*height),
                _ => None,
            })
            .last()
            .unwrap();
        assert_eq!(flat, MIN_BODY_HEIGHT);
    }

    #[test]
    fn test_bars_missing_prices_draw_no_candle() {
        let mut bars: Vec<Bar> = (0..3).map(day).collect();
        bars[1].c = None;
        let list = render_price_chart(&series(bars), ViewRange::new(0, 3), &dims(), &ChartStyle::default());
        assert_eq!(body_fills(&list).len(), 2);
    }

    #[test]
    fn test_window_selects_visible_bars() {
        let s = series((0..30).map(day).collect());
        let list = render_price_chart(&s, ViewRange::new(10, 30), &dims(), &ChartStyle::default());
        assert_eq!(body_fills(&list).len(), 20);
    }
}
