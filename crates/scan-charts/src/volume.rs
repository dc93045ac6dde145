//! Volume histogram renderer
//!
//! Always shows the most recent [`VOLUME_WINDOW`] bars, independent of the
//! price chart's viewport.

use crate::{
    chartkit::format_volume,
    draw::{ChartStyle, DrawCommand, DrawList},
    mapper::{CandleLayout, VolumeMapper},
    price::{average_polyline, clear, grid, legend},
    ChartDimensions,
};
use scan_core::{colors, AverageLine, Series};

/// Bars shown by the volume chart
pub const VOLUME_WINDOW: usize = 60;

/// Render the last [`VOLUME_WINDOW`] bars of `series` as a volume histogram
pub fn render_volume_chart(series: &Series, dims: &ChartDimensions, style: &ChartStyle) -> DrawList {
    let bars = series.tail(VOLUME_WINDOW);
    let mut list = DrawList::new();

    let Some(layout) = CandleLayout::new(bars.len(), dims) else {
        return list;
    };
    let mapper = VolumeMapper::from_bars(bars, dims);

    clear(&mut list, dims, style);
    grid(&mut list, &mapper.grid(style.grid_lines), dims, style, format_volume);

    for (i, bar) in bars.iter().enumerate() {
        let Some(v) = bar.v else {
            continue;
        };

        let height = mapper.bar_height(v as f64);
        let fill = bar
            .direction()
            .map(|d| d.color_alpha(style.volume_alpha))
            .unwrap_or_else(|| colors::neutral_alpha(style.volume_alpha));

        list.push(DrawCommand::Rect {
            x: layout.x(i),
            y: mapper.baseline() - height,
            width: layout.candle_width(),
            height,
            fill,
            stroke: None,
        });
    }

    for line in AverageLine::VOLUME {
        if let Some(cmd) = average_polyline(bars, line, &layout, |v| mapper.volume_to_y(v), style) {
            list.push(cmd);
        }
    }

    legend(&mut list, &AverageLine::VOLUME, dims, style);
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use scan_core::{Bar, Symbol};

    fn dims() -> ChartDimensions {
        ChartDimensions::new(600.0, 200.0)
    }

    fn day(i: usize, v: u64) -> Bar {
        Bar::new(format!("2024-{:02}-{:02}", i / 28 + 1, i % 28 + 1))
            .with_ohlc(10.0, 11.0, 9.0, if i % 2 == 0 { 10.5 } else { 9.5 })
            .with_volume(v)
    }

    fn series(bars: Vec<Bar>) -> Series {
        Series::new(Symbol::new("HPG"), bars)
    }

    /// Volume bars are the unstroked rects below the legend area
    fn bar_rects(list: &DrawList, d: &ChartDimensions) -> Vec<(f64, String)> {
        list.rects()
            .filter_map(|cmd| match cmd {
                DrawCommand::Rect { y, height, fill, .. } if *y + *height >= d.bottom() - 1e-9 => {
                    Some((*height, fill.clone()))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_series_draws_nothing() {
        assert!(render_volume_chart(&series(vec![]), &dims(), &ChartStyle::default()).is_empty());
    }

    #[test]
    fn test_uses_last_sixty_bars() {
        let d = dims();
        let s = series((0..100).map(|i| day(i, 1000 + i as u64)).collect());
        let list = render_volume_chart(&s, &d, &ChartStyle::default());

        assert_eq!(bar_rects(&list, &d).len(), VOLUME_WINDOW);
    }

    #[test]
    fn test_bars_scale_to_max_volume() {
        let d = dims();
        let s = series(vec![day(0, 500), day(1, 1000)]);
        let list = render_volume_chart(&s, &d, &ChartStyle::default());
        let rects = bar_rects(&list, &d);

        assert_eq!(rects[0].0, d.inner_height() / 2.0);
        assert_eq!(rects[1].0, d.inner_height());
        assert_eq!(rects[0].1, colors::up_alpha(0.5));
        assert_eq!(rects[1].1, colors::down_alpha(0.5));
    }

    #[test]
    fn test_unknown_direction_is_neutral_and_missing_volume_skipped() {
        let d = dims();
        let s = series(vec![
            Bar::new("2024-01-01").with_volume(800),
            Bar::new("2024-01-02").with_ohlc(1.0, 1.0, 1.0, 1.0),
        ]);
        let list = render_volume_chart(&s, &d, &ChartStyle::default());
        let rects = bar_rects(&list, &d);

        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].1, colors::neutral_alpha(0.5));
    }

    #[test]
    fn test_grid_labels_run_to_zero() {
        let s = series(vec![day(0, 2_000_000), day(1, 1_000_000)]);
        let list = render_volume_chart(&s, &dims(), &ChartStyle::default());
        let labels: Vec<_> = list.texts().take(5).collect();

        assert_eq!(labels[0], "2.00M");
        assert_eq!(labels[4], "0");
    }

    #[test]
    fn test_volume_averages_and_legend() {
        let mut bars: Vec<Bar> = (0..5).map(|i| day(i, 1000)).collect();
        for bar in &mut bars {
            bar.va5 = Some(900.0);
        }
        let list = render_volume_chart(&series(bars), &dims(), &ChartStyle::default());

        assert_eq!(list.polylines(colors::MA5).len(), 1);
        assert!(list.polylines(colors::MA20).is_empty());
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(&texts[texts.len() - 3..], &["VA5", "VA20", "VA60"]);
    }

    #[test]
    fn test_volume_average_normalised_to_max_volume() {
        let d = dims();
        let mut bars: Vec<Bar> = (0..4).map(|i| day(i, if i == 2 { 2000 } else { 1000 })).collect();
        for bar in &mut bars {
            bar.va20 = Some(1500.0);
        }
        let mapper = VolumeMapper::from_bars(&bars, &d);
        let list = render_volume_chart(&series(bars), &d, &ChartStyle::default());

        let lines = list.polylines(colors::MA20);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 4);
        for &(_, y) in lines[0] {
            assert_eq!(y, mapper.volume_to_y(1500.0));
            assert!((y - (d.bottom() - 0.75 * d.inner_height())).abs() < 1e-9);
        }
    }
}
