//! Pointer interaction state machine
//!
//! Every event maps `(InteractionState, ViewRange)` to a fresh [`Transition`].
//! Nothing is mutated in place; the component stores whatever comes back.

use crate::{
    mapper::HitLayout,
    viewport::{ViewRange, Viewport, ViewportConfig, ZoomDirection},
    ChartDimensions,
};
use scan_core::{
    Bar, CompactNumberFormatter, DecimalPriceFormatter, LargeNumberFormatter, PriceFormatter, Series,
};

/// Pointer input, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Down { x: f64 },
    Up,
    Leave,
    Wheel { delta_y: f64 },
}

impl PointerEvent {
    /// Whether the browser default must be suppressed, with or without a series
    pub fn suppresses_default(&self) -> bool {
        matches!(self, Self::Wheel { .. })
    }
}

/// Drag FSM: `Idle -> Dragging -> Idle`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer x at the last processed drag step
    Dragging { anchor_x: f64 },
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Hovered bar and where to show it
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub pixel_x: f64,
    pub pixel_y: f64,
    /// Index into the full series
    pub index: usize,
    pub bar: Bar,
}

impl Tooltip {
    /// Labelled rows: date, OHLCV, MA5, MA20 and ADMF. Absent values read `-`.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let price = DecimalPriceFormatter::default();
        let bar = &self.bar;

        vec![
            ("Date", bar.display_date()),
            ("Open", price.format_opt(bar.o)),
            ("High", price.format_opt(bar.h)),
            ("Low", price.format_opt(bar.l)),
            ("Close", price.format_opt(bar.c)),
            ("Volume", CompactNumberFormatter.format_opt(bar.v.map(|v| v as f64))),
            ("MA5", price.format_opt(bar.ma5)),
            ("MA20", price.format_opt(bar.ma20)),
            ("ADMF", CompactNumberFormatter.format_opt(bar.admf)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    pub drag: DragState,
    pub tooltip: Option<Tooltip>,
}

/// Result of one pointer event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: InteractionState,
    pub range: ViewRange,
    /// Suppress the browser's default handling (page scroll on wheel)
    pub prevent_default: bool,
}

/// Applies pointer events against one series drawn on one surface
#[derive(Debug, Clone)]
pub struct InteractionHandler<'a> {
    series: &'a Series,
    viewport: Viewport,
    dims: ChartDimensions,
}

impl<'a> InteractionHandler<'a> {
    pub fn new(series: &'a Series, config: ViewportConfig, dims: ChartDimensions) -> Self {
        Self {
            series,
            viewport: Viewport::with_config(series.len(), config),
            dims,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn handle(&self, state: &InteractionState, range: ViewRange, event: PointerEvent) -> Transition {
        match event {
            PointerEvent::Move { x, y } => {
                let (drag, range) = match state.drag {
                    DragState::Dragging { anchor_x } => (
                        DragState::Dragging { anchor_x: x },
                        self.viewport.pan_by_pixels(range, anchor_x - x),
                    ),
                    DragState::Idle => (DragState::Idle, range),
                };

                Transition {
                    state: InteractionState {
                        drag,
                        tooltip: self.hit_test(range, x, y),
                    },
                    range,
                    prevent_default: false,
                }
            }
            PointerEvent::Down { x } => Transition {
                state: InteractionState {
                    drag: DragState::Dragging { anchor_x: x },
                    tooltip: state.tooltip.clone(),
                },
                range,
                prevent_default: false,
            },
            PointerEvent::Up => Transition {
                state: InteractionState {
                    drag: DragState::Idle,
                    tooltip: state.tooltip.clone(),
                },
                range,
                prevent_default: false,
            },
            PointerEvent::Leave => Transition {
                state: InteractionState {
                    drag: state.drag,
                    tooltip: None,
                },
                range,
                prevent_default: false,
            },
            PointerEvent::Wheel { delta_y } => Transition {
                state: state.clone(),
                range: self.viewport.zoom(range, ZoomDirection::from_wheel_delta(delta_y)),
                prevent_default: event.suppresses_default(),
            },
        }
    }

    /// Bar under `x` in the visible window, using the uniform hit layout
    pub fn hit_test(&self, range: ViewRange, x: f64, y: f64) -> Option<Tooltip> {
        let visible = self.series.window(range.start, range.end);
        let i = HitLayout::new(visible.len(), &self.dims)?.index_at(x)?;

        Some(Tooltip {
            pixel_x: x,
            pixel_y: y,
            index: range.start + i,
            bar: visible[i].clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChartMargin;
    use scan_core::Symbol;

    fn series(n: usize) -> Series {
        let bars = (0..n)
            .map(|i| {
                Bar::new(format!("2024-{:02}-{:02}", i / 28 + 1, i % 28 + 1))
                    .with_ohlc(10.0, 11.0, 9.0, 10.5)
                    .with_volume(1_000)
            })
            .collect();
        Series::new(Symbol::new("FPT"), bars)
    }

    fn dims() -> ChartDimensions {
        // 600px plot area starting at x = 0
        ChartDimensions::new(600.0, 300.0).with_margin(ChartMargin::uniform(0.0))
    }

    #[test]
    fn test_move_shows_tooltip_for_hovered_bar() {
        let s = series(100);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let range = ViewRange::new(40, 100);

        // 60 visible bars, 10px each
        let t = handler.handle(&InteractionState::default(), range, PointerEvent::Move { x: 25.0, y: 50.0 });
        let tooltip = t.state.tooltip.unwrap();
        assert_eq!(tooltip.index, 42);
        assert_eq!(tooltip.bar, s.bars()[42]);
        assert_eq!(t.range, range);
    }

    #[test]
    fn test_move_outside_plot_clears_tooltip() {
        let s = series(100);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let range = ViewRange::new(40, 100);

        let hovered = handler.handle(&InteractionState::default(), range, PointerEvent::Move { x: 25.0, y: 0.0 });
        let t = handler.handle(&hovered.state, range, PointerEvent::Move { x: 650.0, y: 0.0 });
        assert!(t.state.tooltip.is_none());
    }

    #[test]
    fn test_drag_pans_and_moves_anchor() {
        let s = series(200);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let range = ViewRange::new(40, 100);

        let down = handler.handle(&InteractionState::default(), range, PointerEvent::Down { x: 300.0 });
        assert_eq!(down.state.drag, DragState::Dragging { anchor_x: 300.0 });

        // dragging left by 50px reveals newer bars
        let moved = handler.handle(&down.state, range, PointerEvent::Move { x: 250.0, y: 10.0 });
        assert_eq!(moved.range, ViewRange::new(45, 105));
        assert_eq!(moved.state.drag, DragState::Dragging { anchor_x: 250.0 });

        // tooltip reflects the panned window
        assert_eq!(moved.state.tooltip.as_ref().unwrap().index, 45 + 25);

        let up = handler.handle(&moved.state, moved.range, PointerEvent::Up);
        assert_eq!(up.state.drag, DragState::Idle);
        assert_eq!(up.range, moved.range);
    }

    #[test]
    fn test_drag_rounds_half_pixels_per_bar_up() {
        let s = series(100);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let state = InteractionState {
            drag: DragState::Dragging { anchor_x: 300.0 },
            tooltip: None,
        };

        let t = handler.handle(&state, ViewRange::new(40, 100), PointerEvent::Move { x: 325.0, y: 0.0 });
        assert_eq!(t.range, ViewRange::new(38, 98));
    }

    #[test]
    fn test_move_without_drag_never_pans() {
        let s = series(200);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let range = ViewRange::new(40, 100);

        let t = handler.handle(&InteractionState::default(), range, PointerEvent::Move { x: 0.0, y: 0.0 });
        assert_eq!(t.range, range);
    }

    #[test]
    fn test_leave_clears_tooltip_keeps_drag() {
        let s = series(100);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let range = ViewRange::new(40, 100);

        let down = handler.handle(&InteractionState::default(), range, PointerEvent::Down { x: 100.0 });
        let hovered = handler.handle(&down.state, range, PointerEvent::Move { x: 100.0, y: 5.0 });
        assert!(hovered.state.tooltip.is_some());

        let left = handler.handle(&hovered.state, range, PointerEvent::Leave);
        assert!(left.state.tooltip.is_none());
        assert!(left.state.drag.is_dragging());
    }

    #[test]
    fn test_wheel_zooms_and_prevents_scroll() {
        let s = series(100);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        let range = handler.viewport().initialize();
        assert_eq!(range, ViewRange::new(40, 100));

        let out = handler.handle(&InteractionState::default(), range, PointerEvent::Wheel { delta_y: 100.0 });
        assert!(out.prevent_default);
        assert_eq!(out.range, ViewRange::new(37, 100));

        let back = handler.handle(&out.state, range, PointerEvent::Wheel { delta_y: -100.0 });
        assert_eq!(back.range, ViewRange::new(43, 97));
    }

    #[test]
    fn test_tooltip_rows_mark_absent_values() {
        let mut bar = Bar::new("2024-03-15").with_ohlc(25.5, 26.0, 25.0, 25.8);
        bar.ma5 = Some(25.12);
        bar.admf = Some(-48_250.0);
        let tooltip = Tooltip {
            pixel_x: 0.0,
            pixel_y: 0.0,
            index: 0,
            bar,
        };

        let rows = tooltip.rows();
        assert_eq!(rows[0], ("Date", "15/03/2024".to_string()));
        assert_eq!(rows[4], ("Close", "25.80".to_string()));
        assert_eq!(rows[5], ("Volume", "-".to_string()));
        assert_eq!(rows[6], ("MA5", "25.12".to_string()));
        assert_eq!(rows[7], ("MA20", "-".to_string()));
        assert_eq!(rows[8], ("ADMF", "-48.25K".to_string()));
    }

    #[test]
    fn test_only_wheel_suppresses_default() {
        assert!(PointerEvent::Wheel { delta_y: 0.0 }.suppresses_default());
        assert!(!PointerEvent::Move { x: 1.0, y: 1.0 }.suppresses_default());
        assert!(!PointerEvent::Down { x: 1.0 }.suppresses_default());
        assert!(!PointerEvent::Leave.suppresses_default());
    }

    #[test]
    fn test_empty_series_has_no_hits() {
        let s = series(0);
        let handler = InteractionHandler::new(&s, ViewportConfig::default(), dims());
        assert!(handler.hit_test(ViewRange::default(), 10.0, 10.0).is_none());

        let out = handler.handle(&InteractionState::default(), ViewRange::default(), PointerEvent::Wheel { delta_y: 1.0 });
        assert!(out.prevent_default);
        assert_eq!(out.range, ViewRange::default());
    }
}
