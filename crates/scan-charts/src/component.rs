//! SVG chart components
//!
//! Executes [`DrawList`]s as SVG and routes pointer events through
//! [`InteractionHandler`]. The SVG is sized in pixels equal to its
//! [`ChartDimensions`], so event offsets are surface coordinates.

use crate::{
    chartkit::format_price,
    colors,
    draw::{ChartStyle, DrawCommand, DrawList},
    interaction::{InteractionHandler, InteractionState, PointerEvent, Tooltip},
    mapper::PriceMapper,
    price::render_price_chart,
    viewport::{ViewRange, Viewport, ViewportConfig},
    volume::render_volume_chart,
    ChartDimensions,
};
use leptos::prelude::*;
use scan_core::{LoadState, Series};

const FONT_FAMILY: &str = "JetBrains Mono, monospace";
const TOOLTIP_OFFSET: f64 = 12.0;

/// Price chart configuration
#[derive(Debug, Clone)]
pub struct PriceChartConfig {
    pub width: f64,
    pub height: f64,
    pub viewport: ViewportConfig,
    pub style: ChartStyle,
    pub show_crosshair: bool,
}

impl Default for PriceChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 420.0,
            viewport: ViewportConfig::default(),
            style: ChartStyle::default(),
            show_crosshair: true,
        }
    }
}

/// Volume chart configuration
#[derive(Debug, Clone)]
pub struct VolumeChartConfig {
    pub width: f64,
    pub height: f64,
    pub style: ChartStyle,
}

impl Default for VolumeChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 160.0,
            style: ChartStyle::default(),
        }
    }
}

// ============================================================================
// DRAW LIST EXECUTOR
// ============================================================================

fn command_view(command: DrawCommand) -> AnyView {
    let path = command.svg_path();
    match command {
        DrawCommand::Clear { width, height, color } => view! {
            <rect width=width height=height fill=color rx="4" />
        }
        .into_any(),
        DrawCommand::Line { x1, y1, x2, y2, color, width, dashed } => view! {
            <line
                x1=x1 y1=y1
                x2=x2 y2=y2
                stroke=color
                stroke-width=width
                stroke-dasharray=dashed.then_some("2,2")
            />
        }
        .into_any(),
        DrawCommand::Polyline { color, width, .. } => view! {
            <path
                d=path.unwrap_or_default()
                fill="none"
                stroke=color
                stroke-width=width
                stroke-linejoin="round"
            />
        }
        .into_any(),
        DrawCommand::Rect { x, y, width, height, fill, stroke } => view! {
            <rect
                x=x y=y
                width=width height=height
                fill=fill
                stroke=stroke
                stroke-width="1"
            />
        }
        .into_any(),
        DrawCommand::Text { x, y, text, color, size, anchor } => view! {
            <text
                x=x y=y
                fill=color
                font-size=size
                text-anchor=anchor.as_svg()
                font-family=FONT_FAMILY
            >
                {text}
            </text>
        }
        .into_any(),
    }
}

/// Execute a draw list as a group of SVG elements.
///
/// Children ignore pointer events so the root `<svg>` is always the event
/// target and offsets stay relative to it.
pub fn draw_list_view(list: DrawList) -> impl IntoView {
    view! {
        <g style="pointer-events: none;">
            {list.into_commands().into_iter().map(command_view).collect_view()}
        </g>
    }
}

const NO_DATA: &str = "No data available";

fn status_text<T>(state: &LoadState<T>) -> &'static str {
    match state {
        LoadState::Idle => "Select a stock",
        other => other.label(),
    }
}

/// Loading / failed / idle placeholder
fn status_view(text: &'static str, dims: &ChartDimensions) -> AnyView {
    view! {
        <svg
            class="chart-status"
            width=dims.width
            height=dims.height
            viewBox=dims.viewbox()
        >
            <rect width=dims.width height=dims.height fill=colors::BG_PANEL rx="4" />
            <text
                x=dims.width / 2.0
                y=dims.height / 2.0
                text-anchor="middle"
                fill=colors::TEXT_MUTED
                font-size="12"
                font-family=FONT_FAMILY
            >
                {text}
            </text>
        </svg>
    }
    .into_any()
}

// ============================================================================
// PRICE CHART
// ============================================================================

/// Interactive candlestick chart with MA overlays, zoom, pan and tooltip
#[component]
pub fn PriceChart(
    #[prop(into)] series: Signal<LoadState<Series>>,
    #[prop(optional)] config: Option<PriceChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let dims = ChartDimensions::new(config.width, config.height);
    let viewport_config = config.viewport;
    let show_crosshair = config.show_crosshair;
    let style = config.style;

    let range = RwSignal::new(ViewRange::default());
    let interaction = RwSignal::new(InteractionState::default());

    // A new series starts from the most recent window with no hover or drag
    Effect::new(move |_| {
        let len = series.with(|state| state.ready().map_or(0, Series::len));
        let initial = Viewport::with_config(len, viewport_config).initialize();
        tracing::debug!("price chart initialized with {} bars at {}", len, initial);
        range.set(initial);
        interaction.set(InteractionState::default());
    });

    // Returns whether the browser default should be suppressed, series or not
    let dispatch = move |event: PointerEvent| -> bool {
        series.with_untracked(|state| {
            let Some(s) = state.ready() else {
                return event.suppresses_default();
            };

            let handler = InteractionHandler::new(s, viewport_config, dims);
            let current = range.get_untracked();
            let next = handler.handle(&interaction.get_untracked(), current, event);

            if next.range != current {
                range.set(next.range);
            }
            interaction.set(next.state);
            next.prevent_default
        })
    };

    let step = move |apply: fn(&Viewport, ViewRange) -> ViewRange| {
        let len = series.with_untracked(|state| state.ready().map_or(0, Series::len));
        let viewport = Viewport::with_config(len, viewport_config);
        range.update(|r| *r = apply(&viewport, *r));
    };

    let chart = move || {
        series.with(|state| match state.ready() {
            Some(s) => {
                let list = render_price_chart(s, range.get(), &dims, &style);
                if list.is_empty() {
                    status_view(NO_DATA, &dims)
                } else {
                    draw_list_view(list).into_any()
                }
            }
            None => status_view(status_text(state), &dims),
        })
    };

    // Hover crosshair with the price under the pointer
    let crosshair = move || {
        if !show_crosshair {
            return None;
        }
        let tooltip = interaction.with(|i| i.tooltip.clone())?;
        let mapper = series.with(|state| {
            let s = state.ready()?;
            let r = range.get();
            PriceMapper::from_bars(s.window(r.start, r.end), &dims)
        })?;

        let y = tooltip.pixel_y.max(dims.top()).min(dims.bottom());
        Some(view! {
            <g class="crosshair" style="pointer-events: none;">
                <line
                    x1=tooltip.pixel_x y1=dims.top()
                    x2=tooltip.pixel_x y2=dims.bottom()
                    stroke=colors::BORDER
                    stroke-dasharray="4,4"
                />
                <line
                    x1=dims.left() y1=y
                    x2=dims.right() y2=y
                    stroke=colors::BORDER
                    stroke-dasharray="4,4"
                />
                <text
                    x=dims.right() + 6.0
                    y=y + 3.5
                    fill=colors::TEXT_PRIMARY
                    font-size="10"
                    font-family=FONT_FAMILY
                >
                    {format_price(mapper.y_to_price(y))}
                </text>
            </g>
        })
    };

    view! {
        <div class="price-chart">
            <div class="chart-toolbar">
                <button title="Zoom in" on:click=move |_| step(Viewport::contract)>"+"</button>
                <button title="Zoom out" on:click=move |_| step(Viewport::expand)>"−"</button>
                <button title="Show all" on:click=move |_| step(|v, _| v.reset())>"Reset"</button>
                <span class="chart-range">
                    {move || {
                        let r = range.get();
                        series.with(|state| {
                            state.ready().and_then(|s| {
                                let first = s.get(r.start)?;
                                let last = s.get(r.end.checked_sub(1)?)?;
                                Some(format!("{} - {} ({} bars)", first.display_date(), last.display_date(), r.len()))
                            })
                        })
                    }}
                </span>
            </div>

            <div class="price-chart-body" style="position: relative;">
                <svg
                    class="price-chart-surface"
                    width=dims.width
                    height=dims.height
                    viewBox=dims.viewbox()
                    style:cursor=move || if interaction.with(|i| i.drag.is_dragging()) { "grabbing" } else { "crosshair" }
                    on:mousemove=move |ev: web_sys::MouseEvent| {
                        dispatch(PointerEvent::Move { x: ev.offset_x() as f64, y: ev.offset_y() as f64 });
                    }
                    on:mousedown=move |ev: web_sys::MouseEvent| {
                        dispatch(PointerEvent::Down { x: ev.offset_x() as f64 });
                    }
                    on:mouseup=move |_| {
                        dispatch(PointerEvent::Up);
                    }
                    on:mouseleave=move |_| {
                        dispatch(PointerEvent::Leave);
                    }
                    on:wheel=move |ev: web_sys::WheelEvent| {
                        if dispatch(PointerEvent::Wheel { delta_y: ev.delta_y() }) {
                            ev.prevent_default();
                        }
                    }
                >
                    {chart}
                    {crosshair}
                </svg>

                {move || interaction.with(|i| i.tooltip.clone()).map(|tooltip| view! { <TooltipPanel tooltip=tooltip /> })}
            </div>
        </div>
    }
}

/// Absolute placement beside the pointer, in the chart body's coordinates
fn tooltip_style(tooltip: &Tooltip) -> String {
    format!(
        "position: absolute; left: {}px; top: {}px; pointer-events: none;",
        tooltip.pixel_x + TOOLTIP_OFFSET,
        tooltip.pixel_y + TOOLTIP_OFFSET,
    )
}

#[component]
fn TooltipPanel(tooltip: Tooltip) -> impl IntoView {
    let style = tooltip_style(&tooltip);

    view! {
        <div class="chart-tooltip" style=style>
            {tooltip.rows().into_iter().map(|(label, value)| view! {
                <div class="tooltip-row">
                    <span class="tooltip-label">{label}</span>
                    <span class="tooltip-value">{value}</span>
                </div>
            }).collect_view()}
        </div>
    }
}

// ============================================================================
// VOLUME CHART
// ============================================================================

/// Volume histogram over the most recent bars
#[component]
pub fn VolumeChart(
    #[prop(into)] series: Signal<LoadState<Series>>,
    #[prop(optional)] config: Option<VolumeChartConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let dims = ChartDimensions::new(config.width, config.height);
    let style = config.style;

    let chart = move || {
        series.with(|state| match state.ready() {
            Some(s) if !s.is_empty() => draw_list_view(render_volume_chart(s, &dims, &style)).into_any(),
            Some(_) => status_view(NO_DATA, &dims),
            None => status_view(status_text(state), &dims),
        })
    };

    view! {
        <div class="volume-chart">
            <svg
                class="volume-chart-surface"
                width=dims.width
                height=dims.height
                viewBox=dims.viewbox()
            >
                {chart}
            </svg>
        </div>
    }
}
