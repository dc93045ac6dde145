//! Draw commands produced by the chart renderers
//!
//! A [`DrawList`] is an ordered, surface-independent description of one paint.
//! Any 2D surface can execute it; [`crate::component`] executes it as SVG.

use crate::chartkit::line_path;
use crate::colors;

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

/// A single drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { width: f64, height: f64, color: String },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: String,
        width: f64,
        dashed: bool,
    },
    /// Connected line through `points`, in order
    Polyline {
        points: Vec<(f64, f64)>,
        color: String,
        width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
        stroke: Option<String>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        color: String,
        size: f64,
        anchor: TextAnchor,
    },
}

impl DrawCommand {
    /// SVG path data for polylines
    pub fn svg_path(&self) -> Option<String> {
        match self {
            Self::Polyline { points, .. } => Some(line_path(points)),
            _ => None,
        }
    }
}

/// Ordered draw commands for one chart paint
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Points of every polyline drawn in `color`
    pub fn polylines(&self, color: &str) -> Vec<&[(f64, f64)]> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Polyline { points, color: c, .. } if c == color => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Rect { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Consecutive point pairs of a polyline
pub fn segments(points: &[(f64, f64)]) -> impl Iterator<Item = ((f64, f64), (f64, f64))> + '_ {
    points.windows(2).map(|pair| (pair[0], pair[1]))
}

/// Colours and stroke widths shared by both chart variants
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub background: String,
    pub grid: String,
    pub text: String,
    pub grid_lines: usize,
    pub font_size: f64,
    pub wick_width: f64,
    pub average_width: f64,
    /// Opacity of volume bars
    pub volume_alpha: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: colors::BG_PANEL.to_string(),
            grid: colors::GRID.to_string(),
            text: colors::TEXT_MUTED.to_string(),
            grid_lines: 5,
            font_size: 10.0,
            wick_width: 1.0,
            average_width: 1.5,
            volume_alpha: 0.5,
        }
    }
}
