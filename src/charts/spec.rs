//! Chart Specification Module
//! Plain-data description of a chart: layout, traces, shapes and an optional
//! side table. Both the interactive plotter and the static renderer consume it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA colour, alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Alpha scaled to a byte.
    pub fn alpha_u8(&self) -> u8 {
        (self.a.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dash {
    Solid,
    Dash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TickPlacement {
    Outside,
    Inside { length: f32 },
    /// Labels only, no tick marks.
    Hidden,
}

impl TickPlacement {
    /// Pixel length of an outside tick.
    pub const OUTSIDE_LENGTH: f32 = 5.0;

    /// Signed tick length in pixels, positive pointing away from the plot.
    pub fn outward_length(&self) -> f32 {
        match self {
            TickPlacement::Outside => Self::OUTSIDE_LENGTH,
            TickPlacement::Inside { length } => -length,
            TickPlacement::Hidden => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZeroLine {
    pub color: Rgba,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub title: String,
    /// Fixed `[min, max]`; `None` lets the renderer fit the data.
    pub range: Option<(f64, f64)>,
    pub tick_values: Option<Vec<f64>>,
    pub ticks: TickPlacement,
    pub line_color: Rgba,
    pub line_width: f32,
    pub grid_color: Option<Rgba>,
    pub zero_line: Option<ZeroLine>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendAnchor {
    /// Renderer default placement (top right).
    Default,
    Top,
    TopLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendSpec {
    pub anchor: LegendAnchor,
    /// Position in paper coordinates (0..1 of the plot area).
    pub position: Option<(f64, f64)>,
    pub background: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub font: FontSpec,
    pub plot_background: Rgba,
    pub x_axis: AxisSpec,
    pub y_axis: AxisSpec,
    pub legend: LegendSpec,
    /// `None` shows the legend only when there is more than one named trace.
    pub show_legend: Option<bool>,
    /// Share of the width given to the plot when a table panel is present.
    pub plot_fraction: f64,
}

impl Layout {
    /// Horizontal gridline colour, `None` when it would not show against the background.
    pub fn visible_y_grid(&self) -> Option<Rgba> {
        self.y_axis
            .grid_color
            .filter(|grid| !grid.is_transparent() && *grid != self.plot_background)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceKind {
    Bar {
        fill: Rgba,
        outline: Rgba,
        outline_width: f32,
        bar_width: f64,
    },
    Line {
        color: Rgba,
        width: f32,
        dash: Dash,
    },
    Markers {
        color: Rgba,
        size: f32,
    },
}

impl TraceKind {
    pub fn color(&self) -> Rgba {
        match self {
            TraceKind::Bar { fill, .. } => *fill,
            TraceKind::Line { color, .. } | TraceKind::Markers { color, .. } => *color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: Option<String>,
    pub show_in_legend: bool,
    pub kind: TraceKind,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trace {
    pub fn line(name: impl Into<String>, x: &[f64], y: &[f64], color: Rgba) -> Self {
        Self {
            name: Some(name.into()),
            show_in_legend: true,
            kind: TraceKind::Line {
                color,
                width: 2.0,
                dash: Dash::Solid,
            },
            x: x.to_vec(),
            y: y.to_vec(),
        }
    }

    pub fn markers(name: impl Into<String>, x: &[f64], y: &[f64], color: Rgba, size: f32) -> Self {
        Self {
            name: Some(name.into()),
            show_in_legend: true,
            kind: TraceKind::Markers { color, size },
            x: x.to_vec(),
            y: y.to_vec(),
        }
    }

    pub fn dashed(mut self) -> Self {
        if let TraceKind::Line { dash, .. } = &mut self.kind {
            *dash = Dash::Dash;
        }
        self
    }

    pub fn with_width(mut self, line_width: f32) -> Self {
        if let TraceKind::Line { width, .. } = &mut self.kind {
            *width = line_width;
        }
        self
    }

    pub fn hidden_from_legend(mut self) -> Self {
        self.show_in_legend = false;
        self
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Point pairs, as consumed by both renderers.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    VerticalLine {
        x: f64,
        y0: f64,
        y1: f64,
        color: Rgba,
        dash: Dash,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePanel {
    /// Share of the total width given to the table.
    pub column_fraction: f64,
    pub header: Vec<String>,
    pub columns: Vec<Vec<f64>>,
    pub fill: Rgba,
    pub line_color: Rgba,
    pub header_line_width: f32,
    pub cell_height: f32,
}

impl TablePanel {
    pub fn row_count(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell text for `(row, col)`, blank past the end of a short column.
    pub fn cell(&self, row: usize, col: usize) -> String {
        self.columns
            .get(col)
            .and_then(|c| c.get(row))
            .map(|v| format_cell(*v))
            .unwrap_or_default()
    }
}

fn format_cell(value: f64) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// A fully styled chart, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub layout: Layout,
    pub traces: Vec<Trace>,
    pub shapes: Vec<Shape>,
    pub table: Option<TablePanel>,
}

impl ChartSpec {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            traces: Vec::new(),
            shapes: Vec::new(),
            table: None,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.traces.push(trace);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn with_table(mut self, table: TablePanel) -> Self {
        self.table = Some(table);
        self
    }

    pub fn title(&self) -> &str {
        &self.layout.title
    }

    /// Total number of plotted points across all traces.
    pub fn point_count(&self) -> usize {
        self.traces.iter().map(Trace::len).sum()
    }

    /// Names of the traces that appear in the legend.
    pub fn trace_names(&self) -> Vec<&str> {
        self.traces
            .iter()
            .filter(|t| t.show_in_legend)
            .filter_map(|t| t.name.as_deref())
            .collect()
    }

    pub fn legend_visible(&self) -> bool {
        self.layout
            .show_legend
            .unwrap_or_else(|| self.trace_names().len() > 1)
    }

    /// Bounds of all plotted data and shapes as `(x_min, x_max, y_min, y_max)`.
    pub fn data_bounds(&self) -> Option<(f64, f64, f64, f64)> {
        let mut points: Vec<(f64, f64)> = self.traces.iter().flat_map(Trace::points).collect();
        for shape in &self.shapes {
            match shape {
                Shape::VerticalLine { x, y0, y1, .. } => {
                    points.push((*x, *y0));
                    points.push((*x, *y1));
                }
            }
        }
        if points.is_empty() {
            return None;
        }
        Some(points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY),
            |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
        ))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_css_formatting() {
        assert_eq!(Rgba::rgb(0, 71, 102).to_string(), "rgb(0, 71, 102)");
        assert_eq!(
            Rgba::rgba(38, 38, 38, 0.15).to_string(),
            "rgba(38, 38, 38, 0.15)"
        );
        assert!(Rgba::rgba(0, 0, 0, 0.0).is_transparent());
    }

    #[test]
    fn test_trace_builders() {
        let trace = Trace::line("a", &[1.0, 2.0], &[3.0, 4.0], Rgba::rgb(255, 0, 0))
            .dashed()
            .with_width(3.0)
            .hidden_from_legend();
        assert!(!trace.show_in_legend);
        assert_eq!(
            trace.kind,
            TraceKind::Line {
                color: Rgba::rgb(255, 0, 0),
                width: 3.0,
                dash: Dash::Dash
            }
        );
        assert_eq!(trace.points().collect::<Vec<_>>(), vec![(1.0, 3.0), (2.0, 4.0)]);
    }

    #[test]
    fn test_grid_matching_background_is_hidden() {
        use crate::charts::style::{base_layout, GRID, WHITE};

        let mut layout = base_layout("t", "x", "y");
        assert_eq!(layout.visible_y_grid(), Some(GRID));

        layout.y_axis.grid_color = Some(WHITE);
        assert_eq!(layout.visible_y_grid(), None);

        layout.plot_background = Rgba::rgba(255, 255, 255, 0.0);
        assert_eq!(layout.visible_y_grid(), Some(WHITE));
    }

    #[test]
    fn test_tick_lengths() {
        assert_eq!(TickPlacement::Inside { length: 5.0 }.outward_length(), -5.0);
        assert_eq!(TickPlacement::Outside.outward_length(), 5.0);
        assert_eq!(TickPlacement::Hidden.outward_length(), 0.0);
    }

    #[test]
    fn test_table_cell_formatting() {
        let table = TablePanel {
            column_fraction: 0.3,
            header: vec!["a".into(), "b".into()],
            columns: vec![vec![1.0, 2.5], vec![3.14159]],
            fill: Rgba::rgb(255, 255, 255),
            line_color: Rgba::rgb(0, 0, 0),
            header_line_width: 1.0,
            cell_height: 20.0,
        };
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, 0), "1");
        assert_eq!(table.cell(1, 0), "2.5");
        assert_eq!(table.cell(0, 1), "3.1416");
        assert_eq!(table.cell(1, 1), "");
    }
}
