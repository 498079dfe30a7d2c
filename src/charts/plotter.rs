//! Chart Plotter Module
//! Draws a `ChartSpec` interactively with egui_plot.

use super::spec::{ChartSpec, Dash, LegendAnchor, LegendSpec, Rgba, Shape, TablePanel, TraceKind};
use egui::{Color32, RichText, Stroke};
use egui_plot::{
    Bar, BarChart, Corner, GridMark, Legend, Line, LineStyle, Plot, PlotBounds, PlotPoints,
    Points,
};

/// Pixel length of one dash segment.
const DASH_LENGTH: f32 = 8.0;

pub fn to_color32(color: Rgba) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.alpha_u8())
}

fn line_style(dash: Dash) -> LineStyle {
    match dash {
        Dash::Solid => LineStyle::Solid,
        Dash::Dash => LineStyle::Dashed {
            length: DASH_LENGTH,
        },
    }
}

/// Closest egui_plot corner for a legend placement.
pub fn legend_corner(legend: &LegendSpec) -> Corner {
    if let Some((x, y)) = legend.position {
        return match (x < 0.5, y >= 0.5) {
            (true, true) => Corner::LeftTop,
            (false, true) => Corner::RightTop,
            (true, false) => Corner::LeftBottom,
            (false, false) => Corner::RightBottom,
        };
    }
    match legend.anchor {
        LegendAnchor::TopLeft => Corner::LeftTop,
        LegendAnchor::Top | LegendAnchor::Default => Corner::RightTop,
    }
}

/// Fixed ticks become grid marks with a common step so all of them are labelled.
fn fixed_marks(values: &[f64]) -> Vec<GridMark> {
    values
        .iter()
        .map(|&value| GridMark {
            value,
            step_size: 1.0,
        })
        .collect()
}

fn padded(lo: f64, hi: f64) -> (f64, f64) {
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

/// Initial view for charts that declare an axis range. The other axis falls
/// back to the padded data extent; `None` leaves egui to fit everything.
pub fn initial_bounds(spec: &ChartSpec) -> Option<PlotBounds> {
    let layout = &spec.layout;
    if layout.x_axis.range.is_none() && layout.y_axis.range.is_none() {
        return None;
    }
    let (dx0, dx1, dy0, dy1) = spec.data_bounds()?;
    let has_bars = spec
        .traces
        .iter()
        .any(|t| matches!(t.kind, TraceKind::Bar { .. }));
    let (dy0, dy1) = if has_bars {
        (dy0.min(0.0), dy1.max(0.0))
    } else {
        (dy0, dy1)
    };

    let (x0, x1) = layout.x_axis.range.unwrap_or_else(|| padded(dx0, dx1));
    let (y0, y1) = layout.y_axis.range.unwrap_or_else(|| padded(dy0, dy1));
    Some(PlotBounds::from_min_max([x0, y0], [x1, y1]))
}

/// Draws chart specifications with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw the plot area of `spec` at the given height.
    pub fn draw_chart(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        let layout = &spec.layout;

        let mut plot = Plot::new(format!("chart_{}", layout.title))
            .height(height)
            .x_axis_label(layout.x_axis.title.clone())
            .y_axis_label(layout.y_axis.title.clone())
            .allow_scroll(false)
            .show_background(!layout.plot_background.is_transparent())
            .show_grid([false, layout.visible_y_grid().is_some()]);

        if spec.legend_visible() {
            let legend = Legend::default()
                .position(legend_corner(&layout.legend))
                .background_alpha(layout.legend.background.a);
            plot = plot.legend(legend);
        }

        if let Some(ticks) = layout.x_axis.tick_values.clone() {
            let marks = fixed_marks(&ticks);
            plot = plot.x_grid_spacer(move |_input| marks.clone());
        }

        let bounds = initial_bounds(spec);

        plot.show(ui, |plot_ui| {
            // Re-applied whenever the view is reset to auto, so zooming still works.
            if let Some(bounds) = bounds {
                if plot_ui.auto_bounds().any() {
                    plot_ui.set_plot_bounds(bounds);
                }
            }

            if let Some(zero) = layout.y_axis.zero_line {
                let (x0, x1) = layout
                    .x_axis
                    .range
                    .or_else(|| spec.data_bounds().map(|(x0, x1, _, _)| (x0, x1)))
                    .unwrap_or((0.0, 1.0));
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[x0, 0.0], [x1, 0.0]]))
                        .color(to_color32(zero.color))
                        .width(zero.width),
                );
            }

            for shape in &spec.shapes {
                match shape {
                    Shape::VerticalLine {
                        x,
                        y0,
                        y1,
                        color,
                        dash,
                        ..
                    } => {
                        plot_ui.line(
                            Line::new(PlotPoints::from(vec![[*x, *y0], [*x, *y1]]))
                                .color(to_color32(*color))
                                .style(line_style(*dash))
                                .width(1.5),
                        );
                    }
                }
            }

            for trace in &spec.traces {
                let legend_name = trace.name.as_deref().filter(|_| trace.show_in_legend);

                match &trace.kind {
                    TraceKind::Bar {
                        fill,
                        outline,
                        outline_width,
                        bar_width,
                    } => {
                        let bars: Vec<Bar> = trace
                            .points()
                            .map(|(x, y)| {
                                Bar::new(x, y)
                                    .width(*bar_width)
                                    .fill(to_color32(*fill))
                                    .stroke(Stroke::new(*outline_width, to_color32(*outline)))
                            })
                            .collect();
                        let mut chart = BarChart::new(bars).color(to_color32(*fill));
                        if let Some(name) = legend_name {
                            chart = chart.name(name);
                        }
                        plot_ui.bar_chart(chart);
                    }
                    TraceKind::Line { color, width, dash } => {
                        let points: PlotPoints = trace.points().map(|(x, y)| [x, y]).collect();
                        let mut line = Line::new(points)
                            .color(to_color32(*color))
                            .width(*width)
                            .style(line_style(*dash));
                        if let Some(name) = legend_name {
                            line = line.name(name);
                        }
                        plot_ui.line(line);
                    }
                    TraceKind::Markers { color, size } => {
                        let points: PlotPoints = trace.points().map(|(x, y)| [x, y]).collect();
                        let mut markers = Points::new(points)
                            .radius(size / 2.0)
                            .color(to_color32(*color));
                        if let Some(name) = legend_name {
                            markers = markers.name(name);
                        }
                        plot_ui.points(markers);
                    }
                }
            }
        });
    }

    /// Draw the side table of raw values.
    pub fn draw_table(ui: &mut egui::Ui, table: &TablePanel, id: &str) {
        let line_color = to_color32(table.line_color);

        egui::Frame::none()
            .fill(to_color32(table.fill))
            .stroke(Stroke::new(table.header_line_width, line_color))
            .inner_margin(6.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("table_{}", id)))
                    .striped(true)
                    .min_row_height(table.cell_height * 0.75)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in &table.header {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in 0..table.row_count() {
                            for col in 0..table.columns.len() {
                                ui.label(RichText::new(table.cell(row, col)).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Draw the chart with its table panel to the right when present.
    pub fn draw(ui: &mut egui::Ui, spec: &ChartSpec, height: f32) {
        match &spec.table {
            Some(table) => {
                let width = ui.available_width();
                let plot_width = width * spec.layout.plot_fraction as f32;
                ui.horizontal_top(|ui| {
                    ui.vertical(|ui| {
                        ui.set_width(plot_width);
                        Self::draw_chart(ui, spec, height);
                    });
                    ui.vertical(|ui| {
                        egui::ScrollArea::vertical()
                            .max_height(height)
                            .show(ui, |ui| Self::draw_table(ui, table, &spec.layout.title));
                    });
                });
            }
            None => Self::draw_chart(ui, spec, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::spec::Trace;
    use crate::charts::style::{base_layout, top_left_legend, GRID, NAVY};

    #[test]
    fn test_color_conversion_keeps_alpha() {
        assert_eq!(to_color32(NAVY), Color32::from_rgb(0, 71, 102));
        assert_eq!(to_color32(GRID).a(), 38);
    }

    #[test]
    fn test_legend_corner() {
        assert_eq!(legend_corner(&top_left_legend()), Corner::LeftTop);

        let mut legend = top_left_legend();
        legend.position = Some((0.39, 0.75));
        assert_eq!(legend_corner(&legend), Corner::LeftTop);
        legend.position = Some((0.8, 0.2));
        assert_eq!(legend_corner(&legend), Corner::RightBottom);

        legend.position = None;
        legend.anchor = LegendAnchor::Default;
        assert_eq!(legend_corner(&legend), Corner::RightTop);
    }

    #[test]
    fn test_fixed_marks_share_step() {
        let marks = fixed_marks(&[1.0, 15.0]);
        assert_eq!(marks.len(), 2);
        assert!(marks.iter().all(|m| m.step_size == 1.0));
        assert_eq!(marks[1].value, 15.0);
    }

    #[test]
    fn test_initial_bounds_clip_to_declared_range() {
        let mut layout = base_layout("t", "x", "y");
        layout.x_axis.range = Some((0.0, 22.0));
        let spec = ChartSpec::new(layout).with_trace(Trace::line(
            "curve",
            &[1.0, 10.0, 25.0],
            &[3.0, 3.5, 4.0],
            NAVY,
        ));

        let bounds = initial_bounds(&spec).unwrap();
        assert_eq!(bounds.min()[0], 0.0);
        assert_eq!(bounds.max()[0], 22.0);
        assert!((bounds.min()[1] - 2.95).abs() < 1e-12);
        assert!((bounds.max()[1] - 4.05).abs() < 1e-12);
    }

    #[test]
    fn test_initial_bounds_use_both_ranges() {
        let mut layout = base_layout("t", "x", "y");
        layout.y_axis.range = Some((-10.0, 55.0));
        let spec = ChartSpec::new(layout)
            .with_trace(Trace::line("d", &[0.0, 25.0], &[0.0, 50.0], NAVY));

        let bounds = initial_bounds(&spec).unwrap();
        assert_eq!(bounds.min(), [0.0, -10.0]);
        assert_eq!(bounds.max(), [27.0, 55.0]);
    }

    #[test]
    fn test_initial_bounds_absent_without_ranges() {
        let mut layout = base_layout("t", "x", "y");
        layout.x_axis.range = None;
        let spec = ChartSpec::new(layout).with_trace(Trace::line("d", &[1.0], &[2.0], NAVY));
        assert!(initial_bounds(&spec).is_none());
    }
}
