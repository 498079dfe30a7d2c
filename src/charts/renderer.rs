//! Static Chart Renderer
//! Renders a `ChartSpec` to an in-memory SVG document or PNG image with plotters.
//!
//! Layout:
//! 1. Title centered above the plot
//! 2. Cartesian plot with fixed maturity ticks, bordered axes and gridlines
//! 3. Optional table panel on the right, sized by the layout's plot fraction

use super::spec::{ChartSpec, Dash, LegendAnchor, Rgba, Shape, TablePanel, TraceKind};
use crate::error::{ChartError, ChartResult};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::io::Cursor;
use std::ops::Range;
use std::sync::Mutex;
use tracing::debug;

/// Dash and gap length as a fraction of the plot diagonal.
const DASH_FRACTION: f64 = 0.012;
const TITLE_SCALE: f64 = 1.2;
const TABLE_FONT_SIZE: f64 = 12.0;
/// Family plotters falls back to for text without an explicit font.
const FALLBACK_FAMILY: &str = "sans-serif";

/// Font families already bound to the bundled typeface.
static REGISTERED_FAMILIES: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Bind `family` to the bundled typeface so text can be measured and rasterised.
/// SVG output keeps the family name; bitmaps draw with the bundled glyphs.
fn register_family(family: &str) -> ChartResult<()> {
    let mut registered = REGISTERED_FAMILIES
        .lock()
        .map_err(|_| ChartError::Render("font registry lock poisoned".to_string()))?;
    if registered.iter().any(|known| known == family) {
        return Ok(());
    }
    register_font(family, FontStyle::Normal, epaint_default_fonts::UBUNTU_LIGHT)
        .map_err(|_| ChartError::Render(format!("bundled font rejected for {}", family)))?;
    registered.push(family.to_string());
    debug!(family, "registered bundled font");
    Ok(())
}

fn render_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Render(err.to_string())
}

fn to_rgba(color: Rgba) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a as f64)
}

/// Pick a 1/2/5 step giving roughly `target` intervals over `range`.
fn nice_step(range: f64, target: usize) -> f64 {
    if range <= 0.0 || !range.is_finite() {
        return 1.0;
    }
    let rough = range / target.max(1) as f64;
    let magnitude = 10f64.powf(rough.log10().floor());
    let residual = rough / magnitude;
    let nice = if residual > 5.0 {
        10.0
    } else if residual > 2.0 {
        5.0
    } else if residual > 1.0 {
        2.0
    } else {
        1.0
    };
    nice * magnitude
}

/// Tick positions inside `range`, either the fixed set or generated ones.
fn tick_positions(fixed: Option<&[f64]>, range: &Range<f64>) -> Vec<f64> {
    let inside = |v: &f64| *v >= range.start && *v <= range.end;
    match fixed {
        Some(values) => values.iter().copied().filter(inside).collect(),
        None => {
            let step = nice_step(range.end - range.start, 10);
            let first = (range.start / step).ceil() as i64;
            let last = (range.end / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        }
    }
}

fn format_tick(value: &f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Axis range: the fixed one, else the data extent padded by 5%.
fn axis_range(fixed: Option<(f64, f64)>, lo: f64, hi: f64, include_zero: bool) -> Range<f64> {
    if let Some((a, b)) = fixed {
        return a..b;
    }
    let (lo, hi) = if include_zero {
        (lo.min(0.0), hi.max(0.0))
    } else {
        (lo, hi)
    };
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad)..(hi + pad)
}

/// Split a polyline into the "on" segments of a dash pattern. Distances are
/// measured after normalising each axis by its span.
pub fn dash_segments(
    points: &[(f64, f64)],
    x_span: f64,
    y_span: f64,
    dash: f64,
) -> Vec<Vec<(f64, f64)>> {
    let xs = if x_span > 0.0 { x_span } else { 1.0 };
    let ys = if y_span > 0.0 { y_span } else { 1.0 };

    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut on = true;
    let mut remaining = dash;

    for pair in points.windows(2) {
        let (mut ax, mut ay) = pair[0];
        let (bx, by) = pair[1];
        if on && current.is_empty() {
            current.push((ax, ay));
        }
        let mut length = (((bx - ax) / xs).powi(2) + ((by - ay) / ys).powi(2)).sqrt();

        while length > remaining {
            let t = remaining / length;
            ax += (bx - ax) * t;
            ay += (by - ay) * t;
            length -= remaining;
            if on {
                current.push((ax, ay));
                segments.push(std::mem::take(&mut current));
            } else {
                current.push((ax, ay));
            }
            on = !on;
            remaining = dash;
        }
        remaining -= length;
        if on {
            current.push((bx, by));
        }
    }
    if current.len() > 1 {
        segments.push(current);
    }
    segments
}

/// Renders chart specifications without a window.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    fn dimensions(spec: &ChartSpec, scale: f64) -> (u32, u32) {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        (
            ((spec.layout.width as f64 * scale).round() as u32).max(1),
            ((spec.layout.height as f64 * scale).round() as u32).max(1),
        )
    }

    /// Render to an SVG document.
    pub fn render_svg(spec: &ChartSpec, scale: f64) -> ChartResult<String> {
        let size = Self::dimensions(spec, scale);
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            Self::draw(root, spec, scale)?;
        }
        debug!(title = %spec.title(), bytes = svg.len(), "rendered svg");
        Ok(svg)
    }

    /// Render to PNG bytes.
    pub fn render_png(spec: &ChartSpec, scale: f64) -> ChartResult<Vec<u8>> {
        let (width, height) = Self::dimensions(spec, scale);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            Self::draw(root, spec, scale)?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| ChartError::Render("bitmap buffer has the wrong size".to_string()))?;
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(render_err)?;

        debug!(title = %spec.title(), bytes = bytes.len(), "rendered png");
        Ok(bytes)
    }

    fn draw<DB: DrawingBackend>(
        root: DrawingArea<DB, Shift>,
        spec: &ChartSpec,
        scale: f64,
    ) -> ChartResult<()> {
        let layout = &spec.layout;
        root.fill(&WHITE).map_err(render_err)?;

        let (plot_area, table_area) = match &spec.table {
            Some(_) => {
                let split = (root.dim_in_pixel().0 as f64 * layout.plot_fraction) as u32;
                let (left, right) = root.split_horizontally(split);
                (left, Some(right))
            }
            None => (root, None),
        };

        let (dx0, dx1, dy0, dy1) = spec.data_bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
        let has_bars = spec
            .traces
            .iter()
            .any(|t| matches!(t.kind, TraceKind::Bar { .. }));
        let x_range = match layout.x_axis.range {
            Some((a, b)) => a..b,
            None if has_bars => (dx0 - 0.5)..(dx1 + 0.5),
            None => axis_range(None, dx0, dx1, false),
        };
        let y_range = axis_range(layout.y_axis.range, dy0, dy1, has_bars);
        let x_ticks = tick_positions(layout.x_axis.tick_values.as_deref(), &x_range);

        let family = layout.font.family.as_str();
        register_family(family)?;
        register_family(FALLBACK_FAMILY)?;
        let font_size = layout.font.size as f64 * scale;
        let label_font = (family, font_size).into_font().color(&to_rgba(layout.font.color));
        let stroke = |w: f32| ((w as f64 * scale).round() as u32).max(1);

        let mut chart = ChartBuilder::on(&plot_area)
            .caption(&layout.title, (family, font_size * TITLE_SCALE))
            .margin((10.0 * scale) as u32)
            .x_label_area_size((45.0 * scale) as u32)
            .y_label_area_size((65.0 * scale) as u32)
            .build_cartesian_2d(x_range.clone(), y_range.clone())
            .map_err(render_err)?;

        if !layout.plot_background.is_transparent() {
            chart
                .plotting_area()
                .fill(&to_rgba(layout.plot_background))
                .map_err(render_err)?;
        }

        {
            // X labels come from the fixed tick set below, not from the mesh.
            let mut mesh = chart.configure_mesh();
            mesh.x_desc(layout.x_axis.title.as_str())
                .y_desc(layout.y_axis.title.as_str())
                .label_style(label_font.clone())
                .axis_desc_style(label_font.clone())
                .axis_style(to_rgba(layout.x_axis.line_color).stroke_width(stroke(layout.x_axis.line_width)))
                .x_labels(0)
                .y_label_formatter(&format_tick)
                .disable_x_mesh();
            match layout.visible_y_grid() {
                Some(grid) => {
                    mesh.bold_line_style(to_rgba(grid))
                        .light_line_style(RGBAColor(0, 0, 0, 0.0));
                }
                None => {
                    mesh.disable_y_mesh();
                }
            }
            mesh.draw().map_err(render_err)?;
        }

        let tick_length = (layout.x_axis.ticks.outward_length() as f64 * scale).round() as i32;
        let tick_color = if tick_length == 0 {
            RGBAColor(0, 0, 0, 0.0)
        } else {
            to_rgba(layout.x_axis.line_color)
        };
        let tick_style = tick_color.stroke_width(stroke(layout.x_axis.line_width));
        let label_offset = tick_length.max(0) + (4.0 * scale) as i32;
        let tick_label_style = label_font.clone().pos(Pos::new(HPos::Center, VPos::Top));
        chart
            .draw_series(x_ticks.iter().map(|&tick| {
                EmptyElement::at((tick, y_range.start))
                    + PathElement::new(vec![(0, 0), (0, tick_length)], tick_style)
                    + Text::new(format_tick(&tick), (0, label_offset), tick_label_style.clone())
            }))
            .map_err(render_err)?;

        let x_span = x_range.end - x_range.start;
        let y_span = y_range.end - y_range.start;
        let dash = DASH_FRACTION * 2f64.sqrt();

        if let Some(zero) = layout.y_axis.zero_line {
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x_range.start, 0.0), (x_range.end, 0.0)],
                    to_rgba(zero.color).stroke_width(stroke(zero.width)),
                )))
                .map_err(render_err)?;
        }

        for shape in &spec.shapes {
            match shape {
                Shape::VerticalLine {
                    x,
                    y0,
                    y1,
                    color,
                    dash: style,
                    ..
                } => {
                    let path = vec![(*x, *y0), (*x, *y1)];
                    let pieces = match style {
                        Dash::Solid => vec![path],
                        Dash::Dash => dash_segments(&path, x_span, y_span, dash),
                    };
                    let line_style = to_rgba(*color).stroke_width(stroke(1.5));
                    chart
                        .draw_series(pieces.into_iter().map(|p| PathElement::new(p, line_style)))
                        .map_err(render_err)?;
                }
            }
        }

        for trace in &spec.traces {
            let label = trace.name.clone().filter(|_| trace.show_in_legend);
            let color = to_rgba(trace.kind.color());

            match &trace.kind {
                TraceKind::Bar {
                    fill,
                    outline,
                    outline_width,
                    bar_width,
                } => {
                    let half = bar_width / 2.0;
                    let fill_style = to_rgba(*fill).filled();
                    let outline_style = to_rgba(*outline).stroke_width(stroke(*outline_width));
                    let anno = chart
                        .draw_series(trace.points().map(|(x, y)| {
                            Rectangle::new([(x - half, 0.0), (x + half, y)], fill_style)
                        }))
                        .map_err(render_err)?;
                    if let Some(name) = label {
                        anno.label(name).legend(move |(lx, ly)| {
                            Rectangle::new([(lx, ly - 5), (lx + 20, ly + 5)], fill_style)
                        });
                    }
                    chart
                        .draw_series(trace.points().map(|(x, y)| {
                            Rectangle::new([(x - half, 0.0), (x + half, y)], outline_style)
                        }))
                        .map_err(render_err)?;
                }
                TraceKind::Line {
                    width, dash: style, ..
                } => {
                    let line_style = color.stroke_width(stroke(*width));
                    let points: Vec<(f64, f64)> = trace.points().collect();
                    let anno = match style {
                        Dash::Solid => chart
                            .draw_series(LineSeries::new(points, line_style))
                            .map_err(render_err)?,
                        Dash::Dash => chart
                            .draw_series(
                                dash_segments(&points, x_span, y_span, dash)
                                    .into_iter()
                                    .map(|p| PathElement::new(p, line_style)),
                            )
                            .map_err(render_err)?,
                    };
                    if let Some(name) = label {
                        anno.label(name).legend(move |(lx, ly)| {
                            PathElement::new(vec![(lx, ly), (lx + 20, ly)], line_style)
                        });
                    }
                }
                TraceKind::Markers { size, .. } => {
                    let radius = ((*size as f64 * scale) / 2.0).round().max(1.0) as i32;
                    let marker_style = color.filled();
                    let anno = chart
                        .draw_series(
                            trace
                                .points()
                                .map(|(x, y)| Circle::new((x, y), radius, marker_style)),
                        )
                        .map_err(render_err)?;
                    if let Some(name) = label {
                        anno.label(name).legend(move |(lx, ly)| {
                            Circle::new((lx + 10, ly), radius, marker_style)
                        });
                    }
                }
            }
        }

        if spec.legend_visible() && !spec.trace_names().is_empty() {
            let position = match (layout.legend.position, layout.legend.anchor) {
                (Some((x, y)), _) => SeriesLabelPosition::Coordinate(
                    (plot_area.dim_in_pixel().0 as f64 * x) as i32,
                    (plot_area.dim_in_pixel().1 as f64 * (1.0 - y)) as i32,
                ),
                (None, LegendAnchor::TopLeft) => SeriesLabelPosition::UpperLeft,
                (None, LegendAnchor::Top | LegendAnchor::Default) => {
                    SeriesLabelPosition::UpperRight
                }
            };
            chart
                .configure_series_labels()
                .position(position)
                .label_font((family, font_size * 0.85))
                .background_style(to_rgba(layout.legend.background))
                .border_style(RGBAColor(0, 0, 0, 0.0))
                .draw()
                .map_err(render_err)?;
        }

        if let (Some(table), Some(area)) = (&spec.table, &table_area) {
            Self::draw_table(area, table, family, scale)?;
        }

        plot_area.present().map_err(render_err)?;
        Ok(())
    }

    fn draw_table<DB: DrawingBackend>(
        area: &DrawingArea<DB, Shift>,
        table: &TablePanel,
        family: &str,
        scale: f64,
    ) -> ChartResult<()> {
        let (width, _) = area.dim_in_pixel();
        let cols = table.columns.len().max(table.header.len()).max(1);
        let cell_w = (width as f64 * 0.95 / cols as f64) as i32;
        let cell_h = (table.cell_height as f64 * scale) as i32;
        let left = (width as f64 * 0.025) as i32;
        let top = (60.0 * scale) as i32;
        let line = to_rgba(table.line_color);
        let header_font = (family, TABLE_FONT_SIZE * scale, FontStyle::Bold).into_font();
        let cell_font = (family, TABLE_FONT_SIZE * scale).into_font();

        let body = (0..table.row_count())
            .map(|r| (0..cols).map(|c| table.cell(r, c)).collect::<Vec<String>>());
        let rows = std::iter::once(table.header.clone()).chain(body);

        for (r, row) in rows.enumerate() {
            let y = top + r as i32 * cell_h;
            let (font, border) = if r == 0 {
                let width = ((table.header_line_width as f64 * scale).round() as u32).max(1);
                (&header_font, line.stroke_width(width))
            } else {
                (&cell_font, line.stroke_width(1))
            };
            for (c, text) in row.iter().enumerate() {
                let x = left + c as i32 * cell_w;
                area.draw(&Rectangle::new(
                    [(x, y), (x + cell_w, y + cell_h)],
                    to_rgba(table.fill).filled(),
                ))
                .map_err(render_err)?;
                area.draw(&Rectangle::new([(x, y), (x + cell_w, y + cell_h)], border))
                    .map_err(render_err)?;
                area.draw(&Text::new(
                    text.clone(),
                    (x + (6.0 * scale) as i32, y + cell_h / 4),
                    font.clone(),
                ))
                .map_err(render_err)?;
            }
        }
        Ok(())
    }
}
