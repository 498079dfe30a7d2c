//! Shared styling for every yield-curve chart.

use super::spec::{
    AxisSpec, FontSpec, Layout, LegendAnchor, LegendSpec, Rgba, TickPlacement,
};

/// Maturities (years) that carry an x-axis tick.
pub const MATURITY_TICKS: [f64; 13] = [
    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 15.0, 20.0, 25.0,
];

pub const NAVY: Rgba = Rgba::rgb(0, 71, 102);
pub const RED: Rgba = Rgba::rgb(255, 0, 0);
pub const BROWN: Rgba = Rgba::rgb(153, 100, 50);
pub const GREEN: Rgba = Rgba::rgb(2, 130, 2);
pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
pub const GREY: Rgba = Rgba::rgb(128, 128, 128);
pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
pub const TRANSPARENT: Rgba = Rgba::rgba(255, 255, 255, 0.0);
pub const GRID: Rgba = Rgba::rgba(38, 38, 38, 0.15);

/// Level, slope, curvature 1, curvature 2.
pub const FACTOR_COLORS: [Rgba; 4] = [NAVY, RED, BROWN, GREEN];

pub const FONT_FAMILY: &str = "Times New Roman";
pub const FONT_SIZE: f32 = 15.0;

pub const DEFAULT_WIDTH: u32 = 900;
pub const DEFAULT_HEIGHT: u32 = 500;
pub const WIDE_WIDTH: u32 = 1000;
/// Height used by the wide factor charts, which never set one explicitly.
pub const WIDE_HEIGHT: u32 = 450;

pub const MATURITY_AXIS_TITLE: &str = "Time to Maturity (Years)";
pub const INSIDE_TICK_LENGTH: f32 = 5.0;

pub fn font() -> FontSpec {
    FontSpec {
        family: FONT_FAMILY.to_string(),
        size: FONT_SIZE,
        color: BLACK,
    }
}

/// Black bordered maturity axis with the fixed tick set.
pub fn maturity_axis(title: &str, range: Option<(f64, f64)>) -> AxisSpec {
    AxisSpec {
        title: title.to_string(),
        range,
        tick_values: Some(MATURITY_TICKS.to_vec()),
        ticks: TickPlacement::Inside {
            length: INSIDE_TICK_LENGTH,
        },
        line_color: BLACK,
        line_width: 1.0,
        grid_color: None,
        zero_line: None,
    }
}

/// Grey bordered value axis with translucent gridlines.
pub fn value_axis(title: &str) -> AxisSpec {
    AxisSpec {
        title: title.to_string(),
        range: None,
        tick_values: None,
        ticks: TickPlacement::Outside,
        line_color: GREY,
        line_width: 1.0,
        grid_color: Some(GRID),
        zero_line: None,
    }
}

/// Top-left legend on a transparent background.
pub fn top_left_legend() -> LegendSpec {
    LegendSpec {
        anchor: LegendAnchor::TopLeft,
        position: None,
        background: TRANSPARENT,
    }
}

/// Common layout: 900x500, white plot area, maturity x-axis fixed to [0, 27].
pub fn base_layout(title: &str, x_title: &str, y_title: &str) -> Layout {
    Layout {
        title: title.to_string(),
        width: DEFAULT_WIDTH,
        height: DEFAULT_HEIGHT,
        font: font(),
        plot_background: WHITE,
        x_axis: maturity_axis(x_title, Some((0.0, 27.0))),
        y_axis: value_axis(y_title),
        legend: top_left_legend(),
        show_legend: None,
        plot_fraction: 1.0,
    }
}
