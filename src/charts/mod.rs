//! Charts module - Chart specification, builders and rendering

mod plotter;
mod renderer;
mod spec;
pub mod style;
mod yield_charts;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use spec::{
    AxisSpec, ChartSpec, Dash, FontSpec, Layout, LegendAnchor, LegendSpec, Rgba, Shape,
    TablePanel, TickPlacement, Trace, TraceKind, ZeroLine,
};
pub use yield_charts::{
    ShockScenario, ShockedCurveInput, YieldCharts, CURVE_FIT_DEGREE, CURVE_FIT_HORIZON,
    CURVE_FIT_SAMPLES,
};
