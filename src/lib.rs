//! Yield Curve Charts - styled charts for fixed-income analytics
//!
//! Builds key-rate duration, yield-shock, NSS factor and discount-factor charts
//! from precomputed series, then displays them in a window or renders them to
//! SVG/PNG in memory.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod gui;
pub mod stats;

pub use charts::{ChartSpec, ShockScenario, ShockedCurveInput, StaticChartRenderer, YieldCharts};
pub use config::AppConfig;
pub use error::{ChartError, ChartResult};
pub use gui::display;
