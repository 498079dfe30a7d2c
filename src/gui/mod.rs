//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::{SingleChartApp, YieldChartsApp};
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction, UserSettings};

use crate::charts::ChartSpec;
use crate::config::ViewerConfig;
use crate::error::{ChartError, ChartResult};
use tracing::info;

/// Viewport options shared by the gallery and single-chart windows.
pub fn native_options(config: &ViewerConfig) -> eframe::NativeOptions {
    eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([config.min_width, config.min_height])
            .with_title(&config.title),
        ..Default::default()
    }
}

/// Open a window showing `spec` and block until it is closed.
pub fn display(spec: ChartSpec, config: &ViewerConfig) -> ChartResult<()> {
    info!(
        title = %spec.layout.title,
        traces = spec.traces.len(),
        "displaying chart"
    );
    let options = native_options(config);
    eframe::run_native(
        &config.title,
        options,
        Box::new(move |_cc| Ok(Box::new(SingleChartApp::new(spec)))),
    )
    .map_err(|e| ChartError::Display(e.to_string()))
}
