//! Yield Charts Main Application
//! Gallery window with control panel and chart viewer, plus the single-chart window
//! used by `display`.

use crate::charts::{ChartSpec, ShockScenario, StaticChartRenderer};
use crate::config::RenderConfig;
use crate::data::{SampleChart, SampleMarket};
use crate::error::{ChartError, ChartResult};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use tracing::{debug, info, warn};

/// Gallery of every chart variant over the sample market.
pub struct YieldChartsApp {
    market: SampleMarket,
    render: RenderConfig,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl YieldChartsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, render: RenderConfig) -> Self {
        Self::with_render(render)
    }

    fn with_render(render: RenderConfig) -> Self {
        let mut app = Self {
            market: SampleMarket::default(),
            render,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.rebuild();
        app
    }

    /// Rebuild the selected chart from the current market.
    fn rebuild(&mut self) {
        let chart = self.control_panel.settings.chart;
        let result = self.market.build(chart);
        match &result {
            Ok(spec) => {
                debug!(chart = chart.label(), points = spec.point_count(), "chart ready");
                self.control_panel
                    .set_status(&format!("{} points plotted", spec.point_count()));
            }
            Err(e) => {
                warn!(chart = chart.label(), error = %e, "chart build failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
        self.chart_viewer.set_result(result);
    }

    fn handle_select_chart(&mut self, chart: SampleChart) {
        debug!(chart = chart.label(), "chart selected");
        self.rebuild();
    }

    fn handle_shock_changed(&mut self, shock: ShockScenario) {
        debug!(
            maturity = shock.maturity_years,
            bps = shock.size_bps,
            "shock scenario changed"
        );
        self.market = SampleMarket::new(shock);
        self.rebuild();
    }

    /// Current chart as an SVG document at the configured scale.
    pub fn export_svg(&self) -> ChartResult<String> {
        let spec = self.current_chart()?;
        StaticChartRenderer::render_svg(spec, self.render.scale)
    }

    /// Current chart's configuration object as JSON.
    pub fn export_json(&self) -> ChartResult<String> {
        let spec = self.current_chart()?;
        spec.to_json().map_err(|e| ChartError::Render(e.to_string()))
    }

    fn current_chart(&self) -> ChartResult<&ChartSpec> {
        self.chart_viewer
            .chart()
            .ok_or_else(|| ChartError::Render("no chart to export".to_string()))
    }

    fn handle_copy(&mut self, ctx: &egui::Context, format: &str, result: ChartResult<String>) {
        match result {
            Ok(text) => {
                info!(format, bytes = text.len(), scale = self.render.scale, "copied chart");
                self.control_panel
                    .set_status(&format!("Copied {} ({} bytes)", format, text.len()));
                ctx.copy_text(text);
            }
            Err(e) => {
                warn!(format, error = %e, "chart export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for YieldChartsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(240.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| match self.control_panel.show(ui) {
                    ControlPanelAction::SelectChart(chart) => self.handle_select_chart(chart),
                    ControlPanelAction::ShockChanged(shock) => self.handle_shock_changed(shock),
                    ControlPanelAction::CopySvg => {
                        let svg = self.export_svg();
                        self.handle_copy(ui.ctx(), "SVG", svg);
                    }
                    ControlPanelAction::CopyJson => {
                        let json = self.export_json();
                        self.handle_copy(ui.ctx(), "JSON", json);
                    }
                    ControlPanelAction::None => {}
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

/// Window holding exactly one chart.
pub struct SingleChartApp {
    chart_viewer: ChartViewer,
}

impl SingleChartApp {
    pub fn new(spec: ChartSpec) -> Self {
        Self {
            chart_viewer: ChartViewer::with_chart(spec),
        }
    }
}

impl eframe::App for SingleChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_export_uses_render_scale() {
        let app = YieldChartsApp::with_render(RenderConfig { scale: 2.0 });
        let svg = app.export_svg().unwrap();
        let spec = app.current_chart().unwrap();
        let expected = format!(
            "width=\"{}\" height=\"{}\"",
            spec.layout.width * 2,
            spec.layout.height * 2
        );
        assert!(svg.contains(&expected), "svg header lacks {}", expected);
    }

    #[test]
    fn test_json_export_describes_current_chart() {
        let app = YieldChartsApp::with_render(RenderConfig::default());
        let json = app.export_json().unwrap();
        let parsed: ChartSpec = serde_json::from_str(&json).unwrap();
        let current = app.current_chart().unwrap();
        assert_eq!(parsed.title(), current.title());
        assert_eq!(parsed.trace_names(), current.trace_names());
        assert_eq!(parsed.point_count(), current.point_count());
    }

    #[test]
    fn test_export_without_chart_fails() {
        let mut app = YieldChartsApp::with_render(RenderConfig::default());
        app.chart_viewer = ChartViewer::new();
        assert!(matches!(app.export_svg(), Err(ChartError::Render(_))));
    }
}
