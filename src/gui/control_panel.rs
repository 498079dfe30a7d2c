//! Control Panel Widget
//! Left side panel: chart selection and the shock scenario applied to the sample market.

use crate::charts::ShockScenario;
use crate::data::{SampleChart, KEY_MATURITIES};
use egui::{Color32, ComboBox, RichText};

/// User selections
#[derive(Clone)]
pub struct UserSettings {
    pub chart: SampleChart,
    pub shock_maturity: f64,
    pub shock_bps: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        let shock = ShockScenario::default();
        Self {
            chart: SampleChart::KeyRateDurations,
            shock_maturity: shock.maturity_years,
            shock_bps: shock.size_bps,
        }
    }
}

impl UserSettings {
    pub fn shock(&self) -> ShockScenario {
        ShockScenario {
            maturity_years: self.shock_maturity,
            size_bps: self.shock_bps,
        }
    }
}

/// Left side control panel with chart list and shock controls.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            settings: UserSettings::default(),
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.heading(RichText::new("📈 Yield Curve Charts").strong());
        ui.add_space(10.0);

        ui.label(RichText::new("Chart").strong());
        for chart in SampleChart::ALL {
            let selected = self.settings.chart == chart;
            if ui.selectable_label(selected, chart.label()).clicked() && !selected {
                self.settings.chart = chart;
                action = ControlPanelAction::SelectChart(chart);
            }
        }

        ui.add_space(12.0);
        ui.separator();
        ui.label(RichText::new("Shock scenario").strong());

        let before = (self.settings.shock_maturity, self.settings.shock_bps);
        ComboBox::from_label("Shocked maturity")
            .selected_text(format!("{}Y", self.settings.shock_maturity))
            .show_ui(ui, |ui| {
                for maturity in KEY_MATURITIES {
                    ui.selectable_value(
                        &mut self.settings.shock_maturity,
                        maturity,
                        format!("{}Y", maturity),
                    );
                }
            });
        ui.add(egui::Slider::new(&mut self.settings.shock_bps, 5.0..=200.0).text("Size (bps)"));

        if before != (self.settings.shock_maturity, self.settings.shock_bps) {
            action = ControlPanelAction::ShockChanged(self.settings.shock());
        }

        ui.add_space(12.0);
        ui.separator();
        ui.label(RichText::new("Export").strong());
        ui.horizontal(|ui| {
            if ui.button("📋 Copy SVG").clicked() {
                action = ControlPanelAction::CopySvg;
            }
            if ui.button("📋 Copy JSON").clicked() {
                action = ControlPanelAction::CopyJson;
            }
        });

        ui.add_space(12.0);
        ui.separator();
        let color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            ui.visuals().text_color()
        };
        ui.label(RichText::new(&self.status).size(11.0).color(color));

        action
    }
}

/// Actions triggered by the control panel
pub enum ControlPanelAction {
    None,
    SelectChart(SampleChart),
    ShockChanged(ShockScenario),
    CopySvg,
    CopyJson,
}
