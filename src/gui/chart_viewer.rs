//! Chart Viewer Widget
//! Central panel card that shows one chart, or the reason it could not be built.

use crate::charts::{ChartPlotter, ChartSpec};
use crate::error::ChartError;
use egui::{Color32, RichText};

const CARD_PADDING: f32 = 12.0;
const TITLE_HEIGHT: f32 = 40.0;
const MIN_PLOT_HEIGHT: f32 = 240.0;

enum ViewerContent {
    Empty,
    Chart(ChartSpec),
    Failed(String),
}

/// Displays the current chart inside a bordered card.
pub struct ChartViewer {
    content: ViewerContent,
}

impl Default for ChartViewer {
    fn default() -> Self {
        Self {
            content: ViewerContent::Empty,
        }
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chart(spec: ChartSpec) -> Self {
        Self {
            content: ViewerContent::Chart(spec),
        }
    }

    /// Replace the shown chart with a build result.
    pub fn set_result(&mut self, result: Result<ChartSpec, ChartError>) {
        self.content = match result {
            Ok(spec) => ViewerContent::Chart(spec),
            Err(e) => ViewerContent::Failed(e.to_string()),
        };
    }

    pub fn chart(&self) -> Option<&ChartSpec> {
        match &self.content {
            ViewerContent::Chart(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.content {
            ViewerContent::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Chart").size(20.0));
                });
            }
            ViewerContent::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(format!("⚠ {}", message))
                            .size(16.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
            ViewerContent::Chart(spec) => Self::draw_card(ui, spec),
        }
    }

    fn draw_card(ui: &mut egui::Ui, spec: &ChartSpec) {
        // Layout height is the preferred size; shrink to the panel when needed.
        let available = ui.available_height() - TITLE_HEIGHT - 3.0 * CARD_PADDING;
        let height = (spec.layout.height as f32)
            .min(available)
            .max(MIN_PLOT_HEIGHT);

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(160)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(CARD_PADDING)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            RichText::new(&spec.layout.title)
                                .size(18.0)
                                .strong()
                                .family(egui::FontFamily::Proportional),
                        );
                    });
                    ui.add_space(8.0);
                    ChartPlotter::draw(ui, spec, height);
                });
            });
    }
}
