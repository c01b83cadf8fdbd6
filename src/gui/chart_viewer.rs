//! Chart Viewer Widget
//! Central scrollable panel showing the current report's charts as cards.
//! Supports responsive multi-column layout based on available width.

use crate::charts::{ChartDescriptor, ChartKind, ChartPlotter};
use crate::gui::controller::ChartSink;
use egui::{Color32, RichText, ScrollArea};

/// Chart card configuration
const CHART_SPACING: f32 = 15.0;
const CARD_HEIGHT: f32 = 420.0;
const CHART_WIDTH: f32 = 640.0;

const CARD_BORDER: Color32 = Color32::from_rgb(80, 61, 54);

/// Scrollable chart display area. Charts keep report order, filling rows
/// left to right.
#[derive(Default)]
pub struct ChartViewer {
    pub charts: Vec<ChartDescriptor>,
}

impl ChartSink for ChartViewer {
    fn replace_all(&mut self, charts: Vec<ChartDescriptor>) {
        self.charts = charts;
    }
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Draw the chart viewer with responsive multi-column layout
    pub fn show(&self, ui: &mut egui::Ui) {
        if self.charts.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Select a report type to view statistics")
                        .size(20.0)
                        .color(Color32::GRAY),
                );
            });
            return;
        }

        let avail_width = ui.available_width();
        let card_total_width = CHART_WIDTH + CHART_SPACING;
        let num_columns = ((avail_width / card_total_width).floor() as usize).max(1);

        let total_items = self.charts.len();
        let total_rows = total_items.div_ceil(num_columns);
        let row_height = CARD_HEIGHT + CHART_SPACING;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, total_rows, |ui, row_range| {
                for row in row_range {
                    ui.horizontal(|ui| {
                        for col in 0..num_columns {
                            let idx = row * num_columns + col;
                            if let Some(chart) = self.charts.get(idx) {
                                Self::draw_chart_card(ui, chart);
                                ui.add_space(CHART_SPACING);
                            }
                        }
                    });
                    ui.add_space(CHART_SPACING);
                }
            });
    }

    fn draw_chart_card(ui: &mut egui::Ui, chart: &ChartDescriptor) {
        let card_width = CHART_WIDTH - 20.0;

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, CARD_BORDER))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(card_width);

                ui.vertical(|ui| {
                    ui.label(RichText::new(&chart.title).size(16.0).strong());
                    ui.add_space(8.0);

                    let nothing_to_draw = match chart.kind {
                        ChartKind::Pie => chart.pie_slices().is_empty(),
                        ChartKind::Hierarchical => chart.sunburst_slices().is_empty(),
                        ChartKind::Line | ChartKind::Bar => chart.is_empty(),
                    };
                    if nothing_to_draw {
                        ui.add_sized(
                            [card_width, CARD_HEIGHT - 60.0],
                            egui::Label::new(
                                RichText::new("No data for this selection")
                                    .size(14.0)
                                    .color(Color32::GRAY),
                            ),
                        );
                    } else {
                        ChartPlotter::draw_chart(ui, chart);
                    }
                });
            });
    }
}
