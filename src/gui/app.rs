//! Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::data::SalesTable;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DashboardController};
use crate::stats::{ReportType, SelectionState};
use egui::SidePanel;

/// Main application window. Owns the loaded table for the process lifetime.
pub struct DashboardApp {
    table: SalesTable,
    controller: DashboardController,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        table: SalesTable,
        dataset_label: String,
        initial: SelectionState,
    ) -> Self {
        let controller = DashboardController::new(initial);
        let mut chart_viewer = ChartViewer::new();
        controller.refresh(&table, &mut chart_viewer);

        let mut app = Self {
            control_panel: ControlPanel::new(dataset_label, table.row_count()),
            table,
            controller,
            chart_viewer,
        };
        app.update_status();
        app
    }

    fn handle_action(&mut self, action: ControlPanelAction) {
        match action {
            ControlPanelAction::ReportTypeChanged(report_type) => {
                self.controller
                    .set_report_type(report_type, &self.table, &mut self.chart_viewer);
            }
            ControlPanelAction::YearChanged(year) => {
                self.controller
                    .set_selected_year(year, &self.table, &mut self.chart_viewer);
            }
            ControlPanelAction::None => return,
        }
        self.update_status();
    }

    fn update_status(&mut self) {
        let selection = self.controller.selection();
        let status = if self.chart_viewer.is_empty() {
            match selection.report_type {
                ReportType::YearlyStatistics => "Select a year".to_string(),
                _ => "Select a report type".to_string(),
            }
        } else {
            format!("{} charts ready", self.chart_viewer.len())
        };
        self.control_panel.set_status(&status);
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui, self.controller.selection());
                    self.handle_action(action);
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
