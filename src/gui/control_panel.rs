//! Control Panel Widget
//! Left side panel with the report type and year selectors.

use crate::data::schema::supported_years;
use crate::stats::{ReportType, SelectionState};
use egui::{Color32, ComboBox, RichText};

const TITLE_COLOR: Color32 = Color32::from_rgb(80, 61, 54);

/// Left side control panel with the two report inputs and a status line.
pub struct ControlPanel {
    pub dataset_label: String,
    pub row_count: usize,
    pub status: String,
}

impl ControlPanel {
    pub fn new(dataset_label: String, row_count: usize) -> Self {
        Self {
            dataset_label,
            row_count,
            status: "Ready".to_string(),
        }
    }

    /// Draw the control panel. The year selector is interactive only when
    /// `selection` enables it.
    pub fn show(&mut self, ui: &mut egui::Ui, selection: SelectionState) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("Automobile Sales Statistics Dashboard")
                    .size(20.0)
                    .strong()
                    .color(TITLE_COLOR),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(&self.dataset_label).size(11.0).color(Color32::GRAY));
                ui.label(RichText::new(format!("{} rows", self.row_count)).size(12.0));
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Report Section =====
        ui.label(RichText::new("⚙️ Report").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 90.0;
        let combo_width = 190.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Report Type:"));
            ComboBox::from_id_salt("report_type")
                .width(combo_width)
                .selected_text(selection.report_type.label())
                .show_ui(ui, |ui| {
                    for rt in ReportType::OPTIONS {
                        if ui
                            .selectable_label(selection.report_type == rt, rt.label())
                            .clicked()
                        {
                            action = ControlPanelAction::ReportTypeChanged(rt);
                        }
                    }
                });
        });

        ui.add_space(5.0);

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Year:"));
            ui.add_enabled_ui(selection.year_enabled(), |ui| {
                let selected = selection
                    .selected_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "Select-year".to_string());
                ComboBox::from_id_salt("select_year")
                    .width(combo_width)
                    .height(300.0)
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for year in supported_years() {
                            if ui
                                .selectable_label(selection.selected_year == Some(year), year.to_string())
                                .clicked()
                            {
                                action = ControlPanelAction::YearChanged(year);
                            }
                        }
                    });
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        ui.label(RichText::new("📊 Status").size(14.0).strong());
        ui.add_space(5.0);
        ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlPanelAction {
    None,
    ReportTypeChanged(ReportType),
    YearChanged(i32),
}
