//! Selection Controller
//! State machine over the report selection. Every effective transition
//! recomputes the report and replaces the rendered charts in one step.

use crate::charts::{build_charts, ChartDescriptor};
use crate::data::SalesTable;
use crate::stats::{ReportPipeline, ReportType, SelectionState};

/// Receives the full, ordered chart set after each recomputation.
pub trait ChartSink {
    /// Replace everything currently shown with `charts`.
    fn replace_all(&mut self, charts: Vec<ChartDescriptor>);
}

#[derive(Debug, Default)]
pub struct DashboardController {
    selection: SelectionState,
}

impl DashboardController {
    pub fn new(selection: SelectionState) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Derived from the report type; never stored.
    pub fn year_enabled(&self) -> bool {
        self.selection.year_enabled()
    }

    /// Switch report. A previously chosen year is kept, only its input is
    /// disabled outside the yearly report.
    pub fn set_report_type(
        &mut self,
        report_type: ReportType,
        table: &SalesTable,
        sink: &mut impl ChartSink,
    ) {
        self.selection.report_type = report_type;
        log::debug!("Report type set to {:?}", report_type);
        self.refresh(table, sink);
    }

    /// Choose a year. Ignored while the year input is disabled; returns
    /// whether the event was applied.
    pub fn set_selected_year(
        &mut self,
        year: i32,
        table: &SalesTable,
        sink: &mut impl ChartSink,
    ) -> bool {
        if !self.year_enabled() {
            log::debug!("Ignoring year {} while year input is disabled", year);
            return false;
        }
        self.selection.selected_year = Some(year);
        log::debug!("Year set to {}", year);
        self.refresh(table, sink);
        true
    }

    /// Recompute the current selection and hand the charts to `sink`.
    pub fn refresh(&self, table: &SalesTable, sink: &mut impl ChartSink) {
        let charts = match ReportPipeline::compute(table, &self.selection) {
            Ok(tables) => build_charts(&tables),
            Err(e) => {
                log::error!("Report computation failed: {}", e);
                Vec::new()
            }
        };
        log::info!(
            "{} ({}): {} charts",
            self.selection.report_type.label(),
            self.selection
                .effective_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string()),
            charts.len()
        );
        sink.replace_all(charts);
    }
}
