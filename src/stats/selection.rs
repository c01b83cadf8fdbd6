//! Report selection: which report is shown and for which year.

use crate::data::schema::is_supported_year;

/// Top-level report mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportType {
    #[default]
    Unselected,
    YearlyStatistics,
    RecessionStatistics,
}

impl ReportType {
    /// Selectable report types, in menu order.
    pub const OPTIONS: [ReportType; 2] =
        [ReportType::YearlyStatistics, ReportType::RecessionStatistics];

    pub fn label(self) -> &'static str {
        match self {
            ReportType::Unselected => "Select a report type",
            ReportType::YearlyStatistics => "Yearly Statistics",
            ReportType::RecessionStatistics => "Recession Period Statistics",
        }
    }

    /// Map a menu label back to a report type. Unknown labels select nothing.
    #[allow(dead_code)]
    pub fn from_label(label: &str) -> ReportType {
        Self::OPTIONS
            .iter()
            .copied()
            .find(|rt| rt.label() == label)
            .unwrap_or(ReportType::Unselected)
    }
}

/// The (report type, year) pair driving the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub report_type: ReportType,
    pub selected_year: Option<i32>,
}

impl SelectionState {
    pub fn new(report_type: ReportType, selected_year: Option<i32>) -> Self {
        Self {
            report_type,
            selected_year,
        }
    }

    /// The year input only accepts changes in yearly mode.
    pub fn year_enabled(&self) -> bool {
        self.report_type == ReportType::YearlyStatistics
    }

    /// Year the yearly report should use, if it is chosen and supported.
    pub fn effective_year(&self) -> Option<i32> {
        if !self.year_enabled() {
            return None;
        }
        self.selected_year.filter(|y| is_supported_year(*y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_and_unknown_is_unselected() {
        for rt in ReportType::OPTIONS {
            assert_eq!(ReportType::from_label(rt.label()), rt);
        }
        assert_eq!(ReportType::from_label("Select Statistics"), ReportType::Unselected);
        assert_eq!(ReportType::from_label(""), ReportType::Unselected);
    }

    #[test]
    fn effective_year_requires_yearly_mode_and_supported_year() {
        let yearly = SelectionState::new(ReportType::YearlyStatistics, Some(1999));
        assert_eq!(yearly.effective_year(), Some(1999));

        let out_of_range = SelectionState::new(ReportType::YearlyStatistics, Some(2030));
        assert_eq!(out_of_range.effective_year(), None);

        let recession = SelectionState::new(ReportType::RecessionStatistics, Some(1999));
        assert_eq!(recession.effective_year(), None);

        let no_year = SelectionState::new(ReportType::YearlyStatistics, None);
        assert_eq!(no_year.effective_year(), None);
    }
}
