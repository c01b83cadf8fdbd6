//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::{DataSource, DEFAULT_DATA_URL};
use crate::stats::{ReportType, SelectionState};

/// Report names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportArg {
    Yearly,
    Recession,
}

impl From<ReportArg> for ReportType {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Yearly => ReportType::YearlyStatistics,
            ReportArg::Recession => ReportType::RecessionStatistics,
        }
    }
}

/// Automobile Sales Statistics Dashboard
#[derive(Parser, Debug)]
#[command(name = "autosales-dashboard")]
#[command(about = "Interactive recession and yearly statistics for automobile sales", long_about = None)]
#[command(version)]
pub struct Args {
    /// Dataset location: a local CSV path or an http(s) URL
    #[arg(short, long, value_name = "PATH|URL", default_value = DEFAULT_DATA_URL)]
    pub source: String,

    /// Initial report
    #[arg(short, long, value_enum)]
    pub report: Option<ReportArg>,

    /// Initial year (1980-2023), used by the yearly report
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Write the report's charts as PNG files plus a manifest into DIR and exit
    #[arg(short, long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Exported image width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Exported image height in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    /// Selection the dashboard or the export starts from.
    pub fn initial_selection(&self) -> SelectionState {
        let report_type = self.report.map(ReportType::from).unwrap_or_default();
        SelectionState::new(report_type, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["autosales-dashboard"]).unwrap();
        assert_eq!(args.source, DEFAULT_DATA_URL);
        assert_eq!(args.data_source(), DataSource::default());
        assert_eq!((args.width, args.height), (1200, 800));
        assert!(args.export.is_none());
        assert_eq!(args.initial_selection(), SelectionState::default());
    }

    #[test]
    fn yearly_selection_from_flags() {
        let args = Args::try_parse_from([
            "autosales-dashboard",
            "--source",
            "data/sales.csv",
            "--report",
            "yearly",
            "--year",
            "1990",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.data_source(), DataSource::Path(PathBuf::from("data/sales.csv")));
        assert_eq!(args.verbose, 2);

        let selection = args.initial_selection();
        assert_eq!(selection.report_type, ReportType::YearlyStatistics);
        assert_eq!(selection.effective_year(), Some(1990));
    }

    #[test]
    fn recession_selection_ignores_year() {
        let args = Args::try_parse_from([
            "autosales-dashboard",
            "--report",
            "recession",
            "--year",
            "1990",
            "--export",
            "out",
        ])
        .unwrap();
        let selection = args.initial_selection();
        assert_eq!(selection.report_type, ReportType::RecessionStatistics);
        assert_eq!(selection.effective_year(), None);
        assert_eq!(args.export, Some(PathBuf::from("out")));
    }

    #[test]
    fn unknown_report_is_rejected() {
        assert!(Args::try_parse_from(["autosales-dashboard", "--report", "monthly"]).is_err());
    }
}
