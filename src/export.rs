//! Chart Export Module
//! Writes the charts of one selection to a directory: a PNG per chart and a
//! `charts.json` manifest describing all of them.

use crate::charts::{ChartDescriptor, RenderError, StaticChartRenderer};
use crate::stats::SelectionState;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "charts.json";

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    report: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    charts: &'a [ChartDescriptor],
}

/// What an export wrote.
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    /// Titles of charts with nothing to draw.
    pub skipped: Vec<String>,
    pub manifest: PathBuf,
}

pub struct ChartExporter;

impl ChartExporter {
    /// File name for the chart at `index` (zero based) in report order.
    pub fn file_name(index: usize, chart: &ChartDescriptor) -> String {
        format!("{:02}_{}.png", index + 1, chart.role.slug())
    }

    /// Render every chart in parallel and write the results to `dir`.
    /// Empty charts are skipped with a warning but still listed in the manifest.
    pub fn export(
        charts: &[ChartDescriptor],
        selection: &SelectionState,
        dir: &Path,
        width: u32,
        height: u32,
    ) -> Result<ExportSummary> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {}", dir.display()))?;

        let rendered: Vec<(usize, Result<Vec<u8>, RenderError>)> = charts
            .par_iter()
            .enumerate()
            .map(|(idx, chart)| (idx, StaticChartRenderer::render_png(chart, width, height)))
            .collect();

        let mut summary = ExportSummary::default();
        for (idx, result) in rendered {
            let chart = &charts[idx];
            match result {
                Ok(png) => {
                    let path = dir.join(Self::file_name(idx, chart));
                    fs::write(&path, png)
                        .with_context(|| format!("writing {}", path.display()))?;
                    log::info!("Wrote {}", path.display());
                    summary.written.push(path);
                }
                Err(RenderError::EmptyAggregation(title)) => {
                    log::warn!("Skipping \"{}\": no data for this selection", title);
                    summary.skipped.push(title);
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("rendering \"{}\"", chart.title));
                }
            }
        }

        let manifest = Manifest {
            report: selection.report_type.label(),
            year: selection.effective_year(),
            charts,
        };
        let manifest_path = dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(&manifest_path, json)
            .with_context(|| format!("writing {}", manifest_path.display()))?;
        summary.manifest = manifest_path;

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartKind;
    use crate::stats::{ReportType, TableRole};

    fn empty_chart(role: TableRole) -> ChartDescriptor {
        ChartDescriptor {
            role,
            kind: ChartKind::Line,
            title: "Total Monthly Automobile Sales".to_string(),
            x_label: "Month".to_string(),
            y_label: "Total Automobile Sales".to_string(),
            series_label: None,
            points: Vec::new(),
        }
    }

    #[test]
    fn file_names_follow_report_order() {
        let chart = empty_chart(TableRole::MonthlySales { year: 1985 });
        assert_eq!(ChartExporter::file_name(1, &chart), "02_monthly_sales.png");
    }

    #[test]
    fn empty_charts_are_skipped_but_listed() {
        let dir = tempfile::tempdir().unwrap();
        let charts = vec![empty_chart(TableRole::MonthlySales { year: 1985 })];
        let selection = SelectionState::new(ReportType::YearlyStatistics, Some(1985));

        let summary = ChartExporter::export(&charts, &selection, dir.path(), 640, 480).unwrap();
        assert!(summary.written.is_empty());
        assert_eq!(summary.skipped, vec!["Total Monthly Automobile Sales"]);

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.manifest).unwrap()).unwrap();
        assert_eq!(manifest["report"], "Yearly Statistics");
        assert_eq!(manifest["year"], 1985);
        assert_eq!(manifest["charts"].as_array().unwrap().len(), 1);
    }
}
