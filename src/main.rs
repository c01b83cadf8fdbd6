//! Automobile Sales Statistics Dashboard
//!
//! Loads the historical automobile sales dataset and shows recession-period
//! or per-year statistics as interactive charts, or exports them as PNG files.

mod charts;
mod config;
mod data;
mod export;
mod gui;
mod stats;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;

use config::Args;
use data::DatasetLoader;
use export::ChartExporter;
use gui::DashboardApp;
use stats::ReportPipeline;

const WINDOW_TITLE: &str = "Automobile Sales Statistics Dashboard";

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);
    log::info!("Automobile sales dashboard v{}", env!("CARGO_PKG_VERSION"));

    let source = args.data_source();
    let table = DatasetLoader::load(&source)
        .with_context(|| format!("loading automobile sales data from {}", source))?;
    log::debug!("Columns: {:?}", table.dataframe().get_column_names());

    let selection = args.initial_selection();

    if let Some(dir) = &args.export {
        let tables = ReportPipeline::compute(&table, &selection)
            .context("computing report tables")?;
        let charts = charts::build_charts(&tables);
        if charts.is_empty() {
            log::warn!("Nothing to export: choose --report, and --year for the yearly report");
        }
        let summary = ChartExporter::export(&charts, &selection, dir, args.width, args.height)?;
        log::info!(
            "Exported {} charts ({} skipped), manifest at {}",
            summary.written.len(),
            summary.skipped.len(),
            summary.manifest.display()
        );
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title(WINDOW_TITLE),
        ..Default::default()
    };

    let dataset_label = source.to_string();
    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, table, dataset_label, selection)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {}", e))
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::{Builder, Env};
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::from_env(Env::default())
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
