use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use eframe::egui;

use survival_dashboard::app::SurvivalDashboardApp;
use survival_dashboard::config::DashboardConfig;
use survival_dashboard::data::aggregate::DerivedViews;
use survival_dashboard::data::filter::FilteredView;
use survival_dashboard::data::loader::load_file;
use survival_dashboard::report::{json_report, text_report};
use survival_dashboard::state::AppState;

#[derive(Debug, Parser)]
#[command(version, about = "Explore passenger survival with interactive filters")]
struct Cli {
    /// Passenger table to open (.csv, .json or .parquet)
    dataset: Option<PathBuf>,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the unfiltered views and exit instead of opening a window
    #[arg(long)]
    report: bool,

    /// Print the report as JSON
    #[arg(long, requires = "report")]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)?,
        None => {
            log::info!("No --config given, using defaults");
            DashboardConfig::default()
        }
    };

    let mut state = AppState::new(config);

    // Without data nothing can be drawn, so a failed startup load is fatal.
    let dataset_path = cli.dataset.clone().or_else(|| state.config.dataset_path.clone());
    if let Some(path) = &dataset_path {
        let dataset = load_file(path)
            .inspect_err(|e| log::error!("Failed to load {}: {e:#}", path.display()))?;
        state.set_dataset(Arc::new(dataset));
    }

    if cli.report {
        let Some(dataset) = &state.dataset else {
            bail!("--report needs a dataset path");
        };
        let views = DerivedViews::compute(&FilteredView::all(dataset), &state.config);
        let out = if cli.json {
            json_report(&views)?
        } else {
            text_report(&views)?
        };
        println!("{out}");
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Titanic Survival Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SurvivalDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}
