mod bootstrap;
mod report;

use anyhow::{Context, Result};
use dashboard_core::settings::Settings;
use dashboard_data::analysis::Dashboard;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Bike dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let loader = bootstrap::data_loader(&settings);
    tracing::debug!("Data candidates: {:?}", loader.dirs());

    let dashboard = Dashboard::load(&loader).context("loading bike-sharing datasets")?;

    let dashboard_report = dashboard
        .report_between(settings.start, settings.end)
        .context("applying date range")?;

    let output = match settings.format.as_str() {
        "json" => report::render_json(&dashboard_report)?,
        _ => report::render_text(&dashboard_report),
    };
    println!("{}", output);

    Ok(())
}
