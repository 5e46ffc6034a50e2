// Injury dashboard entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load, normalize, and enrich the CSV
// 4. Run the TUI until the user quits

use std::path::Path;

use anyhow::Context;
use tracing::{error, info};

use sidelined_core::config;
use sidelined_core::report::ReportOptions;
use sidelined_core::Dataset;
use sidelined_tui::tui;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("sidelined dashboard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    let csv_path = Path::new(&config.data.csv_path);
    info!("Config loaded: data={}", csv_path.display());

    // 3. Load the data; a missing or unreadable file is fatal before the
    // terminal is taken over, so the error prints normally.
    let dataset = Dataset::load(csv_path)
        .with_context(|| format!("failed to load injury data from {}", csv_path.display()))?;
    info!(
        "Loaded {} rows, {} columns",
        dataset.table.row_count(),
        dataset.table.column_count()
    );

    // 4. Run the TUI event loop (blocking until user quits)
    if let Err(e) = tui::run(dataset, ReportOptions::from(&config.views)).await {
        error!("TUI error: {}", e);
        return Err(e);
    }

    info!("sidelined dashboard shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("sidelined.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sidelined=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
