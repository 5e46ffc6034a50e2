// Batch exporter entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout is for the file list)
// 2. Load config
// 3. Load, normalize, and enrich the CSV
// 4. Build the unfiltered report
// 5. Write every available view and the manifest
// 6. Print what was saved and skipped

use std::path::Path;

use anyhow::Context;
use tracing::info;

use sidelined_core::config;
use sidelined_core::filter::Filters;
use sidelined_core::report::ReportOptions;
use sidelined_core::Dataset;
use sidelined_export::export::{self, MANIFEST_FILE};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("sidelined-export starting up");

    let config = config::load_config().context("failed to load configuration")?;
    let csv_path = Path::new(&config.data.csv_path);
    let out_dir = Path::new(&config.export.out_dir);

    let dataset = Dataset::load(csv_path)
        .with_context(|| format!("failed to load injury data from {}", csv_path.display()))?;

    println!("Rows: {}", dataset.table.row_count());
    println!("Columns: {}", dataset.table.column_names().join(", "));

    let report = dataset.report(&Filters::default(), &ReportOptions::from(&config.views));
    let manifest = export::export_report(&report, &dataset.source, out_dir)
        .with_context(|| format!("failed to export views to {}", out_dir.display()))?;

    for outcome in &manifest.views {
        println!("{}", outcome.line(out_dir));
    }
    println!("Saved: {}", out_dir.join(MANIFEST_FILE).display());

    println!(
        "\nExport complete. {} file(s) in '{}':",
        manifest.saved_files().len() + 1,
        out_dir.display()
    );
    let mut files: Vec<&str> = manifest.saved_files();
    files.push(MANIFEST_FILE);
    files.sort_unstable();
    for file in files {
        println!(" - {file}");
    }

    info!("sidelined-export finished");
    Ok(())
}

/// Initialize tracing to stderr so stdout carries only the export listing.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sidelined=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
