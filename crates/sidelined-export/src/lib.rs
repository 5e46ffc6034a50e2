// Batch exporter: renders every report view to standalone HTML/CSV files.

pub mod export;
pub mod html;
pub mod svg;

pub use export::{export_report, ExportError, Manifest, ViewOutcome};
