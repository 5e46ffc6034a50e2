// Library root: the injury-data pipeline shared by the dashboard and the
// batch exporter.

pub mod config;
pub mod dataset;
pub mod derive;
pub mod filter;
pub mod load;
pub mod normalize;
pub mod report;
pub mod stats;
pub mod table;

pub use dataset::Dataset;
