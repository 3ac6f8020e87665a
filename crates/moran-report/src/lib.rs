//! Reports for finished simulations: tables, summaries and SVG plots.

pub mod export;
pub mod plots;
pub mod svg;

pub use export::{ReportOptions, ReportWriter};
pub use plots::{entropy_chart, history_charts, metric_chart, size_chart, snapshot_map};
pub use svg::{HeatMap, LineChart, Series};
