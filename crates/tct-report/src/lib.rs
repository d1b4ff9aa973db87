//! Structured per-event text report.

pub mod report;

pub use report::{report_file_name, ReportWriter};
