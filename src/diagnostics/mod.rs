//! Run diagnostics: phase timings and the serializable run report.
pub mod report;
pub mod timing;

pub use report::FilterReport;
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
