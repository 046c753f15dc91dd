use super::timing::TimingBreakdown;
use crate::config::{FilterConfig, FilterKind};
use crate::engine::RowBand;
use serde::Serialize;

/// JSON summary of one filter run, written by the filter tool.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterReport {
    pub width: usize,
    pub height: usize,
    pub filter: FilterKind,
    pub config: FilterConfig,
    pub bands: Vec<RowBand>,
    pub degenerate_pixels: usize,
    /// SSIM against the configured reference image, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssim: Option<f32>,
    pub timing: TimingBreakdown,
}
