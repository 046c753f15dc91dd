//! JSON configuration for the `stencil_filter` tool.
//!
//! ```json
//! {
//!   "input": "photo.png",
//!   "filter": { "kind": "diffusion", "gradient": "forward" },
//!   "params": { "iterations": 10, "threads": 8, "edge_constant": 20.0 },
//!   "reference": "photo_ref.png",
//!   "output": { "image": "out/diffused.png", "report_json": "out/report.json" }
//! }
//! ```
use super::{FilterConfig, FilterKind};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct FilterToolConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub filter: FilterKind,
    #[serde(default)]
    pub params: ToolParams,
    /// Optional image the output is scored against with SSIM.
    #[serde(default)]
    pub reference: Option<PathBuf>,
    pub output: FilterOutputConfig,
}

/// Filter parameters as written in the config file.
///
/// `threads` defaults to the machine's available parallelism.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ToolParams {
    pub kernel_size: usize,
    pub sigma: f32,
    pub edge_constant: f32,
    pub iterations: usize,
    pub threads: Option<usize>,
}

impl Default for ToolParams {
    fn default() -> Self {
        let base = FilterConfig::default();
        Self {
            kernel_size: base.kernel_size,
            sigma: base.sigma,
            edge_constant: base.edge_constant,
            iterations: base.iterations,
            threads: None,
        }
    }
}

impl ToolParams {
    pub fn resolve(&self) -> FilterConfig {
        let threads = self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        FilterConfig {
            kernel_size: self.kernel_size,
            sigma: self.sigma,
            edge_constant: self.edge_constant,
            iterations: self.iterations,
            threads,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FilterOutputConfig {
    pub image: PathBuf,
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}

pub fn load_config(path: &Path) -> Result<FilterToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&data).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<FilterToolConfig, serde_json::Error> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stencil::GradientMode;

    #[test]
    fn parses_full_config() {
        let cfg = parse_config(
            r#"{
                "input": "in.png",
                "filter": { "kind": "diffusion", "gradient": "centered" },
                "params": { "iterations": 4, "threads": 3, "edge_constant": 12.5 },
                "reference": "ref.png",
                "output": { "image": "out.png", "report_json": "report.json" }
            }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.filter,
            FilterKind::Diffusion {
                gradient: GradientMode::Centered
            }
        );
        let resolved = cfg.params.resolve();
        assert_eq!(resolved.iterations, 4);
        assert_eq!(resolved.threads, 3);
        assert_eq!(resolved.edge_constant, 12.5);
        assert_eq!(resolved.kernel_size, 5);
        assert_eq!(cfg.reference, Some(PathBuf::from("ref.png")));
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(r#"{ "input": "a.png", "output": { "image": "b.png" } }"#).unwrap();
        assert_eq!(cfg.filter, FilterKind::Gaussian);
        assert!(cfg.params.resolve().threads >= 1);
        assert!(cfg.output.report_json.is_none());
    }
}
