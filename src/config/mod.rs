//! Per-run filter parameters.
//!
//! `FilterConfig` carries the knobs shared by both weighting rules; the rule
//! itself is selected by `FilterKind`, which deserializes from the tool's JSON
//! config (see [`tool`]).
pub mod tool;

use crate::error::FilterError;
use crate::kernel::promote_to_odd;
use crate::stencil::GradientMode;
use serde::{Deserialize, Serialize};

/// Immutable parameters for one engine run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FilterConfig {
    /// Gaussian window size (odd, >= 1). Even values are promoted.
    pub kernel_size: usize,
    /// Gaussian standard deviation (> 0).
    pub sigma: f32,
    /// Diffusion edge constant `K` (> 0).
    pub edge_constant: f32,
    /// Number of filter passes (>= 1).
    pub iterations: usize,
    /// Number of worker threads (>= 1).
    pub threads: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            kernel_size: 5,
            sigma: 1.0,
            edge_constant: 20.0,
            iterations: 1,
            threads: 1,
        }
    }
}

impl FilterConfig {
    pub fn with_kernel_size(mut self, kernel_size: usize) -> Self {
        self.kernel_size = kernel_size;
        self
    }

    pub fn with_sigma(mut self, sigma: f32) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_edge_constant(mut self, edge_constant: f32) -> Self {
        self.edge_constant = edge_constant;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Check the counts shared by every rule and promote an even kernel size.
    ///
    /// Rule-specific parameters (`sigma`, `edge_constant`) are checked when
    /// the rule is built.
    pub fn validated(self) -> Result<Self, FilterError> {
        if self.kernel_size == 0 {
            return Err(FilterError::invalid_config("kernel_size must be >= 1"));
        }
        if self.iterations == 0 {
            return Err(FilterError::invalid_config("iterations must be >= 1"));
        }
        if self.threads == 0 {
            return Err(FilterError::invalid_config("threads must be >= 1"));
        }
        Ok(Self {
            kernel_size: promote_to_odd(self.kernel_size),
            ..self
        })
    }
}

/// Weighting rule applied at every pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    #[default]
    Gaussian,
    Diffusion {
        #[serde(default)]
        gradient: GradientMode,
    },
}

impl FilterKind {
    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::Gaussian => "gaussian",
            FilterKind::Diffusion { .. } => "diffusion",
        }
    }
}
