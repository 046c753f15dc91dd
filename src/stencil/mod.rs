//! Per-pixel stencil evaluation.
//!
//! A [`StencilRule`] maps a pixel location and the buffer of the previous pass
//! to the filtered RGB value. Two rules share the same traversal shape:
//!
//! - [`GaussianRule`]: static weights from a [`KernelTable`], out-of-range
//!   neighbors clamped to the nearest edge pixel (replicate border).
//! - [`DiffusionRule`]: 3×3 window, weights `exp(-g²/K²)` from the local
//!   gradient, out-of-range neighbors skipped.
//!
//! Per channel the output is `round(Σ v·w / Σ w)` clamped to `[0, 255]`.
//! A zero or non-finite weight total is reported as [`DegenerateWeight`] and
//! left to the caller to recover.
//!
//! [`KernelTable`]: crate::kernel::KernelTable
pub mod diffusion;
pub mod gaussian;

pub use diffusion::{DiffusionRule, GradientMode};
pub use gaussian::GaussianRule;

use crate::config::{FilterConfig, FilterKind};
use crate::error::{DegenerateWeight, FilterError};
use crate::image::RgbView;

pub trait StencilRule: Sync {
    /// Filtered value of pixel `(x, y)` sampled from `src`.
    fn evaluate(&self, src: RgbView<'_>, x: usize, y: usize) -> Result<[u8; 3], DegenerateWeight>;
}

/// Rule chosen from configuration at run time.
#[derive(Clone, Debug)]
pub enum Filter {
    Gaussian(GaussianRule),
    Diffusion(DiffusionRule),
}

impl Filter {
    /// Build the rule for `kind`. `config` should already be validated so the
    /// kernel size is odd.
    pub fn from_config(kind: FilterKind, config: &FilterConfig) -> Result<Self, FilterError> {
        match kind {
            FilterKind::Gaussian => Ok(Filter::Gaussian(GaussianRule::new(
                config.kernel_size,
                config.sigma,
            )?)),
            FilterKind::Diffusion { gradient } => Ok(Filter::Diffusion(DiffusionRule::new(
                config.edge_constant,
                gradient,
            )?)),
        }
    }

    /// Side length of the sampled window.
    pub fn window(&self) -> usize {
        match self {
            Filter::Gaussian(rule) => rule.table().size(),
            Filter::Diffusion(_) => 3,
        }
    }
}

impl StencilRule for Filter {
    #[inline]
    fn evaluate(&self, src: RgbView<'_>, x: usize, y: usize) -> Result<[u8; 3], DegenerateWeight> {
        match self {
            Filter::Gaussian(rule) => rule.evaluate(src, x, y),
            Filter::Diffusion(rule) => rule.evaluate(src, x, y),
        }
    }
}

#[inline]
pub(crate) fn clip_to_rgb(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Normalize per-channel accumulators, or report the pixel as degenerate.
#[inline]
pub(crate) fn normalize(
    sums: [f32; 3],
    weight_sums: [f32; 3],
    x: usize,
    y: usize,
) -> Result<[u8; 3], DegenerateWeight> {
    let mut out = [0u8; 3];
    for c in 0..3 {
        let w = weight_sums[c];
        if !(w.is_finite() && w > 0.0) {
            return Err(DegenerateWeight { x, y });
        }
        let v = sums[c] / w;
        if !v.is_finite() {
            return Err(DegenerateWeight { x, y });
        }
        out[c] = clip_to_rgb(v);
    }
    Ok(out)
}

/// Clamp a signed coordinate into `[0, upper)`.
#[inline]
pub(crate) fn clamp_index(idx: isize, upper: usize) -> usize {
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper.saturating_sub(1)
    } else {
        idx as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_rounds_and_saturates() {
        assert_eq!(clip_to_rgb(-3.0), 0);
        assert_eq!(clip_to_rgb(127.5), 128);
        assert_eq!(clip_to_rgb(127.49), 127);
        assert_eq!(clip_to_rgb(300.0), 255);
    }

    #[test]
    fn zero_weight_is_degenerate() {
        let res = normalize([1.0, 1.0, 1.0], [1.0, 0.0, 1.0], 4, 7);
        assert_eq!(res, Err(DegenerateWeight { x: 4, y: 7 }));
        let res = normalize([1.0, 1.0, 1.0], [1.0, f32::NAN, 1.0], 0, 0);
        assert!(res.is_err());
    }

    #[test]
    fn clamp_index_replicates_edges() {
        assert_eq!(clamp_index(-2, 5), 0);
        assert_eq!(clamp_index(7, 5), 4);
        assert_eq!(clamp_index(3, 5), 3);
    }

    #[test]
    fn filter_from_config_selects_rule() {
        let cfg = FilterConfig::default().with_kernel_size(7);
        let filter = Filter::from_config(FilterKind::Gaussian, &cfg).unwrap();
        assert_eq!(filter.window(), 7);
        let filter = Filter::from_config(
            FilterKind::Diffusion {
                gradient: GradientMode::Forward,
            },
            &cfg,
        )
        .unwrap();
        assert_eq!(filter.window(), 3);
        let bad = cfg.with_edge_constant(0.0);
        assert!(Filter::from_config(
            FilterKind::Diffusion {
                gradient: GradientMode::Forward
            },
            &bad
        )
        .is_err());
    }
}
