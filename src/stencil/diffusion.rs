//! Edge-preserving diffusion weights.
//!
//! For each in-bounds neighbor `(x+dx, y+dy)` of the 3×3 window and each
//! channel, `diff_x` is the neighbor minus the centre and `diff_y` is a
//! vertical term selected by [`GradientMode`]. The neighbor weight is
//! `exp(-(diff_x² + diff_y²) / K²)`, so large local contrast suppresses mixing
//! across edges. Neighbors outside the image are skipped, never clamped.
//!
//! Rows below the last row (needed by the forward term) and above the first
//! (centered term) are clamped to the border.
use super::{clamp_index, normalize, StencilRule};
use crate::error::{DegenerateWeight, FilterError};
use crate::image::RgbView;
use serde::{Deserialize, Serialize};

/// How the vertical component of the gradient is estimated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMode {
    /// `I(x+dx, y+dy+1) - I(x, y+1)`: the one-row-down difference.
    #[default]
    Forward,
    /// Mean of the one-row-down and one-row-up differences.
    Centered,
}

#[derive(Clone, Copy, Debug)]
pub struct DiffusionRule {
    inv_k2: f32,
    gradient: GradientMode,
}

impl DiffusionRule {
    pub fn new(edge_constant: f32, gradient: GradientMode) -> Result<Self, FilterError> {
        if !(edge_constant.is_finite() && edge_constant > 0.0) {
            return Err(FilterError::invalid_config(format!(
                "edge constant must be positive and finite, got {edge_constant}"
            )));
        }
        Ok(Self {
            inv_k2: 1.0 / (edge_constant * edge_constant),
            gradient,
        })
    }

    /// `exp(-g²/K²)` for a gradient magnitude `g`.
    #[inline]
    pub fn coefficient(&self, gradient_magnitude: f32) -> f32 {
        (-(gradient_magnitude * gradient_magnitude) * self.inv_k2).exp()
    }

    #[inline]
    fn vertical_diff(
        &self,
        src: &RgbView<'_>,
        (sx, sy): (usize, usize),
        (x, y): (usize, usize),
        c: usize,
    ) -> f32 {
        let below = |px: usize, py: usize| {
            let row = clamp_index(py as isize + 1, src.h);
            src.sample(px, row, c) as f32
        };
        let forward = below(sx, sy) - below(x, y);
        match self.gradient {
            GradientMode::Forward => forward,
            GradientMode::Centered => {
                let above = |px: usize, py: usize| {
                    let row = clamp_index(py as isize - 1, src.h);
                    src.sample(px, row, c) as f32
                };
                0.5 * (forward + (above(sx, sy) - above(x, y)))
            }
        }
    }
}

impl StencilRule for DiffusionRule {
    fn evaluate(&self, src: RgbView<'_>, x: usize, y: usize) -> Result<[u8; 3], DegenerateWeight> {
        let mut sums = [0.0f32; 3];
        let mut weight_sums = [0.0f32; 3];
        let centre = src.pixel(x, y);

        for dy in -1isize..=1 {
            let sy = y as isize + dy;
            if sy < 0 || sy as usize >= src.h {
                continue;
            }
            let sy = sy as usize;
            for dx in -1isize..=1 {
                let sx = x as isize + dx;
                if sx < 0 || sx as usize >= src.w {
                    continue;
                }
                let sx = sx as usize;
                let neighbor = src.pixel(sx, sy);
                for c in 0..3 {
                    let v = neighbor[c] as f32;
                    let diff_x = v - centre[c] as f32;
                    let diff_y = self.vertical_diff(&src, (sx, sy), (x, y), c);
                    let g = (diff_x * diff_x + diff_y * diff_y).sqrt();
                    let coeff = self.coefficient(g);
                    sums[c] += v * coeff;
                    weight_sums[c] += coeff;
                }
            }
        }
        normalize(sums, weight_sums, x, y)
    }
}
