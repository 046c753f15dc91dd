//! Normalized 2D Gaussian weight table.
//!
//! Weights are stored in a single flat buffer with an explicit row stride
//! (`size`), indexed by the offset `(dy, dx)` in `[-r, r]²` where
//! `r = size / 2`. After normalization the entries sum to one.
use crate::error::FilterError;

#[derive(Clone, Debug, PartialEq)]
pub struct KernelTable {
    size: usize,
    weights: Vec<f32>,
}

impl KernelTable {
    /// Build the table for an odd `kernel_size` and a positive `sigma`.
    ///
    /// Even sizes are rejected here; callers promote them with
    /// [`promote_to_odd`] first.
    pub fn build(kernel_size: usize, sigma: f32) -> Result<Self, FilterError> {
        if kernel_size == 0 || kernel_size % 2 == 0 {
            return Err(FilterError::invalid_config(format!(
                "kernel size must be a positive odd integer, got {kernel_size}"
            )));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(FilterError::invalid_config(format!(
                "sigma must be positive and finite, got {sigma}"
            )));
        }

        let radius = (kernel_size / 2) as i64;
        let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
        let mut raw = Vec::with_capacity(kernel_size * kernel_size);
        let mut sum = 0.0f64;
        for y in -radius..=radius {
            for x in -radius..=radius {
                let w = (-((x * x + y * y) as f64) / denom).exp();
                sum += w;
                raw.push(w);
            }
        }
        // exp underflow for tiny sigma still leaves the centre tap at 1.0
        let weights = raw.into_iter().map(|w| (w / sum) as f32).collect();
        Ok(Self {
            size: kernel_size,
            weights,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn radius(&self) -> usize {
        self.size / 2
    }

    /// Weight at offset `(dy, dx)`, both in `[-radius, radius]`.
    #[inline]
    pub fn weight(&self, dy: isize, dx: isize) -> f32 {
        let r = self.radius() as isize;
        let row = (dy + r) as usize;
        let col = (dx + r) as usize;
        self.weights[row * self.size + col]
    }

    /// Row `dy + radius` of the table.
    #[inline]
    pub fn row(&self, ky: usize) -> &[f32] {
        &self.weights[ky * self.size..(ky + 1) * self.size]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }
}

/// Round even kernel sizes up to the next odd value.
#[inline]
pub fn promote_to_odd(kernel_size: usize) -> usize {
    if kernel_size % 2 == 0 {
        kernel_size + 1
    } else {
        kernel_size
    }
}
