//! Windowed structural similarity (SSIM) between two grayscale images.
//!
//! - Square `window × window` box windows, centred on every pixel whose
//!   window lies fully inside the image (no border handling).
//! - Local means, variances and covariance per window, combined as
//!   `((2μxμy + C1)(2σxy + C2)) / ((μx² + μy² + C1)(σx² + σy² + C2))`
//!   with `C1 = (0.01·255)²`, `C2 = (0.03·255)²`.
//! - The score is the mean over all windows; identical inputs give 1.
//!
//! Rows of window centres are scored in parallel and summed in row order, so
//! the result does not depend on the rayon schedule.
use crate::image::{GrayImage, ImageView};
use rayon::prelude::*;

pub const DEFAULT_WINDOW: usize = 11;

const C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

/// SSIM with the default 11×11 window.
pub fn ssim(reference: &GrayImage, test: &GrayImage) -> Result<f32, String> {
    ssim_with_window(reference, test, DEFAULT_WINDOW)
}

pub fn ssim_with_window(
    reference: &GrayImage,
    test: &GrayImage,
    window: usize,
) -> Result<f32, String> {
    let (w, h) = (reference.width(), reference.height());
    if (w, h) != (test.width(), test.height()) {
        return Err(format!(
            "image sizes differ: {w}x{h} vs {}x{}",
            test.width(),
            test.height()
        ));
    }
    if window == 0 || window % 2 == 0 {
        return Err(format!("window must be a positive odd size, got {window}"));
    }
    if w < window || h < window {
        return Err(format!("{w}x{h} image is smaller than the {window}x{window} window"));
    }

    let half = window / 2;
    let xs = half..w - half;
    let row_sums: Vec<f64> = (half..h - half)
        .into_par_iter()
        .map(|y| {
            xs.clone()
                .map(|x| window_ssim(reference, test, x, y, half))
                .sum::<f64>()
        })
        .collect();

    let windows = (w - 2 * half) * (h - 2 * half);
    let total: f64 = row_sums.iter().sum();
    Ok((total / windows as f64) as f32)
}

fn window_ssim(a: &GrayImage, b: &GrayImage, cx: usize, cy: usize, half: usize) -> f64 {
    let (x0, x1) = (cx - half, cx + half + 1);
    let n = ((2 * half + 1) * (2 * half + 1)) as f64;

    let mut sum_a = 0.0f64;
    let mut sum_b = 0.0f64;
    for y in cy - half..=cy + half {
        let (ra, rb) = (&a.row(y)[x0..x1], &b.row(y)[x0..x1]);
        sum_a += ra.iter().map(|&v| f64::from(v)).sum::<f64>();
        sum_b += rb.iter().map(|&v| f64::from(v)).sum::<f64>();
    }
    let (mu_a, mu_b) = (sum_a / n, sum_b / n);

    let (mut var_a, mut var_b, mut cov) = (0.0f64, 0.0f64, 0.0f64);
    for y in cy - half..=cy + half {
        let (ra, rb) = (&a.row(y)[x0..x1], &b.row(y)[x0..x1]);
        for (&va, &vb) in ra.iter().zip(rb) {
            let da = f64::from(va) - mu_a;
            let db = f64::from(vb) - mu_b;
            var_a += da * da;
            var_b += db * db;
            cov += da * db;
        }
    }
    var_a /= n;
    var_b /= n;
    cov /= n;

    let numerator = (2.0 * mu_a * mu_b + C1) * (2.0 * cov + C2);
    let denominator = (mu_a * mu_a + mu_b * mu_b + C1) * (var_a + var_b + C2);
    numerator / denominator
}
