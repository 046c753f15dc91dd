use stencil_filter::RgbImage;

/// High-contrast RGB checkerboard with `cell`-pixel squares.
pub fn checkerboard_rgb(width: usize, height: usize, cell: usize) -> RgbImage {
    assert!(cell > 0, "cell size must be positive");
    let mut img = RgbImage::filled(width, height, [0, 0, 0]).expect("valid dimensions");
    for y in 0..height {
        for x in 0..width {
            let dark = ((x / cell) + (y / cell)) % 2 == 0;
            let px = if dark { [32, 40, 200] } else { [220, 210, 16] };
            img.put_pixel(x, y, px);
        }
    }
    img
}

/// Deterministic pseudo-random RGB noise (64-bit LCG, no external RNG).
pub fn noise_rgb(width: usize, height: usize, seed: u64) -> RgbImage {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let data = (0..width * height * 3)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect();
    RgbImage::new(width, height, data).expect("buffer sized from dimensions")
}
