use super::{clamp_index, normalize, StencilRule};
use crate::error::{DegenerateWeight, FilterError};
use crate::image::RgbView;
use crate::kernel::KernelTable;

/// Static Gaussian weighting with replicate-border sampling.
#[derive(Clone, Debug)]
pub struct GaussianRule {
    table: KernelTable,
}

impl GaussianRule {
    pub fn new(kernel_size: usize, sigma: f32) -> Result<Self, FilterError> {
        Ok(Self::from_table(KernelTable::build(kernel_size, sigma)?))
    }

    pub fn from_table(table: KernelTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &KernelTable {
        &self.table
    }
}

impl StencilRule for GaussianRule {
    fn evaluate(&self, src: RgbView<'_>, x: usize, y: usize) -> Result<[u8; 3], DegenerateWeight> {
        let r = self.table.radius() as isize;
        let (xi, yi) = (x as isize, y as isize);
        let mut sums = [0.0f32; 3];
        let mut weight_sum = 0.0f32;

        for (ky, taps) in (0..self.table.size()).map(|ky| (ky, self.table.row(ky))) {
            let sy = clamp_index(yi + ky as isize - r, src.h);
            let row = &src.data[sy * src.w * 3..(sy + 1) * src.w * 3];
            for (kx, &k) in taps.iter().enumerate() {
                let sx = clamp_index(xi + kx as isize - r, src.w);
                let px = &row[sx * 3..sx * 3 + 3];
                sums[0] += px[0] as f32 * k;
                sums[1] += px[1] as f32 * k;
                sums[2] += px[2] as f32 * k;
                weight_sum += k;
            }
        }
        normalize(sums, [weight_sum; 3], x, y)
    }
}
