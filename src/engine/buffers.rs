//! Ping-pong working buffers.
//!
//! Plane 0 is seeded with the input. Pass `i` reads plane `i % 2` and writes
//! plane `(i + 1) % 2`, so after `n` passes the latest data sits in plane
//! `n % 2`: the scratch plane when `n` is odd. The output is that plane,
//! detached without a copy.
use super::partition::RowBand;
use crate::error::FilterError;
use crate::image::{ImageView, RgbImage, RgbView, CHANNELS};
use std::marker::PhantomData;

#[derive(Debug)]
pub struct WorkingBuffers {
    planes: [Vec<u8>; 2],
    width: usize,
    height: usize,
}

impl WorkingBuffers {
    /// Zeroed planes for a `width × height` RGB image.
    pub fn allocate(width: usize, height: usize) -> Result<Self, FilterError> {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(FilterError::AllocationFailure { bytes: usize::MAX })?;
        let current = zeroed(len)?;
        let scratch = zeroed(len)?;
        Ok(Self {
            planes: [current, scratch],
            width,
            height,
        })
    }

    /// Allocate and copy `input` into the current plane.
    pub fn seeded(input: &RgbImage) -> Result<Self, FilterError> {
        let mut buffers = Self::allocate(input.width(), input.height())?;
        buffers.planes[0].copy_from_slice(input.as_raw());
        Ok(buffers)
    }

    #[inline]
    pub fn read_index(pass: usize) -> usize {
        pass % 2
    }

    #[inline]
    pub fn write_index(pass: usize) -> usize {
        (pass + 1) % 2
    }

    /// Plane holding the newest data after `passes` completed passes.
    #[inline]
    pub fn latest_index(passes: usize) -> usize {
        passes % 2
    }

    pub fn plane(&self, index: usize) -> &[u8] {
        &self.planes[index]
    }

    pub(crate) fn shared(&mut self) -> SharedPlanes<'_> {
        let [current, scratch] = &mut self.planes;
        SharedPlanes {
            ptrs: [current.as_mut_ptr(), scratch.as_mut_ptr()],
            width: self.width,
            height: self.height,
            _marker: PhantomData,
        }
    }

    /// Detach the plane holding the result of `passes` passes.
    pub fn into_output(self, passes: usize) -> Result<RgbImage, FilterError> {
        let [current, scratch] = self.planes;
        let latest = if Self::latest_index(passes) == 0 {
            current
        } else {
            scratch
        };
        RgbImage::new(self.width, self.height, latest)
    }
}

fn zeroed(len: usize) -> Result<Vec<u8>, FilterError> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|_| FilterError::AllocationFailure { bytes: len })?;
    plane.resize(len, 0);
    Ok(plane)
}

/// Both planes viewed from many worker threads at once.
///
/// Handing out `&[u8]` / `&mut [u8]` is left to the caller under two rules:
/// within a pass, a worker only writes its own band of the write plane and
/// nobody writes the read plane; and every slice from pass `i` is dropped
/// before the barrier closing pass `i`.
pub(crate) struct SharedPlanes<'a> {
    ptrs: [*mut u8; 2],
    width: usize,
    height: usize,
    _marker: PhantomData<&'a mut [u8]>,
}

// SAFETY: access is partitioned by pass parity and row band as documented on
// the type; the barrier orders passes.
unsafe impl Send for SharedPlanes<'_> {}
unsafe impl Sync for SharedPlanes<'_> {}

impl<'a> SharedPlanes<'a> {
    #[inline]
    fn row_len(&self) -> usize {
        self.width * CHANNELS
    }

    /// Read view of the plane pass `pass` samples from.
    ///
    /// # Safety
    /// No thread may write plane `pass % 2` while the view is alive.
    pub(crate) unsafe fn source(&self, pass: usize) -> RgbView<'_> {
        let ptr = self.ptrs[WorkingBuffers::read_index(pass)];
        RgbView {
            w: self.width,
            h: self.height,
            data: std::slice::from_raw_parts(ptr, self.row_len() * self.height),
        }
    }

    /// Mutable rows of `band` in the plane pass `pass` writes.
    ///
    /// # Safety
    /// The caller must be the only holder of `band` for this pass, and no
    /// thread may read plane `(pass + 1) % 2` while the slice is alive.
    pub(crate) unsafe fn band_mut(&self, pass: usize, band: RowBand) -> &mut [u8] {
        debug_assert!(band.end <= self.height);
        let ptr = self.ptrs[WorkingBuffers::write_index(pass)];
        let row_len = self.row_len();
        std::slice::from_raw_parts_mut(ptr.add(band.start * row_len), band.len() * row_len)
    }
}
