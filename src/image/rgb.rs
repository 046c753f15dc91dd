//! Interleaved RGB8 rasters: `RgbImage` owns its pixels, `RgbView` borrows a
//! buffer of the same layout (row-major, 3 bytes per pixel, no padding).
use super::gray::GrayImage;
use super::traits::{ImageView, ImageViewMut};
use crate::error::FilterError;

pub const CHANNELS: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImage {
    /// Wrap a raw RGB buffer, checking dimensions against its length.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FilterError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(FilterError::InvalidImage(format!(
                "expected {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image of the given size with every pixel set to `rgb`.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self, FilterError> {
        let bytes = byte_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)
            .map_err(|_| FilterError::AllocationFailure { bytes })?;
        data.extend(rgb.iter().copied().cycle().take(bytes));
        Self::new(width, height, data)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.view().pixel(x, y)
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        self.row_mut(y)[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&rgb);
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn view(&self) -> RgbView<'_> {
        RgbView {
            w: self.width,
            h: self.height,
            data: &self.data,
        }
    }

    /// BT.601 luma projection used as the grayscale equivalent for SSIM.
    pub fn to_gray(&self) -> GrayImage {
        let mut luma = Vec::with_capacity(self.width * self.height);
        for row in self.rows() {
            luma.extend(row.chunks_exact(CHANNELS).map(|px| {
                let y = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
                ((y + 500) / 1000) as u8
            }));
        }
        GrayImage::from_parts(self.width, self.height, luma)
    }
}

/// Byte length of a `width`×`height` RGB buffer; rejects empty or
/// unrepresentable sizes.
fn byte_len(width: usize, height: usize) -> Result<usize, FilterError> {
    if width == 0 || height == 0 {
        return Err(FilterError::InvalidImage(format!(
            "dimensions must be positive, got {width}x{height}"
        )));
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| {
            FilterError::InvalidImage(format!("{width}x{height} overflows the address space"))
        })
}

impl ImageView for RgbImage {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        self.width * CHANNELS
    }
    #[inline]
    fn channels(&self) -> usize {
        CHANNELS
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride();
        &self.data[start..start + self.stride()]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl ImageViewMut for RgbImage {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let stride = self.stride();
        let start = y * stride;
        &mut self.data[start..start + stride]
    }
}

/// Borrowed RGB8 buffer the stencil rules sample from.
#[derive(Clone, Copy, Debug)]
pub struct RgbView<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl<'a> RgbView<'a> {
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[(y * self.w + x) * CHANNELS + c]
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.w + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

impl<'a> ImageView for RgbView<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w * CHANNELS
    }
    #[inline]
    fn channels(&self) -> usize {
        CHANNELS
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride();
        &self.data[start..start + self.stride()]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_buffer() {
        assert!(RgbImage::new(2, 2, vec![0; 11]).is_err());
        assert!(RgbImage::new(0, 2, Vec::new()).is_err());
        assert!(RgbImage::new(2, 2, vec![0; 12]).is_ok());
    }

    #[test]
    fn filled_rejects_overflowing_dimensions() {
        let err = RgbImage::filled(usize::MAX, 2, [1, 2, 3]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)), "{err}");
        let err = RgbImage::filled(usize::MAX / 2, 2, [1, 2, 3]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidImage(_)), "{err}");
        assert!(matches!(
            RgbImage::filled(0, 4, [0, 0, 0]),
            Err(FilterError::InvalidImage(_))
        ));
    }

    #[test]
    fn to_gray_keeps_neutral_levels() {
        let mut img = RgbImage::filled(3, 2, [128, 128, 128]).unwrap();
        img.put_pixel(2, 1, [255, 255, 255]);
        let gray = img.to_gray();
        assert_eq!(gray.get(0, 0), 128);
        assert_eq!(gray.get(2, 1), 255);
    }
}
