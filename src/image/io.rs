//! I/O helpers for RGB rasters, grayscale references and JSON reports.
//!
//! - `load_rgb_image`: decode a PNG/JPEG/BMP into an owned RGB8 buffer.
//! - `save_rgb_image`: encode an `RgbImage`, format chosen by extension.
//! - `load_grayscale_image`: decode to RGB, then BT.601 luma for SSIM.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{GrayImage, ImageView, RgbImage};
use image::{DynamicImage, ImageBuffer, Rgb};
use log::info;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk, forcing three 8-bit channels.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    let image = RgbImage::new(width, height, img.into_raw())
        .map_err(|e| format!("Failed to load {}: {e}", path.display()))?;
    info!("loaded {} ({width}x{height})", path.display());
    Ok(image)
}

/// Load an image from disk and project it to luma with [`RgbImage::to_gray`],
/// the same projection applied to filter output before scoring.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImage, String> {
    load_rgb_image(path).map(|image| image.to_gray())
}

/// Save an RGB buffer; the encoder is picked from the file extension.
pub fn save_rgb_image(image: &RgbImage, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.as_raw().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageRgb8(buffer)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))?;
    info!("saved {}", path.display());
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
