//! Post-filter quality checks. Independent of the engine.
pub mod ssim;

pub use ssim::{ssim, ssim_with_window, DEFAULT_WINDOW};
