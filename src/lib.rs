#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod engine;
pub mod error;
pub mod image;
pub mod stencil;

// Building blocks, public for tools and tests.
pub mod diagnostics;
pub mod kernel;
pub mod quality;
pub mod sync;

// --- High-level re-exports -------------------------------------------------

pub use crate::config::{FilterConfig, FilterKind};
pub use crate::engine::{apply_filter, FilterRun, ParallelFilterEngine};
pub use crate::error::FilterError;
pub use crate::image::RgbImage;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use stencil_filter::prelude::*;
///
/// # fn main() -> Result<(), FilterError> {
/// let image = RgbImage::filled(640, 480, [128, 64, 32])?;
/// let config = FilterConfig::default()
///     .with_kernel_size(7)
///     .with_sigma(1.5)
///     .with_iterations(3)
///     .with_threads(4);
/// let run = apply_filter(&image, FilterKind::Gaussian, config)?;
/// println!("filtered in {:.3} ms", run.timing.total_ms);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageView, RgbImage};
    pub use crate::stencil::{DiffusionRule, Filter, GaussianRule, GradientMode, StencilRule};
    pub use crate::{apply_filter, FilterConfig, FilterError, FilterKind, ParallelFilterEngine};
}
