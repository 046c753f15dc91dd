//! Synchronization primitives shared by the engine's workers.
pub mod barrier;
pub mod cancel;

pub use barrier::{Barrier, BarrierWait};
pub use cancel::CancelToken;
