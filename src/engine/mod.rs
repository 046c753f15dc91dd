//! Barrier-synchronized, double-buffered parallel stencil engine.
//!
//! A run copies the input into [`WorkingBuffers`], splits the rows into one
//! [`RowBand`] per thread and spawns that many scoped OS threads. Each worker
//! runs every pass over its own band, reading the plane written by the
//! previous pass and writing the other one, then waits on the shared
//! [`Barrier`]. Since bands are disjoint and reads never target the plane
//! being written, pixel writes need no lock, and the output does not depend
//! on the thread count.
//!
//! Threads live for exactly one run. A failed spawn or a panicking worker
//! breaks the barrier so the remaining workers drain out before the error is
//! returned.
mod buffers;
mod partition;
mod worker;

pub use buffers::WorkingBuffers;
pub use partition::{partition_rows, RowBand};

use crate::config::{FilterConfig, FilterKind};
use crate::diagnostics::TimingBreakdown;
use crate::error::FilterError;
use crate::image::{ImageView, RgbImage};
use crate::stencil::{Filter, StencilRule};
use crate::sync::{Barrier, CancelToken};
use buffers::SharedPlanes;
use log::{debug, info, warn};
use std::thread;
use std::time::Instant;
use worker::{run_worker, WorkerContext, WorkerStats};

/// Result of a run: the filtered image plus what happened along the way.
#[derive(Clone, Debug)]
pub struct FilterRun {
    pub image: RgbImage,
    pub bands: Vec<RowBand>,
    /// Pixels that fell back to their previous value because the
    /// neighborhood carried no weight.
    pub degenerate_pixels: usize,
    pub timing: TimingBreakdown,
}

#[derive(Clone, Debug)]
pub struct ParallelFilterEngine {
    config: FilterConfig,
    cancel: Option<CancelToken>,
}

impl ParallelFilterEngine {
    /// Validate `config` (promoting an even kernel size) and build an engine.
    pub fn new(config: FilterConfig) -> Result<Self, FilterError> {
        Ok(Self {
            config: config.validated()?,
            cancel: None,
        })
    }

    /// Poll `token` once per row; a fired token aborts the run with
    /// [`FilterError::Cancelled`] unless every row was already filtered.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Build the rule for `kind` from this engine's config.
    pub fn filter_for(&self, kind: FilterKind) -> Result<Filter, FilterError> {
        Filter::from_config(kind, &self.config)
    }

    pub fn run<R: StencilRule>(&self, input: &RgbImage, rule: &R) -> Result<RgbImage, FilterError> {
        self.run_detailed(input, rule).map(|run| run.image)
    }

    pub fn run_detailed<R: StencilRule>(
        &self,
        input: &RgbImage,
        rule: &R,
    ) -> Result<FilterRun, FilterError> {
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();
        let (width, height) = (input.width(), input.height());
        let FilterConfig {
            iterations,
            threads,
            ..
        } = self.config;

        let start = Instant::now();
        let mut buffers = WorkingBuffers::seeded(input)?;
        timing.push_since("allocate_seed", start);

        let bands = partition_rows(height, threads);
        if threads > height {
            warn!("{threads} threads for {height} rows; {} bands are empty", threads - 1);
        }
        debug!(
            "filtering {width}x{height}: {iterations} passes over {} bands",
            bands.len()
        );

        let start = Instant::now();
        let stats = {
            let planes = buffers.shared();
            self.execute(&planes, &bands, rule)
        }?;
        timing.push_since("passes", start);

        // A token fired after the last row was filtered leaves a complete image.
        if stats.iter().any(|s| s.skipped_rows) {
            return Err(FilterError::Cancelled);
        }

        let degenerate_pixels = stats.iter().map(|s| s.degenerate_pixels).sum();
        if degenerate_pixels > 0 {
            warn!("{degenerate_pixels} pixels had a zero weight sum and kept their value");
        }

        let image = buffers.into_output(iterations)?;
        timing.total_ms = crate::diagnostics::elapsed_ms(total_start);
        info!(
            "filtered {width}x{height} with {threads} threads, {iterations} passes in {:.2} ms",
            timing.total_ms
        );
        Ok(FilterRun {
            image,
            bands,
            degenerate_pixels,
            timing,
        })
    }

    fn execute<R: StencilRule>(
        &self,
        planes: &SharedPlanes<'_>,
        bands: &[RowBand],
        rule: &R,
    ) -> Result<Vec<WorkerStats>, FilterError> {
        let barrier = Barrier::new(bands.len());
        let ctx = WorkerContext {
            rule,
            planes,
            barrier: &barrier,
            cancel: self.cancel.as_ref(),
            iterations: self.config.iterations,
        };
        let ctx = &ctx;

        thread::scope(|s| {
            let mut handles = Vec::with_capacity(bands.len());
            let mut failure = None;
            for (index, &band) in bands.iter().enumerate() {
                let spawned = thread::Builder::new()
                    .name(format!("stencil-{index}"))
                    .spawn_scoped(s, move || run_worker(ctx, band));
                match spawned {
                    Ok(handle) => handles.push((index, handle)),
                    Err(source) => {
                        barrier.break_barrier();
                        failure = Some(FilterError::ThreadSpawn { index, source });
                        break;
                    }
                }
            }

            let mut stats = Vec::with_capacity(handles.len());
            for (index, handle) in handles {
                match handle.join() {
                    Ok(worker_stats) => {
                        debug!(
                            "worker {index}: rows {:?}, {} passes, {} rows filtered",
                            bands[index].rows(),
                            worker_stats.passes,
                            worker_stats.rows
                        );
                        stats.push(worker_stats);
                    }
                    Err(_) => {
                        failure.get_or_insert(FilterError::WorkerPanicked { index });
                    }
                }
            }
            match failure {
                Some(err) => Err(err),
                None => Ok(stats),
            }
        })
    }
}

/// Validate `config`, build the rule for `kind` and run it over `input`.
pub fn apply_filter(
    input: &RgbImage,
    kind: FilterKind,
    config: FilterConfig,
) -> Result<FilterRun, FilterError> {
    let engine = ParallelFilterEngine::new(config)?;
    let filter = engine.filter_for(kind)?;
    engine.run_detailed(input, &filter)
}
