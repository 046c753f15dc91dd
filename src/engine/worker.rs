//! Body of one engine worker: filter the owned band, then rendezvous.
use super::buffers::SharedPlanes;
use super::partition::RowBand;
use crate::image::{RgbView, CHANNELS};
use crate::stencil::StencilRule;
use crate::sync::{Barrier, CancelToken};
use std::thread;

pub(crate) struct WorkerContext<'a, R: StencilRule> {
    pub rule: &'a R,
    pub planes: &'a SharedPlanes<'a>,
    pub barrier: &'a Barrier,
    pub cancel: Option<&'a CancelToken>,
    pub iterations: usize,
}

impl<R: StencilRule> WorkerContext<'_, R> {
    #[inline]
    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancelToken::is_cancelled)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct WorkerStats {
    pub passes: usize,
    pub rows: usize,
    pub degenerate_pixels: usize,
    /// Set when cancellation left at least one band row unfiltered.
    pub skipped_rows: bool,
}

/// Breaks the barrier if the worker unwinds, so peers are not left waiting.
struct BreakOnPanic<'a>(&'a Barrier);

impl Drop for BreakOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            self.0.break_barrier();
        }
    }
}

pub(crate) fn run_worker<R: StencilRule>(ctx: &WorkerContext<'_, R>, band: RowBand) -> WorkerStats {
    let _guard = BreakOnPanic(ctx.barrier);
    let mut stats = WorkerStats::default();

    for pass in 0..ctx.iterations {
        // A cancelled worker still attends every barrier below.
        if ctx.is_cancelled() {
            stats.skipped_rows |= !band.is_empty();
        } else {
            // SAFETY: bands are disjoint, the read and write planes differ
            // within a pass, and both slices die before the barrier.
            let (src, dst) = unsafe { (ctx.planes.source(pass), ctx.planes.band_mut(pass, band)) };
            filter_band(ctx, src, dst, band, &mut stats);
        }
        if ctx.barrier.wait().is_broken() {
            break;
        }
        stats.passes += 1;
    }
    stats
}

fn filter_band<R: StencilRule>(
    ctx: &WorkerContext<'_, R>,
    src: RgbView<'_>,
    dst: &mut [u8],
    band: RowBand,
    stats: &mut WorkerStats,
) {
    let row_len = src.w * CHANNELS;
    for (y, out_row) in band.rows().zip(dst.chunks_exact_mut(row_len)) {
        if ctx.is_cancelled() {
            stats.skipped_rows = true;
            return;
        }
        for (x, out_px) in out_row.chunks_exact_mut(CHANNELS).enumerate() {
            let rgb = match ctx.rule.evaluate(src, x, y) {
                Ok(rgb) => rgb,
                Err(_) => {
                    stats.degenerate_pixels += 1;
                    src.pixel(x, y)
                }
            };
            out_px.copy_from_slice(&rgb);
        }
        stats.rows += 1;
    }
}
