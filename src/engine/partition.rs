use serde::Serialize;

/// Half-open row range `[start, end)` owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RowBand {
    pub start: usize,
    pub end: usize,
}

impl RowBand {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Split `[0, height)` into `threads` contiguous bands.
///
/// Every band gets `height / threads` rows and the last one absorbs the
/// remainder, so with more threads than rows all but the last band are empty.
pub fn partition_rows(height: usize, threads: usize) -> Vec<RowBand> {
    let threads = threads.max(1);
    let rows_per_thread = height / threads;
    (0..threads)
        .map(|i| {
            let start = i * rows_per_thread;
            let end = if i == threads - 1 {
                height
            } else {
                (i + 1) * rows_per_thread
            };
            RowBand { start, end }
        })
        .collect()
}
