use std::ops::Range;

use thiserror::Error;

/// Number of processing units held back from [`ExecutionStrategy::Auto`] for I/O and orchestration.
pub const RESERVED_THREADS: usize = 1;

/// Largest number of bands, and of worker threads, a single call may request.
pub const MAX_THREADS: usize = 4096;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be in 1..={max}, got {0}", max = MAX_THREADS)]
    InvalidThreadCount(usize),

    /// The row stride must be valid.
    #[error("row stride must be > 0")]
    InvalidRowStride(usize),

    /// The bands do not cover the destination buffer exactly.
    #[error("bands cover {0} samples but the destination holds {1}")]
    BandMismatch(usize, usize),
}

/// Controls how band-parallel operations are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Split the work into one band per available processing unit, minus
    /// [`RESERVED_THREADS`], and run the bands on the global Rayon thread pool.
    #[default]
    Auto,

    /// Run a single band sequentially on the current thread.
    ///
    /// Useful for small images, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Split the work into `n` bands and run them on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Degree of parallelism, i.e. the number of bands the work is split into.
    ///
    /// # Errors
    ///
    /// Returns [`ParallelError::InvalidThreadCount`] for `Fixed(n)` with `n` outside
    /// `1..=MAX_THREADS`.
    pub fn num_threads(&self) -> Result<usize, ParallelError> {
        match *self {
            ExecutionStrategy::Auto => Ok(num_cpus::get()
                .saturating_sub(RESERVED_THREADS)
                .clamp(1, MAX_THREADS)),
            ExecutionStrategy::Serial => Ok(1),
            ExecutionStrategy::Fixed(n) => check_thread_count(n),
        }
    }
}

/// A contiguous, half-open range of rows owned by a single worker.
///
/// Bands are only created by [`partition`], which guarantees that the bands of one
/// partition are ordered, disjoint and cover every row exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    start_row: usize,
    num_rows: usize,
}

impl Band {
    /// First row of the band.
    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Number of rows in the band. May be zero.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// One past the last row of the band.
    pub fn end_row(&self) -> usize {
        self.start_row + self.num_rows
    }

    /// Whether the band has no rows to process.
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// The rows of the band as a range.
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.end_row()
    }
}

fn check_thread_count(thread_count: usize) -> Result<usize, ParallelError> {
    if thread_count == 0 || thread_count > MAX_THREADS {
        return Err(ParallelError::InvalidThreadCount(thread_count));
    }
    Ok(thread_count)
}

/// Divide `total_rows` rows into `thread_count` contiguous bands.
///
/// Every band but the last gets `total_rows / thread_count` rows and the last band
/// also absorbs the remainder. When `thread_count > total_rows` the leading bands are
/// empty, which callers must treat as no work.
///
/// # Arguments
///
/// * `total_rows` - The number of rows to divide.
/// * `thread_count` - The number of bands to produce.
///
/// # Errors
///
/// Returns [`ParallelError::InvalidThreadCount`] if `thread_count` is zero or larger
/// than [`MAX_THREADS`].
///
/// # Examples
///
/// ```
/// use bandconv_imgproc::parallel::partition;
///
/// let bands = partition(10, 3).unwrap();
/// let rows = bands.iter().map(|b| b.rows()).collect::<Vec<_>>();
/// assert_eq!(rows, vec![0..3, 3..6, 6..10]);
/// ```
pub fn partition(total_rows: usize, thread_count: usize) -> Result<Vec<Band>, ParallelError> {
    check_thread_count(thread_count)?;

    let base = total_rows / thread_count;
    let remainder = total_rows % thread_count;

    let bands = (0..thread_count)
        .map(|i| Band {
            start_row: i * base,
            num_rows: if i == thread_count - 1 {
                base + remainder
            } else {
                base
            },
        })
        .collect();

    Ok(bands)
}

/// Run `op` once per band, handing each call the band's disjoint slice of `dst`.
///
/// `dst` is split into one mutable sub-slice per band before any work starts, so
/// workers never share output memory. All bands are joined before returning. Empty
/// bands are skipped. A failing band does not stop the others; the first error in
/// band order is returned once every band has finished.
///
/// # Arguments
///
/// * `dst` - The destination buffer, `row_stride` samples per row.
/// * `row_stride` - The number of samples in a row.
/// * `bands` - The bands as produced by [`partition`].
/// * `strategy` - Where the bands are run.
/// * `op` - The per-band operation.
pub fn par_iter_bands<T, E, F>(
    dst: &mut [T],
    row_stride: usize,
    bands: &[Band],
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), E>
where
    T: Send,
    E: From<ParallelError> + Send,
    F: Fn(Band, &mut [T]) -> Result<(), E> + Sync,
{
    if row_stride == 0 {
        return Err(ParallelError::InvalidRowStride(row_stride).into());
    }

    let covered = bands.iter().map(|b| b.num_rows() * row_stride).sum::<usize>();
    if covered != dst.len() {
        return Err(ParallelError::BandMismatch(covered, dst.len()).into());
    }

    // carve the output into one disjoint slice per band
    let mut jobs = Vec::with_capacity(bands.len());
    let mut rest = dst;
    for band in bands {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(band.num_rows() * row_stride);
        jobs.push((*band, head));
        rest = tail;
    }

    let mut results = Vec::with_capacity(bands.len());
    results.resize_with(bands.len(), || Ok(()));

    let run = |(band, chunk): (Band, &mut [T]), result: &mut Result<(), E>| {
        if band.is_empty() {
            return;
        }
        log::debug!(
            "processing band rows {}..{} ({} rows)",
            band.start_row(),
            band.end_row(),
            band.num_rows()
        );
        *result = op(band, chunk);
    };

    match strategy {
        ExecutionStrategy::Serial => {
            jobs.into_iter()
                .zip(results.iter_mut())
                .for_each(|(job, result)| run(job, result));
        }
        ExecutionStrategy::Auto => {
            let run = &run;
            rayon::scope(|s| {
                for (job, result) in jobs.into_iter().zip(results.iter_mut()) {
                    s.spawn(move |_| run(job, result));
                }
            });
        }
        ExecutionStrategy::Fixed(n) => {
            check_thread_count(n)?;
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .thread_name(|i| format!("bandconv-worker-{i}"))
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            let run = &run;
            pool.scope(|s| {
                for (job, result) in jobs.into_iter().zip(results.iter_mut()) {
                    s.spawn(move |_| run(job, result));
                }
            });
        }
    }

    results.into_iter().collect()
}
