use std::io::Write as _;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::{
    foundation::core::FrameIndex,
    foundation::error::{BlockturnError, BlockturnResult},
    render::canvas::{FrameArtifact, FrameCanvas},
};

/// Result of one job, tagged with the frame it belongs to.
#[derive(Debug)]
pub struct JobOutcome {
    pub index: FrameIndex,
    pub result: BlockturnResult<FrameArtifact>,
}

/// Runs a batch of frame jobs.
///
/// Per-job failures come back inside [`JobOutcome`]; the outer error is reserved for the
/// dispatcher itself being unable to run.
pub trait Dispatcher {
    fn dispatch_all(
        &self,
        jobs: &[FrameCanvas],
        observer: &dyn ProgressObserver,
    ) -> BlockturnResult<Vec<JobOutcome>>;
}

/// Progress callbacks. `frame_done` may be called from worker threads in any order.
pub trait ProgressObserver: Send + Sync {
    fn start(&self, total: usize);
    fn frame_done(&self, index: FrameIndex, completed: usize, total: usize);
    fn finish(&self);
}

/// Ignores all progress.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn start(&self, _total: usize) {}
    fn frame_done(&self, _index: FrameIndex, _completed: usize, _total: usize) {}
    fn finish(&self) {}
}

/// Emits a `tracing` event at every tenth of the batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl LogObserver {
    /// Percentage to report when `completed` crosses into a new tenth of `total`, or completes it.
    pub fn milestone(completed: usize, total: usize) -> Option<usize> {
        if total == 0 || completed == 0 {
            return None;
        }
        let crossed = completed * 10 / total > (completed - 1) * 10 / total;
        (crossed || completed == total).then(|| completed.min(total) * 100 / total)
    }
}

impl ProgressObserver for LogObserver {
    fn start(&self, total: usize) {
        tracing::info!(total, "rendering frames");
    }

    fn frame_done(&self, index: FrameIndex, completed: usize, total: usize) {
        if let Some(percent) = LogObserver::milestone(completed, total) {
            tracing::info!(completed, total, last = index.0, "{percent}% rendered");
        }
    }

    fn finish(&self) {
        tracing::debug!("rendering finished");
    }
}

/// Single-line progress bar on stderr.
#[derive(Clone, Copy, Debug)]
pub struct ProgressBarObserver {
    pub width: usize,
}

impl Default for ProgressBarObserver {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ProgressBarObserver {
    fn line(&self, completed: usize, total: usize) -> String {
        let filled = if total == 0 {
            self.width
        } else {
            (self.width * completed / total).min(self.width)
        };
        format!(
            "\r[{}{}] {completed}/{total}",
            "#".repeat(filled),
            " ".repeat(self.width - filled)
        )
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn start(&self, total: usize) {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "{}", self.line(0, total));
        let _ = err.flush();
    }

    fn frame_done(&self, _index: FrameIndex, completed: usize, total: usize) {
        let mut err = std::io::stderr().lock();
        let _ = write!(err, "{}", self.line(completed, total));
        let _ = err.flush();
    }

    fn finish(&self) {
        let _ = writeln!(std::io::stderr());
    }
}

/// Runs jobs in index order on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialDispatcher;

impl Dispatcher for SerialDispatcher {
    fn dispatch_all(
        &self,
        jobs: &[FrameCanvas],
        observer: &dyn ProgressObserver,
    ) -> BlockturnResult<Vec<JobOutcome>> {
        let total = jobs.len();
        observer.start(total);
        let outcomes = jobs
            .iter()
            .enumerate()
            .map(|(i, job)| {
                let result = job.execute();
                observer.frame_done(job.index, i + 1, total);
                JobOutcome {
                    index: job.index,
                    result,
                }
            })
            .collect();
        observer.finish();
        Ok(outcomes)
    }
}

/// Runs jobs on a dedicated rayon pool built per batch.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayonDispatcher {
    /// Worker count; `None` lets rayon pick.
    pub threads: Option<usize>,
}

impl Dispatcher for RayonDispatcher {
    #[tracing::instrument(skip_all, fields(jobs = jobs.len(), threads = ?self.threads))]
    fn dispatch_all(
        &self,
        jobs: &[FrameCanvas],
        observer: &dyn ProgressObserver,
    ) -> BlockturnResult<Vec<JobOutcome>> {
        let pool = build_thread_pool(self.threads)?;
        let total = jobs.len();
        let completed = AtomicUsize::new(0);

        observer.start(total);
        let outcomes = pool.install(|| {
            jobs.par_iter()
                .map(|job| {
                    let result = job.execute();
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    observer.frame_done(job.index, done, total);
                    JobOutcome {
                        index: job.index,
                        result,
                    }
                })
                .collect::<Vec<_>>()
        });
        observer.finish();
        Ok(outcomes)
    }
}

/// How frames are dispatched.
#[derive(Clone, Copy, Debug)]
pub struct RenderThreading {
    pub parallel: bool,
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

impl RenderThreading {
    /// Build the dispatcher these settings describe. A thread count of zero is rejected here, even
    /// for serial runs.
    pub fn dispatcher(&self) -> BlockturnResult<Box<dyn Dispatcher>> {
        if self.threads == Some(0) {
            return Err(BlockturnError::validation(
                "render threading 'threads' must be >= 1 when set",
            ));
        }
        if self.parallel {
            Ok(Box::new(RayonDispatcher {
                threads: self.threads,
            }))
        } else {
            Ok(Box::new(SerialDispatcher))
        }
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> BlockturnResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(BlockturnError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("blockturn-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        BlockturnError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/dispatch.rs"]
mod tests;
