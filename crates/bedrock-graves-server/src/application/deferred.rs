//! Tick-drained deferred task queue.
//!
//! Connection threads and other producers hand work to the tick thread by
//! submitting a task; the tick loop calls [`TaskQueue::drain`] once per tick.
//! A task receives the queue so it can resubmit itself, which is how
//! multi-tick delays are built (see [`TaskQueue::submit_after`]).

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use tracing::error;

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce(&TaskQueue) -> anyhow::Result<()> + Send>;

/// Thread-safe FIFO of tasks drained on the tick thread.
#[derive(Default)]
pub struct TaskQueue {
    tasks: Mutex<VecDeque<Task>>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `task` to run on the next drain.  Callable from any thread.
    pub fn submit<F>(&self, task: F)
    where
        F: FnOnce(&TaskQueue) -> anyhow::Result<()> + Send + 'static,
    {
        self.lock().push_back(Box::new(task));
    }

    /// Enqueues `task` to run `ticks` drains from now.  `0` and `1` both mean
    /// the next drain.
    pub fn submit_after<F>(&self, ticks: u64, task: F)
    where
        F: FnOnce(&TaskQueue) -> anyhow::Result<()> + Send + 'static,
    {
        if ticks <= 1 {
            self.submit(task);
        } else {
            self.submit(move |queue: &TaskQueue| {
                queue.submit_after(ticks - 1, task);
                Ok(())
            });
        }
    }

    /// Runs every task queued before this call, in submission order.
    ///
    /// Tasks submitted while draining wait for the next drain.  A failing
    /// task is logged and does not stop the others.  Returns the number of
    /// tasks run.
    pub fn drain(&self) -> usize {
        let batch = std::mem::take(&mut *self.lock());
        let count = batch.len();
        for task in batch {
            if let Err(e) = task(self) {
                error!("deferred task failed: {e:#}");
            }
        }
        count
    }

    /// Number of tasks waiting for the next drain.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.len())
            .finish()
    }
}
