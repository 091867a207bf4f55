//! Bounded worker pool
//!
//! Runs submitted futures with at most K bodies executing at once:
//! - Submission is non-blocking and never drops a task
//! - Queued tasks start in submission order (a FIFO queue feeds a single
//!   dispatcher, which takes a semaphore permit per task)
//! - Tasks complete in whatever order their own latency dictates
//! - A task that panics only fails its own handle

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Semaphore};

/// Errors reported through a [`TaskHandle`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("Task panicked")]
    TaskPanicked,

    #[error("Worker pool dispatcher is no longer running")]
    DispatcherClosed,
}

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Fixed-concurrency task pool
///
/// Cloning yields another handle to the same pool.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    queue: mpsc::UnboundedSender<Job>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl WorkerPool {
    /// Creates a pool running at most `concurrency` tasks at once
    ///
    /// Must be called from within a Tokio runtime: the dispatcher is spawned
    /// immediately. A concurrency of 0 is treated as 1.
    pub fn new(concurrency: usize) -> Self {
        let concurrency = concurrency.max(1);
        let semaphore = Arc::new(Semaphore::new(concurrency));
        let (queue, jobs) = mpsc::unbounded_channel();

        tokio::spawn(dispatch(jobs, Arc::clone(&semaphore)));

        Self {
            queue,
            semaphore,
            concurrency,
        }
    }

    /// Queues a task and returns a handle to its eventual result
    ///
    /// Returns immediately; the task starts once every earlier submission has
    /// started and a slot is free.
    pub fn submit<F, T>(&self, task: F) -> TaskHandle<T>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (done, result) = oneshot::channel();

        let job: Job = Box::pin(async move {
            let outcome = AssertUnwindSafe(task)
                .catch_unwind()
                .await
                .map_err(|_| PoolError::TaskPanicked);
            // The submitter may have stopped waiting
            let _ = done.send(outcome);
        });

        if self.queue.send(job).is_err() {
            tracing::error!("Worker pool dispatcher stopped; task dropped");
        }

        TaskHandle { result }
    }

    /// Maximum number of tasks running at once
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of tasks currently running
    pub fn in_flight(&self) -> usize {
        self.concurrency - self.semaphore.available_permits()
    }
}

/// Starts queued jobs one at a time as permits become available
async fn dispatch(mut jobs: mpsc::UnboundedReceiver<Job>, semaphore: Arc<Semaphore>) {
    while let Some(job) = jobs.recv().await {
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        tokio::spawn(async move {
            job.await;
            drop(permit);
        });
    }

    tracing::trace!("Worker pool dispatcher finished");
}

/// Eventual result of a submitted task
#[derive(Debug)]
pub struct TaskHandle<T> {
    result: oneshot::Receiver<Result<T, PoolError>>,
}

impl<T> Future for TaskHandle<T> {
    type Output = Result<T, PoolError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.result).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(PoolError::DispatcherClosed)),
            Poll::Pending => Poll::Pending,
        }
    }
}
