//! Fixed-size worker pool
//!
//! Runs short jobs (persisting counters, invoking user handlers) off the
//! transport and timer tasks. Jobs are boxed futures consumed by a fixed
//! number of worker tasks, so user callbacks can never occupy more than
//! `size` concurrent slots.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::warn;

type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Fixed-size pool of worker tasks.
pub struct WorkerPool {
    /// Guarded by a sync mutex: held only to clone/drop the sender.
    jobs: Mutex<Option<mpsc::UnboundedSender<Job>>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool with `size` workers (at least 1; the charge-point
    /// session requires 2).
    pub fn new(size: usize) -> Arc<Self> {
        let size = size.max(1);
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let rx = Arc::new(tokio::sync::Mutex::new(rx));

        let mut handles = Vec::with_capacity(size);
        for _ in 0..size {
            let rx = rx.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    // Lock only to receive; the job itself runs unlocked so
                    // workers drain the queue concurrently.
                    let job = { rx.lock().await.recv().await };
                    match job {
                        Some(job) => job.await,
                        None => break,
                    }
                }
            }));
        }

        Arc::new(Self {
            jobs: Mutex::new(Some(tx)),
            handles: Mutex::new(handles),
            size,
        })
    }

    /// Number of worker tasks.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Submit-and-forget. Returns `false` if the pool is shut down.
    pub fn spawn<F>(&self, fut: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sender = self.jobs.lock().unwrap().clone();
        match sender {
            Some(tx) => tx.send(Box::pin(fut)).is_ok(),
            None => false,
        }
    }

    /// Submit a job and obtain its result through a future.
    ///
    /// The receiver resolves to `Err` if the pool shuts down before the job
    /// runs to completion.
    pub fn submit<T, F>(&self, fut: F) -> oneshot::Receiver<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let accepted = self.spawn(async move {
            let result = fut.await;
            let _ = tx.send(result);
        });
        if !accepted {
            warn!("Worker pool is shut down; job rejected");
        }
        rx
    }

    /// Stop accepting jobs and wait (bounded) for in-flight jobs to finish.
    pub async fn shutdown(&self, drain_timeout: Duration) {
        // Closing the channel lets each worker finish its current job and exit
        self.jobs.lock().unwrap().take();

        let handles: Vec<_> = {
            let mut guard = self.handles.lock().unwrap();
            guard.drain(..).collect()
        };
        for handle in handles {
            if tokio::time::timeout(drain_timeout, handle).await.is_err() {
                warn!("Worker did not drain within {:?}", drain_timeout);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn runs_submitted_jobs() {
        let pool = WorkerPool::new(2);
        let rx = pool.submit(async { 21 * 2 });
        assert_eq!(rx.await.unwrap(), 42);
        pool.shutdown(Duration::from_secs(1)).await;
    }

    #[tokio::test]
    async fn fire_and_forget_jobs_execute() {
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..10 {
            let counter = counter.clone();
            assert!(pool.spawn(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        pool.shutdown(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn concurrency_is_bounded_by_size() {
        let pool = WorkerPool::new(2);
        let peak = Arc::new(AtomicUsize::new(0));
        let current = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let peak = peak.clone();
            let current = current.clone();
            pool.spawn(async move {
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            });
        }
        pool.shutdown(Duration::from_secs(2)).await;
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn rejects_after_shutdown() {
        let pool = WorkerPool::new(1);
        pool.shutdown(Duration::from_secs(1)).await;
        assert!(!pool.spawn(async {}));
    }
}
