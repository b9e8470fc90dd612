//! Client-owned worker pool
//!
//! A fixed set of threads drives one shared `smol` executor. Process waits
//! and output draining run here so the public operations can hand back task
//! handles immediately. Shutdown consumes the pool, waits a bounded time for
//! in-flight tasks to finish, and reports a fatal error if the bound elapses.

use crate::error::{Error, Result};
use smol::Executor;
use std::future::Future;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, warn};

/// A fixed-size pool of worker threads driving an async executor
pub struct WorkerPool {
    executor: Arc<Executor<'static>>,
    inflight: Arc<Inflight>,
    /// Closing this channel releases the worker threads
    stop: async_channel::Sender<()>,
    workers: Vec<JoinHandle<()>>,
}

/// In-flight task accounting shared with the spawned task guards
struct Inflight {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Inflight {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn increment(&self) {
        *self.lock() += 1;
    }

    fn decrement(&self) {
        let mut count = self.lock();
        *count -= 1;
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Decrements the in-flight count when its task completes or is cancelled
struct InflightGuard(Arc<Inflight>);

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

impl WorkerPool {
    /// Start a pool with the given number of worker threads (at least one)
    pub fn new(threads: usize) -> Result<Self> {
        let threads = threads.max(1);
        let executor = Arc::new(Executor::new());
        let inflight = Arc::new(Inflight {
            count: Mutex::new(0),
            idle: Condvar::new(),
        });
        let (stop, stop_rx) = async_channel::bounded::<()>(1);

        let mut workers = Vec::with_capacity(threads);
        for i in 0..threads {
            let executor = Arc::clone(&executor);
            let stop_rx = stop_rx.clone();
            let worker = std::thread::Builder::new()
                .name(format!("terraform-worker-{i}"))
                .spawn(move || {
                    // Runs tasks until every stop sender is dropped.
                    smol::block_on(executor.run(async move {
                        let _ = stop_rx.recv().await;
                    }));
                })?;
            workers.push(worker);
        }

        debug!(threads, "worker pool started");
        Ok(Self {
            executor,
            inflight,
            stop,
            workers,
        })
    }

    /// Start a pool sized to the machine's available parallelism
    pub fn with_default_size() -> Result<Self> {
        let threads = std::thread::available_parallelism().map_or(1, usize::from);
        Self::new(threads)
    }

    /// Spawn a future onto the pool, returning a handle to await or drop
    ///
    /// Dropping the returned task cancels the future at its next suspension
    /// point.
    pub fn spawn<T, F>(&self, future: F) -> smol::Task<T>
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        self.inflight.increment();
        let guard = InflightGuard(Arc::clone(&self.inflight));
        self.executor.spawn(async move {
            let _guard = guard;
            future.await
        })
    }

    /// Number of tasks spawned but not yet finished
    pub fn inflight(&self) -> usize {
        *self.inflight.lock()
    }

    /// Shut the pool down, waiting up to `timeout` for in-flight tasks
    ///
    /// Consuming the pool stops new work by construction. If in-flight tasks
    /// do not finish within the bound the pool returns [`Error::Shutdown`]
    /// and abandons its worker threads.
    pub fn shutdown(self, timeout: Duration) -> Result<()> {
        let count = self.inflight.lock();
        let (count, wait) = self
            .inflight
            .idle
            .wait_timeout_while(count, timeout, |count| *count > 0)
            .unwrap_or_else(|e| e.into_inner());
        if wait.timed_out() && *count > 0 {
            warn!(inflight = *count, ?timeout, "worker pool shutdown timed out");
            return Err(Error::Shutdown { timeout });
        }
        drop(count);

        // No in-flight work remains; release and join the workers.
        drop(self.stop);
        for worker in self.workers {
            let _ = worker.join();
        }
        debug!("worker pool stopped");
        Ok(())
    }
}
