//! Fixed-size worker pool for handler invocations.
//!
//! `size` tokio tasks drain one unbounded queue. Submissions never block and
//! are never rejected while the pool is open; the queue grows instead.
//! `stop` closes the queue, lets the workers finish everything already
//! submitted, and joins them.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use httpbench_core::error::{BenchError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;
type JobQueue = Arc<AsyncMutex<mpsc::UnboundedReceiver<Job>>>;

pub struct WorkerPool {
    size: usize,
    // `None` once stopped.
    tx: RwLock<Option<mpsc::UnboundedSender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawn `size` workers on the current tokio runtime.
    pub fn start(size: usize) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<Job>();
        let queue: JobQueue = Arc::new(AsyncMutex::new(rx));

        let workers = (0..size)
            .map(|id| tokio::spawn(worker_loop(id, Arc::clone(&queue))))
            .collect();

        tracing::info!(workers = size, "worker pool started");

        Self {
            size,
            tx: RwLock::new(Some(tx)),
            workers: Mutex::new(workers),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_closed(&self) -> bool {
        match self.tx.read() {
            Ok(g) => g.is_none(),
            Err(poisoned) => poisoned.into_inner().is_none(),
        }
    }

    /// Queue `task` and return a receiver for its output.
    ///
    /// The receiver errors if the task panicked.
    pub fn submit<F, T>(&self, task: F) -> Result<oneshot::Receiver<T>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (done_tx, done_rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            // The caller may have gone away; the work still counts.
            let _ = done_tx.send(task());
        });

        let guard = self
            .tx
            .read()
            .map_err(|_| BenchError::Internal("worker pool lock poisoned".into()))?;
        let tx = guard.as_ref().ok_or(BenchError::PoolClosed)?;
        tx.send(job).map_err(|_| BenchError::PoolClosed)?;
        Ok(done_rx)
    }

    /// Submit `task` and wait for its output.
    pub async fn run<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let rx = self.submit(task)?;
        rx.await
            .map_err(|_| BenchError::Internal("worker task panicked".into()))
    }

    /// Close the queue and wait for the workers to drain it.
    ///
    /// With a `timeout`, workers still busy when it elapses are aborted and
    /// `false` is returned. Calling `stop` again is a no-op.
    pub async fn stop(&self, timeout: Option<Duration>) -> bool {
        let tx = match self.tx.write() {
            Ok(mut g) => g.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if tx.is_none() {
            return true;
        }
        drop(tx);

        let mut handles = match self.workers.lock() {
            Ok(mut g) => std::mem::take(&mut *g),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };

        let drain = async {
            for h in handles.iter_mut() {
                let _ = h.await;
            }
        };
        let drained = match timeout {
            None => {
                drain.await;
                true
            }
            Some(limit) => tokio::time::timeout(limit, drain).await.is_ok(),
        };

        if drained {
            tracing::info!(workers = self.size, "worker pool drained");
        } else {
            for h in &handles {
                h.abort();
            }
            tracing::warn!(workers = self.size, "worker pool drain timed out; aborting workers");
        }
        drained
    }
}

async fn worker_loop(id: usize, queue: JobQueue) {
    loop {
        let job = { queue.lock().await.recv().await };
        let Some(job) = job else { break };

        if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
            tracing::error!(worker = id, panic = %panic_message(&*panic), "worker task panicked");
        }
    }
    tracing::debug!(worker = id, "worker exited");
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
