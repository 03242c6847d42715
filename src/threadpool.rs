//! Fixed-size worker pool with a bounded, fail-fast submission queue.
//!
//! Jobs run on a `rayon::ThreadPool`. Admission is controlled by a
//! `crossbeam_channel::bounded` channel pre-filled with one token per slot
//! (`nb_threads + queue_size` slots): a submitter takes a token with
//! `try_recv`, and the worker hands it back when the job ends. When no token
//! is available the submission is rejected with [`Error::QueueFull`] instead
//! of blocking the caller.
//!
//! The token channel and the pending counter are the only state shared
//! between submitters and workers.

use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use rayon::ThreadPool as RayonPool;
use tracing::{debug, error, warn};

use crate::error::{Error, Result};

type JobFn = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    pending: usize, // submitted and not yet finished
}

/// Returns a job's slot and decrements the pending count when dropped, so a
/// panicking job still frees its slot.
struct SlotRelease {
    state: Arc<(Mutex<PoolState>, Condvar)>,
    slot_tx: Sender<()>,
}

impl Drop for SlotRelease {
    fn drop(&mut self) {
        let (lock, cvar) = &*self.state;
        let mut s = lock.lock().unwrap_or_else(PoisonError::into_inner);
        s.pending -= 1;
        if s.pending == 0 {
            cvar.notify_all();
        }
        let _ = self.slot_tx.try_send(());
    }
}

/// Worker pool handle.
///
/// Dropping the pool waits for every in-flight job before the worker
/// threads are released.
pub struct WorkerPool {
    /// `None` once [`WorkerPool::shutdown`] has run.
    pool: Mutex<Option<RayonPool>>,
    slot_tx: Sender<()>,
    slot_rx: Receiver<()>,
    state: Arc<(Mutex<PoolState>, Condvar)>,
    nb_threads: usize,
    queue_size: usize,
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("nb_threads", &self.nb_threads)
            .field("queue_size", &self.queue_size)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl WorkerPool {
    /// Both `nb_threads` and `queue_size` must be at least 1.
    pub fn new(nb_threads: usize, queue_size: usize) -> Result<Self> {
        if nb_threads < 1 || queue_size < 1 {
            return Err(Error::InvalidConfig(format!(
                "worker pool needs at least one thread and one queue slot \
                 (got {nb_threads} threads, {queue_size} slots)"
            )));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(nb_threads)
            .thread_name(|i| format!("deflate-worker-{i}"))
            .panic_handler(|_| error!("worker job panicked"))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot start worker threads: {e}")))?;

        let capacity = queue_size + nb_threads;
        let (slot_tx, slot_rx) = bounded(capacity);
        for _ in 0..capacity {
            slot_tx
                .try_send(())
                .map_err(|_| Error::InvalidConfig("slot channel rejected a token".into()))?;
        }

        debug!(nb_threads, queue_size, "worker pool started");
        Ok(WorkerPool {
            pool: Mutex::new(Some(pool)),
            slot_tx,
            slot_rx,
            state: Arc::new((Mutex::new(PoolState { pending: 0 }), Condvar::new())),
            nb_threads,
            queue_size,
        })
    }

    pub fn nb_threads(&self) -> usize {
        self.nb_threads
    }

    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    /// Queues `job` without blocking.
    ///
    /// Fails with [`Error::QueueFull`] when every slot is taken and with
    /// [`Error::PoolShutdown`] after [`WorkerPool::shutdown`].
    pub fn try_submit(&self, job: JobFn) -> Result<()> {
        let guard = self.pool.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pool) = guard.as_ref() else {
            return Err(Error::PoolShutdown);
        };

        match self.slot_rx.try_recv() {
            Ok(()) => {}
            Err(TryRecvError::Empty) => {
                warn!(
                    nb_threads = self.nb_threads,
                    queue_size = self.queue_size,
                    "worker queue saturated, rejecting job"
                );
                return Err(Error::QueueFull);
            }
            Err(TryRecvError::Disconnected) => return Err(Error::PoolShutdown),
        }

        // Counted before spawning so `jobs_completed` never sees zero while
        // this job is queued.
        {
            let (lock, _cvar) = &*self.state;
            lock.lock().unwrap_or_else(PoisonError::into_inner).pending += 1;
        }

        let release = SlotRelease { state: Arc::clone(&self.state), slot_tx: self.slot_tx.clone() };
        pool.spawn(move || {
            let _release = release;
            job();
        });
        Ok(())
    }

    /// Jobs submitted and not yet finished.
    pub fn in_flight(&self) -> usize {
        let (lock, _cvar) = &*self.state;
        lock.lock().unwrap_or_else(PoisonError::into_inner).pending
    }

    /// Blocks until no job is in flight. The pool stays usable.
    pub fn jobs_completed(&self) {
        let (lock, cvar) = &*self.state;
        let mut s = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while s.pending > 0 {
            s = cvar.wait(s).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// `true` once [`WorkerPool::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.pool.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    /// Stops accepting jobs, waits for the in-flight ones, then releases the
    /// worker threads. Idempotent.
    pub fn shutdown(&self) {
        let pool = self.pool.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(pool) = pool {
            self.jobs_completed();
            drop(pool);
            debug!(nb_threads = self.nb_threads, "worker pool shut down");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
