//! Dispatch layer: runs the codec invoker inline (sync) or on the worker
//! pool (async).
//!
//! Both paths go through [`invoke`] with the same codec and growth policy,
//! so they produce identical bytes and identical errors for the same input.
//!
//! An async submission builds a [`WorkUnit`] that owns a snapshot of the
//! input, enqueues it without blocking, and returns a [`Completion`] future
//! at once. The unit is consumed by exactly one worker, which resolves the
//! future with the result. Completion order across submissions is not
//! guaranteed.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::FusedFuture;
use tracing::{error, trace};

use crate::api::CompressOptions;
use crate::codec::{Codec, FlateCodec};
use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::format::{Format, Operation};
use crate::growth::GrowthPolicy;
use crate::invoker::invoke;
use crate::level::map_level;
use crate::threadpool::WorkerPool;

/// One async job: an owned input snapshot, the operation, and the handle
/// that resolves the caller's [`Completion`].
struct WorkUnit {
    input: Vec<u8>,
    op: Operation,
    done: oneshot::Sender<Result<Vec<u8>>>,
}

impl WorkUnit {
    fn run<C: Codec + ?Sized>(self, codec: &C, policy: &GrowthPolicy) {
        let WorkUnit { input, op, done } = self;
        let result = guarded_invoke(codec, policy, &op, &input);
        // The caller may have dropped its Completion; nothing to report then.
        let _ = done.send(result);
    }
}

/// [`invoke`] with a codec panic turned into
/// [`Error::InternalCodecFailure`], so inline and pooled calls fail alike.
fn guarded_invoke<C: Codec + ?Sized>(
    codec: &C,
    policy: &GrowthPolicy,
    op: &Operation,
    input: &[u8],
) -> Result<Vec<u8>> {
    catch_unwind(AssertUnwindSafe(|| invoke(codec, policy, op, input))).unwrap_or_else(|_| {
        error!(kind = ?op.kind, format = %op.format, "codec panicked");
        Err(Error::InternalCodecFailure { reason: "codec panicked".into() })
    })
}

enum CompletionState {
    Ready(Option<Result<Vec<u8>>>),
    Pending(oneshot::Receiver<Result<Vec<u8>>>),
    Done,
}

/// Future resolved with the result of an async call.
///
/// Errors detected before enqueueing (invalid level, full queue, shut-down
/// pool) resolve it immediately.
#[must_use = "a Completion does nothing unless polled or waited on"]
pub struct Completion {
    state: CompletionState,
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            CompletionState::Ready(_) => "ready",
            CompletionState::Pending(_) => "pending",
            CompletionState::Done => "done",
        };
        f.debug_struct("Completion").field("state", &state).finish()
    }
}

impl Completion {
    fn ready(result: Result<Vec<u8>>) -> Self {
        Completion { state: CompletionState::Ready(Some(result)) }
    }

    pub(crate) fn failed(error: Error) -> Self {
        Completion::ready(Err(error))
    }

    fn pending(rx: oneshot::Receiver<Result<Vec<u8>>>) -> Self {
        Completion { state: CompletionState::Pending(rx) }
    }

    /// Blocks the current thread until the result is available.
    pub fn wait(self) -> Result<Vec<u8>> {
        futures::executor::block_on(self)
    }
}

impl Future for Completion {
    type Output = Result<Vec<u8>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = match &mut self.state {
            CompletionState::Ready(result) => result.take().unwrap_or(Err(Error::WorkerLost)),
            CompletionState::Pending(rx) => match Pin::new(rx).poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Ok(result)) => result,
                Poll::Ready(Err(oneshot::Canceled)) => Err(Error::WorkerLost),
            },
            CompletionState::Done => Err(Error::WorkerLost),
        };
        self.state = CompletionState::Done;
        Poll::Ready(result)
    }
}

impl FusedFuture for Completion {
    fn is_terminated(&self) -> bool {
        matches!(self.state, CompletionState::Done)
    }
}

/// Scheduler for compress/decompress calls over one codec.
#[derive(Debug)]
pub struct Dispatcher<C: Codec = FlateCodec> {
    codec: Arc<C>,
    policy: GrowthPolicy,
    pool: WorkerPool,
}

impl Dispatcher<FlateCodec> {
    /// Dispatcher over [`FlateCodec`].
    pub fn with_config(config: &PoolConfig) -> Result<Self> {
        Dispatcher::new(FlateCodec::new(), config)
    }
}

impl<C: Codec> Dispatcher<C> {
    pub fn new(codec: C, config: &PoolConfig) -> Result<Self> {
        config.validate()?;
        let pool = WorkerPool::new(config.resolved_workers(), config.queue_size)?;
        Ok(Dispatcher { codec: Arc::new(codec), policy: config.growth, pool })
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Runs `op` on the calling thread.
    pub fn run(&self, op: Operation, input: &[u8]) -> Result<Vec<u8>> {
        trace!(kind = ?op.kind, format = %op.format, input_len = input.len(), "sync dispatch");
        guarded_invoke(self.codec.as_ref(), &self.policy, &op, input)
    }

    /// Queues `op` over a private copy of `input`. The caller may reuse or
    /// mutate `input` as soon as this returns.
    pub fn submit(&self, op: Operation, input: &[u8]) -> Completion {
        self.submit_owned(op, input.to_vec())
    }

    /// Queues `op`, taking ownership of `input`.
    pub fn submit_owned(&self, op: Operation, input: Vec<u8>) -> Completion {
        let (done, rx) = oneshot::channel();
        let input_len = input.len();
        let unit = WorkUnit { input, op, done };
        let codec = Arc::clone(&self.codec);
        let policy = self.policy;

        match self.pool.try_submit(Box::new(move || unit.run(codec.as_ref(), &policy))) {
            Ok(()) => {
                trace!(kind = ?op.kind, format = %op.format, input_len, "async dispatch");
                Completion::pending(rx)
            }
            Err(e) => Completion::failed(e),
        }
    }

    pub fn compress(&self, format: Format, input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
        let level = map_level(options.level)?;
        self.run(Operation::compress(format, level), input)
    }

    pub fn decompress(&self, format: Format, input: &[u8]) -> Result<Vec<u8>> {
        self.run(Operation::decompress(format), input)
    }

    pub fn compress_async(&self, format: Format, input: &[u8], options: CompressOptions) -> Completion {
        match map_level(options.level) {
            Ok(level) => self.submit(Operation::compress(format, level), input),
            Err(e) => Completion::failed(e),
        }
    }

    pub fn decompress_async(&self, format: Format, input: &[u8]) -> Completion {
        self.submit(Operation::decompress(format), input)
    }

    /// Blocks until every queued job has finished.
    pub fn drain(&self) {
        self.pool.jobs_completed();
    }

    /// Refuses further async work, drains the queue and releases the worker
    /// threads. Sync calls keep working.
    pub fn shutdown(&self) {
        self.pool.shutdown();
    }
}
