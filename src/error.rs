//! Error taxonomy surfaced by every public entry point.
//!
//! The sync and async paths return the same [`Error`] values for the same
//! input. The codec's "insufficient output space" signal never appears here:
//! it is consumed by the invoker's grow-and-retry loop.

use crate::format::Format;

/// Errors returned by compression and decompression calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The caller-supplied level is not one of the accepted values (0, 1, 3).
    #[error("invalid compression level {level}: must be 0, 1, or 3")]
    InvalidLevel { level: i32 },

    /// Decompression received a malformed or truncated stream.
    #[error("corrupt {format} input: {reason}")]
    Corrupt { format: Format, reason: String },

    /// The output buffer would have to grow past `limit` bytes (or the
    /// allocator refused the request).
    #[error("output exceeds the {limit}-byte capacity limit")]
    CapacityExceeded { limit: usize },

    /// The worker queue is saturated; the async submission was rejected.
    #[error("worker queue is full")]
    QueueFull,

    /// The codec reported an unexpected failure.
    #[error("codec failure: {reason}")]
    InternalCodecFailure { reason: String },

    /// The worker pool has been shut down and no longer accepts work.
    #[error("worker pool has been shut down")]
    PoolShutdown,

    /// The worker holding a job went away without signalling completion.
    #[error("worker dropped the job before completing it")]
    WorkerLost,

    /// The process-wide runtime was already initialized.
    #[error("runtime already initialized")]
    AlreadyInitialized,

    /// A pool or growth-policy setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// `true` when re-issuing the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::QueueFull)
    }

    pub(crate) fn corrupt(format: Format, reason: impl Into<String>) -> Self {
        Error::Corrupt { format, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
