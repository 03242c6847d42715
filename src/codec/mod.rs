//! Boundary to the DEFLATE/GZIP/ZLIB primitives.
//!
//! A [`Codec`] fills a caller-provided, fixed-size output slice in one shot
//! and reports whether it finished, ran out of room, or hit bad input. Every
//! call is independent: a retry on a larger slice starts from scratch.

pub mod flate;

pub use flate::FlateCodec;

use crate::format::Format;
use crate::level::CompressionLevel;

/// Outcome of one codec call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecStatus {
    /// Finished; this many bytes of the output slice are valid.
    Done(usize),
    /// The output slice filled up before the stream was finished.
    InsufficientSpace,
    /// Malformed, truncated or wrongly framed input.
    Corrupt(String),
    /// Any other failure inside the codec.
    Failed(String),
}

/// One-shot compress/decompress primitives.
///
/// Implementations are shared by every worker thread, so they must not keep
/// per-call state in `self`.
pub trait Codec: Send + Sync + 'static {
    fn compress(
        &self,
        format: Format,
        level: CompressionLevel,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecStatus;

    fn decompress(&self, format: Format, input: &[u8], output: &mut [u8]) -> CodecStatus;
}
