//! Codec invoker: runs one [`Operation`] to completion against a [`Codec`],
//! growing the output buffer until the result fits.
//!
//! The loop is strictly sequential within one call:
//!
//! 1. allocate an [`OutputBuffer`] of [`GrowthPolicy::initial_capacity`];
//! 2. hand the codec the whole input and the whole buffer;
//! 3. on [`CodecStatus::InsufficientSpace`], grow and go back to 2;
//! 4. on success, truncate to the produced length and return it.
//!
//! Corrupt input and codec failures end the call immediately. Growth ends
//! with [`Error::CapacityExceeded`] once `max_capacity` has been tried.

use tracing::trace;

use crate::codec::{Codec, CodecStatus};
use crate::error::{Error, Result};
use crate::format::{OpKind, Operation};
use crate::growth::GrowthPolicy;

/// Scratch output owned by a single operation.
///
/// The written prefix survives growth; only the truncated result ever
/// leaves the invoker.
#[derive(Debug)]
pub struct OutputBuffer {
    buf: Vec<u8>,
    limit: usize,
}

impl OutputBuffer {
    /// Zero-filled buffer of exactly `capacity` bytes. `limit` is the
    /// policy's `max_capacity`, reported if the allocator refuses.
    pub fn with_capacity(capacity: usize, limit: usize) -> Result<Self> {
        let mut out = OutputBuffer { buf: Vec::new(), limit };
        out.resize(capacity)?;
        Ok(out)
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Grows to `capacity` bytes, keeping the current contents.
    pub fn grow_to(&mut self, capacity: usize) -> Result<()> {
        debug_assert!(capacity >= self.buf.len());
        self.resize(capacity)
    }

    fn resize(&mut self, capacity: usize) -> Result<()> {
        let extra = capacity.saturating_sub(self.buf.len());
        self.buf
            .try_reserve_exact(extra)
            .map_err(|_| Error::CapacityExceeded { limit: self.limit })?;
        self.buf.resize(capacity, 0);
        Ok(())
    }

    pub fn writable(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Hands out the first `len` bytes as an independent buffer; spare
    /// capacity is released.
    pub fn into_truncated(mut self, len: usize) -> Vec<u8> {
        self.buf.truncate(len);
        self.buf.shrink_to_fit();
        self.buf
    }
}

/// Runs `op` over `input`, retrying on larger buffers as needed.
pub fn invoke<C>(codec: &C, policy: &GrowthPolicy, op: &Operation, input: &[u8]) -> Result<Vec<u8>>
where
    C: Codec + ?Sized,
{
    if op.kind == OpKind::Decompress && input.is_empty() {
        // None of the three containers has an empty encoding.
        return Err(Error::corrupt(op.format, "empty input"));
    }

    let mut capacity = policy.initial_capacity(input.len(), op);
    let mut output = OutputBuffer::with_capacity(capacity, policy.max_capacity)?;
    let mut attempts = 1u32;

    loop {
        let status = match op.kind {
            OpKind::Compress => {
                let level = op.level.unwrap_or_default();
                codec.compress(op.format, level, input, output.writable())
            }
            OpKind::Decompress => codec.decompress(op.format, input, output.writable()),
        };

        match status {
            CodecStatus::Done(len) if len <= output.capacity() => {
                trace!(
                    kind = ?op.kind,
                    format = %op.format,
                    input_len = input.len(),
                    output_len = len,
                    attempts,
                    "codec call finished"
                );
                return Ok(output.into_truncated(len));
            }
            CodecStatus::Done(len) => {
                return Err(Error::InternalCodecFailure {
                    reason: format!(
                        "codec reported {len} bytes written into a {}-byte buffer",
                        output.capacity()
                    ),
                });
            }
            CodecStatus::InsufficientSpace => {
                capacity = policy
                    .grow(capacity)
                    .ok_or(Error::CapacityExceeded { limit: policy.max_capacity })?;
                trace!(format = %op.format, capacity, attempts, "growing output buffer");
                output.grow_to(capacity)?;
                attempts += 1;
            }
            CodecStatus::Corrupt(reason) => return Err(Error::corrupt(op.format, reason)),
            CodecStatus::Failed(reason) => return Err(Error::InternalCodecFailure { reason }),
        }
    }
}
