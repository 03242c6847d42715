//! Output-buffer sizing: initial estimates and multiplicative growth.
//!
//! Compression starts from [`compress_bound`], which is never below the
//! encoded size of incompressible input at the requested level, so the
//! common case needs a single codec call. Decompression has no such bound and starts from
//! `decompress_ratio × input`; each retry multiplies the capacity by
//! `growth_factor`, so reaching a final size `S` from an estimate `E` takes
//! `O(log(S / E))` retries.

use crate::config::{
    DECOMPRESS_RATIO_DEFAULT, GROWTH_FACTOR_DEFAULT, MAX_CAPACITY_DEFAULT, MIN_CAPACITY,
};
use crate::error::{Error, Result};
use crate::format::{Format, OpKind, Operation};
use crate::level::CompressionLevel;

/// Worst-case encoded size of `input_len` bytes in `format` at `level`.
///
/// The lazy/slow strategies fall back to stored blocks, bounded by
/// `len + len/4096 + len/16384 + len/2^25 + 13`. The quick strategy used by
/// [`CompressionLevel::Fastest`] never stores: every literal may cost up to
/// 9 bits under the fixed Huffman table, plus a block header and end code
/// roughly every 4 KiB. The container envelope comes on top.
pub fn compress_bound(input_len: usize, format: Format, level: CompressionLevel) -> usize {
    let deflate = match level {
        CompressionLevel::Fastest => input_len
            .saturating_add(input_len.saturating_add(7) >> 3)
            .saturating_add(input_len >> 12)
            .saturating_add(13),
        CompressionLevel::Default | CompressionLevel::Best => input_len
            .saturating_add(input_len >> 12)
            .saturating_add(input_len >> 14)
            .saturating_add(input_len >> 25)
            .saturating_add(13),
    };
    deflate.saturating_add(format.envelope_len())
}

/// Sizing policy for one operation's output buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    pub decompress_ratio: usize,
    pub growth_factor: usize,
    pub min_capacity: usize,
    pub max_capacity: usize,
    /// Caps the first estimate. `None` in production; tests use it to force
    /// the grow-and-retry path.
    pub initial_limit: Option<usize>,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        GrowthPolicy {
            decompress_ratio: DECOMPRESS_RATIO_DEFAULT,
            growth_factor: GROWTH_FACTOR_DEFAULT,
            min_capacity: MIN_CAPACITY,
            max_capacity: MAX_CAPACITY_DEFAULT,
            initial_limit: None,
        }
    }
}

impl GrowthPolicy {
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    pub fn with_initial_limit(mut self, limit: usize) -> Self {
        self.initial_limit = Some(limit);
        self
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    pub fn with_decompress_ratio(mut self, ratio: usize) -> Self {
        self.decompress_ratio = ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.growth_factor < 2 {
            return Err(Error::InvalidConfig(format!(
                "growth_factor must be at least 2, got {}",
                self.growth_factor
            )));
        }
        if self.decompress_ratio == 0 {
            return Err(Error::InvalidConfig("decompress_ratio must be at least 1".into()));
        }
        if self.min_capacity == 0 || self.min_capacity > self.max_capacity {
            return Err(Error::InvalidConfig(format!(
                "min_capacity {} must be in 1..={}",
                self.min_capacity, self.max_capacity
            )));
        }
        if self.initial_limit == Some(0) {
            return Err(Error::InvalidConfig("initial_limit must be non-zero".into()));
        }
        Ok(())
    }

    /// First capacity to try. Never zero, even for empty input.
    pub fn initial_capacity(&self, input_len: usize, op: &Operation) -> usize {
        let estimate = match op.kind {
            OpKind::Compress => {
                compress_bound(input_len, op.format, op.level.unwrap_or_default())
            }
            OpKind::Decompress => input_len.saturating_mul(self.decompress_ratio),
        };
        let estimate = match self.initial_limit {
            Some(limit) => estimate.min(limit),
            None => estimate.max(self.min_capacity),
        };
        estimate.clamp(1, self.max_capacity.max(1))
    }

    /// Next capacity after `current` proved too small, or `None` once
    /// `max_capacity` has already been tried.
    pub fn grow(&self, current: usize) -> Option<usize> {
        if current >= self.max_capacity {
            return None;
        }
        let next = current.max(1).saturating_mul(self.growth_factor);
        Some(next.min(self.max_capacity))
    }
}
