//! Free-function facade with Node `zlib`-style names.
//!
//! Every function routes through the process-wide dispatcher in
//! [`crate::runtime`]. The `*_async` variants return a [`Completion`]; errors
//! found before enqueueing (bad level, full queue, shut-down runtime)
//! resolve it immediately.

use crate::config::DEFAULT_LEVEL;
use crate::dispatch::Completion;
use crate::error::Result;
use crate::format::Format;
use crate::runtime;

/// Per-call compression options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// Raw level: 0, 1 or 3. Validated when the call is made.
    pub level: i32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions { level: DEFAULT_LEVEL }
    }
}

impl CompressOptions {
    pub fn with_level(level: i32) -> Self {
        CompressOptions { level }
    }
}

pub fn compress(format: Format, input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    runtime::dispatcher()?.compress(format, input, options)
}

pub fn decompress(format: Format, input: &[u8]) -> Result<Vec<u8>> {
    runtime::dispatcher()?.decompress(format, input)
}

pub fn compress_async(format: Format, input: &[u8], options: CompressOptions) -> Completion {
    match runtime::dispatcher() {
        Ok(dispatcher) => dispatcher.compress_async(format, input, options),
        Err(e) => Completion::failed(e),
    }
}

pub fn decompress_async(format: Format, input: &[u8]) -> Completion {
    match runtime::dispatcher() {
        Ok(dispatcher) => dispatcher.decompress_async(format, input),
        Err(e) => Completion::failed(e),
    }
}

// ── GZIP ─────────────────────────────────────────────────────────────────────

pub fn gzip(input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    compress(Format::Gzip, input, options)
}

pub fn gunzip(input: &[u8]) -> Result<Vec<u8>> {
    decompress(Format::Gzip, input)
}

/// Alias of [`gunzip`].
pub fn ungzip(input: &[u8]) -> Result<Vec<u8>> {
    gunzip(input)
}

pub fn gzip_sync(input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    gzip(input, options)
}

pub fn gunzip_sync(input: &[u8]) -> Result<Vec<u8>> {
    gunzip(input)
}

pub fn gzip_async(input: &[u8], options: CompressOptions) -> Completion {
    compress_async(Format::Gzip, input, options)
}

pub fn gunzip_async(input: &[u8]) -> Completion {
    decompress_async(Format::Gzip, input)
}

pub fn ungzip_async(input: &[u8]) -> Completion {
    gunzip_async(input)
}

// ── raw DEFLATE ──────────────────────────────────────────────────────────────

pub fn deflate(input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    compress(Format::Raw, input, options)
}

pub fn inflate(input: &[u8]) -> Result<Vec<u8>> {
    decompress(Format::Raw, input)
}

pub fn deflate_sync(input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    deflate(input, options)
}

pub fn inflate_sync(input: &[u8]) -> Result<Vec<u8>> {
    inflate(input)
}

pub fn deflate_async(input: &[u8], options: CompressOptions) -> Completion {
    compress_async(Format::Raw, input, options)
}

pub fn inflate_async(input: &[u8]) -> Completion {
    decompress_async(Format::Raw, input)
}

// ── ZLIB ─────────────────────────────────────────────────────────────────────

pub fn zlib(input: &[u8], options: CompressOptions) -> Result<Vec<u8>> {
    compress(Format::Zlib, input, options)
}

pub fn unzlib(input: &[u8]) -> Result<Vec<u8>> {
    decompress(Format::Zlib, input)
}

pub fn zlib_async(input: &[u8], options: CompressOptions) -> Completion {
    compress_async(Format::Zlib, input, options)
}

pub fn unzlib_async(input: &[u8]) -> Completion {
    decompress_async(Format::Zlib, input)
}
