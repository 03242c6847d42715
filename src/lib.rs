// deflate-dispatch: blocking and non-blocking DEFLATE/GZIP/ZLIB buffer service

//! One-shot compression and decompression of in-memory buffers in three
//! containers (raw DEFLATE, GZIP, ZLIB), callable synchronously or through a
//! future resolved by a bounded worker pool.
//!
//! ```no_run
//! use deflate_dispatch::{gunzip_async, gzip, CompressOptions};
//!
//! let packed = gzip(b"hello hello hello", CompressOptions::default())?;
//! let plain = gunzip_async(&packed).wait()?;
//! assert_eq!(plain, b"hello hello hello");
//! # Ok::<(), deflate_dispatch::Error>(())
//! ```

pub mod api;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod growth;
pub mod invoker;
pub mod level;
pub mod runtime;
pub mod threadpool;

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Returns the crate version string.
pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use api::{
    compress, compress_async, decompress, decompress_async, deflate, deflate_async, deflate_sync,
    gunzip, gunzip_async, gunzip_sync, gzip, gzip_async, gzip_sync, inflate, inflate_async,
    inflate_sync, ungzip, ungzip_async, unzlib, unzlib_async, zlib, zlib_async, CompressOptions,
};
pub use codec::{Codec, CodecStatus, FlateCodec};
pub use config::PoolConfig;
pub use dispatch::{Completion, Dispatcher};
pub use error::{Error, Result};
pub use format::{Format, OpKind, Operation};
pub use growth::{compress_bound, GrowthPolicy};
pub use level::{map_level, CompressionLevel};
