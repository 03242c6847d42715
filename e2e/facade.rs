//! E2E Suite: Node-style facade
//!
//! Exercises the named free functions end to end through the lazily created
//! process-wide runtime.
//!
//! Coverage:
//! - gzip / deflate / zlib round trips, sync and `_sync` aliases
//! - async variants, including concurrent calls on one buffer
//! - every accepted level decodes; level 2 is rejected on both paths
//! - empty buffers
//! - a periodic task on the caller's thread keeps ticking while async work is
//!   in flight, and cannot tick while sync work holds the thread
//! - cross-format decoding fails cleanly

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use deflate_dispatch::{
    deflate, deflate_async, deflate_sync, gunzip, gunzip_async, gunzip_sync, gzip, gzip_async,
    gzip_sync, inflate, inflate_async, inflate_sync, ungzip, ungzip_async, unzlib, unzlib_async,
    zlib, zlib_async, Completion, CompressOptions, Error, Format,
};
use futures::executor::block_on;
use futures::future::join_all;
use futures::task::noop_waker;

fn test_data() -> Vec<u8> {
    b"Hello, World! This is a test string for compression. ".repeat(10)
}

/// Bytes deflate cannot shrink, so every level does real work on them.
fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// A 1 ms periodic task serviced from a cooperative loop on the test thread.
/// It only runs when the loop gets control back.
struct Ticker {
    period: Duration,
    next: Instant,
    ticks: u32,
}

impl Ticker {
    fn new() -> Self {
        let period = Duration::from_millis(1);
        Ticker { period, next: Instant::now() + period, ticks: 0 }
    }

    fn is_due(&self) -> bool {
        Instant::now() >= self.next
    }

    /// Runs the task once if its period has elapsed.
    fn service(&mut self) {
        let now = Instant::now();
        if now >= self.next {
            self.ticks += 1;
            self.next = now + self.period;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Sync round trips
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn gzip_round_trip() -> anyhow::Result<()> {
    let data = test_data();
    let packed = gzip(&data, CompressOptions::default())?;
    assert!(packed.len() < data.len());
    assert_eq!(gunzip(&packed)?, data);
    assert_eq!(ungzip(&packed)?, data);
    Ok(())
}

#[test]
fn sync_suffix_aliases_match() -> anyhow::Result<()> {
    let data = test_data();
    let options = CompressOptions::default();
    assert_eq!(gzip_sync(&data, options)?, gzip(&data, options)?);
    assert_eq!(deflate_sync(&data, options)?, deflate(&data, options)?);
    assert_eq!(gunzip_sync(&gzip_sync(&data, options)?)?, data);
    assert_eq!(inflate_sync(&deflate_sync(&data, options)?)?, data);
    Ok(())
}

#[test]
fn deflate_round_trip() -> anyhow::Result<()> {
    let data = test_data();
    let packed = deflate(&data, CompressOptions::default())?;
    assert!(packed.len() < data.len());
    assert_eq!(inflate(&packed)?, data);
    Ok(())
}

#[test]
fn zlib_round_trip() -> anyhow::Result<()> {
    let data = test_data();
    let packed = zlib(&data, CompressOptions::default())?;
    assert!(packed.len() < data.len());
    assert_eq!(packed[0] & 0x0F, 8, "CM = deflate");
    assert_eq!(unzlib(&packed)?, data);
    Ok(())
}

#[test]
fn every_level_decodes() -> anyhow::Result<()> {
    let data = test_data();
    for level in [0, 1, 3] {
        let packed = gzip(&data, CompressOptions::with_level(level))?;
        assert!(!packed.is_empty());
        assert_eq!(gunzip(&packed)?, data, "level {level}");
    }
    Ok(())
}

#[test]
fn level_two_is_rejected() {
    let data = test_data();
    let options = CompressOptions::with_level(2);
    assert_eq!(gzip(&data, options), Err(Error::InvalidLevel { level: 2 }));
    assert_eq!(deflate_async(&data, options).wait(), Err(Error::InvalidLevel { level: 2 }));
}

#[test]
fn empty_buffers_round_trip() -> anyhow::Result<()> {
    let options = CompressOptions::default();
    assert_eq!(gunzip(&gzip(b"", options)?)?, b"");
    assert_eq!(inflate(&deflate(b"", options)?)?, b"");
    assert_eq!(unzlib(&zlib(b"", options)?)?, b"");
    assert_eq!(block_on(gunzip_async(&block_on(gzip_async(b"", options))?))?, b"");
    Ok(())
}

#[test]
fn empty_input_is_not_a_stream() {
    for result in [gunzip(b""), inflate(b""), unzlib(b"")] {
        assert!(matches!(result, Err(Error::Corrupt { .. })), "{result:?}");
    }
}

#[test]
fn cross_format_decoding_fails() -> anyhow::Result<()> {
    let data = test_data();
    let packed = gzip(&data, CompressOptions::default())?;
    assert!(matches!(unzlib(&packed), Err(Error::Corrupt { format: Format::Zlib, .. })));
    let packed = zlib(&data, CompressOptions::default())?;
    assert!(matches!(gunzip(&packed), Err(Error::Corrupt { format: Format::Gzip, .. })));
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════════
// Async round trips
// ═════════════════════════════════════════════════════════════════════════════

#[test]
fn async_round_trips() -> anyhow::Result<()> {
    let data = test_data();
    let options = CompressOptions::default();
    block_on(async {
        assert_eq!(gunzip_async(&gzip_async(&data, options).await?).await?, data);
        assert_eq!(ungzip_async(&gzip_async(&data, options).await?).await?, data);
        assert_eq!(inflate_async(&deflate_async(&data, options).await?).await?, data);
        assert_eq!(unzlib_async(&zlib_async(&data, options).await?).await?, data);
        Ok::<_, Error>(())
    })?;
    Ok(())
}

#[test]
fn async_levels_decode() -> anyhow::Result<()> {
    let data = test_data();
    let packed = block_on(join_all(
        [0, 1, 3].map(|level| gzip_async(&data, CompressOptions::with_level(level))),
    ));
    for result in packed {
        assert_eq!(gunzip(&result?)?, data);
    }
    Ok(())
}

#[test]
fn caller_keeps_running_while_async_work_is_in_flight() -> anyhow::Result<()> {
    let data = vec![b'a'; 1024 * 1024];
    let mut ticker = Ticker::new();
    let mut pending: Vec<Completion> =
        (0..5).map(|_| gzip_async(&data, CompressOptions::default())).collect();

    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    let mut results = Vec::new();
    while !pending.is_empty() {
        pending.retain_mut(|completion| match Pin::new(completion).poll(&mut cx) {
            Poll::Ready(result) => {
                results.push(result);
                false
            }
            Poll::Pending => true,
        });
        if !pending.is_empty() {
            std::thread::sleep(ticker.period);
            ticker.service();
        }
    }

    assert!(ticker.ticks > 0, "async compression must not block the caller");
    assert_eq!(results.len(), 5);
    for result in results {
        assert_eq!(gunzip(&result?)?, data);
    }
    Ok(())
}

#[test]
fn sync_work_holds_the_caller_thread() -> anyhow::Result<()> {
    let data = noise(1024 * 1024);
    let mut ticker = Ticker::new();
    let started = Instant::now();

    // Nothing services the ticker between these calls, exactly as a thread
    // stuck in a blocking call cannot.
    let mut results = Vec::new();
    for _ in 0..5 {
        results.push(gzip_sync(&data, CompressOptions::default())?);
    }
    let busy = started.elapsed();

    assert_eq!(ticker.ticks, 0, "no tick can run while sync work holds the thread");
    assert!(busy >= ticker.period, "five 1 MiB compressions took only {busy:?}");
    assert!(ticker.is_due(), "the tick became due during the busy window");
    ticker.service();
    assert_eq!(ticker.ticks, 1, "the overdue tick runs once the thread is free");

    for packed in results {
        assert_eq!(gunzip(&packed)?, data);
    }
    Ok(())
}
