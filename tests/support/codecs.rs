// Test codecs and data generators shared by the integration tests.
//
// Each wrapper delegates the real work to `FlateCodec` and adds one
// observable behaviour: counting calls, recording the executing thread,
// parking until a gate opens, or panicking.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread::{self, ThreadId};

use deflate_dispatch::{Codec, CodecStatus, CompressionLevel, FlateCodec, Format};

// ─────────────────────────────────────────────────────────────────────────────
// Data
// ─────────────────────────────────────────────────────────────────────────────

const WORDS: &[&str] = &[
    "buffer", "stream", "window", "literal", "match", "block", "header", "trailer",
    "checksum", "huffman", "distance", "length", "queue", "worker", "future", "slot",
];

/// Deterministic, moderately compressible text.
pub fn text(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut out = Vec::with_capacity(len + 16);
    while out.len() < len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let word = WORDS[(state >> 33) as usize % WORDS.len()];
        out.extend_from_slice(word.as_bytes());
        out.push(if (state >> 20) % 11 == 0 { b'\n' } else { b' ' });
    }
    out.truncate(len);
    out
}

/// Deterministic bytes that deflate cannot shrink.
pub fn noise(len: usize, seed: u64) -> Vec<u8> {
    let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// CountingCodec: counts calls and records which thread ran them
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CountingCodec {
    pub compress_calls: AtomicUsize,
    pub decompress_calls: AtomicUsize,
    pub threads: Mutex<Vec<ThreadId>>,
}

impl CountingCodec {
    pub fn calls(&self) -> usize {
        self.compress_calls.load(Ordering::SeqCst) + self.decompress_calls.load(Ordering::SeqCst)
    }

    pub fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().unwrap().clone()
    }

    fn record(&self) {
        self.threads.lock().unwrap().push(thread::current().id());
    }
}

impl Codec for CountingCodec {
    fn compress(
        &self,
        format: Format,
        level: CompressionLevel,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecStatus {
        self.compress_calls.fetch_add(1, Ordering::SeqCst);
        self.record();
        FlateCodec.compress(format, level, input, output)
    }

    fn decompress(&self, format: Format, input: &[u8], output: &mut [u8]) -> CodecStatus {
        self.decompress_calls.fetch_add(1, Ordering::SeqCst);
        self.record();
        FlateCodec.decompress(format, input, output)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GatedCodec: parks every call until the test opens the gate
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct GatedCodec {
    open: Mutex<bool>,
    cvar: Condvar,
    entered: AtomicUsize,
}

impl GatedCodec {
    pub fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cvar.notify_all();
    }

    /// Calls that have reached the codec (parked or finished).
    pub fn entered(&self) -> usize {
        self.entered.load(Ordering::SeqCst)
    }

    fn pass(&self) {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let mut open = self.open.lock().unwrap();
        while !*open {
            open = self.cvar.wait(open).unwrap();
        }
    }
}

impl Codec for GatedCodec {
    fn compress(
        &self,
        format: Format,
        level: CompressionLevel,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecStatus {
        self.pass();
        FlateCodec.compress(format, level, input, output)
    }

    fn decompress(&self, format: Format, input: &[u8], output: &mut [u8]) -> CodecStatus {
        self.pass();
        FlateCodec.decompress(format, input, output)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PanickingCodec / FailingCodec: misbehaving collaborators
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct PanickingCodec;

impl Codec for PanickingCodec {
    fn compress(&self, _: Format, _: CompressionLevel, _: &[u8], _: &mut [u8]) -> CodecStatus {
        panic!("codec blew up");
    }

    fn decompress(&self, _: Format, _: &[u8], _: &mut [u8]) -> CodecStatus {
        panic!("codec blew up");
    }
}

/// Reports `Failed` on compression and claims more bytes than it was given
/// on decompression.
#[derive(Debug, Default)]
pub struct FailingCodec;

impl Codec for FailingCodec {
    fn compress(&self, _: Format, _: CompressionLevel, _: &[u8], _: &mut [u8]) -> CodecStatus {
        CodecStatus::Failed("simulated encoder fault".into())
    }

    fn decompress(&self, _: Format, _: &[u8], output: &mut [u8]) -> CodecStatus {
        CodecStatus::Done(output.len() + 1)
    }
}
