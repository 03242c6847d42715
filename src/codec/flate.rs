//! [`Codec`] backed by `flate2`'s one-shot streams (zlib-rs backend).

use flate2::{Compress, Decompress, FlushCompress, FlushDecompress, Status};

use super::{Codec, CodecStatus};
use crate::format::Format;
use crate::level::CompressionLevel;

/// LZ77 window used for every format (32 KiB).
const WINDOW_BITS: u8 = 15;

/// The production codec. Stateless; every call builds a fresh stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlateCodec;

impl FlateCodec {
    pub fn new() -> Self {
        FlateCodec
    }
}

fn encoder(format: Format, level: CompressionLevel) -> Compress {
    let level = level.to_compression();
    match format {
        Format::Raw => Compress::new(level, false),
        Format::Zlib => Compress::new(level, true),
        Format::Gzip => Compress::new_gzip(level, WINDOW_BITS),
    }
}

fn decoder(format: Format) -> Decompress {
    match format {
        Format::Raw => Decompress::new(false),
        Format::Zlib => Decompress::new(true),
        Format::Gzip => Decompress::new_gzip(WINDOW_BITS),
    }
}

impl Codec for FlateCodec {
    fn compress(
        &self,
        format: Format,
        level: CompressionLevel,
        input: &[u8],
        output: &mut [u8],
    ) -> CodecStatus {
        let mut stream = encoder(format, level);
        match stream.compress(input, output, FlushCompress::Finish) {
            Ok(Status::StreamEnd) => CodecStatus::Done(stream.total_out() as usize),
            // With `Finish` and the whole input supplied, stopping short of
            // the end only happens when the output slice is full.
            Ok(Status::Ok | Status::BufError) => CodecStatus::InsufficientSpace,
            Err(e) => CodecStatus::Failed(e.to_string()),
        }
    }

    fn decompress(&self, format: Format, input: &[u8], output: &mut [u8]) -> CodecStatus {
        let mut consumed = 0;
        let mut produced = 0;
        loop {
            let mut stream = decoder(format);
            let status = stream.decompress(
                &input[consumed..],
                &mut output[produced..],
                FlushDecompress::Finish,
            );
            let read = stream.total_in() as usize;
            let written = stream.total_out() as usize;
            match status {
                Err(e) => return CodecStatus::Corrupt(e.to_string()),
                Ok(Status::StreamEnd) => {
                    consumed += read;
                    produced += written;
                    if consumed == input.len() {
                        return CodecStatus::Done(produced);
                    }
                    // gzip allows concatenated members; decode the next one.
                    if format != Format::Gzip {
                        return CodecStatus::Corrupt("trailing data after end of stream".into());
                    }
                }
                Ok(Status::Ok | Status::BufError) => {
                    return if produced + written < output.len() {
                        CodecStatus::Corrupt("truncated stream".into())
                    } else {
                        CodecStatus::InsufficientSpace
                    };
                }
            }
        }
    }
}
