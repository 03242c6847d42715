//! Container formats and the per-call operation descriptor.

use std::fmt;

use crate::level::CompressionLevel;

/// Container framing around a DEFLATE stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Bare DEFLATE (RFC 1951), no header or trailer.
    Raw,
    /// GZIP (RFC 1952): 10-byte header, CRC-32 and ISIZE trailer.
    Gzip,
    /// ZLIB (RFC 1950): 2-byte header, Adler-32 trailer.
    Zlib,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Raw, Format::Gzip, Format::Zlib];

    /// Header + trailer bytes the container adds around the DEFLATE payload.
    pub const fn envelope_len(self) -> usize {
        match self {
            Format::Raw => 0,
            Format::Gzip => 18,
            Format::Zlib => 6,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Raw => "deflate",
            Format::Gzip => "gzip",
            Format::Zlib => "zlib",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Compress,
    Decompress,
}

/// Immutable description of one call. Built after level validation; never
/// shared between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub kind: OpKind,
    pub format: Format,
    /// `Some` exactly for [`OpKind::Compress`].
    pub level: Option<CompressionLevel>,
}

impl Operation {
    pub fn compress(format: Format, level: CompressionLevel) -> Self {
        Operation { kind: OpKind::Compress, format, level: Some(level) }
    }

    pub fn decompress(format: Format) -> Self {
        Operation { kind: OpKind::Decompress, format, level: None }
    }
}
