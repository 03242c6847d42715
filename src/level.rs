//! Level mapper: caller-facing integer levels to codec parameters.
//!
//! Only the discrete set `{0, 1, 3}` is accepted. Anything else is rejected
//! with [`Error::InvalidLevel`]; values are never clamped.

use flate2::Compression;

use crate::error::{Error, Result};

/// Validated compression level.
///
/// | raw | level     | deflate level |
/// |-----|-----------|---------------|
/// | 0   | `Fastest` | 1             |
/// | 1   | `Default` | 6             |
/// | 3   | `Best`    | 9             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionLevel {
    Fastest,
    Default,
    Best,
}

/// Maps a raw caller level to a [`CompressionLevel`].
pub fn map_level(raw: i32) -> Result<CompressionLevel> {
    match raw {
        0 => Ok(CompressionLevel::Fastest),
        1 => Ok(CompressionLevel::Default),
        3 => Ok(CompressionLevel::Best),
        level => Err(Error::InvalidLevel { level }),
    }
}

impl CompressionLevel {
    /// The integer this level was accepted from.
    pub const fn as_raw(self) -> i32 {
        match self {
            CompressionLevel::Fastest => 0,
            CompressionLevel::Default => 1,
            CompressionLevel::Best => 3,
        }
    }

    /// Parameter handed to the deflate encoder.
    pub fn to_compression(self) -> Compression {
        match self {
            CompressionLevel::Fastest => Compression::fast(),
            CompressionLevel::Default => Compression::new(6),
            CompressionLevel::Best => Compression::best(),
        }
    }
}

impl TryFrom<i32> for CompressionLevel {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self> {
        map_level(raw)
    }
}

/// The level used when the caller does not pick one (raw level
/// [`DEFAULT_LEVEL`](crate::config::DEFAULT_LEVEL), i.e. `Best`).
impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LEVEL;

    #[test]
    fn default_matches_configured_raw_level() {
        assert_eq!(CompressionLevel::default().as_raw(), DEFAULT_LEVEL);
    }

    #[test]
    fn as_raw_inverts_map_level() {
        for raw in [0, 1, 3] {
            assert_eq!(map_level(raw).map(CompressionLevel::as_raw), Ok(raw));
        }
    }
}
