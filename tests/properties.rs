// Property tests over the public facade (api.rs), driven by proptest.
//
// Coverage:
//   - round trip for every format and accepted level, including empty input
//   - sync and async round trips agree byte for byte
//   - every proper truncation of a compressed stream fails with Corrupt
//   - every level outside {0, 1, 3} fails with InvalidLevel

use deflate_dispatch::{compress, compress_async, decompress, CompressOptions, Error, Format};
use proptest::prelude::*;

fn format() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Raw), Just(Format::Gzip), Just(Format::Zlib)]
}

fn level() -> impl Strategy<Value = i32> {
    prop_oneof![Just(0), Just(1), Just(3)]
}

/// Mixes runs (compressible) with arbitrary bytes.
fn payload() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 0..4096),
        prop::collection::vec((any::<u8>(), 1usize..64), 0..128).prop_map(|runs| {
            runs.into_iter().flat_map(|(b, n)| std::iter::repeat(b).take(n)).collect()
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn round_trip(format in format(), level in level(), data in payload()) {
        let packed = compress(format, &data, CompressOptions::with_level(level)).unwrap();
        prop_assert_eq!(decompress(format, &packed).unwrap(), data);
    }

    #[test]
    fn async_matches_sync(format in format(), level in level(), data in payload()) {
        let options = CompressOptions::with_level(level);
        let sync = compress(format, &data, options).unwrap();
        let async_ = compress_async(format, &data, options).wait().unwrap();
        prop_assert_eq!(sync, async_);
    }

    #[test]
    fn truncation_is_corrupt(
        format in format(),
        data in payload(),
        cut in any::<prop::sample::Index>(),
    ) {
        let packed = compress(format, &data, CompressOptions::default()).unwrap();
        let cut = cut.index(packed.len());
        match decompress(format, &packed[..cut]) {
            Err(Error::Corrupt { format: f, .. }) => prop_assert_eq!(f, format),
            other => prop_assert!(false, "cut {} of {}: {:?}", cut, packed.len(), other),
        }
    }

    #[test]
    fn unaccepted_levels_are_rejected(
        format in format(),
        level in any::<i32>().prop_filter("accepted level", |l| ![0, 1, 3].contains(l)),
    ) {
        let result = compress(format, b"payload", CompressOptions::with_level(level));
        prop_assert_eq!(result, Err(Error::InvalidLevel { level }));
    }
}

#[test]
fn empty_input_round_trips_in_every_format() {
    for format in Format::ALL {
        for level in [0, 1, 3] {
            let packed = compress(format, b"", CompressOptions::with_level(level)).unwrap();
            assert!(!packed.is_empty());
            assert_eq!(decompress(format, &packed).unwrap(), b"");
        }
    }
}
