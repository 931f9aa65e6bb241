// tests/property/timecode_test.rs

//! Property-based tests for timecode formatting

use deckbridge::core::timecode::format;
use proptest::prelude::*;

fn fields(timecode: &str) -> Vec<i64> {
    timecode.split(':').map(|f| f.parse().unwrap()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        ..ProptestConfig::default()
    })]

    #[test]
    fn test_shape_is_always_four_two_digit_fields(frames in any::<i64>(), rate in -10i64..200) {
        let timecode = format(frames, rate);
        prop_assert_eq!(timecode.len(), 11);
        let parts: Vec<&str> = timecode.split(':').collect();
        prop_assert_eq!(parts.len(), 4);
        for part in parts {
            prop_assert_eq!(part.len(), 2);
            prop_assert!(part.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_fields_match_their_components(
        (rate, frame) in (1i64..=99).prop_flat_map(|rate| (Just(rate), 0..rate)),
        hours in 0i64..99,
        minutes in 0i64..60,
        seconds in 0i64..60,
    ) {
        let frames = ((hours * 60 + minutes) * 60 + seconds) * rate + frame;
        prop_assume!(frames > 0);
        prop_assert_eq!(fields(&format(frames, rate)), vec![hours, minutes, seconds, frame]);
    }

    #[test]
    fn test_is_monotonic_below_saturation(
        (rate, a, b) in (1i64..=60).prop_flat_map(|rate| {
            // Past 99 hours the hour field saturates while the lower fields keep cycling.
            let limit = 99 * 3600 * rate;
            (Just(rate), 0..limit, 0..limit)
        }),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(format(lo, rate) <= format(hi, rate));
    }
}
