use proptest::prelude::*;

use quadfund_types::{Amount, Timestamp};

proptest! {
    /// Formatting an amount and parsing it back yields the same minor units.
    #[test]
    fn amount_display_parses_back(raw in any::<u128>()) {
        let amount = Amount::from_raw(raw);
        let parsed = Amount::parse_decimal(&amount.to_string()).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// A basis-point share never exceeds the whole and leaves an exact remainder.
    #[test]
    fn basis_points_partition_is_exact(raw in any::<u128>(), bps in 0u32..=10_000) {
        let amount = Amount::from_raw(raw);
        let share = amount.basis_points(bps);
        prop_assert!(share <= amount);
        let rest = amount.checked_sub(share).unwrap();
        prop_assert_eq!(share.checked_add(rest), Some(amount));
    }

    /// Basis points agree with naive arithmetic whenever the naive product fits.
    #[test]
    fn basis_points_matches_naive(raw in 0u128..(u128::MAX / 10_000), bps in 0u32..=10_000) {
        let expected = raw * u128::from(bps) / 10_000;
        prop_assert_eq!(Amount::from_raw(raw).basis_points(bps).raw(), expected);
    }

    /// Whole-unit integers parse to `n * UNIT`.
    #[test]
    fn whole_units_parse(n in 0u64..u64::MAX) {
        let parsed = Amount::parse_decimal(&n.to_string()).unwrap();
        prop_assert_eq!(parsed.raw(), u128::from(n) * Amount::UNIT);
    }

    /// Timestamp has_expired agrees with manual arithmetic.
    #[test]
    fn timestamp_has_expired(start in 0u64..1_000_000, ttl in 0u64..1_000, now in 0u64..1_001_000) {
        let t = Timestamp::new(start);
        prop_assert_eq!(t.has_expired(ttl, Timestamp::new(now)), now >= start + ttl);
    }
}
