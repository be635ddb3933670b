//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating usage data that maintains
//! the record invariants.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::Currency;
use domain_metering::{ImportRow, RawRecord, RawRecordBuilder, RecordFieldSetters, Tags};

/// Strategy for generating Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::all().to_vec())
}

/// Strategy for non-negative metered values with up to four decimal places
pub fn metered_value_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000i64, 0u32..5u32).prop_map(|(m, s)| Decimal::new(m, s))
}

/// Strategy for metered durations up to 31 days, in whole seconds
pub fn duration_strategy() -> impl Strategy<Value = Duration> {
    (0i64..31 * 86_400).prop_map(Duration::seconds)
}

/// Strategy for strictly positive unit divisors
pub fn divisor_strategy() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::from(1)),
        Just(Decimal::from(60)),
        Just(Decimal::from(1000)),
        Just(Decimal::from(1440)),
        Just(Decimal::from(86_400)),
        Just(Decimal::from(1_048_576)),
        (1i64..1_000_000i64).prop_map(Decimal::from),
    ]
}

/// Strategy for tariff rates (0.0000000001 to 100)
pub fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000_000i64).prop_map(|n| Decimal::new(n, 10))
}

/// Strategy for timestamps in 2020..2030
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap().timestamp();
    let end = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap().timestamp();
    (start..end).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

/// Strategy for tag maps with lowercase keys and values
pub fn tags_strategy() -> impl Strategy<Value = Tags> {
    prop::collection::btree_map("[a-z]{1,12}", "[a-z0-9-]{1,20}", 0..6)
}

/// Strategy for positional tag titles and values of equal length
pub fn tag_pairs_strategy() -> impl Strategy<Value = (Vec<String>, Vec<String>)> {
    prop::collection::vec(("[a-z]{1,8}", "[a-z0-9]{1,8}"), 0..8)
        .prop_map(|pairs| pairs.into_iter().unzip())
}

/// Strategy for valid raw records of either observation kind
pub fn raw_record_strategy() -> impl Strategy<Value = RawRecord> {
    let observation = prop_oneof![
        metered_value_strategy().prop_map(|v| (Some(v), None::<Duration>)),
        duration_strategy().prop_map(|d| (None::<Decimal>, Some(d))),
    ];

    (timestamp_strategy(), observation, tags_strategy()).prop_map(
        |(imported_at, (value, duration), tags)| {
            let builder = RawRecordBuilder::new().imported_at(imported_at).tags(tags);
            let builder = match (value, duration) {
                (Some(value), _) => builder.metered_value(value),
                (None, Some(duration)) => builder.metered_duration(duration),
                (None, None) => unreachable!("observation strategy always sets one side"),
            };
            builder.build().unwrap()
        },
    )
}

/// Strategy for valid import rows carrying a value observation
pub fn import_row_strategy() -> impl Strategy<Value = ImportRow> {
    (metered_value_strategy(), timestamp_strategy(), tag_pairs_strategy()).prop_map(
        |(value, imported_at, (tag_titles, tags))| ImportRow {
            imported_at: Some(imported_at),
            metered_value: Some(value),
            tag_titles,
            tags,
            ..Default::default()
        },
    )
}
