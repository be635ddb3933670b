//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for billing types that give more
//! meaningful error messages than standard assertions.

use rust_decimal::Decimal;

use core_kernel::Money;
use domain_metering::BillingRecord;
use domain_rating::RatedRecord;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {money}");
}

/// Asserts that two records, at any pipeline stage, carry the same base fields
pub fn assert_same_base<A, B>(actual: &A, expected: &B)
where
    A: BillingRecord + ?Sized,
    B: BillingRecord + ?Sized,
{
    assert_eq!(actual.id(), expected.id(), "Record id mismatch");
    assert_eq!(actual.metering_id(), expected.metering_id(), "Metering id mismatch");
    assert_eq!(actual.timestamps(), expected.timestamps(), "Timestamp mismatch");
    assert_eq!(actual.observation(), expected.observation(), "Observation mismatch");
    assert_eq!(actual.tags(), expected.tags(), "Tag mismatch");
}

/// Asserts that a rated record was priced with the given tariff name and amount
pub fn assert_rated(record: &RatedRecord, tariff: &str, amount: Decimal) {
    assert_eq!(
        record.tariff().name(),
        tariff,
        "Record {} rated with unexpected tariff",
        record.id()
    );
    assert_eq!(
        record.amount().amount(),
        amount,
        "Record {} has amount {}, expected {}",
        record.id(),
        record.amount(),
        amount
    );
}
