//! Rated records and the rating calculation

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use core_kernel::{InvalidRecordState, Money};
use domain_guiding::{Customer, GuidedRecord, GuidedRecordBuilder, ProductRecordInfo};
use domain_metering::{BillingRecord, Observation, RecordBase, RecordFieldSetters, RecordFields};

use crate::error::RatingError;
use crate::tariff::Tariff;

/// Decimal places the billed units are rounded to before applying the rate
pub const RATING_PRECISION: u32 = 5;

/// Prices a raw quantity with a tariff
///
/// `rate × round(quantity ÷ divisor, RATING_PRECISION)`, rounding midpoints
/// away from zero. The quotient is rounded, not the final amount.
///
/// # Errors
///
/// Returns `RatingError::Calculation` if the division or the multiplication
/// overflows
pub fn rate_quantity(quantity: Decimal, tariff: &Tariff) -> Result<Money, RatingError> {
    let units = round_quotient(quantity, tariff.unit_divisor()).ok_or_else(|| {
        RatingError::calculation(format!(
            "cannot divide {quantity} by unit divisor {}",
            tariff.unit_divisor()
        ))
    })?;

    let amount = tariff.rate().checked_mul(units)?;
    debug!(
        %quantity,
        divisor = %tariff.unit_divisor(),
        rate = %tariff.rate(),
        %amount,
        "Calculated quantity / divisor * rate"
    );
    Ok(amount)
}

/// `quantity ÷ divisor` rounded once to `RATING_PRECISION` places, half away from zero
///
/// Works on the exact remainder against `divisor × 10^-RATING_PRECISION`, so
/// a quotient just below a midpoint is never pushed onto it by an
/// intermediate rounding. `None` on overflow or a zero divisor.
fn round_quotient(quantity: Decimal, divisor: Decimal) -> Option<Decimal> {
    let mut step = divisor.normalize();
    step.set_scale(step.scale() + RATING_PRECISION).ok()?;

    let (mut whole, rem) = if quantity.abs() < step.abs() {
        (Decimal::ZERO, quantity)
    } else {
        let rem = quantity.checked_rem(step)?;
        (quantity.checked_sub(rem)?.checked_div(step)?.trunc(), rem)
    };

    // |rem| >= |step| / 2, without doubling a full-precision remainder
    if !rem.is_zero() && rem.abs() >= step.abs().checked_sub(rem.abs())? {
        let away = if rem.is_sign_negative() == step.is_sign_negative() {
            Decimal::ONE
        } else {
            Decimal::NEGATIVE_ONE
        };
        whole = whole.checked_add(away)?;
    }

    let mut units = whole.normalize();
    units.set_scale(units.scale() + RATING_PRECISION).ok()?;
    Some(units)
}

/// The quantity a tariff is applied to
///
/// The metered value, or the interval length in whole seconds.
fn billable_quantity(observation: &Observation) -> Decimal {
    match observation {
        Observation::Value { metered_value } => *metered_value,
        Observation::Interval(interval) => Decimal::from(interval.whole_seconds()),
    }
}

/// A guided record priced by a tariff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatedRecord {
    #[serde(flatten)]
    guided: GuidedRecord,
    tariff: Arc<Tariff>,
    amount: Money,
}

impl RatedRecord {
    /// The guided record that was rated
    pub fn guided(&self) -> &GuidedRecord {
        &self.guided
    }

    pub fn customer(&self) -> &Customer {
        self.guided.customer()
    }

    pub fn product(&self) -> &ProductRecordInfo {
        self.guided.product()
    }

    pub fn tariff(&self) -> &Arc<Tariff> {
        &self.tariff
    }

    /// The computed charge, at full precision
    pub fn amount(&self) -> Money {
        self.amount
    }
}

impl BillingRecord for RatedRecord {
    fn base(&self) -> &RecordBase {
        self.guided.base()
    }
}

/// Builder for rated records
///
/// Customer, product and tariff are mandatory. The amount is computed from
/// the observation and the tariff when the record is built.
#[derive(Debug, Clone, Default)]
pub struct RatedRecordBuilder {
    fields: RecordFields,
    customer: Option<Customer>,
    product: Option<ProductRecordInfo>,
    tariff: Option<Arc<Tariff>>,
}

impl RatedRecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the builder from a guided record
    pub fn from_guided(record: &GuidedRecord) -> Self {
        Self {
            fields: RecordFields::from_record(record),
            customer: Some(record.customer().clone()),
            product: Some(record.product().clone()),
            tariff: None,
        }
    }

    /// Seeds every field, including the tariff, from a rated record
    pub fn copy_from(record: &RatedRecord) -> Self {
        Self {
            tariff: Some(Arc::clone(&record.tariff)),
            ..Self::from_guided(&record.guided)
        }
    }

    pub fn customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }

    pub fn product(mut self, product: ProductRecordInfo) -> Self {
        self.product = Some(product);
        self
    }

    pub fn tariff(mut self, tariff: Arc<Tariff>) -> Self {
        self.tariff = Some(tariff);
        self
    }

    /// Builds the rated record
    ///
    /// # Errors
    ///
    /// * `RatingError::InvalidRecordState` - a mandatory field is missing or
    ///   the observation fields are inconsistent
    /// * `RatingError::Calculation` - the amount overflows
    pub fn build(self) -> Result<RatedRecord, RatingError> {
        let mut guided = GuidedRecordBuilder::from_fields(self.fields);
        if let Some(customer) = self.customer {
            guided = guided.customer(customer);
        }
        if let Some(product) = self.product {
            guided = guided.product(product);
        }
        let guided = guided.build()?;

        let tariff = self
            .tariff
            .ok_or(InvalidRecordState::MissingField("tariff"))?;
        let amount = rate_quantity(billable_quantity(guided.observation()), &tariff)?;

        Ok(RatedRecord {
            guided,
            tariff,
            amount,
        })
    }
}

impl RecordFieldSetters for RatedRecordBuilder {
    fn fields_mut(&mut self) -> &mut RecordFields {
        &mut self.fields
    }
}
