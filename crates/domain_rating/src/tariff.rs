//! Tariffs
//!
//! A tariff prices one product: a rate per unit, and the divisor that turns
//! the raw metered quantity into units (e.g. 1000 millicores per core, 86400
//! seconds per day).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{Currency, Money, TariffId};
use domain_metering::Tags;

use crate::error::RatingError;

/// The price of a product
///
/// Tariffs are identified by their id; two tariffs with the same id are the
/// same tariff.
#[derive(Debug, Clone, Serialize)]
pub struct Tariff {
    id: TariffId,
    name: String,
    unit: String,
    unit_divisor: Decimal,
    rate: Money,
    tags: Tags,
}

impl Tariff {
    pub fn builder() -> TariffBuilder {
        TariffBuilder::new()
    }

    /// Assembles a tariff from values known to be valid
    pub(crate) fn from_parts(
        id: TariffId,
        name: &str,
        unit: &str,
        unit_divisor: Decimal,
        rate: Money,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            unit: unit.to_string(),
            unit_divisor,
            rate,
            tags: Tags::new(),
        }
    }

    pub fn id(&self) -> TariffId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label of the billed unit, e.g. "mCore" or "EUR/GB d"
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Raw quantity per billed unit; always strictly positive
    pub fn unit_divisor(&self) -> Decimal {
        self.unit_divisor
    }

    /// Price per billed unit
    pub fn rate(&self) -> Money {
        self.rate
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }
}

impl PartialEq for Tariff {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tariff {}

impl Hash for Tariff {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Builder for tariffs
#[derive(Debug, Clone, Default)]
pub struct TariffBuilder {
    id: Option<TariffId>,
    name: Option<String>,
    unit: Option<String>,
    unit_divisor: Option<Decimal>,
    rate: Option<Money>,
    tags: Tags,
}

impl TariffBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: TariffId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn unit_divisor(mut self, unit_divisor: Decimal) -> Self {
        self.unit_divisor = Some(unit_divisor);
        self
    }

    pub fn rate(mut self, rate: Money) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Builds the tariff
    ///
    /// The id defaults to a random one, the unit label to an empty string and
    /// the divisor to one.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::InvalidTariff` if the name or rate is missing or
    /// the divisor is not strictly positive
    pub fn build(self) -> Result<Tariff, RatingError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| RatingError::invalid_tariff("tariff name is required"))?;
        let rate = self
            .rate
            .ok_or_else(|| RatingError::invalid_tariff(format!("tariff '{name}' has no rate")))?;
        let unit_divisor = self.unit_divisor.unwrap_or(Decimal::ONE);
        if unit_divisor <= Decimal::ZERO {
            return Err(RatingError::invalid_tariff(format!(
                "tariff '{name}' has a non-positive unit divisor: {unit_divisor}"
            )));
        }

        Ok(Tariff {
            id: self.id.unwrap_or_default(),
            name,
            unit: self.unit.unwrap_or_default(),
            unit_divisor,
            rate,
            tags: self.tags,
        })
    }
}

/// A tariff as written in configuration
///
/// The rate is given as a plain decimal in the catalog currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TariffDefinition {
    /// Product the tariff applies to
    #[validate(length(min = 1, message = "product is required"))]
    pub product: String,
    /// Fixed tariff id; random when absent
    #[serde(default)]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub unit: String,
    pub unit_divisor: Decimal,
    pub rate: Decimal,
    #[serde(default)]
    pub tags: Tags,
}

impl TariffDefinition {
    /// Validates the definition and builds the tariff in the given currency
    ///
    /// # Errors
    ///
    /// Returns `RatingError::InvalidTariff` if the definition fails validation
    pub fn to_tariff(&self, currency: Currency) -> Result<Tariff, RatingError> {
        self.validate()
            .map_err(|e| RatingError::invalid_tariff(format!("{}: {e}", self.product)))?;

        let mut builder = TariffBuilder::new()
            .name(self.name.clone())
            .unit(self.unit.clone())
            .unit_divisor(self.unit_divisor)
            .rate(Money::new(self.rate, currency))
            .tags(self.tags.clone());
        if let Some(id) = self.id {
            builder = builder.id(TariffId::from_uuid(id));
        }
        builder.build()
    }
}
