//! Tariff catalog
//!
//! Maps product names to tariffs. A catalog is assembled once and then only
//! read, so it can be shared between threads behind an `Arc`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::{uuid, Uuid};

use core_kernel::{Currency, Money, TariffId};
use domain_guiding::Customer;

use crate::error::RatingError;
use crate::tariff::{Tariff, TariffDefinition};

/// Immutable product → tariff mapping
#[derive(Debug, Clone, Default)]
pub struct TariffCatalog {
    tariffs: HashMap<String, Arc<Tariff>>,
}

impl TariffCatalog {
    /// Creates a catalog from (product name, tariff) pairs
    ///
    /// # Errors
    ///
    /// Returns `RatingError::DuplicateTariff` if a product appears twice
    pub fn new<I, P>(entries: I) -> Result<Self, RatingError>
    where
        I: IntoIterator<Item = (P, Tariff)>,
        P: Into<String>,
    {
        let mut tariffs = HashMap::new();
        for (product, tariff) in entries {
            let product = product.into();
            if tariffs.contains_key(&product) {
                return Err(RatingError::DuplicateTariff(product));
            }
            tariffs.insert(product, Arc::new(tariff));
        }
        Ok(Self { tariffs })
    }

    /// Creates a catalog from configured definitions, pricing in `currency`
    ///
    /// # Errors
    ///
    /// Returns `RatingError::InvalidTariff` for an invalid definition and
    /// `RatingError::DuplicateTariff` if a product is defined twice
    pub fn from_definitions(
        definitions: &[TariffDefinition],
        currency: Currency,
    ) -> Result<Self, RatingError> {
        let entries = definitions
            .iter()
            .map(|d| Ok((d.product.clone(), d.to_tariff(currency)?)))
            .collect::<Result<Vec<_>, RatingError>>()?;

        let catalog = Self::new(entries)?;
        info!(tariffs = catalog.len(), %currency, "Loaded tariff catalog");
        Ok(catalog)
    }

    /// Finds the tariff for a product
    ///
    /// Tariffs are selected by product name; the customer is reported in the
    /// error but does not take part in the match.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::TariffNotFound` if no tariff covers the product
    pub fn lookup(&self, product_name: &str, customer: &Customer) -> Result<Arc<Tariff>, RatingError> {
        match self.tariffs.get(product_name) {
            Some(tariff) => {
                debug!(product = product_name, tariff_id = %tariff.id(), "Tariff found");
                Ok(Arc::clone(tariff))
            }
            None => Err(RatingError::tariff_not_found(customer.to_string(), product_name)),
        }
    }

    pub fn get(&self, product_name: &str) -> Option<&Arc<Tariff>> {
        self.tariffs.get(product_name)
    }

    /// Product names covered by the catalog, in no particular order
    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.tariffs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tariffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tariffs.is_empty()
    }
}

struct StandardTariff {
    product: &'static str,
    id: Uuid,
    name: &'static str,
    unit: &'static str,
    unit_divisor: Decimal,
    rate: Decimal,
}

const STANDARD_TARIFFS: [StandardTariff; 5] = [
    StandardTariff {
        product: "POD",
        id: uuid!("451dd39a-a8bf-4063-acf5-e3c89ad98287"),
        name: "Base Rate Single POD",
        unit: "Hourly Usage",
        unit_divisor: dec!(60),
        rate: dec!(0.1),
    },
    StandardTariff {
        product: "CPU",
        id: uuid!("e3fc0fc2-96f0-439e-9743-dc5cf750093b"),
        name: "CPU Usage",
        unit: "mCore",
        unit_divisor: dec!(1000),
        rate: dec!(0.5),
    },
    StandardTariff {
        product: "Memory",
        id: uuid!("eb3f8469-89b2-4094-8014-a471f527699d"),
        name: "RAM Usage",
        unit: "MB",
        unit_divisor: dec!(1),
        rate: dec!(0.01),
    },
    // priced per GBit, reported in kBit
    StandardTariff {
        product: "Network",
        id: uuid!("ddf90e50-e906-4260-99e6-9aab4f7c1fe7"),
        name: "Network Usage",
        unit: "kbit I/O",
        unit_divisor: dec!(1048576),
        rate: dec!(0.1),
    },
    // priced per day, reported in minutes
    StandardTariff {
        product: "Storage",
        id: uuid!("86cf3529-9ee5-4f0f-897e-2c31ff7cc545"),
        name: "Storage Usage",
        unit: "GB",
        unit_divisor: dec!(1440),
        rate: dec!(0.0027777777),
    },
];

/// Builds the standard cluster catalog (POD, CPU, Memory, Network, Storage)
/// with all rates in `currency`
pub fn build_catalog(currency: Currency) -> TariffCatalog {
    let tariffs = STANDARD_TARIFFS
        .iter()
        .map(|t| {
            let tariff = Tariff::from_parts(
                TariffId::from_uuid(t.id),
                t.name,
                t.unit,
                t.unit_divisor,
                Money::new(t.rate, currency),
            );
            (t.product.to_string(), Arc::new(tariff))
        })
        .collect();

    TariffCatalog { tariffs }
}
