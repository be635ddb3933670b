//! Pipeline configuration
//!
//! Values come from an optional `billing.toml` next to the working directory,
//! overridden by `BILLING_*` environment variables (`BILLING_CURRENCY=CHF`,
//! `BILLING_WORKERS=8`, ...). Products, customers and tariffs are lists and
//! are normally given in the file.

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::Currency;
use domain_guiding::{Customer, ProductInfo, TagSchemaResolver};
use domain_rating::{build_catalog, TariffCatalog, TariffDefinition};

use crate::error::PipelineError;

/// Format of the log output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A product and the tags it is billed by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProductEntry {
    #[validate(length(min = 1, message = "product name is required"))]
    pub name: String,
    #[serde(default)]
    pub tag_keys: Vec<String>,
}

/// A customer and the customer tag value that identifies it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CustomerEntry {
    #[validate(length(min = 1, message = "customer tag value is required"))]
    pub tag_value: String,
    #[validate(length(min = 1, message = "customer name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "cost reference is required"))]
    pub cost_reference: String,
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// ISO code of the currency all tariffs are priced in
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Log level (trace, debug, info, warn, error) or an `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Upper bound on parallel workers for batch processing
    #[serde(default = "default_workers")]
    #[validate(range(min = 1, max = 1024, message = "workers must be between 1 and 1024"))]
    pub workers: usize,
    /// Tag naming the product of a record
    #[serde(default = "default_product_tag")]
    #[validate(length(min = 1, message = "product tag is required"))]
    pub product_tag: String,
    /// Tag identifying the customer of a record
    #[serde(default = "default_customer_tag")]
    #[validate(length(min = 1, message = "customer tag is required"))]
    pub customer_tag: String,
    /// Known products; defaults to one product per catalog tariff
    #[serde(default)]
    pub products: Vec<ProductEntry>,
    #[serde(default)]
    pub customers: Vec<CustomerEntry>,
    /// Tariffs; the standard cluster catalog when empty
    #[serde(default)]
    pub tariffs: Vec<TariffDefinition>,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_workers() -> usize {
    4
}

fn default_product_tag() -> String {
    "product".to_string()
}

fn default_customer_tag() -> String {
    "customer".to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            workers: default_workers(),
            product_tag: default_product_tag(),
            customer_tag: default_customer_tag(),
            products: Vec::new(),
            customers: Vec::new(),
            tariffs: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Loads `billing.toml` (if present) and `BILLING_*` environment variables
    pub fn load() -> Result<Self, PipelineError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::with_name("billing").required(false))
            .add_source(config::Environment::with_prefix("BILLING").try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    /// Parses a TOML document
    pub fn from_toml(source: &str) -> Result<Self, PipelineError> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    /// Validates field ranges and the currency code
    pub fn check(&self) -> Result<(), PipelineError> {
        self.validate()?;
        for product in &self.products {
            product.validate()?;
        }
        for customer in &self.customers {
            customer.validate()?;
        }
        self.currency()?;
        Ok(())
    }

    pub fn currency(&self) -> Result<Currency, PipelineError> {
        self.currency
            .parse()
            .map_err(|e| PipelineError::configuration(format!("{e}")))
    }

    /// Builds the tariff catalog
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unknown currency and a rating
    /// error for invalid or duplicate tariffs
    pub fn tariff_catalog(&self) -> Result<TariffCatalog, PipelineError> {
        let currency = self.currency()?;
        if self.tariffs.is_empty() {
            return Ok(build_catalog(currency));
        }
        Ok(TariffCatalog::from_definitions(&self.tariffs, currency)?)
    }

    /// Builds the tag-schema resolver for products and customers
    ///
    /// Without configured products every catalog product is known and keeps
    /// all record tags.
    pub fn resolver(&self, catalog: &TariffCatalog) -> TagSchemaResolver {
        let mut resolver = TagSchemaResolver::new(&self.product_tag, &self.customer_tag);

        if self.products.is_empty() {
            for name in catalog.products() {
                resolver = resolver.with_product(ProductInfo::new(name, Vec::<String>::new()));
            }
        } else {
            for product in &self.products {
                resolver = resolver
                    .with_product(ProductInfo::new(&product.name, product.tag_keys.iter().cloned()));
            }
        }

        for entry in &self.customers {
            resolver = resolver.with_customer(
                &entry.tag_value,
                Customer::new(&entry.name, &entry.cost_reference),
            );
        }

        resolver
    }
}
