//! Tag-schema resolver
//!
//! Resolves products and customers from two configured tag keys: the product
//! tag names a catalog product, the customer tag is looked up in a customer
//! directory.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use domain_metering::{BillingRecord, RawRecord};

use crate::customer::Customer;
use crate::error::GuidingFailure;
use crate::ports::{CustomerResolver, ProductResolver};
use crate::product::{ProductInfo, ProductRecordInfo};

/// Configuration driven product and customer resolution
#[derive(Debug, Clone)]
pub struct TagSchemaResolver {
    product_tag: String,
    customer_tag: String,
    products: HashMap<String, Arc<ProductInfo>>,
    customers: HashMap<String, Customer>,
}

impl TagSchemaResolver {
    /// Creates a resolver with empty product and customer directories
    pub fn new(product_tag: impl Into<String>, customer_tag: impl Into<String>) -> Self {
        Self {
            product_tag: product_tag.into(),
            customer_tag: customer_tag.into(),
            products: HashMap::new(),
            customers: HashMap::new(),
        }
    }

    /// Registers a product under its name
    pub fn with_product(mut self, product: ProductInfo) -> Self {
        self.products
            .insert(product.name().to_string(), Arc::new(product));
        self
    }

    /// Registers the customer billed for a customer tag value
    pub fn with_customer(mut self, tag_value: impl Into<String>, customer: Customer) -> Self {
        self.customers.insert(tag_value.into(), customer);
        self
    }

    pub fn product_tag(&self) -> &str {
        &self.product_tag
    }

    pub fn customer_tag(&self) -> &str {
        &self.customer_tag
    }

    /// Looks up a registered product by name
    pub fn product(&self, name: &str) -> Option<&Arc<ProductInfo>> {
        self.products.get(name)
    }

    fn tag_value<'r>(&self, record: &'r RawRecord, key: &str) -> Result<&'r str, GuidingFailure> {
        record
            .tags()
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GuidingFailure::missing_tag(record, key))
    }
}

impl ProductResolver for TagSchemaResolver {
    fn resolve(&self, record: &RawRecord) -> Result<ProductRecordInfo, GuidingFailure> {
        let name = self.tag_value(record, &self.product_tag)?;
        let product = self
            .products
            .get(name)
            .ok_or_else(|| GuidingFailure::unknown_product(record, name))?;

        trace!(record_id = %record.id(), product = name, "Product resolved from tags");
        Ok(ProductRecordInfo::from_record_tags(Arc::clone(product), record.tags()))
    }
}

impl CustomerResolver for TagSchemaResolver {
    fn resolve(&self, record: &RawRecord) -> Result<Customer, GuidingFailure> {
        let value = self.tag_value(record, &self.customer_tag)?;
        let customer = self
            .customers
            .get(value)
            .ok_or_else(|| GuidingFailure::unknown_customer(record, value))?;

        trace!(record_id = %record.id(), customer = %customer.name, "Customer resolved from tags");
        Ok(customer.clone())
    }
}
