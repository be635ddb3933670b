//! Product catalog entries and their per-record instances

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use domain_metering::Tags;

/// A product of the catalog
///
/// `tag_keys` lists the tags the product is billed by, in declaration order
/// and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductInfo {
    name: String,
    tag_keys: Vec<String>,
}

impl ProductInfo {
    /// Creates a product, dropping repeated tag keys after their first occurrence
    pub fn new<I, K>(name: impl Into<String>, tag_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut keys: Vec<String> = Vec::new();
        for key in tag_keys {
            let key = key.into();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        Self {
            name: name.into(),
            tag_keys: keys,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag_keys(&self) -> &[String] {
        &self.tag_keys
    }

    /// Returns true if the product is billed by the given tag
    pub fn recognises(&self, key: &str) -> bool {
        self.tag_keys.iter().any(|k| k == key)
    }
}

/// A catalog product as it applies to one record
///
/// The product itself is shared between all records of that product; the tag
/// values are owned by the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecordInfo {
    product: Arc<ProductInfo>,
    tags: Tags,
}

impl ProductRecordInfo {
    pub fn new(product: Arc<ProductInfo>, tags: Tags) -> Self {
        Self { product, tags }
    }

    /// Keeps only the record tags the product is billed by
    ///
    /// A product without declared tag keys keeps every tag.
    pub fn from_record_tags(product: Arc<ProductInfo>, record_tags: &Tags) -> Self {
        let tags = if product.tag_keys().is_empty() {
            record_tags.clone()
        } else {
            record_tags
                .iter()
                .filter(|(key, _)| product.recognises(key))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        };

        Self { product, tags }
    }

    pub fn product(&self) -> &Arc<ProductInfo> {
        &self.product
    }

    /// Name of the catalog product, used for the tariff lookup
    pub fn product_name(&self) -> &str {
        self.product.name()
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}
