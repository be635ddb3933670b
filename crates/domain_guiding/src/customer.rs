//! Billed customers

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// The party a guided record is billed to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct Customer {
    /// Display name of the customer
    #[validate(length(min = 1))]
    pub name: String,
    /// Cost center or account reference the charges are booked against
    #[validate(length(min = 1))]
    pub cost_reference: String,
}

impl Customer {
    pub fn new(name: impl Into<String>, cost_reference: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost_reference: cost_reference.into(),
        }
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.cost_reference)
    }
}
