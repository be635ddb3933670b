//! Rating Domain - Tariffs and priced records
//!
//! Rating is the last stage of the billing pipeline. A guided record is
//! matched to a tariff of the [`TariffCatalog`] by its product name and
//! priced:
//!
//! ```text
//! amount = rate × round(quantity ÷ unit divisor, 5 places, half up)
//! ```
//!
//! The quantity is the metered value for value records and the metered
//! duration in whole seconds for interval records.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_rating::{build_catalog, RatingEngine};
//!
//! let catalog = build_catalog(Currency::EUR);
//! let rated = RatingEngine::new(&catalog).rate(&guided)?;
//! println!("{} costs {}", rated.tariff().name(), rated.amount());
//! ```

pub mod tariff;
pub mod catalog;
pub mod rated;
pub mod engine;
pub mod error;

pub use tariff::{Tariff, TariffBuilder, TariffDefinition};
pub use catalog::{build_catalog, TariffCatalog};
pub use rated::{rate_quantity, RatedRecord, RatedRecordBuilder, RATING_PRECISION};
pub use engine::RatingEngine;
pub use error::RatingError;
