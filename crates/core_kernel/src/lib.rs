//! Core Kernel - Foundational types and utilities for the billing pipeline
//!
//! This crate provides the fundamental building blocks used across the
//! metering, guiding and rating domains:
//! - Money types with precise decimal arithmetic
//! - Record timestamps and metered intervals
//! - Strongly typed identifiers
//! - The shared record-state error

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod error;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{RecordTimestamps, MeteredInterval, TemporalError};
pub use identifiers::{RecordId, TariffId};
pub use error::{CoreError, InvalidRecordState};
