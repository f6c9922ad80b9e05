//! Core domain model for tickvault.
//!
//! This crate contains:
//! - Canonical market-data records (price bars and quote ticks) with validation
//! - Venue and interval identifiers and their wire values
//! - Canonical-UTC timestamps
//! - Series keys scoping a stored time-series

pub mod domain;
pub mod error;
pub mod series;

pub use domain::{Bar, Interval, Symbol, Tick, UtcTimestamp, Venue, BOOK_DEPTH};
pub use error::ValidationError;
pub use series::{BarSeries, TickSeries};
