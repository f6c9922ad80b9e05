use serde::{Deserialize, Serialize};

use crate::series::TickSeries;
use crate::{Symbol, UtcTimestamp, ValidationError, Venue};

/// Order-book depth carried on a tick.
pub const BOOK_DEPTH: usize = 5;

/// One quote tick. Immutable once constructed.
///
/// `local_ts` is the local receipt time; when absent it defaults to the
/// event timestamp at write time (data-quality normalization, not an error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub symbol: Symbol,
    pub venue: Venue,
    pub ts: UtcTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_ts: Option<UtcTimestamp>,
    pub name: String,

    pub volume: f64,
    pub turnover: f64,
    pub open_interest: f64,
    pub last_price: f64,
    pub last_volume: f64,
    pub limit_up: f64,
    pub limit_down: f64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub pre_close: f64,

    pub bid_price: [f64; BOOK_DEPTH],
    pub ask_price: [f64; BOOK_DEPTH],
    pub bid_volume: [f64; BOOK_DEPTH],
    pub ask_volume: [f64; BOOK_DEPTH],
}

impl Tick {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("last_price", self.last_price),
            ("last_volume", self.last_volume),
            ("limit_up", self.limit_up),
            ("limit_down", self.limit_down),
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("pre_close", self.pre_close),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
        }
        for (field, value) in [
            ("volume", self.volume),
            ("turnover", self.turnover),
            ("open_interest", self.open_interest),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteValue { field });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeValue { field });
            }
        }
        for side in [
            &self.bid_price,
            &self.ask_price,
            &self.bid_volume,
            &self.ask_volume,
        ] {
            if side.iter().any(|level| !level.is_finite()) {
                return Err(ValidationError::NonFiniteValue { field: "book" });
            }
        }
        Ok(())
    }

    /// Local receipt time, falling back to the event timestamp.
    pub fn local_or_event_ts(&self) -> UtcTimestamp {
        self.local_ts.unwrap_or(self.ts)
    }

    pub fn series(&self) -> TickSeries {
        TickSeries::new(self.symbol.clone(), self.venue)
    }
}
