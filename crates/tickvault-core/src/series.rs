use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Interval, Symbol, Venue};

/// Identity of a stored bar series: instrument, venue and interval.
///
/// The string key is `"{symbol}.{venue}_{interval}"`, e.g. `AAPL.NASDAQ_d`.
/// It is stable because symbols cannot contain dots and venue/interval wire
/// values are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub venue: Venue,
    pub interval: Interval,
}

impl BarSeries {
    pub fn new(symbol: Symbol, venue: Venue, interval: Interval) -> Self {
        Self {
            symbol,
            venue,
            interval,
        }
    }

    /// Instrument identifier without the interval, e.g. `AAPL.NASDAQ`.
    pub fn instrument(&self) -> String {
        format!("{}.{}", self.symbol, self.venue)
    }

    pub fn key(&self) -> String {
        format!("{}.{}_{}", self.symbol, self.venue, self.interval)
    }
}

impl Display for BarSeries {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}

/// Identity of a stored tick series: instrument and venue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickSeries {
    pub symbol: Symbol,
    pub venue: Venue,
}

impl TickSeries {
    pub fn new(symbol: Symbol, venue: Venue) -> Self {
        Self { symbol, venue }
    }

    pub fn key(&self) -> String {
        format!("{}.{}", self.symbol, self.venue)
    }
}

impl Display for TickSeries {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key())
    }
}
