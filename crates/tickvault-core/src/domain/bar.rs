use serde::{Deserialize, Serialize};

use crate::series::BarSeries;
use crate::{Interval, Symbol, UtcTimestamp, ValidationError, Venue};

/// One price bar. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: Symbol,
    pub venue: Venue,
    pub interval: Interval,
    pub ts: UtcTimestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub turnover: f64,
    pub open_interest: f64,
}

impl Bar {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: Symbol,
        venue: Venue,
        interval: Interval,
        ts: UtcTimestamp,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        turnover: f64,
        open_interest: f64,
    ) -> Result<Self, ValidationError> {
        let bar = Self {
            symbol,
            venue,
            interval,
            ts,
            open,
            high,
            low,
            close,
            volume,
            turnover,
            open_interest,
        };
        bar.validate()?;
        Ok(bar)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_finite("open", self.open)?;
        require_finite("high", self.high)?;
        require_finite("low", self.low)?;
        require_finite("close", self.close)?;
        require_non_negative("volume", self.volume)?;
        require_non_negative("turnover", self.turnover)?;
        require_non_negative("open_interest", self.open_interest)?;

        if self.high < self.low {
            return Err(ValidationError::InvalidBarRange);
        }
        if self.open < self.low
            || self.open > self.high
            || self.close < self.low
            || self.close > self.high
        {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(())
    }

    pub fn series(&self) -> BarSeries {
        BarSeries::new(self.symbol.clone(), self.venue, self.interval)
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
