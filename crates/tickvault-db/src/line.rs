//! Line-protocol encoding for bar and tick batches.
//!
//! Every numeric field is written as a float regardless of its domain type:
//! the engine types fields per name on first write, and a later write with a
//! different type is rejected. Tag values are escaped per the line-protocol
//! rules; the tick display name travels as a quoted string field.

use std::fmt::Write as _;

use tickvault_core::{Bar, BarSeries, Tick, TickSeries, BOOK_DEPTH};

use crate::error::StoreError;

pub const BAR_MEASUREMENT: &str = "bar";
pub const TICK_MEASUREMENT: &str = "tick";

/// Resolves the series key shared by a bar batch, rejecting empty batches
/// and batches mixing series.
pub fn bar_batch_series(bars: &[Bar]) -> Result<BarSeries, StoreError> {
    let first = bars.first().ok_or(StoreError::EmptyBatch)?;
    let series = first.series();
    for bar in &bars[1..] {
        let found = bar.series();
        if found != series {
            return Err(StoreError::InvalidBatch {
                expected: series.key(),
                found: found.key(),
            });
        }
    }
    Ok(series)
}

/// Same contract for tick batches.
pub fn tick_batch_series(ticks: &[Tick]) -> Result<TickSeries, StoreError> {
    let first = ticks.first().ok_or(StoreError::EmptyBatch)?;
    let series = first.series();
    for tick in &ticks[1..] {
        let found = tick.series();
        if found != series {
            return Err(StoreError::InvalidBatch {
                expected: series.key(),
                found: found.key(),
            });
        }
    }
    Ok(series)
}

pub fn encode_bars(series: &BarSeries, bars: &[Bar]) -> String {
    let mut out = String::with_capacity(bars.len() * 128);
    for bar in bars {
        let _ = write!(
            out,
            "{},symbol={},venue={},interval={} ",
            BAR_MEASUREMENT,
            escape_tag(bar.symbol.as_str()),
            series.venue.as_str(),
            series.interval.as_str(),
        );
        let _ = write!(
            out,
            "open={},high={},low={},close={},volume={},turnover={},open_interest={}",
            bar.open, bar.high, bar.low, bar.close, bar.volume, bar.turnover, bar.open_interest,
        );
        let _ = writeln!(out, " {}", bar.ts.unix_nanos());
    }
    out
}

pub fn encode_ticks(series: &TickSeries, ticks: &[Tick]) -> String {
    let mut out = String::with_capacity(ticks.len() * 512);
    for tick in ticks {
        let _ = write!(
            out,
            "{},symbol={},venue={} ",
            TICK_MEASUREMENT,
            escape_tag(tick.symbol.as_str()),
            series.venue.as_str(),
        );
        let _ = write!(
            out,
            "name=\"{}\",volume={},turnover={},open_interest={},last_price={},last_volume={},limit_up={},limit_down={}",
            escape_string_field(&tick.name),
            tick.volume,
            tick.turnover,
            tick.open_interest,
            tick.last_price,
            tick.last_volume,
            tick.limit_up,
            tick.limit_down,
        );
        let _ = write!(
            out,
            ",open={},high={},low={},pre_close={}",
            tick.open, tick.high, tick.low, tick.pre_close,
        );
        for level in 0..BOOK_DEPTH {
            let _ = write!(
                out,
                ",bid_price_{n}={},ask_price_{n}={},bid_volume_{n}={},ask_volume_{n}={}",
                tick.bid_price[level],
                tick.ask_price[level],
                tick.bid_volume[level],
                tick.ask_volume[level],
                n = level + 1,
            );
        }
        // Local receipt time travels as float seconds, defaulting to the
        // event timestamp when the feed did not stamp one.
        let local_seconds = tick.local_or_event_ts().unix_nanos() as f64 / 1e9;
        let _ = write!(out, ",localtime={local_seconds}");
        let _ = writeln!(out, " {}", tick.ts.unix_nanos());
    }
    out
}

/// Escapes commas, spaces and equals signs in tag values.
fn escape_tag(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, ',' | ' ' | '=') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escapes backslashes and double quotes in string field values.
fn escape_string_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
