//! Reconstruction of typed records from pivoted query tables.
//!
//! Every semantic field is resolved by column NAME against the table header.
//! Column order drifts whenever the tag/field set or the result serialization
//! changes, so positional access is never used. A row that cannot be resolved
//! is an incomplete record: under [`Strictness::Strict`] (the default) the
//! whole load fails loudly, under [`Strictness::Lenient`] the row is skipped
//! with a warning. Silent zero-filling is never an option.

use tickvault_core::{Bar, BarSeries, Tick, TickSeries, UtcTimestamp, BOOK_DEPTH};

use crate::client::{QueryTable, RowView};
use crate::error::{MappingError, StoreError};

/// Missing-field policy for loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Fail the whole load on the first unresolvable row.
    #[default]
    Strict,
    /// Skip unresolvable rows and keep going.
    Lenient,
}

pub fn bars_from_table(
    table: &QueryTable,
    series: &BarSeries,
    strictness: Strictness,
) -> Result<Vec<Bar>, StoreError> {
    let mut bars = Vec::with_capacity(table.len());
    for (index, row) in table.rows().enumerate() {
        match bar_from_row(&row, series) {
            Ok(bar) => bars.push(bar),
            Err(error) => handle_row_error(strictness, index, error)?,
        }
    }
    bars.sort_by(|a, b| a.ts.cmp(&b.ts));
    Ok(bars)
}

pub fn ticks_from_table(
    table: &QueryTable,
    series: &TickSeries,
    strictness: Strictness,
) -> Result<Vec<Tick>, StoreError> {
    let mut ticks = Vec::with_capacity(table.len());
    for (index, row) in table.rows().enumerate() {
        match tick_from_row(&row, series) {
            Ok(tick) => ticks.push(tick),
            Err(error) => handle_row_error(strictness, index, error)?,
        }
    }
    ticks.sort_by(|a, b| a.ts.cmp(&b.ts));
    Ok(ticks)
}

fn handle_row_error(
    strictness: Strictness,
    index: usize,
    error: MappingError,
) -> Result<(), StoreError> {
    match strictness {
        Strictness::Strict => Err(error.into()),
        Strictness::Lenient => {
            tracing::warn!(row = index, %error, "skipping incomplete result row");
            Ok(())
        }
    }
}

fn bar_from_row(row: &RowView<'_>, series: &BarSeries) -> Result<Bar, MappingError> {
    Ok(Bar {
        symbol: series.symbol.clone(),
        venue: series.venue,
        interval: series.interval,
        ts: row.timestamp("_time")?,
        open: row.f64("open")?,
        high: row.f64("high")?,
        low: row.f64("low")?,
        close: row.f64("close")?,
        volume: row.f64("volume")?,
        turnover: row.f64("turnover")?,
        open_interest: row.f64("open_interest")?,
    })
}

fn tick_from_row(row: &RowView<'_>, series: &TickSeries) -> Result<Tick, MappingError> {
    let mut bid_price = [0.0; BOOK_DEPTH];
    let mut ask_price = [0.0; BOOK_DEPTH];
    let mut bid_volume = [0.0; BOOK_DEPTH];
    let mut ask_volume = [0.0; BOOK_DEPTH];
    for level in 0..BOOK_DEPTH {
        let n = level + 1;
        bid_price[level] = row.f64(&format!("bid_price_{n}"))?;
        ask_price[level] = row.f64(&format!("ask_price_{n}"))?;
        bid_volume[level] = row.f64(&format!("bid_volume_{n}"))?;
        ask_volume[level] = row.f64(&format!("ask_volume_{n}"))?;
    }

    let ts = row.timestamp("_time")?;
    // Stored as float seconds; an absent cell falls back to the event time.
    let local_ts = match row.get("localtime") {
        Some(value) => {
            let seconds = value.parse::<f64>().map_err(|_| MappingError::InvalidNumber {
                column: "localtime".to_string(),
                value: value.to_string(),
            })?;
            UtcTimestamp::from_unix_nanos((seconds * 1e9) as i128).ok()
        }
        None => None,
    };

    Ok(Tick {
        symbol: series.symbol.clone(),
        venue: series.venue,
        ts,
        local_ts,
        name: row.text("name")?.to_string(),
        volume: row.f64("volume")?,
        turnover: row.f64("turnover")?,
        open_interest: row.f64("open_interest")?,
        last_price: row.f64("last_price")?,
        last_volume: row.f64("last_volume")?,
        limit_up: row.f64("limit_up")?,
        limit_down: row.f64("limit_down")?,
        open: row.f64("open")?,
        high: row.f64("high")?,
        low: row.f64("low")?,
        pre_close: row.f64("pre_close")?,
        bid_price,
        ask_price,
        bid_volume,
        ask_volume,
    })
}
