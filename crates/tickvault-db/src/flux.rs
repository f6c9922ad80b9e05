//! Flux query builders for the adapter's four query shapes: range+pivot
//! loads, authoritative counts, and delete predicates.

use tickvault_core::{BarSeries, TickSeries, UtcTimestamp};

use crate::line::{BAR_MEASUREMENT, TICK_MEASUREMENT};

/// Earliest timestamp the adapter ever considers. Counts and deletes cover
/// `[EPOCH_FLOOR, now]`.
pub const EPOCH_FLOOR: &str = "2000-01-01T00:00:00Z";

/// Range + filter + pivot load over `[start, end)` for one bar series.
pub fn bar_range_query(
    bucket: &str,
    series: &BarSeries,
    start: UtcTimestamp,
    end: UtcTimestamp,
) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {start}, stop: {end})
  |> filter(fn: (r) =>
      r._measurement == "{measurement}" and
      r.symbol == "{symbol}" and
      r.venue == "{venue}" and
      r.interval == "{interval}"
  )
  |> pivot(rowKey: ["_time"], columnKey: ["_field"], valueColumn: "_value")"#,
        bucket = escape_flux_string(bucket),
        start = start.format_rfc3339(),
        end = end.format_rfc3339(),
        measurement = BAR_MEASUREMENT,
        symbol = escape_flux_string(series.symbol.as_str()),
        venue = series.venue.as_str(),
        interval = series.interval.as_str(),
    )
}

pub fn tick_range_query(
    bucket: &str,
    series: &TickSeries,
    start: UtcTimestamp,
    end: UtcTimestamp,
) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {start}, stop: {end})
  |> filter(fn: (r) =>
      r._measurement == "{measurement}" and
      r.symbol == "{symbol}" and
      r.venue == "{venue}"
  )
  |> pivot(rowKey: ["_time"], columnKey: ["_field"], valueColumn: "_value")"#,
        bucket = escape_flux_string(bucket),
        start = start.format_rfc3339(),
        end = end.format_rfc3339(),
        measurement = TICK_MEASUREMENT,
        symbol = escape_flux_string(series.symbol.as_str()),
        venue = series.venue.as_str(),
    )
}

/// Authoritative full-range row count for a bar series, counting the close
/// field (exactly one close per stored bar).
pub fn bar_count_query(bucket: &str, series: &BarSeries, now: UtcTimestamp) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {floor}, stop: {now})
  |> filter(fn: (r) =>
      r._measurement == "{measurement}" and
      r.symbol == "{symbol}" and
      r.venue == "{venue}" and
      r.interval == "{interval}" and
      r._field == "close"
  )
  |> count()
  |> yield(name: "count")"#,
        bucket = escape_flux_string(bucket),
        floor = EPOCH_FLOOR,
        now = now.format_rfc3339(),
        measurement = BAR_MEASUREMENT,
        symbol = escape_flux_string(series.symbol.as_str()),
        venue = series.venue.as_str(),
        interval = series.interval.as_str(),
    )
}

/// Tick row count over the representative `last_price` field.
pub fn tick_count_query(bucket: &str, series: &TickSeries, now: UtcTimestamp) -> String {
    format!(
        r#"from(bucket: "{bucket}")
  |> range(start: {floor}, stop: {now})
  |> filter(fn: (r) =>
      r._measurement == "{measurement}" and
      r.symbol == "{symbol}" and
      r.venue == "{venue}" and
      r._field == "last_price"
  )
  |> count()
  |> yield(name: "count")"#,
        bucket = escape_flux_string(bucket),
        floor = EPOCH_FLOOR,
        now = now.format_rfc3339(),
        measurement = TICK_MEASUREMENT,
        symbol = escape_flux_string(series.symbol.as_str()),
        venue = series.venue.as_str(),
    )
}

/// Delete predicate selecting every point of one bar series.
pub fn bar_delete_predicate(series: &BarSeries) -> String {
    format!(
        r#"_measurement="{measurement}" AND symbol="{symbol}" AND venue="{venue}" AND interval="{interval}""#,
        measurement = BAR_MEASUREMENT,
        symbol = series.symbol.as_str(),
        venue = series.venue.as_str(),
        interval = series.interval.as_str(),
    )
}

pub fn tick_delete_predicate(series: &TickSeries) -> String {
    format!(
        r#"_measurement="{measurement}" AND symbol="{symbol}" AND venue="{venue}""#,
        measurement = TICK_MEASUREMENT,
        symbol = series.symbol.as_str(),
        venue = series.venue.as_str(),
    )
}

fn escape_flux_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use tickvault_core::{Interval, Symbol, Venue};

    use super::*;

    fn bar_series() -> BarSeries {
        BarSeries::new(Symbol::new("AAPL").expect("symbol"), Venue::Nasdaq, Interval::Daily)
    }

    #[test]
    fn range_query_filters_and_pivots() {
        let start = UtcTimestamp::parse("2024-03-01T00:00:00Z").expect("ts");
        let end = UtcTimestamp::parse("2024-03-05T00:00:00Z").expect("ts");
        let flux = bar_range_query("market_data", &bar_series(), start, end);

        assert!(flux.contains(r#"from(bucket: "market_data")"#));
        assert!(flux.contains("range(start: 2024-03-01T00:00:00Z, stop: 2024-03-05T00:00:00Z)"));
        assert!(flux.contains(r#"r.symbol == "AAPL""#));
        assert!(flux.contains(r#"r.interval == "d""#));
        assert!(flux.contains("pivot(rowKey: [\"_time\"], columnKey: [\"_field\"]"));
    }

    #[test]
    fn count_query_targets_close_field_from_epoch_floor() {
        let now = UtcTimestamp::parse("2024-03-10T00:00:00Z").expect("ts");
        let flux = bar_count_query("market_data", &bar_series(), now);

        assert!(flux.contains(&format!("range(start: {EPOCH_FLOOR}, stop: 2024-03-10T00:00:00Z)")));
        assert!(flux.contains(r#"r._field == "close""#));
        assert!(flux.contains("count()"));
    }

    #[test]
    fn tick_count_uses_last_price() {
        let series = TickSeries::new(Symbol::new("rb2405").expect("symbol"), Venue::Shfe);
        let now = UtcTimestamp::parse("2024-03-10T00:00:00Z").expect("ts");
        let flux = tick_count_query("market_data", &series, now);
        assert!(flux.contains(r#"r._field == "last_price""#));
        assert!(!flux.contains("interval"));
    }

    #[test]
    fn delete_predicate_pins_all_series_tags() {
        let predicate = bar_delete_predicate(&bar_series());
        assert_eq!(
            predicate,
            r#"_measurement="bar" AND symbol="AAPL" AND venue="NASDAQ" AND interval="d""#
        );
    }
}
