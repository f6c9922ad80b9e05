//! Time-series database adapter for tickvault.
//!
//! [`Database`] stores and retrieves bar and tick series in an external
//! time-series database (InfluxDB v2 over HTTP, or anything implementing
//! [`TsdbClient`]) and keeps a cheap-to-read overview index — row count,
//! start, end per series — consistent with an append-only, possibly
//! out-of-order, possibly overlapping stream of writes.
//!
//! All calls are synchronous and blocking; the overview update strictly
//! follows write completion. The overview index assumes a single writer
//! process.

pub mod client;
pub mod error;
pub mod flux;
pub mod influx;
pub mod line;
pub mod map;
mod maintainer;
pub mod overview;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tickvault_core::{Bar, BarSeries, Tick, TickSeries, UtcTimestamp};

pub use client::{QueryTable, RowView, TsdbClient};
pub use error::{MappingError, StoreError};
pub use influx::InfluxClient;
pub use map::Strictness;
pub use overview::{BarOverview, JsonFileOverviewStore, OverviewStore, TickOverview};

/// Connection and behavior settings for [`Database`].
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub org: String,
    pub token: String,
    pub bucket: String,
    /// Where the overview index file lives.
    pub overview_path: PathBuf,
    pub timeout: Duration,
    /// Missing-field policy for loads.
    pub strictness: Strictness,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env_or("TICKVAULT_URL", "http://localhost:8086"),
            org: env_or("TICKVAULT_ORG", ""),
            token: env_or("TICKVAULT_TOKEN", ""),
            bucket: env_or("TICKVAULT_BUCKET", "market_data"),
            overview_path: resolve_tickvault_home().join("overview.json"),
            timeout: Duration::from_secs(30),
            strictness: Strictness::Strict,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn resolve_tickvault_home() -> PathBuf {
    if let Some(path) = env::var_os("TICKVAULT_HOME") {
        let path = PathBuf::from(path);
        if !path.as_os_str().is_empty() {
            return path;
        }
    }

    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home).join(".tickvault");
    }

    PathBuf::from(".tickvault")
}

/// The persistence adapter: explicit client + overview store, no process
/// globals.
#[derive(Clone)]
pub struct Database {
    config: DatabaseConfig,
    client: Arc<dyn TsdbClient>,
    overviews: Arc<dyn OverviewStore>,
}

impl Database {
    /// Connects using the HTTP client and the JSON-file overview store.
    pub fn connect(config: DatabaseConfig) -> Result<Self, StoreError> {
        let client = Arc::new(InfluxClient::new(&config)?);
        let overviews = Arc::new(JsonFileOverviewStore::open(config.overview_path.clone())?);
        Ok(Self::with_parts(config, client, overviews))
    }

    /// Assembles a database from explicit collaborators. Tests use this with
    /// a scripted client.
    pub fn with_parts(
        config: DatabaseConfig,
        client: Arc<dyn TsdbClient>,
        overviews: Arc<dyn OverviewStore>,
    ) -> Self {
        Self {
            config,
            client,
            overviews,
        }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Writes a bar batch and updates the series overview.
    ///
    /// All bars must belong to one series; a mixed batch fails fast before
    /// anything is written. The overview is not touched when the write
    /// fails. Partially-applied points are not rolled back (the engine has
    /// no multi-point transactions).
    pub fn save_bars(&self, bars: &[Bar]) -> Result<(), StoreError> {
        let series = line::bar_batch_series(bars)?;
        for bar in bars {
            bar.validate()?;
        }

        let lines = line::encode_bars(&series, bars);
        self.client.write_lines(&self.config.bucket, &lines)?;
        tracing::info!(series = %series.key(), rows = bars.len(), "wrote bar batch");

        let (start, end) = batch_bounds(bars.iter().map(|bar| bar.ts));
        maintainer::update_bar_overview(
            self.client.as_ref(),
            self.overviews.as_ref(),
            &self.config.bucket,
            &series,
            start,
            end,
            bars.len() as u64,
        )
    }

    /// Writes a tick batch and updates the series overview.
    pub fn save_ticks(&self, ticks: &[Tick]) -> Result<(), StoreError> {
        let series = line::tick_batch_series(ticks)?;
        for tick in ticks {
            tick.validate()?;
        }

        let lines = line::encode_ticks(&series, ticks);
        self.client.write_lines(&self.config.bucket, &lines)?;
        tracing::info!(series = %series.key(), rows = ticks.len(), "wrote tick batch");

        let (start, end) = batch_bounds(ticks.iter().map(|tick| tick.ts));
        maintainer::update_tick_overview(
            self.client.as_ref(),
            self.overviews.as_ref(),
            &self.config.bucket,
            &series,
            start,
            end,
            ticks.len() as u64,
        )
    }

    /// Loads bars for one series over the half-open interval `[start, end)`,
    /// chronologically ordered, possibly empty.
    pub fn load_bars(
        &self,
        series: &BarSeries,
        start: UtcTimestamp,
        end: UtcTimestamp,
    ) -> Result<Vec<Bar>, StoreError> {
        let flux = flux::bar_range_query(&self.config.bucket, series, start, end);
        let table = self.client.query(&flux)?;
        tracing::debug!(series = %series.key(), rows = table.len(), "loaded bar table");
        map::bars_from_table(&table, series, self.config.strictness)
    }

    pub fn load_ticks(
        &self,
        series: &TickSeries,
        start: UtcTimestamp,
        end: UtcTimestamp,
    ) -> Result<Vec<Tick>, StoreError> {
        let flux = flux::tick_range_query(&self.config.bucket, series, start, end);
        let table = self.client.query(&flux)?;
        tracing::debug!(series = %series.key(), rows = table.len(), "loaded tick table");
        map::ticks_from_table(&table, series, self.config.strictness)
    }

    /// Removes all data for a bar series and its overview entry, returning
    /// the row count observed before deletion.
    ///
    /// Count and delete are two non-atomic calls; a failure between them
    /// surfaces as an error, never as a count of zero.
    pub fn delete_bars(&self, series: &BarSeries) -> Result<u64, StoreError> {
        let now = UtcTimestamp::now();
        let count = self
            .client
            .query(&flux::bar_count_query(&self.config.bucket, series, now))?
            .count_value()?;

        self.client.delete_range(
            &self.config.bucket,
            flux::EPOCH_FLOOR,
            &now.format_rfc3339(),
            &flux::bar_delete_predicate(series),
        )?;
        self.overviews.remove_bar_overview(&series.key())?;
        tracing::info!(series = %series.key(), rows = count, "deleted bar series");
        Ok(count)
    }

    pub fn delete_ticks(&self, series: &TickSeries) -> Result<u64, StoreError> {
        let now = UtcTimestamp::now();
        let count = self
            .client
            .query(&flux::tick_count_query(&self.config.bucket, series, now))?
            .count_value()?;

        self.client.delete_range(
            &self.config.bucket,
            flux::EPOCH_FLOOR,
            &now.format_rfc3339(),
            &flux::tick_delete_predicate(series),
        )?;
        self.overviews.remove_tick_overview(&series.key())?;
        tracing::info!(series = %series.key(), rows = count, "deleted tick series");
        Ok(count)
    }

    /// All bar-series overviews, unordered.
    pub fn get_bar_overviews(&self) -> Result<Vec<BarOverview>, StoreError> {
        self.overviews.bar_overviews()
    }

    /// All tick-series overviews, unordered.
    pub fn get_tick_overviews(&self) -> Result<Vec<TickOverview>, StoreError> {
        self.overviews.tick_overviews()
    }
}

fn batch_bounds(timestamps: impl Iterator<Item = UtcTimestamp>) -> (UtcTimestamp, UtcTimestamp) {
    // Batches may arrive unordered, so scan the whole batch instead of
    // trusting first/last. Callers guarantee non-emptiness.
    let mut bounds: Option<(UtcTimestamp, UtcTimestamp)> = None;
    for ts in timestamps {
        bounds = Some(match bounds {
            None => (ts, ts),
            Some((start, end)) => (start.min(ts), end.max(ts)),
        });
    }
    bounds.expect("batch_bounds requires a non-empty batch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_bounds_scans_unordered_batches() {
        let a = UtcTimestamp::parse("2024-03-02T00:00:00Z").expect("ts");
        let b = UtcTimestamp::parse("2024-03-01T00:00:00Z").expect("ts");
        let c = UtcTimestamp::parse("2024-03-04T00:00:00Z").expect("ts");
        let (start, end) = batch_bounds([a, b, c].into_iter());
        assert_eq!(start, b);
        assert_eq!(end, c);
    }

    #[test]
    fn default_config_resolves_bucket_and_home() {
        let config = DatabaseConfig::default();
        assert!(!config.bucket.is_empty());
        assert!(config.overview_path.ends_with("overview.json"));
        assert_eq!(config.strictness, Strictness::Strict);
    }
}
