//! The overview index: a durable key-value table summarizing each stored
//! series (row count, start, end) so coverage queries never scan raw data.
//!
//! The store is deliberately small: single-key get/put/remove plus listing.
//! It offers single-key atomicity only and assumes a single writer process;
//! it is NOT transactional with the database write, so a crash between the
//! write and the overview update leaves the overview stale until the next
//! write to that series recounts it.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use tickvault_core::{BarSeries, TickSeries, UtcTimestamp};

use crate::error::StoreError;

/// Summary of one bar series. `start <= end` whenever `count > 0`; `count`
/// reflects the authoritative database row count, not merely rows written
/// through this process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarOverview {
    pub series: BarSeries,
    pub count: u64,
    pub start: UtcTimestamp,
    pub end: UtcTimestamp,
}

/// Summary of one tick series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOverview {
    pub series: TickSeries,
    pub count: u64,
    pub start: UtcTimestamp,
    pub end: UtcTimestamp,
}

/// Durable mapping from series key to overview.
pub trait OverviewStore: Send + Sync {
    fn bar_overview(&self, key: &str) -> Result<Option<BarOverview>, StoreError>;
    fn put_bar_overview(&self, key: &str, overview: &BarOverview) -> Result<(), StoreError>;
    fn remove_bar_overview(&self, key: &str) -> Result<(), StoreError>;
    fn bar_overviews(&self) -> Result<Vec<BarOverview>, StoreError>;

    fn tick_overview(&self, key: &str) -> Result<Option<TickOverview>, StoreError>;
    fn put_tick_overview(&self, key: &str, overview: &TickOverview) -> Result<(), StoreError>;
    fn remove_tick_overview(&self, key: &str) -> Result<(), StoreError>;
    fn tick_overviews(&self) -> Result<Vec<TickOverview>, StoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OverviewFile {
    #[serde(default)]
    bars: BTreeMap<String, BarOverview>,
    #[serde(default)]
    ticks: BTreeMap<String, TickOverview>,
}

/// JSON-file-backed overview store. Saves go through a temp file and an
/// atomic rename, so a crash mid-save never truncates the index.
#[derive(Debug, Clone)]
pub struct JsonFileOverviewStore {
    path: PathBuf,
}

impl JsonFileOverviewStore {
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| StoreError::Overview(error.to_string()))?;
        }
        let store = Self { path };
        // Fail now, not on first save, if the existing file is unreadable.
        store.load()?;
        Ok(store)
    }

    fn load(&self) -> Result<OverviewFile, StoreError> {
        if !self.path.exists() {
            return Ok(OverviewFile::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|error| StoreError::Overview(error.to_string()))?;
        serde_json::from_str(&raw).map_err(|error| StoreError::Overview(error.to_string()))
    }

    fn save(&self, file: &OverviewFile) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(file)
            .map_err(|error| StoreError::Overview(error.to_string()))?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, raw).map_err(|error| StoreError::Overview(error.to_string()))?;
        fs::rename(&temp, &self.path).map_err(|error| StoreError::Overview(error.to_string()))
    }
}

impl OverviewStore for JsonFileOverviewStore {
    fn bar_overview(&self, key: &str) -> Result<Option<BarOverview>, StoreError> {
        Ok(self.load()?.bars.get(key).cloned())
    }

    fn put_bar_overview(&self, key: &str, overview: &BarOverview) -> Result<(), StoreError> {
        let mut file = self.load()?;
        file.bars.insert(key.to_string(), overview.clone());
        self.save(&file)
    }

    fn remove_bar_overview(&self, key: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        if file.bars.remove(key).is_some() {
            self.save(&file)?;
        }
        Ok(())
    }

    fn bar_overviews(&self) -> Result<Vec<BarOverview>, StoreError> {
        Ok(self.load()?.bars.into_values().collect())
    }

    fn tick_overview(&self, key: &str) -> Result<Option<TickOverview>, StoreError> {
        Ok(self.load()?.ticks.get(key).cloned())
    }

    fn put_tick_overview(&self, key: &str, overview: &TickOverview) -> Result<(), StoreError> {
        let mut file = self.load()?;
        file.ticks.insert(key.to_string(), overview.clone());
        self.save(&file)
    }

    fn remove_tick_overview(&self, key: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        if file.ticks.remove(key).is_some() {
            self.save(&file)?;
        }
        Ok(())
    }

    fn tick_overviews(&self) -> Result<Vec<TickOverview>, StoreError> {
        Ok(self.load()?.ticks.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use tickvault_core::{Interval, Symbol, Venue};

    use tempfile::tempdir;

    use super::*;

    fn overview(count: u64) -> BarOverview {
        BarOverview {
            series: BarSeries::new(
                Symbol::new("AAPL").expect("symbol"),
                Venue::Nasdaq,
                Interval::Daily,
            ),
            count,
            start: UtcTimestamp::parse("2024-03-01T00:00:00Z").expect("ts"),
            end: UtcTimestamp::parse("2024-03-03T00:00:00Z").expect("ts"),
        }
    }

    #[test]
    fn round_trips_bar_overview() {
        let temp = tempdir().expect("tempdir");
        let store =
            JsonFileOverviewStore::open(temp.path().join("overview.json")).expect("store open");

        let saved = overview(3);
        store
            .put_bar_overview(&saved.series.key(), &saved)
            .expect("put");

        let loaded = store
            .bar_overview("AAPL.NASDAQ_d")
            .expect("get")
            .expect("present");
        assert_eq!(loaded, saved);
    }

    #[test]
    fn survives_reopen() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("state").join("overview.json");

        let store = JsonFileOverviewStore::open(path.clone()).expect("store open");
        let saved = overview(3);
        store
            .put_bar_overview(&saved.series.key(), &saved)
            .expect("put");
        drop(store);

        let reopened = JsonFileOverviewStore::open(path).expect("store reopen");
        assert_eq!(reopened.bar_overviews().expect("list").len(), 1);
    }

    #[test]
    fn remove_is_idempotent() {
        let temp = tempdir().expect("tempdir");
        let store =
            JsonFileOverviewStore::open(temp.path().join("overview.json")).expect("store open");

        let saved = overview(3);
        store
            .put_bar_overview(&saved.series.key(), &saved)
            .expect("put");
        store.remove_bar_overview("AAPL.NASDAQ_d").expect("remove");
        store
            .remove_bar_overview("AAPL.NASDAQ_d")
            .expect("second remove");
        assert!(store.bar_overviews().expect("list").is_empty());
    }

    #[test]
    fn missing_key_reads_as_none() {
        let temp = tempdir().expect("tempdir");
        let store =
            JsonFileOverviewStore::open(temp.path().join("overview.json")).expect("store open");
        assert!(store.bar_overview("GOOG.NASDAQ_d").expect("get").is_none());
    }

    #[test]
    fn bar_and_tick_namespaces_are_independent() {
        let temp = tempdir().expect("tempdir");
        let store =
            JsonFileOverviewStore::open(temp.path().join("overview.json")).expect("store open");

        let tick = TickOverview {
            series: TickSeries::new(Symbol::new("rb2405").expect("symbol"), Venue::Shfe),
            count: 10,
            start: UtcTimestamp::parse("2024-03-01T01:00:00Z").expect("ts"),
            end: UtcTimestamp::parse("2024-03-01T02:00:00Z").expect("ts"),
        };
        store
            .put_tick_overview(&tick.series.key(), &tick)
            .expect("put tick");

        assert!(store.bar_overviews().expect("bars").is_empty());
        assert_eq!(store.tick_overviews().expect("ticks").len(), 1);
    }
}
