//! Overview maintenance after each successful write.
//!
//! First write to an unseen series creates the overview optimistically
//! (count = batch size) without touching the database: the key was unseen,
//! so the batch IS the series. Once an overview exists that shortcut is
//! invalid — overlapping or re-ingested batches would double-count — so the
//! count is overwritten from an authoritative full-range count query while
//! start/end are widened locally (always correct under append or overlap).
//!
//! A failed count query surfaces as an error and persists nothing: the
//! previous overview, stale count included, beats a wrong one.

use tickvault_core::{BarSeries, TickSeries, UtcTimestamp};

use crate::client::TsdbClient;
use crate::error::StoreError;
use crate::flux;
use crate::overview::{BarOverview, OverviewStore, TickOverview};

pub(crate) fn update_bar_overview(
    client: &dyn TsdbClient,
    store: &dyn OverviewStore,
    bucket: &str,
    series: &BarSeries,
    batch_start: UtcTimestamp,
    batch_end: UtcTimestamp,
    batch_len: u64,
) -> Result<(), StoreError> {
    let key = series.key();
    let updated = match store.bar_overview(&key)? {
        None => {
            tracing::debug!(series = %key, count = batch_len, "creating bar overview");
            BarOverview {
                series: series.clone(),
                count: batch_len,
                start: batch_start,
                end: batch_end,
            }
        }
        Some(existing) => {
            let flux = flux::bar_count_query(bucket, series, UtcTimestamp::now());
            let count = client.query(&flux)?.count_value()?;
            tracing::debug!(series = %key, count, "recounted bar series");
            BarOverview {
                series: series.clone(),
                count,
                start: existing.start.min(batch_start),
                end: existing.end.max(batch_end),
            }
        }
    };
    store.put_bar_overview(&key, &updated)
}

pub(crate) fn update_tick_overview(
    client: &dyn TsdbClient,
    store: &dyn OverviewStore,
    bucket: &str,
    series: &TickSeries,
    batch_start: UtcTimestamp,
    batch_end: UtcTimestamp,
    batch_len: u64,
) -> Result<(), StoreError> {
    let key = series.key();
    let updated = match store.tick_overview(&key)? {
        None => {
            tracing::debug!(series = %key, count = batch_len, "creating tick overview");
            TickOverview {
                series: series.clone(),
                count: batch_len,
                start: batch_start,
                end: batch_end,
            }
        }
        Some(existing) => {
            let flux = flux::tick_count_query(bucket, series, UtcTimestamp::now());
            let count = client.query(&flux)?.count_value()?;
            tracing::debug!(series = %key, count, "recounted tick series");
            TickOverview {
                series: series.clone(),
                count,
                start: existing.start.min(batch_start),
                end: existing.end.max(batch_end),
            }
        }
    };
    store.put_tick_overview(&key, &updated)
}
