//! Shared fixtures for tickvault behavior tests: a scripted stand-in for the
//! time-series database and builders for bars, ticks and pivoted result
//! tables.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickvault_core::{Bar, Interval, Symbol, Tick, UtcTimestamp, Venue, BOOK_DEPTH};
use tickvault_db::{
    Database, DatabaseConfig, JsonFileOverviewStore, QueryTable, StoreError, Strictness,
    TsdbClient,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub bucket: String,
    pub lines: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDelete {
    pub bucket: String,
    pub start: String,
    pub stop: String,
    pub predicate: String,
}

/// Scripted [`TsdbClient`]: records every call and replays queued query
/// responses in order. An exhausted queue answers with an empty table.
#[derive(Default)]
pub struct ScriptedClient {
    pub writes: Mutex<Vec<RecordedWrite>>,
    pub queries: Mutex<Vec<String>>,
    pub deletes: Mutex<Vec<RecordedDelete>>,
    query_responses: Mutex<VecDeque<Result<QueryTable, StoreError>>>,
    fail_next_write: Mutex<bool>,
    fail_next_delete: Mutex<bool>,
}

impl ScriptedClient {
    pub fn push_query_response(&self, table: QueryTable) {
        self.query_responses
            .lock()
            .expect("lock")
            .push_back(Ok(table));
    }

    pub fn push_query_error(&self, error: StoreError) {
        self.query_responses
            .lock()
            .expect("lock")
            .push_back(Err(error));
    }

    pub fn fail_next_write(&self) {
        *self.fail_next_write.lock().expect("lock") = true;
    }

    pub fn fail_next_delete(&self) {
        *self.fail_next_delete.lock().expect("lock") = true;
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().expect("lock").len()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().expect("lock").len()
    }
}

impl TsdbClient for ScriptedClient {
    fn write_lines(&self, bucket: &str, lines: &str) -> Result<(), StoreError> {
        let mut fail = self.fail_next_write.lock().expect("lock");
        if *fail {
            *fail = false;
            return Err(StoreError::Write {
                status: 500,
                message: "scripted write failure".to_string(),
            });
        }
        self.writes.lock().expect("lock").push(RecordedWrite {
            bucket: bucket.to_string(),
            lines: lines.to_string(),
        });
        Ok(())
    }

    fn query(&self, flux: &str) -> Result<QueryTable, StoreError> {
        self.queries.lock().expect("lock").push(flux.to_string());
        self.query_responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Ok(QueryTable::default()))
    }

    fn delete_range(
        &self,
        bucket: &str,
        start: &str,
        stop: &str,
        predicate: &str,
    ) -> Result<(), StoreError> {
        let mut fail = self.fail_next_delete.lock().expect("lock");
        if *fail {
            *fail = false;
            return Err(StoreError::Query(
                "scripted delete failure".to_string(),
            ));
        }
        self.deletes.lock().expect("lock").push(RecordedDelete {
            bucket: bucket.to_string(),
            start: start.to_string(),
            stop: stop.to_string(),
            predicate: predicate.to_string(),
        });
        Ok(())
    }
}

/// Database wired to the scripted client and a JSON overview store under
/// `dir`.
pub fn test_database(client: Arc<ScriptedClient>, dir: &Path) -> Database {
    let config = DatabaseConfig {
        url: "http://localhost:8086".to_string(),
        org: String::new(),
        token: String::new(),
        bucket: "market_data".to_string(),
        overview_path: dir.join("overview.json"),
        timeout: Duration::from_secs(5),
        strictness: Strictness::Strict,
    };
    let overviews =
        Arc::new(JsonFileOverviewStore::open(config.overview_path.clone()).expect("overview store"));
    Database::with_parts(config, client, overviews)
}

/// Daily AAPL bar on 2024-03-`day`.
pub fn daily_bar(day: u8) -> Bar {
    let ts = UtcTimestamp::parse(&format!("2024-03-{day:02}T00:00:00Z")).expect("ts");
    Bar::new(
        Symbol::new("AAPL").expect("symbol"),
        Venue::Nasdaq,
        Interval::Daily,
        ts,
        100.0 + f64::from(day),
        105.0 + f64::from(day),
        99.0 + f64::from(day),
        103.0 + f64::from(day),
        1_000_000.0,
        1.03e8,
        0.0,
    )
    .expect("bar")
}

/// SHFE rebar tick at 2024-03-01T01:30:`second` (whole seconds keep the
/// localtime float representation exact).
pub fn rebar_tick(second: u8) -> Tick {
    let ts = UtcTimestamp::parse(&format!("2024-03-01T01:30:{second:02}Z")).expect("ts");
    Tick {
        symbol: Symbol::new("rb2405").expect("symbol"),
        venue: Venue::Shfe,
        ts,
        local_ts: None,
        name: "Rebar 2405".to_string(),
        volume: 120.0 + f64::from(second),
        turnover: 4.6e6,
        open_interest: 5_000.0,
        last_price: 3_841.0 + f64::from(second),
        last_volume: 2.0,
        limit_up: 4_200.0,
        limit_down: 3_500.0,
        open: 3_820.0,
        high: 3_850.0,
        low: 3_810.0,
        pre_close: 3_825.0,
        bid_price: [3_840.0, 3_839.0, 3_838.0, 3_837.0, 3_836.0],
        ask_price: [3_841.0, 3_842.0, 3_843.0, 3_844.0, 3_845.0],
        bid_volume: [10.0, 8.0, 5.0, 3.0, 1.0],
        ask_volume: [12.0, 9.0, 6.0, 2.0, 1.0],
    }
}

/// Count-query result table carrying one `_value`.
pub fn count_table(count: u64) -> QueryTable {
    let mut table = QueryTable::new(vec![
        "result".to_string(),
        "table".to_string(),
        "_value".to_string(),
    ]);
    table.push_row(vec!["count".to_string(), "0".to_string(), count.to_string()]);
    table
}

/// Pivoted bar result table with a deliberately scrambled column order.
pub fn bar_pivot_table(bars: &[Bar]) -> QueryTable {
    let columns = [
        "turnover",
        "close",
        "_time",
        "open_interest",
        "low",
        "volume",
        "open",
        "high",
    ];
    let mut table = QueryTable::new(columns.iter().map(|c| c.to_string()).collect());
    for bar in bars {
        table.push_row(vec![
            bar.turnover.to_string(),
            bar.close.to_string(),
            bar.ts.format_rfc3339(),
            bar.open_interest.to_string(),
            bar.low.to_string(),
            bar.volume.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
        ]);
    }
    table
}

/// Pivoted tick result table, book levels flattened to `bid_price_1..5`
/// style columns, again in scrambled order.
pub fn tick_pivot_table(ticks: &[Tick]) -> QueryTable {
    let mut columns = vec![
        "localtime".to_string(),
        "last_price".to_string(),
        "_time".to_string(),
        "name".to_string(),
        "volume".to_string(),
        "turnover".to_string(),
        "open_interest".to_string(),
        "last_volume".to_string(),
        "limit_up".to_string(),
        "limit_down".to_string(),
        "pre_close".to_string(),
        "low".to_string(),
        "high".to_string(),
        "open".to_string(),
    ];
    for level in 1..=BOOK_DEPTH {
        columns.push(format!("ask_volume_{level}"));
        columns.push(format!("bid_price_{level}"));
        columns.push(format!("ask_price_{level}"));
        columns.push(format!("bid_volume_{level}"));
    }

    let mut table = QueryTable::new(columns);
    for tick in ticks {
        let mut row = vec![
            (tick.local_or_event_ts().unix_nanos() as f64 / 1e9).to_string(),
            tick.last_price.to_string(),
            tick.ts.format_rfc3339(),
            tick.name.clone(),
            tick.volume.to_string(),
            tick.turnover.to_string(),
            tick.open_interest.to_string(),
            tick.last_volume.to_string(),
            tick.limit_up.to_string(),
            tick.limit_down.to_string(),
            tick.pre_close.to_string(),
            tick.low.to_string(),
            tick.high.to_string(),
            tick.open.to_string(),
        ];
        for level in 0..BOOK_DEPTH {
            row.push(tick.ask_volume[level].to_string());
            row.push(tick.bid_price[level].to_string());
            row.push(tick.ask_price[level].to_string());
            row.push(tick.bid_volume[level].to_string());
        }
        table.push_row(row);
    }
    table
}
