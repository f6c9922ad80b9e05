//! Behavior tests for the tick paths: the wider column set, localtime
//! defaulting, and symmetric overview maintenance.

use std::sync::Arc;

use tempfile::tempdir;

use tickvault_core::UtcTimestamp;
use tickvault_tests::{count_table, rebar_tick, test_database, tick_pivot_table, ScriptedClient};

#[test]
fn tick_save_creates_and_recounts_overview_like_bars() {
    let temp = tempdir().expect("tempdir");
    let client = Arc::new(ScriptedClient::default());
    let database = test_database(client.clone(), temp.path());

    database
        .save_ticks(&[rebar_tick(0), rebar_tick(1)])
        .expect("first save");
    assert_eq!(client.query_count(), 0);

    let overview = &database.get_tick_overviews().expect("overviews")[0];
    assert_eq!(overview.series.key(), "rb2405.SHFE");
    assert_eq!(overview.count, 2);

    client.push_query_response(count_table(3));
    database
        .save_ticks(&[rebar_tick(1), rebar_tick(2)])
        .expect("second save");

    let overview = &database.get_tick_overviews().expect("overviews")[0];
    assert_eq!(overview.count, 3);
    assert_eq!(overview.start.format_rfc3339(), "2024-03-01T01:30:00Z");
    assert_eq!(overview.end.format_rfc3339(), "2024-03-01T01:30:02Z");

    let flux = client.queries.lock().expect("lock")[0].clone();
    assert!(flux.contains(r#"r._field == "last_price""#));
}

#[test]
fn tick_write_encodes_defaulted_localtime() {
    let temp = tempdir().expect("tempdir");
    let client = Arc::new(ScriptedClient::default());
    let database = test_database(client.clone(), temp.path());

    let tick = rebar_tick(0);
    assert!(tick.local_ts.is_none());
    database.save_ticks(&[tick.clone()]).expect("save");

    let writes = client.writes.lock().expect("lock");
    let expected = tick.ts.unix_nanos() as f64 / 1e9;
    assert!(writes[0].lines.contains(&format!("localtime={expected}")));
    assert!(writes[0].lines.starts_with("tick,symbol=rb2405,venue=SHFE "));
}

#[test]
fn tick_load_round_trips_all_book_levels() {
    let temp = tempdir().expect("tempdir");
    let client = Arc::new(ScriptedClient::default());
    let database = test_database(client.clone(), temp.path());

    let batch = vec![rebar_tick(0), rebar_tick(1), rebar_tick(2)];
    let series = batch[0].series();

    client.push_query_response(tick_pivot_table(&batch));
    let start = UtcTimestamp::parse("2024-03-01T01:30:00Z").expect("ts");
    let end = UtcTimestamp::parse("2024-03-01T01:31:00Z").expect("ts");
    let loaded = database.load_ticks(&series, start, end).expect("load");

    assert_eq!(loaded.len(), batch.len());
    for (loaded, saved) in loaded.iter().zip(&batch) {
        assert_eq!(loaded.ts, saved.ts);
        assert_eq!(loaded.name, saved.name);
        assert!((loaded.last_price - saved.last_price).abs() < 1e-9);
        assert_eq!(loaded.bid_price, saved.bid_price);
        assert_eq!(loaded.ask_price, saved.ask_price);
        assert_eq!(loaded.bid_volume, saved.bid_volume);
        assert_eq!(loaded.ask_volume, saved.ask_volume);
        // The stub stored the defaulted localtime; it must come back as the
        // event timestamp.
        assert_eq!(loaded.local_ts, Some(saved.ts));
    }
}

#[test]
fn tick_delete_returns_precount_and_drops_overview() {
    let temp = tempdir().expect("tempdir");
    let client = Arc::new(ScriptedClient::default());
    let database = test_database(client.clone(), temp.path());

    let batch = vec![rebar_tick(0), rebar_tick(1)];
    database.save_ticks(&batch).expect("save");
    let series = batch[0].series();

    client.push_query_response(count_table(2));
    let deleted = database.delete_ticks(&series).expect("delete");
    assert_eq!(deleted, 2);
    assert!(database.get_tick_overviews().expect("overviews").is_empty());

    let deletes = client.deletes.lock().expect("lock");
    assert!(deletes[0].predicate.contains(r#"_measurement="tick""#));
    assert!(deletes[0].predicate.contains(r#"symbol="rb2405""#));
    assert!(!deletes[0].predicate.contains("interval"));
}

#[test]
fn bar_and_tick_overviews_do_not_interfere() {
    let temp = tempdir().expect("tempdir");
    let client = Arc::new(ScriptedClient::default());
    let database = test_database(client.clone(), temp.path());

    database.save_ticks(&[rebar_tick(0)]).expect("save ticks");
    assert!(database.get_bar_overviews().expect("bars").is_empty());
    assert_eq!(database.get_tick_overviews().expect("ticks").len(), 1);
}
