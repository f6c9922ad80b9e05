use serde_json::{json, Value};

use tickvault_db::Database;

use crate::cli::{LoadBarsArgs, LoadTicksArgs};
use crate::commands::{bar_series, parse_range, tick_series};
use crate::error::CliError;

pub fn bars(database: &Database, args: &LoadBarsArgs) -> Result<Value, CliError> {
    let series = bar_series(&args.series)?;
    let (start, end) = parse_range(&args.start, &args.end)?;
    let bars = database.load_bars(&series, start, end)?;
    Ok(json!({
        "series": series.key(),
        "rows": bars.len(),
        "bars": bars,
    }))
}

pub fn ticks(database: &Database, args: &LoadTicksArgs) -> Result<Value, CliError> {
    let series = tick_series(&args.series)?;
    let (start, end) = parse_range(&args.start, &args.end)?;
    let ticks = database.load_ticks(&series, start, end)?;
    Ok(json!({
        "series": series.key(),
        "rows": ticks.len(),
        "ticks": ticks,
    }))
}
