use serde_json::{json, Value};

use tickvault_db::Database;

use crate::cli::{BarSeriesArgs, TickSeriesArgs};
use crate::commands::{bar_series, tick_series};
use crate::error::CliError;

pub fn bars(database: &Database, args: &BarSeriesArgs) -> Result<Value, CliError> {
    let series = bar_series(args)?;
    let deleted = database.delete_bars(&series)?;
    Ok(json!({ "series": series.key(), "deleted": deleted }))
}

pub fn ticks(database: &Database, args: &TickSeriesArgs) -> Result<Value, CliError> {
    let series = tick_series(args)?;
    let deleted = database.delete_ticks(&series)?;
    Ok(json!({ "series": series.key(), "deleted": deleted }))
}
