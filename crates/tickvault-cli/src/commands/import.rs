use std::fs;

use serde_json::{json, Value};

use tickvault_core::{Bar, Tick};
use tickvault_db::Database;

use crate::cli::ImportArgs;
use crate::error::CliError;

pub fn bars(database: &Database, args: &ImportArgs) -> Result<Value, CliError> {
    let raw = fs::read_to_string(&args.file)?;
    let batch: Vec<Bar> = serde_json::from_str(&raw)?;
    database.save_bars(&batch)?;
    Ok(json!({
        "saved": batch.len(),
        "series": batch.first().map(|bar| bar.series().key()),
    }))
}

pub fn ticks(database: &Database, args: &ImportArgs) -> Result<Value, CliError> {
    let raw = fs::read_to_string(&args.file)?;
    let batch: Vec<Tick> = serde_json::from_str(&raw)?;
    database.save_ticks(&batch)?;
    Ok(json!({
        "saved": batch.len(),
        "series": batch.first().map(|tick| tick.series().key()),
    }))
}
