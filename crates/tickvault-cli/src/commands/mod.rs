mod delete;
mod import;
mod load;
mod overviews;

use std::str::FromStr;

use serde_json::Value;

use tickvault_core::{BarSeries, Interval, Symbol, TickSeries, UtcTimestamp, Venue};
use tickvault_db::{Database, DatabaseConfig, Strictness};

use crate::cli::{BarSeriesArgs, Cli, Command, TickSeriesArgs};
use crate::error::CliError;

pub fn run(cli: &Cli) -> Result<Value, CliError> {
    let database = connect(cli)?;

    match &cli.command {
        Command::Overviews(args) => overviews::run(&database, args),
        Command::LoadBars(args) => load::bars(&database, args),
        Command::LoadTicks(args) => load::ticks(&database, args),
        Command::ImportBars(args) => import::bars(&database, args),
        Command::ImportTicks(args) => import::ticks(&database, args),
        Command::DeleteBars(args) => delete::bars(&database, args),
        Command::DeleteTicks(args) => delete::ticks(&database, args),
    }
}

fn connect(cli: &Cli) -> Result<Database, CliError> {
    let mut config = DatabaseConfig::default();
    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(org) = &cli.org {
        config.org = org.clone();
    }
    if let Some(token) = &cli.token {
        config.token = token.clone();
    }
    if let Some(bucket) = &cli.bucket {
        config.bucket = bucket.clone();
    }
    if cli.lenient {
        config.strictness = Strictness::Lenient;
    }
    Ok(Database::connect(config)?)
}

pub(crate) fn bar_series(args: &BarSeriesArgs) -> Result<BarSeries, CliError> {
    Ok(BarSeries::new(
        Symbol::new(args.symbol.as_str())?,
        Venue::from_str(&args.venue)?,
        Interval::from_str(&args.interval)?,
    ))
}

pub(crate) fn tick_series(args: &TickSeriesArgs) -> Result<TickSeries, CliError> {
    Ok(TickSeries::new(
        Symbol::new(args.symbol.as_str())?,
        Venue::from_str(&args.venue)?,
    ))
}

pub(crate) fn parse_range(start: &str, end: &str) -> Result<(UtcTimestamp, UtcTimestamp), CliError> {
    Ok((UtcTimestamp::parse(start)?, UtcTimestamp::parse(end)?))
}
