use serde_json::{json, Value};

use tickvault_db::Database;

use crate::cli::{OverviewKind, OverviewsArgs};
use crate::error::CliError;

pub fn run(database: &Database, args: &OverviewsArgs) -> Result<Value, CliError> {
    let value = match args.kind {
        Some(OverviewKind::Bars) => json!({ "bars": database.get_bar_overviews()? }),
        Some(OverviewKind::Ticks) => json!({ "ticks": database.get_tick_overviews()? }),
        None => json!({
            "bars": database.get_bar_overviews()?,
            "ticks": database.get_tick_overviews()?,
        }),
    };
    Ok(value)
}
