use clap::{Args, Parser, Subcommand, ValueEnum};

/// Market-data persistence over a time-series database.
#[derive(Debug, Parser)]
#[command(name = "tickvault", version, about)]
pub struct Cli {
    /// Database URL (default: $TICKVAULT_URL or http://localhost:8086)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Organization (default: $TICKVAULT_ORG)
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// API token (default: $TICKVAULT_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Bucket holding the market data (default: $TICKVAULT_BUCKET)
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Skip incomplete result rows instead of failing the load
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List stored series overviews
    Overviews(OverviewsArgs),
    /// Load bars for one series and time range
    LoadBars(LoadBarsArgs),
    /// Load ticks for one instrument and time range
    LoadTicks(LoadTicksArgs),
    /// Save bars from a JSON batch file
    ImportBars(ImportArgs),
    /// Save ticks from a JSON batch file
    ImportTicks(ImportArgs),
    /// Delete all bars for one series
    DeleteBars(BarSeriesArgs),
    /// Delete all ticks for one instrument
    DeleteTicks(TickSeriesArgs),
}

#[derive(Debug, Args)]
pub struct OverviewsArgs {
    /// Restrict output to one kind
    #[arg(long, value_enum)]
    pub kind: Option<OverviewKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OverviewKind {
    Bars,
    Ticks,
}

#[derive(Debug, Args)]
pub struct BarSeriesArgs {
    pub symbol: String,
    pub venue: String,
    pub interval: String,
}

#[derive(Debug, Args)]
pub struct TickSeriesArgs {
    pub symbol: String,
    pub venue: String,
}

#[derive(Debug, Args)]
pub struct LoadBarsArgs {
    #[command(flatten)]
    pub series: BarSeriesArgs,

    /// Range start, RFC3339 (inclusive)
    #[arg(long)]
    pub start: String,

    /// Range end, RFC3339 (exclusive)
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Args)]
pub struct LoadTicksArgs {
    #[command(flatten)]
    pub series: TickSeriesArgs,

    /// Range start, RFC3339 (inclusive)
    #[arg(long)]
    pub start: String,

    /// Range end, RFC3339 (exclusive)
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Path to a JSON array of records sharing one series
    #[arg(long)]
    pub file: std::path::PathBuf,
}
