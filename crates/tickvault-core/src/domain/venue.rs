use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Trading venue an instrument belongs to.
///
/// The uppercase string values are stored as tag values and embedded in
/// series keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Venue {
    Nasdaq,
    Nyse,
    Cme,
    Sse,
    Szse,
    Shfe,
    Hkex,
    Binance,
    Local,
}

impl Venue {
    pub const ALL: [Self; 9] = [
        Self::Nasdaq,
        Self::Nyse,
        Self::Cme,
        Self::Sse,
        Self::Szse,
        Self::Shfe,
        Self::Hkex,
        Self::Binance,
        Self::Local,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nasdaq => "NASDAQ",
            Self::Nyse => "NYSE",
            Self::Cme => "CME",
            Self::Sse => "SSE",
            Self::Szse => "SZSE",
            Self::Shfe => "SHFE",
            Self::Hkex => "HKEX",
            Self::Binance => "BINANCE",
            Self::Local => "LOCAL",
        }
    }
}

impl Display for Venue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|venue| venue.as_str() == normalized)
            .ok_or(ValidationError::InvalidVenue { value: normalized })
    }
}
