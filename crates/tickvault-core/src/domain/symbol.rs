use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 32;

/// Validated instrument symbol.
///
/// Symbols are ASCII alphanumerics plus `-` and `_`, at most 32 characters.
/// Dots are rejected because `.` separates symbol and venue in series keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(ValidationError::EmptySymbol);
        };
        if value.len() > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len: value.len(),
                max: MAX_SYMBOL_LEN,
            });
        }
        if !first.is_ascii_alphanumeric() {
            return Err(ValidationError::SymbolInvalidStart { ch: first });
        }
        for (index, ch) in value.char_indices().skip(1) {
            if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Symbol {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
