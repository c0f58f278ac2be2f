//! Runtime configuration.
//!
//! Values are read once (optionally from a `.env` file) and passed into the
//! decoder, encoders and driver explicitly.

use std::env;

use crate::error::ConfigError;

/// Name of the system default access control group.
pub const DEFAULT_ACG: &str = "Default";

/// Outer delimiter of Catalogs files.
pub const DEFAULT_DELIMITER: u8 = b',';

const ENV_DEFAULT_ACG: &str = "CATALOG_DEFAULT_ACG";
const ENV_DELIMITER: &str = "CATALOG_CSV_DELIMITER";

/// Settings shared by the decoder, encoders and driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// ACG value that means "use the system default".
    pub default_acg: String,
    /// Outer row delimiter for reading and writing CSV.
    pub delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_acg: DEFAULT_ACG.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Config {
    /// Build a configuration from the environment, loading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        if let Ok(acg) = env::var(ENV_DEFAULT_ACG) {
            config.default_acg = acg;
        }
        if let Ok(delimiter) = env::var(ENV_DELIMITER) {
            config.delimiter = parse_delimiter(&delimiter)?;
        }
        Ok(config)
    }

    pub fn with_default_acg(mut self, acg: impl Into<String>) -> Self {
        self.default_acg = acg.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Whether `acg` selects the system default group.
    pub fn is_default_acg(&self, acg: &str) -> bool {
        acg.is_empty() || acg == self.default_acg
    }
}

/// Parse a single-byte delimiter; `\t` and `tab` are accepted for tabs.
///
/// The CSV quote character and literal whitespace are rejected.
pub fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    if value == "\\t" || value.eq_ignore_ascii_case("tab") {
        return Ok(b'\t');
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii_punctuation() && *byte != b'"' => Ok(*byte),
        _ => Err(ConfigError::InvalidValue {
            var: ENV_DELIMITER,
            message: format!("expected a single punctuation character, got '{value}'"),
        }),
    }
}
