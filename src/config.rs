//! Terminal configuration
//!
//! Serde-backed configuration for constructing terminals from JSON, the
//! shape session profiles arrive in.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ebcdic::{CharacterSet, Cp037};
use crate::error::ConfigError;

/// Configuration for one terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TerminalConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Allow the host to use 14-bit buffer addresses
    #[serde(default = "default_true")]
    pub extended_addressing: bool,
    /// EBCDIC code page name, e.g. "cp037"
    #[serde(default = "default_code_page")]
    pub code_page: String,
}

fn default_rows() -> usize {
    24
}

fn default_cols() -> usize {
    80
}

fn default_true() -> bool {
    true
}

fn default_code_page() -> String {
    "cp037".to_string()
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            rows: default_rows(),
            cols: default_cols(),
            extended_addressing: true,
            code_page: default_code_page(),
        }
    }
}

impl TerminalConfig {
    /// Parse a configuration from JSON; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TerminalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.charset().map(|_| ())
    }

    /// The character set named by `code_page`.
    pub fn charset(&self) -> Result<Arc<dyn CharacterSet>, ConfigError> {
        match self.code_page.to_ascii_lowercase().as_str() {
            "cp037" | "037" | "ibm037" => Ok(Arc::new(Cp037)),
            other => Err(ConfigError::UnknownCodePage(other.to_string())),
        }
    }
}
