// Format module for user formatting preferences
// Author: Gabriel Demetrios Lafis

mod provider;
mod formatters;
mod sync;

pub use provider::*;
pub use formatters::*;
pub use sync::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    Short,
    Medium,
    Long,
    Iso,
}

/// User formatting preferences shared by every formatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatConfig {
    pub locale: String,
    pub currency: String,
    pub decimals: u8,
    pub date_format: DateFormat,
    pub null_value: String,
    pub include_time: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            locale: "en-US".to_string(),
            currency: "USD".to_string(),
            decimals: 2,
            date_format: DateFormat::Medium,
            null_value: "-".to_string(),
            include_time: false,
        }
    }
}

/// Represents an error in the format module
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Failed to push preferences: {0}")]
    Sync(String),
    #[error("Provider lock poisoned")]
    Poisoned,
}
