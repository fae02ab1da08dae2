//! Core types and structures for oast-decode

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::env;

use crate::config_error;
use crate::error::Result;

/// Three-byte identifier of the machine that issued a preamble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MachineId(pub [u8; 3]);

impl std::fmt::Display for MachineId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}", a, b, c)
    }
}

impl Serialize for MachineId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Result of decoding one OAST subdomain or bare preamble.
///
/// `valid == false` means every numeric field is zero and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DecodedPreamble {
    /// Input as provided, cut to at most 255 bytes
    pub original: String,
    pub valid: bool,
    /// Seconds since the Unix epoch
    #[serde(rename = "ts")]
    pub timestamp: u32,
    pub machine_id: MachineId,
    pub pid: u16,
    /// 24-bit counter
    pub counter: u32,
    /// First 6 preamble characters
    pub ksort: String,
    /// Preamble characters 6..11
    pub campaign: String,
    /// Lower-cased remainder of the subdomain after the preamble, at most 127 bytes
    pub nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DecodedPreamble {
    /// Build a failed result carrying only the original input and the reason.
    pub fn invalid(original: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            valid: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }

    /// Issue time as UTC, if decoding succeeded.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        if !self.valid {
            return None;
        }
        Utc.timestamp_opt(i64::from(self.timestamp), 0).single()
    }

    /// Render as a single JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Output format for the command-line front end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::error::OastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(config_error!("unknown output format '{}' (expected text or json)", other)),
        }
    }
}

/// Configuration for the command-line front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    pub format: OutputFormat,
    pub pretty: bool,
    pub log_filter: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty: false,
            log_filter: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Read `OAST_FORMAT`, `OAST_PRETTY` and `OAST_LOG`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`CliConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(format) = lookup("OAST_FORMAT") {
            config.format = format.parse()?;
        }
        if let Some(pretty) = lookup("OAST_PRETTY") {
            config.pretty = matches!(pretty.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(filter) = lookup("OAST_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = filter.trim().to_string();
            }
        }

        Ok(config)
    }
}
