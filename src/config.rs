use serde::Deserialize;
use thiserror::Error;

use std::path::Path;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("\"{0}\" must not be empty")]
    EmptyMarker(&'static str),
    #[error("invalid parity \"{0}\" (expecting N, E or O)")]
    Parity(String),
    #[error("invalid stop bits {0} (expecting 1 or 2)")]
    StopBits(u8),
    #[error("invalid log format: {0}")]
    Regex(#[from] regex::Error),
}

/// How sentences are laid out in a log line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogFormat {
    /// Marker right before the timestamp
    pub timestamp_prefix: String,
    /// Separator between fields
    pub field_separator: String,
    /// Character right before the sentence identifier
    pub nmea_type_prefix: String,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self {
            timestamp_prefix: "t=".to_string(),
            field_separator: ",".to_string(),
            nmea_type_prefix: "$".to_string(),
        }
    }
}

impl LogFormat {
    pub fn validate(&self) -> Result<(), Error> {
        if self.timestamp_prefix.is_empty() {
            return Err(Error::EmptyMarker("timestamp_prefix"));
        }
        if self.field_separator.is_empty() {
            return Err(Error::EmptyMarker("field_separator"));
        }
        if self.nmea_type_prefix.is_empty() {
            return Err(Error::EmptyMarker("nmea_type_prefix"));
        }
        Ok(())
    }

    /// Formats a raw receiver sentence as a log line, stamped with `timestamp` (s).
    pub fn stamp(&self, timestamp: f64, sentence: &str) -> String {
        format!(
            "{}{:.3}{}{}{}",
            self.timestamp_prefix,
            timestamp,
            self.field_separator,
            self.field_separator,
            sentence
        )
    }
}

/// Serial port parameters
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct UartSettings {
    pub serial_port: Option<String>,
    pub baudrate: u32,
    /// "N", "E" or "O"
    pub parity: String,
    pub stopbit: u8,
}

impl Default for UartSettings {
    fn default() -> Self {
        Self {
            serial_port: None,
            baudrate: 9600,
            parity: "N".to_string(),
            stopbit: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_file: LogFormat,
    pub uart: UartSettings,
}

impl Settings {
    /// Loads [Settings] from a JSON file. Omitted entries take their default value.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, Error> {
        let settings: Self = serde_json::from_str(content)?;
        settings.log_file.validate()?;
        Ok(settings)
    }
}
