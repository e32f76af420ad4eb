//! Splits one timestamped log line into timestamp, sentence identifier
//! and field sequence.
//!
//! A log line looks like `t=12.500,,$GPGGA,123519,4807.038,N,...`:
//! the timestamp follows the timestamp marker (`t=`), the sentence starts at
//! the type prefix (`$`) and is followed by exactly 5 letters.
use regex::Regex;

use crate::{config::LogFormat, nmea::error::TokenizeError};

/// Length of a sentence identifier, talker + formatter (`GPGGA`)
pub const SENTENCE_ID_LEN: usize = 5;

/// [Tokens] of a single line. Field #0 is the sentence identifier itself,
/// prefix included, so field indexes match the usual NMEA numbering.
#[derive(Debug, Clone, PartialEq)]
pub struct Tokens<'a> {
    pub timestamp: f64,
    pub sentence_id: &'a str,
    pub fields: Vec<&'a str>,
}

#[derive(Debug, Clone)]
pub struct Tokenizer {
    timestamp: Regex,
    sentence_id: Regex,
    separator: String,
}

impl Tokenizer {
    /// Builds a [Tokenizer] for this [LogFormat].
    pub fn new(format: &LogFormat) -> Result<Self, regex::Error> {
        let timestamp = Regex::new(&format!(
            r"{}(\d+(?:\.\d+)?)",
            regex::escape(&format.timestamp_prefix)
        ))?;

        let sentence_id = Regex::new(&format!(
            r"{}([A-Za-z]{{{}}})(?:[^A-Za-z]|$)",
            regex::escape(&format.nmea_type_prefix),
            SENTENCE_ID_LEN,
        ))?;

        Ok(Self {
            timestamp,
            sentence_id,
            separator: format.field_separator.clone(),
        })
    }

    /// Configured field separator
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Tokenizes one line. Only the structure is verified here,
    /// field contents are interpreted by the extractors.
    pub fn tokenize<'a>(&self, line: &'a str) -> Result<Tokens<'a>, TokenizeError> {
        let captures = self
            .timestamp
            .captures(line)
            .ok_or(TokenizeError::NoTimestamp)?;

        let (ts_match, ts_end) = match (captures.get(1), captures.get(0)) {
            (Some(value), Some(whole)) => (value.as_str(), whole.end()),
            _ => return Err(TokenizeError::NoTimestamp),
        };

        let timestamp = ts_match
            .parse::<f64>()
            .map_err(|_| TokenizeError::NoTimestamp)?;

        let remainder = &line[ts_end..];

        let captures = self
            .sentence_id
            .captures(remainder)
            .ok_or(TokenizeError::NoSentenceType)?;

        let (sentence_id, payload_start) = match (captures.get(1), captures.get(0)) {
            (Some(id), Some(whole)) => (id.as_str(), whole.start()),
            _ => return Err(TokenizeError::NoSentenceType),
        };

        let payload = &remainder[payload_start..];
        let fields = payload.split(self.separator.as_str()).collect();

        Ok(Tokens {
            timestamp,
            sentence_id,
            fields,
        })
    }
}
