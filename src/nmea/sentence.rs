use serde::Serialize;

use crate::nmea::{extractor, record::FixRecord};

/// Supported NMEA sentences. Anything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentenceType {
    /// GPGGA: position fix data
    Gga,
    /// GPRMC: recommended minimum data
    Rmc,
    /// GPGSA: DOP and active satellites, GPS only
    GpsGsa,
    /// GNGSA: DOP and active satellites, combined constellations
    CombinedGsa,
}

impl SentenceType {
    /// Identifies a 5 letter sentence identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "GPGGA" => Some(Self::Gga),
            "GPRMC" => Some(Self::Rmc),
            "GPGSA" => Some(Self::GpsGsa),
            "GNGSA" => Some(Self::CombinedGsa),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Gga => "GPGGA",
            Self::Rmc => "GPRMC",
            Self::GpsGsa => "GPGSA",
            Self::CombinedGsa => "GNGSA",
        }
    }

    /// True for the satellite status (GSA) sentences
    pub fn is_satellite_status(&self) -> bool {
        matches!(self, Self::GpsGsa | Self::CombinedGsa)
    }

    /// Runs the extractor dedicated to this sentence.
    pub fn extract(&self, timestamp: f64, fields: &[&str]) -> FixRecord {
        match self {
            Self::Gga => extractor::gga(timestamp, fields),
            Self::Rmc => extractor::rmc(timestamp, fields),
            Self::GpsGsa | Self::CombinedGsa => extractor::gsa(*self, timestamp, fields),
        }
    }
}

impl std::fmt::Display for SentenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Routes a tokenized sentence to its extractor.
/// Returns None for sentences we are not interested in.
pub fn dispatch(sentence_id: &str, timestamp: f64, fields: &[&str]) -> Option<FixRecord> {
    let sentence = SentenceType::from_id(sentence_id)?;
    Some(sentence.extract(timestamp, fields))
}
