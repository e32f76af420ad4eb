use serde::Serialize;

use crate::nmea::sentence::SentenceType;

/// GGA quality indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixQuality {
    NoFix,
    GpsFix,
    DgpsFix,
    PpsFix,
    RealTimeKinematic,
    FloatRtk,
    Estimated,
    ManualInput,
    Simulation,
    /// Numeric code outside of `0..=8`
    Unknown,
}

impl FixQuality {
    /// Maps the numeric GGA code, any value outside `0..=8` is [FixQuality::Unknown].
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Self::NoFix,
            1 => Self::GpsFix,
            2 => Self::DgpsFix,
            3 => Self::PpsFix,
            4 => Self::RealTimeKinematic,
            5 => Self::FloatRtk,
            6 => Self::Estimated,
            7 => Self::ManualInput,
            8 => Self::Simulation,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for FixQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFix => write!(f, "No Fix"),
            Self::GpsFix => write!(f, "GPS Fix"),
            Self::DgpsFix => write!(f, "DGPS Fix"),
            Self::PpsFix => write!(f, "PPS Fix"),
            Self::RealTimeKinematic => write!(f, "Real Time Kinematic"),
            Self::FloatRtk => write!(f, "Float RTK"),
            Self::Estimated => write!(f, "Estimated (dead reckoning)"),
            Self::ManualInput => write!(f, "Manual input mode"),
            Self::Simulation => write!(f, "Simulation mode"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// GSA fix mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GsaMode {
    /// Empty mode field
    NoMode,
    NoFix,
    Fix2D,
    Fix3D,
}

impl GsaMode {
    /// True when this mode reports a usable position.
    pub fn is_fix(&self) -> bool {
        matches!(self, Self::Fix2D | Self::Fix3D)
    }
}

impl std::fmt::Display for GsaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMode => write!(f, "No Mode"),
            Self::NoFix => write!(f, "No Fix"),
            Self::Fix2D => write!(f, "2D Fix"),
            Self::Fix3D => write!(f, "3D Fix"),
        }
    }
}

/// Fix status, depends on the sentence it was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FixStatus {
    /// GGA quality indicator
    Quality(FixQuality),
    /// RMC validity flag, kept verbatim (`A` valid, `V` invalid)
    Validity(String),
    /// GSA fix mode
    Mode(GsaMode),
}

impl FixStatus {
    /// True when a GSA sentence reports a 2D or 3D fix.
    pub fn is_position_fix(&self) -> bool {
        match self {
            Self::Mode(mode) => mode.is_fix(),
            _ => false,
        }
    }
}

impl std::fmt::Display for FixStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quality(quality) => quality.fmt(f),
            Self::Validity(flag) => write!(f, "{}", flag),
            Self::Mode(mode) => mode.fmt(f),
        }
    }
}

/// What one parsed sentence tells us about the receiver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixRecord {
    /// Log timestamp (s)
    pub timestamp: f64,
    pub sentence: SentenceType,
    pub fix_status: Option<FixStatus>,
    pub satellites_tracked: Option<u32>,
    pub satellites_in_view: Option<u32>,
}

impl FixRecord {
    /// Builds an empty [FixRecord], every derived value is absent.
    pub fn new(timestamp: f64, sentence: SentenceType) -> Self {
        Self {
            timestamp,
            sentence,
            fix_status: None,
            satellites_tracked: None,
            satellites_in_view: None,
        }
    }
}

impl std::fmt::Display for FixRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "t={:.3} {}", self.timestamp, self.sentence)?;
        if let Some(status) = &self.fix_status {
            write!(f, " status=\"{}\"", status)?;
        }
        if let Some(tracked) = self.satellites_tracked {
            write!(f, " tracked={}", tracked)?;
        }
        if let Some(in_view) = self.satellites_in_view {
            write!(f, " in_view={}", in_view)?;
        }
        Ok(())
    }
}
