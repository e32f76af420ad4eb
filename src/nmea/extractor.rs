//! Per sentence field extraction.
//!
//! Extractors never fail as a whole: a field that is missing or cannot be
//! interpreted leaves the matching value out of the [FixRecord] and is
//! reported once, with the raw field sequence.
use itertools::Itertools;
use log::error;

use crate::nmea::{
    error::FieldError,
    record::{FixQuality, FixRecord, FixStatus, GsaMode},
    sentence::SentenceType,
};

/// GGA quality indicator
const GGA_QUALITY: usize = 6;

/// GGA number of satellites in use
const GGA_SATELLITES: usize = 7;

/// RMC status flag
const RMC_STATUS: usize = 2;

/// GSA fix mode
const GSA_MODE: usize = 2;

/// GSA satellite ID slots, 12 of them, right after the fix mode
const GSA_SV_SLOTS: std::ops::Range<usize> = 3..15;

fn field<'a>(fields: &[&'a str], index: usize) -> Result<&'a str, FieldError> {
    fields.get(index).copied().ok_or(FieldError::Missing(index))
}

fn integer(fields: &[&str], index: usize) -> Result<u32, FieldError> {
    let value = field(fields, index)?;
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| FieldError::InvalidInteger {
            index,
            value: value.to_string(),
        })
}

fn report(sentence: SentenceType, fields: &[&str], e: &FieldError) {
    error!("{} - {}: \"{}\"", sentence, e, fields.iter().join(","));
}

fn gga_quality(fields: &[&str]) -> Result<FixQuality, FieldError> {
    let code = integer(fields, GGA_QUALITY)?;
    Ok(FixQuality::from_code(code))
}

/// Empty field means no satellite at all.
fn gga_satellites(fields: &[&str]) -> Result<u32, FieldError> {
    if field(fields, GGA_SATELLITES)?.is_empty() {
        Ok(0)
    } else {
        integer(fields, GGA_SATELLITES)
    }
}

fn gsa_mode(fields: &[&str]) -> Result<GsaMode, FieldError> {
    let value = field(fields, GSA_MODE)?;
    if value.is_empty() {
        return Ok(GsaMode::NoMode);
    }

    match value.trim().parse::<u32>() {
        Ok(1) => Ok(GsaMode::NoFix),
        Ok(2) => Ok(GsaMode::Fix2D),
        Ok(3) => Ok(GsaMode::Fix3D),
        _ => Err(FieldError::UnknownMode(value.to_string())),
    }
}

fn gsa_satellites(fields: &[&str]) -> Result<u32, FieldError> {
    let slots = fields
        .get(GSA_SV_SLOTS)
        .ok_or(FieldError::Missing(GSA_SV_SLOTS.end - 1))?;

    Ok(slots.iter().filter(|sv| !sv.is_empty()).count() as u32)
}

/// GGA: quality indicator and number of satellites.
/// This single satellite count is both the tracked count and the in view sample.
pub fn gga(timestamp: f64, fields: &[&str]) -> FixRecord {
    let sentence = SentenceType::Gga;
    let mut record = FixRecord::new(timestamp, sentence);

    match gga_quality(fields) {
        Ok(quality) => record.fix_status = Some(FixStatus::Quality(quality)),
        Err(e) => report(sentence, fields, &e),
    }

    match gga_satellites(fields) {
        Ok(count) => {
            record.satellites_tracked = Some(count);
            record.satellites_in_view = Some(count);
        },
        Err(e) => report(sentence, fields, &e),
    }

    record
}

/// RMC: validity flag, kept as is.
pub fn rmc(timestamp: f64, fields: &[&str]) -> FixRecord {
    let sentence = SentenceType::Rmc;
    let mut record = FixRecord::new(timestamp, sentence);

    match field(fields, RMC_STATUS) {
        Ok(flag) => record.fix_status = Some(FixStatus::Validity(flag.to_string())),
        Err(e) => report(sentence, fields, &e),
    }

    record
}

/// GSA (either variant): fix mode and number of satellites used in the solution.
pub fn gsa(sentence: SentenceType, timestamp: f64, fields: &[&str]) -> FixRecord {
    let mut record = FixRecord::new(timestamp, sentence);

    match gsa_mode(fields) {
        Ok(mode) => record.fix_status = Some(FixStatus::Mode(mode)),
        Err(e) => report(sentence, fields, &e),
    }

    match gsa_satellites(fields) {
        Ok(count) => record.satellites_tracked = Some(count),
        Err(e) => report(sentence, fields, &e),
    }

    record
}
