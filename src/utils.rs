use serialport::{Parity, StopBits};

use crate::config::Error;

pub fn to_parity(parity: &str) -> Result<Parity, Error> {
    match parity.trim() {
        "N" | "n" => Ok(Parity::None),
        "E" | "e" => Ok(Parity::Even),
        "O" | "o" => Ok(Parity::Odd),
        other => Err(Error::Parity(other.to_string())),
    }
}

pub fn to_stop_bits(stop_bits: u8) -> Result<StopBits, Error> {
    match stop_bits {
        1 => Ok(StopBits::One),
        2 => Ok(StopBits::Two),
        other => Err(Error::StopBits(other)),
    }
}
