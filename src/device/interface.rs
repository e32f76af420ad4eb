use flate2::read::GzDecoder;
use serialport::SerialPort;

use std::{collections::VecDeque, fs::File, io::Read};

/// [Interface] to the NMEA stream
pub enum Interface {
    /// [Interface::ReadOnly] is dedicated to read only input, mainly File inputs.
    /// Sources are consumed one after the other.
    ReadOnly(VecDeque<Box<dyn Read + Send>>),

    /// [Interface::Port] is used to connect to a physical port,
    /// and passively listen to a GNSS receiver.
    Port(Box<dyn SerialPort>),
}

impl Interface {
    /// Creates a new [SerialPort] interface
    pub fn from_serial_port(port: Box<dyn SerialPort>) -> Self {
        Self::Port(port)
    }

    /// Creates a new Read-Only interface
    pub fn from_file_handle(handle: File) -> Self {
        Self::from_reader(Box::new(handle))
    }

    /// Creates a new Read-Only interface, from gzip compressed file
    pub fn from_gzip_file_handle(handle: File) -> Self {
        Self::from_reader(Box::new(GzDecoder::new(handle)))
    }

    /// Creates a new Read-Only interface, from any readable source
    pub fn from_reader(reader: Box<dyn Read + Send>) -> Self {
        Self::ReadOnly(VecDeque::from([reader]))
    }

    /// Stacks one more file, to be consumed once previous sources are exhausted
    pub fn stack_file_handle(&mut self, handle: File) {
        self.stack_reader(Box::new(handle));
    }

    /// Stacks one more gzip compressed file
    pub fn stack_gzip_file_handle(&mut self, handle: File) {
        self.stack_reader(Box::new(GzDecoder::new(handle)));
    }

    pub fn stack_reader(&mut self, reader: Box<dyn Read + Send>) {
        match self {
            Self::ReadOnly(sources) => sources.push_back(reader),
            Self::Port(_) => {},
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::ReadOnly(_))
    }

    /// Moves on to next source, once current one has been consumed.
    pub fn next_source(&mut self) {
        if let Self::ReadOnly(sources) = self {
            sources.pop_front();
        }
    }

    /// True once all read only sources have been consumed.
    /// A serial port is never exhausted.
    pub fn is_exhausted(&self) -> bool {
        match self {
            Self::ReadOnly(sources) => sources.is_empty(),
            Self::Port(_) => false,
        }
    }
}

impl std::io::Read for Interface {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::ReadOnly(sources) => match sources.front_mut() {
                Some(source) => source.read(buf),
                None => Ok(0),
            },
            Self::Port(port) => port.read(buf),
        }
    }
}
