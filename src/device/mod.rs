use log::{debug, error};

use serialport::{Parity, StopBits};

mod interface;

use interface::Interface;

use std::{
    fs::File,
    io::{ErrorKind, Read},
    time::Duration,
};

pub struct Device {
    pub interface: Interface,
    /// Bytes received but not terminated yet
    pending: Vec<u8>,
}

impl Device {
    fn new(interface: Interface) -> Self {
        Self {
            interface,
            pending: Vec::with_capacity(256),
        }
    }

    fn is_gzip(fullpath: &str) -> bool {
        fullpath.ends_with(".gz")
    }

    pub fn open_file(fullpath: &str) -> std::io::Result<Self> {
        let handle = File::open(fullpath)?;

        debug!("opened \"{}\"", fullpath);

        Ok(Self::new(if Self::is_gzip(fullpath) {
            Interface::from_gzip_file_handle(handle)
        } else {
            Interface::from_file_handle(handle)
        }))
    }

    /// Stacks one more input file, consumed after the previous ones.
    pub fn stack_file(&mut self, fullpath: &str) -> std::io::Result<()> {
        let handle = File::open(fullpath)?;

        debug!("stacked \"{}\"", fullpath);

        if Self::is_gzip(fullpath) {
            self.interface.stack_gzip_file_handle(handle);
        } else {
            self.interface.stack_file_handle(handle);
        }

        Ok(())
    }

    /// Stacks any readable source, consumed after the previous ones.
    pub fn stack_reader<R: Read + Send + 'static>(&mut self, reader: R) {
        self.interface.stack_reader(Box::new(reader));
    }

    /// Builds a read only [Device] from any readable source.
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Self::new(Interface::from_reader(Box::new(reader)))
    }

    pub fn open_serial_port(
        port_str: &str,
        baud: u32,
        parity: Parity,
        stop_bits: StopBits,
    ) -> Result<Self, serialport::Error> {
        let port = serialport::new(port_str, baud)
            .parity(parity)
            .stop_bits(stop_bits)
            .timeout(Duration::from_millis(250))
            .open()?;

        debug!("opened {} port ({} bauds)", port_str, baud);

        Ok(Self::new(Interface::from_serial_port(port)))
    }

    /// True once all input files have been consumed
    pub fn is_exhausted(&self) -> bool {
        self.interface.is_exhausted()
    }

    fn read_interface(&mut self, buffer: &mut [u8]) -> std::io::Result<usize> {
        loop {
            match self.interface.read(buffer) {
                Ok(size) => return Ok(size),
                Err(e) => match e.kind() {
                    ErrorKind::Interrupted => continue,
                    // serial port: nothing received in time
                    ErrorKind::TimedOut | ErrorKind::WouldBlock
                        if !self.interface.is_read_only() =>
                    {
                        return Ok(0);
                    },
                    _ => return Err(e),
                },
            }
        }
    }

    /// Releases one terminated line, without its terminator.
    /// Empty lines are dropped.
    fn release<T: FnMut(&str)>(line: &[u8], cb: &mut T) -> usize {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            return 0;
        }

        let line = String::from_utf8_lossy(line);
        cb(&line);
        1
    }

    /// Consume all lines currently available.
    ///
    /// ## Returns
    /// - Ok(n) with n=number of lines that were consumed (not bytes)
    /// - Err(e) on I/O error
    pub fn consume_all_cb<T: FnMut(&str)>(
        &mut self,
        buffer: &mut [u8],
        mut cb: T,
    ) -> std::io::Result<usize> {
        if self.is_exhausted() {
            return Ok(0);
        }

        let nbytes = match self.read_interface(buffer) {
            Ok(nbytes) => nbytes,
            Err(e) => {
                if self.interface.is_read_only() {
                    error!("dropping input file: {}", e);
                    self.pending.clear();
                    self.interface.next_source();
                }
                return Err(e);
            },
        };

        let mut total = 0;

        if nbytes == 0 {
            if self.interface.is_read_only() {
                // end of file: last line may not be terminated
                let pending = std::mem::take(&mut self.pending);
                total += Self::release(&pending, &mut cb);
                self.interface.next_source();
            }
            return Ok(total);
        }

        self.pending.extend_from_slice(&buffer[..nbytes]);

        let mut start = 0;
        while let Some(offset) = self.pending[start..].iter().position(|b| *b == b'\n') {
            let end = start + offset;
            total += Self::release(&self.pending[start..end], &mut cb);
            start = end + 1;
        }

        self.pending.drain(..start);
        Ok(total)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn consume_all(device: &mut Device, buffer: &mut [u8]) -> Vec<String> {
        let mut lines = Vec::new();
        while !device.is_exhausted() {
            device
                .consume_all_cb(buffer, |line| lines.push(line.to_string()))
                .unwrap();
        }
        lines
    }

    #[test]
    fn line_splitting() {
        let mut buffer = [0; 8];
        let mut device = Device::from_reader(Cursor::new(
            "t=0.1,,$GPGGA,1\r\nt=0.2,,$GPRMC,2\n\n\r\nt=0.3,,$GPGSA,3".as_bytes().to_vec(),
        ));

        let lines = consume_all(&mut device, &mut buffer);
        assert_eq!(
            lines,
            vec!["t=0.1,,$GPGGA,1", "t=0.2,,$GPRMC,2", "t=0.3,,$GPGSA,3"]
        );
        assert!(device.is_exhausted());
    }

    #[test]
    fn stacked_sources() {
        let mut buffer = [0; 1024];
        let mut device = Device::from_reader(Cursor::new(b"first\nsecond".to_vec()));
        device.stack_reader(Cursor::new(b"third\n".to_vec()));

        let lines = consume_all(&mut device, &mut buffer);
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn gzip_source() {
        use flate2::{Compression, write::GzEncoder};
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(5));
        encoder.write_all(b"t=1,,$GPGGA,a\nt=2,,$GPGGA,b\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut buffer = [0; 16];
        let mut device = Device::from_reader(flate2::read::GzDecoder::new(Cursor::new(compressed)));

        let lines = consume_all(&mut device, &mut buffer);
        assert_eq!(lines, vec!["t=1,,$GPGGA,a", "t=2,,$GPGGA,b"]);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut buffer = [0; 64];
        let mut device = Device::from_reader(Cursor::new(vec![b'a', 0xff, b'b', b'\n']));
        let lines = consume_all(&mut device, &mut buffer);
        assert_eq!(lines, vec!["a\u{FFFD}b"]);
    }
}
