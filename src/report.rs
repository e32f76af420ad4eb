//! Session results, as handed over to plotting tools.
use serde::Serialize;

use std::io::{BufWriter, Write};

use crate::{
    collecter::fd::FileDescriptor,
    session::{Observation, Session, State},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report<'a> {
    /// Time to first fix (s)
    pub ttff: Option<f64>,
    /// Timestamp of the first sentence
    pub capture_start: Option<f64>,
    pub state: State,
    /// Number of parsed sentences
    pub records: usize,
    /// Number of rejected lines
    pub rejected: usize,
    pub observations: &'a [Observation],
}

impl<'a> Report<'a> {
    pub fn new(session: &'a Session) -> Self {
        let (observations, ttff) = session.snapshot();
        Self {
            ttff,
            observations,
            state: session.state(),
            records: session.records(),
            rejected: session.rejected(),
            capture_start: session.capture_start(),
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(writer, self)
    }

    /// Writes this [Report] as JSON, gzip compressed if filename terminates with `.gz`.
    pub fn to_file(&self, filename: &str) -> std::io::Result<()> {
        let fd = FileDescriptor::new(filename.ends_with(".gz"), filename)?;
        let mut writer = BufWriter::new(fd);

        self.to_writer(&mut writer)?;
        writer.write_all(b"\n")?;

        writer.into_inner().map_err(|e| e.into_error())?.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::LogFormat;

    #[test]
    fn json_layout() {
        let mut session = Session::new(&LogFormat::default()).unwrap();
        session.parse_line("t=1.000,,$GPGGA,000001,,,,,0,");
        session.parse_line("t=3.000,,$GPGGA,000003,,,,,1,07");
        session.parse_line("t=4.000,,$GNGSA,A,3,01,02,03,04,05,06,07,08,,,,,1.0,0.6,0.8");

        let report = Report::new(&session);

        let mut content = Vec::new();
        report.to_writer(&mut content).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&content).unwrap();

        assert_eq!(value["ttff"], 2.0);
        assert_eq!(value["capture_start"], 1.0);
        assert_eq!(value["state"]["fix_acquired"]["ttff"], 2.0);
        assert_eq!(value["records"], 3);
        assert_eq!(value["rejected"], 0);

        let observations = value["observations"].as_array().unwrap();
        assert_eq!(observations.len(), 3);
        assert_eq!(observations[0]["kind"], "in_view");
        assert_eq!(observations[0]["count"], 0);
        assert_eq!(observations[1]["count"], 7);
        assert_eq!(observations[2]["kind"], "tracked");
        assert_eq!(observations[2]["timestamp"], 4.0);
        assert_eq!(observations[2]["count"], 8);
    }

    #[test]
    fn pending_fix() {
        let session = Session::new(&LogFormat::default()).unwrap();
        let report = Report::new(&session);

        let mut content = Vec::new();
        report.to_writer(&mut content).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&content).unwrap();
        assert!(value["ttff"].is_null());
        assert_eq!(value["state"], "awaiting_fix");
        assert!(value["observations"].as_array().unwrap().is_empty());
    }
}
