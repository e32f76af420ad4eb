//! Parsing session: turns log lines into a satellite count time series
//! and latches the Time To First Fix.
use hifitime::prelude::Duration;
use log::{debug, error, info, trace};
use serde::Serialize;

use crate::{
    config::{Error as ConfigError, LogFormat},
    nmea::{
        record::FixRecord,
        sentence::{SentenceType, dispatch},
        tokenizer::Tokenizer,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// Satellites the receiver can see
    InView,
    /// Satellites used in the current solution
    Tracked,
}

impl std::fmt::Display for ObservationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InView => write!(f, "in_view"),
            Self::Tracked => write!(f, "tracked"),
        }
    }
}

/// One point of the satellite count time series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    pub timestamp: f64,
    pub kind: ObservationKind,
    pub count: u32,
}

/// Fix latch. There is no way back from [State::FixAcquired].
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    AwaitingFix,
    FixAcquired {
        /// Time to first fix (s), elapsed since capture start
        ttff: f64,
    },
}

#[derive(Debug, Clone)]
pub struct Session {
    tokenizer: Tokenizer,
    /// Timestamp of the very first sentence
    capture_start: Option<f64>,
    state: State,
    observations: Vec<Observation>,
    /// Number of ingested [FixRecord]s
    records: usize,
    /// Number of lines that could not be tokenized
    rejected: usize,
}

impl Session {
    /// Builds a new [Session] expecting lines laid out as described by [LogFormat].
    pub fn new(format: &LogFormat) -> Result<Self, ConfigError> {
        format.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(format)?,
            capture_start: None,
            state: State::default(),
            observations: Vec::with_capacity(1024),
            records: 0,
            rejected: 0,
        })
    }

    /// Processes one log line (without line terminator).
    /// Unusable lines are reported and skipped, unknown sentences are ignored.
    pub fn parse_line(&mut self, line: &str) {
        let tokens = match self.tokenizer.tokenize(line) {
            Ok(tokens) => tokens,
            Err(e) => {
                error!("{} - \"{}\"", e, line);
                self.rejected += 1;
                return;
            },
        };

        // capture starts with the first timestamped sentence, whatever its type
        if self.capture_start.is_none() {
            debug!("capture start: t={:.3}", tokens.timestamp);
            self.capture_start = Some(tokens.timestamp);
        }

        match dispatch(tokens.sentence_id, tokens.timestamp, &tokens.fields) {
            Some(record) => self.ingest(record),
            None => trace!("t={:.3} - {} skipped", tokens.timestamp, tokens.sentence_id),
        }
    }

    /// Accumulates one [FixRecord].
    pub fn ingest(&mut self, record: FixRecord) {
        trace!("{}", record);

        let capture_start = *self.capture_start.get_or_insert(record.timestamp);
        self.records += 1;

        if self.state == State::AwaitingFix && Self::indicates_fix(&record) {
            let ttff = (record.timestamp - capture_start).max(0.0);
            info!(
                "t={:.3} - {} first fix, TTFF: {}",
                record.timestamp,
                record.sentence,
                Duration::from_seconds(ttff)
            );
            self.state = State::FixAcquired { ttff };
        }

        match record.sentence {
            SentenceType::Gga => {
                if let Some(count) = record.satellites_in_view {
                    self.observations.push(Observation {
                        timestamp: record.timestamp,
                        kind: ObservationKind::InView,
                        count,
                    });
                }
            },
            SentenceType::GpsGsa | SentenceType::CombinedGsa => {
                if let Some(count) = record.satellites_tracked {
                    if self.tracked_point_is_new(count) {
                        self.observations.push(Observation {
                            timestamp: record.timestamp,
                            kind: ObservationKind::Tracked,
                            count,
                        });
                    }
                }
            },
            SentenceType::Rmc => {},
        }
    }

    /// GGA: any satellite in use. GSA: 2D or 3D fix.
    fn indicates_fix(record: &FixRecord) -> bool {
        match record.sentence {
            SentenceType::Gga => record.satellites_tracked.unwrap_or(0) > 0,
            SentenceType::GpsGsa | SentenceType::CombinedGsa => record
                .fix_status
                .as_ref()
                .is_some_and(|status| status.is_position_fix()),
            SentenceType::Rmc => false,
        }
    }

    /// Tracked points are only kept when they rise above the latest point:
    /// a lower count than the latest in view count, or a count that does not
    /// exceed the latest tracked count, is redundant.
    fn tracked_point_is_new(&self, count: u32) -> bool {
        match self.observations.last() {
            Some(latest) => match latest.kind {
                ObservationKind::InView => latest.count <= count,
                ObservationKind::Tracked => latest.count < count,
            },
            None => true,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn has_fix(&self) -> bool {
        matches!(self.state, State::FixAcquired { .. })
    }

    /// Time to first fix (s), once the fix has been acquired.
    pub fn ttff(&self) -> Option<f64> {
        match self.state {
            State::FixAcquired { ttff } => Some(ttff),
            State::AwaitingFix => None,
        }
    }

    pub fn capture_start(&self) -> Option<f64> {
        self.capture_start
    }

    /// Satellite count time series, in arrival order
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Current time series and TTFF
    pub fn snapshot(&self) -> (&[Observation], Option<f64>) {
        (&self.observations, self.ttff())
    }

    pub fn records(&self) -> usize {
        self.records
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// True when not a single usable record was produced
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nmea::record::{FixQuality, FixStatus, GsaMode};

    fn session() -> Session {
        Session::new(&LogFormat::default()).unwrap()
    }

    fn gga(timestamp: f64, count: Option<u32>) -> FixRecord {
        let mut record = FixRecord::new(timestamp, SentenceType::Gga);
        record.fix_status = Some(FixStatus::Quality(FixQuality::GpsFix));
        record.satellites_tracked = count;
        record.satellites_in_view = count;
        record
    }

    fn gsa(timestamp: f64, mode: GsaMode, count: u32) -> FixRecord {
        let mut record = FixRecord::new(timestamp, SentenceType::GpsGsa);
        record.fix_status = Some(FixStatus::Mode(mode));
        record.satellites_tracked = Some(count);
        record
    }

    #[test]
    fn initial_state() {
        let session = session();
        assert_eq!(session.state(), State::AwaitingFix);
        assert!(!session.has_fix());
        assert!(session.ttff().is_none());
        assert!(session.capture_start().is_none());
        assert!(session.observations().is_empty());
        assert!(session.is_empty());
    }

    #[test]
    fn gga_fix_latch() {
        let mut session = session();

        session.ingest(gga(10.0, Some(0)));
        assert_eq!(session.capture_start(), Some(10.0));
        assert!(!session.has_fix());

        session.ingest(gga(12.5, Some(4)));
        assert_eq!(session.state(), State::FixAcquired { ttff: 2.5 });
        assert_eq!(session.ttff(), Some(2.5));

        session.ingest(gga(13.0, Some(0)));
        session.ingest(gga(20.0, Some(9)));
        assert_eq!(session.ttff(), Some(2.5));
        assert_eq!(session.capture_start(), Some(10.0));
        assert_eq!(session.observations().len(), 4);
        assert_eq!(session.records(), 4);
    }

    #[test]
    fn gsa_fix_modes() {
        let mut session = session();
        session.ingest(gsa(1.0, GsaMode::NoMode, 0));
        session.ingest(gsa(2.0, GsaMode::NoFix, 3));
        assert!(!session.has_fix());

        session.ingest(gsa(3.0, GsaMode::Fix2D, 4));
        assert_eq!(session.ttff(), Some(2.0));
    }

    #[test]
    fn rmc_never_acquires_fix() {
        let mut session = session();
        let mut record = FixRecord::new(1.0, SentenceType::Rmc);
        record.fix_status = Some(FixStatus::Validity("A".to_string()));
        session.ingest(record);

        assert!(!session.has_fix());
        assert!(session.observations().is_empty());
        assert_eq!(session.capture_start(), Some(1.0));
        assert!(!session.is_empty());
    }

    #[test]
    fn absent_counts_produce_no_points() {
        let mut session = session();
        session.ingest(gga(1.0, None));

        let mut record = FixRecord::new(2.0, SentenceType::CombinedGsa);
        record.fix_status = Some(FixStatus::Mode(GsaMode::Fix3D));
        session.ingest(record);

        assert!(session.observations().is_empty());
        assert_eq!(session.ttff(), Some(1.0));
    }

    #[test]
    fn tracked_points_filter() {
        let mut session = session();

        // nothing to compare to
        session.ingest(gsa(1.0, GsaMode::NoFix, 3));
        // increase over tracked
        session.ingest(gsa(2.0, GsaMode::NoFix, 5));
        // equal to tracked
        session.ingest(gsa(3.0, GsaMode::NoFix, 5));
        // decrease below tracked
        session.ingest(gsa(4.0, GsaMode::NoFix, 2));

        let counts = session
            .observations()
            .iter()
            .map(|obs| (obs.timestamp, obs.count))
            .collect::<Vec<_>>();
        assert_eq!(counts, vec![(1.0, 3), (2.0, 5)]);

        // in view point, then tracked below, equal and above it
        session.ingest(gga(5.0, Some(8)));
        session.ingest(gsa(6.0, GsaMode::Fix3D, 7));
        assert_eq!(session.observations().len(), 3);

        session.ingest(gga(7.0, Some(8)));
        session.ingest(gsa(8.0, GsaMode::Fix3D, 8));
        assert_eq!(session.observations().len(), 5);

        let latest = session.observations().last().unwrap();
        assert_eq!(latest.kind, ObservationKind::Tracked);
        assert_eq!(latest.count, 8);
    }

    #[test]
    fn parse_line_starts_capture_on_any_sentence() {
        let mut session = session();
        session.parse_line("t=1.000,,$GPGSV,3,1,12,01,40,083,46");
        assert_eq!(session.capture_start(), Some(1.0));
        assert!(session.is_empty());

        session.parse_line("t=4.000,,$GPGGA,000004,,,,,1,06");
        assert_eq!(session.ttff(), Some(3.0));
    }

    #[test]
    fn rejected_lines() {
        let mut session = session();
        session.parse_line("garbage");
        session.parse_line("t=1.0,,$GP");
        assert_eq!(session.rejected(), 2);
        assert!(session.capture_start().is_none());
        assert!(session.is_empty());
    }

    #[test]
    fn observation_kind_labels() {
        assert_eq!(ObservationKind::InView.to_string(), "in_view");
        assert_eq!(ObservationKind::Tracked.to_string(), "tracked");
    }
}
