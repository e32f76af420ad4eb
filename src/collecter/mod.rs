use std::io::{BufWriter, Write};

use log::{debug, error, info};

use hifitime::prelude::Duration as HifiDuration;

use tokio::{
    sync::mpsc::Receiver as Rx,
    time::{Duration, Instant, interval_at},
};

use crate::session::Session;

pub mod fd;

use fd::FileDescriptor;

pub struct Collecter {
    /// Parsing [Session]
    session: Session,

    /// Log lines, in arrival order. Closing the channel ends the collection.
    rx: Rx<String>,

    /// Optional replay log
    recorder: Option<BufWriter<FileDescriptor>>,

    /// Progress report period
    summary_period: Option<Duration>,
}

impl Collecter {
    /// Builds new [Collecter]
    pub fn new(session: Session, rx: Rx<String>) -> Self {
        Self {
            rx,
            session,
            recorder: None,
            summary_period: None,
        }
    }

    /// Copy every collected line to this [FileDescriptor]
    pub fn with_recorder(mut self, fd: FileDescriptor) -> Self {
        self.recorder = Some(BufWriter::new(fd));
        self
    }

    /// Periodically report progress
    pub fn with_summary_period(mut self, period: Duration) -> Self {
        self.summary_period = Some(period);
        self
    }

    /// Consumes all lines until the channel is closed, then returns the [Session].
    pub async fn run(mut self) -> Session {
        let period = self.summary_period.unwrap_or(Duration::from_secs(3600));
        let mut ticker = interval_at(Instant::now() + period, period);

        loop {
            tokio::select! {
                line = self.rx.recv() => match line {
                    Some(line) => self.consume(&line),
                    None => break,
                },
                _ = ticker.tick(), if self.summary_period.is_some() => self.summary(),
            }
        }

        debug!("input closed");
        self.release_recorder();
        self.session
    }

    fn consume(&mut self, line: &str) {
        if let Some(recorder) = &mut self.recorder {
            if let Err(e) = writeln!(recorder, "{}", line) {
                error!("recording error: {}, recording aborted", e);
                self.recorder = None;
            }
        }

        self.session.parse_line(line);
    }

    fn summary(&self) {
        let latest = self
            .session
            .observations()
            .last()
            .map(|obs| format!("t={:.3} {}={}", obs.timestamp, obs.kind, obs.count))
            .unwrap_or_else(|| "no satellite".to_string());

        match self.session.ttff() {
            Some(ttff) => info!(
                "{} records - {} - TTFF: {}",
                self.session.records(),
                latest,
                HifiDuration::from_seconds(ttff)
            ),
            None => info!(
                "{} records - {} - awaiting first fix",
                self.session.records(),
                latest
            ),
        }
    }

    fn release_recorder(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let released = recorder
                .into_inner()
                .map_err(|e| e.into_error())
                .and_then(|fd| fd.finish());

            if let Err(e) = released {
                error!("failed to release recording: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::LogFormat;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn collects_until_closed() {
        let session = Session::new(&LogFormat::default()).unwrap();
        let (tx, rx) = mpsc::channel(4);

        let handle = tokio::spawn(Collecter::new(session, rx).run());

        for line in [
            "t=0.000,,$GPRMC,000000,V",
            "t=1.000,,$GPGGA,000001,,,,,0,00",
            "t=2.500,,$GPGGA,000002,,,,,1,05",
            "t=3.000,,$GPGSA,A,3,01,02,03,04,,,,,,,,,2.0,1.0,1.5",
        ] {
            tx.send(line.to_string()).await.unwrap();
        }
        drop(tx);

        let session = handle.await.unwrap();
        assert_eq!(session.records(), 4);
        assert_eq!(session.ttff(), Some(2.5));
        assert_eq!(session.observations().len(), 2);
    }
}
