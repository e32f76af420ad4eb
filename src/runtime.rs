use hifitime::prelude::{Duration, Epoch, TimeScale};

use crate::config::LogFormat;

/// Live capture clock. Receivers do not timestamp their sentences,
/// so every line is stamped with the time elapsed since deployment.
#[derive(Debug, Clone)]
pub struct Runtime {
    /// Current [Epoch]
    pub epoch: Epoch,

    /// Epoch of deployment
    deploy_time: Epoch,

    /// Uptime as [Duration]
    pub uptime: Duration,

    /// Log line layout
    format: LogFormat,
}

impl Runtime {
    pub fn new(epoch: Epoch, format: LogFormat) -> Self {
        Self {
            epoch,
            deploy_time: epoch,
            uptime: Default::default(),
            format,
        }
    }

    /// Update latest epoch
    pub fn new_epoch(&mut self, epoch: Epoch) {
        self.epoch = epoch;
        self.uptime = epoch - self.deploy_time;
    }

    /// Turns one raw receiver sentence into a log line stamped with current uptime.
    /// Lines that already carry a timestamp are kept as is.
    pub fn stamp(&self, sentence: &str) -> String {
        if sentence.starts_with(&self.format.timestamp_prefix) {
            sentence.to_string()
        } else {
            self.format.stamp(self.uptime.to_seconds(), sentence)
        }
    }

    /// Returns current epoch in [TimeScale::UTC]
    pub fn utc_time(&self) -> Epoch {
        self.epoch.to_time_scale(TimeScale::UTC)
    }
}
