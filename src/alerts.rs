use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertConfig {
    pub audio: bool,
    pub notification: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            audio: true,
            notification: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("audio cue unavailable: {0}")]
    Audio(#[source] io::Error),
    #[error("notification failed: {0}")]
    Notification(#[source] io::Error),
}

/// Where phase-expiry cues go.
pub trait AlertSink {
    fn play_cue(&mut self) -> Result<(), AlertError>;
    fn notify(&mut self, message: &str) -> Result<(), AlertError>;
}

/// Rings the terminal bell and prints the message on its own line.
pub struct TerminalAlerts<W: Write> {
    out: W,
}

impl<W: Write> TerminalAlerts<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> AlertSink for TerminalAlerts<W> {
    fn play_cue(&mut self) -> Result<(), AlertError> {
        self.out.write_all(b"\x07").map_err(AlertError::Audio)?;
        self.out.flush().map_err(AlertError::Audio)
    }

    fn notify(&mut self, message: &str) -> Result<(), AlertError> {
        writeln!(self.out, "\r\n*** {} ***", message).map_err(AlertError::Notification)?;
        self.out.flush().map_err(AlertError::Notification)
    }
}

/// Best effort: sink failures are logged and dropped.
pub fn fire_alert(config: &AlertConfig, sound_enabled: bool, sink: &mut dyn AlertSink, message: &str) {
    if config.audio && sound_enabled {
        if let Err(e) = sink.play_cue() {
            log::warn!("{}", e);
        }
    }
    if config.notification {
        if let Err(e) = sink.notify(message) {
            log::warn!("{}", e);
        }
    }
}
