use std::path::PathBuf;

use clap::{ArgAction, Parser};
use timer_core::Settings;

#[derive(Debug, Parser)]
#[command(name = "pomodoro", version, about = "Pomodoro timer for the terminal")]
pub struct Cli {
    /// Work phase length in minutes
    #[arg(long, value_name = "MINUTES")]
    pub work: Option<u32>,

    /// Short break length in minutes
    #[arg(long = "break", value_name = "MINUTES")]
    pub break_minutes: Option<u32>,

    /// Long break length in minutes
    #[arg(long, value_name = "MINUTES")]
    pub long_break: Option<u32>,

    /// Completed work sessions before a long break
    #[arg(long, value_name = "N")]
    pub sessions: Option<u32>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Start with the audio cue muted
    #[arg(long)]
    pub no_sound: bool,

    /// Begin the first work phase immediately
    #[arg(long)]
    pub autostart: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line values win over whatever was loaded from disk.
    pub fn apply(&self, settings: Settings) -> Settings {
        Settings {
            work_minutes: self.work.unwrap_or(settings.work_minutes),
            break_minutes: self.break_minutes.unwrap_or(settings.break_minutes),
            long_break_minutes: self.long_break.unwrap_or(settings.long_break_minutes),
            sessions_until_long_break: self.sessions.unwrap_or(settings.sessions_until_long_break),
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
