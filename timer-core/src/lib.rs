//! Pure pomodoro phase logic with no platform dependencies.
//! Driven by an external one-second tick; testable on host.

mod engine;
mod settings;

pub use engine::{Phase, PhaseEngine, TimerState, Transition};
pub use settings::{
    Settings, SettingsError, DEFAULT_BREAK_MINUTES, DEFAULT_LONG_BREAK_MINUTES,
    DEFAULT_SESSIONS_UNTIL_LONG_BREAK, DEFAULT_WORK_MINUTES,
};

/// Format seconds as "MM:SS". Minutes are not capped at two digits.
pub fn format_mmss(secs: u32) -> String {
    let m = secs / 60;
    let s = secs % 60;
    format!("{:02}:{:02}", m, s)
}

/// Parse "MM:SS" or plain "SS" into seconds.
pub fn parse_mmss(s: &str) -> Option<u32> {
    let parts: Vec<&str> = s.split(':').collect();
    match parts.len() {
        1 => parts[0].trim().parse::<u32>().ok(),
        2 => {
            let mins = parts[0].trim().parse::<u32>().ok()?;
            let secs = parts[1].trim().parse::<u32>().ok()?;
            if secs >= 60 {
                return None;
            }
            mins.checked_mul(60)?.checked_add(secs)
        }
        _ => None,
    }
}
