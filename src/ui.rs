use std::io::{self, Write};

use timer_core::{format_mmss, Phase, PhaseEngine, Settings, TimerState};

use crate::alerts::AlertConfig;

const BAR_WIDTH: usize = 20;

pub const HELP_TEXT: &str = "POMODORO HELP\n\n\
     start   s   Start / resume\n\
     pause   p   Pause\n\
     toggle  t   Start or pause\n\
     reset   r   Back to ready, clears sessions\n\
     skip    n   Jump to the next phase\n\
     sound       Mute / unmute the cue\n\
     set <work|break|long> <min|MM:SS>\n\
     set sessions <n>\n\
     status  ?   Show settings\n\
     quit    q   Exit";

/// What the redraw loop needs; published after every engine change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Status {
    pub state: TimerState,
    pub sessions_until_long_break: u32,
    pub sound_enabled: bool,
    pub progress: f32,
}

impl Status {
    pub fn of(engine: &PhaseEngine) -> Self {
        Self {
            state: engine.state(),
            sessions_until_long_break: engine.settings().sessions_until_long_break,
            sound_enabled: engine.sound_enabled(),
            progress: engine.progress_fraction(),
        }
    }
}

fn progress_bar(progress: f32) -> String {
    let filled = ((BAR_WIDTH as f32 * progress) as usize).min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

pub fn status_line(status: &Status) -> String {
    let state = &status.state;
    let n = status.sessions_until_long_break;
    let done = state.completed_work_sessions;
    // Work shows the session in progress, a break the one just finished.
    let cycle = match state.phase {
        Phase::Idle => String::new(),
        Phase::Work => format!(" {}/{}", done % n + 1, n),
        Phase::Break | Phase::LongBreak if done > 0 => format!(" {}/{}", (done - 1) % n + 1, n),
        Phase::Break | Phase::LongBreak => String::new(),
    };
    format!(
        "[{}{}] {} [{}] sessions {} | {} | sound {}",
        state.phase.label(),
        cycle,
        format_mmss(state.seconds_remaining),
        progress_bar(status.progress),
        state.completed_work_sessions,
        if state.is_running { "running" } else { "paused" },
        if status.sound_enabled { "on" } else { "off" },
    )
}

/// Rewrites the current terminal line in place.
pub fn draw_status(out: &mut impl Write, status: &Status) -> io::Result<()> {
    write!(out, "\r{}\x1b[K", status_line(status))?;
    out.flush()
}

pub fn settings_text(settings: &Settings, alerts: &AlertConfig, sound_enabled: bool) -> String {
    format!(
        "SETTINGS\n\
         work        {} min\n\
         break       {} min\n\
         long break  {} min\n\
         long every  {} sessions\n\
         sound       {}\n\
         bell        {}\n\
         notify      {}",
        settings.work_minutes,
        settings.break_minutes,
        settings.long_break_minutes,
        settings.sessions_until_long_break,
        if sound_enabled { "on" } else { "off" },
        if alerts.audio { "on" } else { "off" },
        if alerts.notification { "on" } else { "off" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_idle() {
        let engine = PhaseEngine::new(Settings::default()).unwrap();
        let line = status_line(&Status::of(&engine));
        assert_eq!(
            line,
            "[Ready] 25:00 [--------------------] sessions 0 | paused | sound on"
        );
    }

    #[test]
    fn test_status_line_running() {
        let mut engine = PhaseEngine::new(Settings::default()).unwrap();
        engine.start();
        for _ in 0..750 {
            engine.tick();
        }
        engine.toggle_sound();
        let line = status_line(&Status::of(&engine));
        assert_eq!(
            line,
            "[Work 1/4] 12:30 [##########----------] sessions 0 | running | sound off"
        );
    }

    #[test]
    fn test_break_labels_count_the_finished_session() {
        let mut engine = PhaseEngine::new(Settings::default()).unwrap();
        engine.start();
        for _ in 0..1500 {
            engine.tick();
        }
        assert!(status_line(&Status::of(&engine)).starts_with("[Break 1/4] 05:00"));

        for _ in 0..3 {
            for _ in 0..300 {
                engine.tick();
            }
            for _ in 0..1500 {
                engine.tick();
            }
        }
        assert_eq!(engine.phase(), Phase::LongBreak);
        assert!(status_line(&Status::of(&engine)).starts_with("[Long Break 4/4] 15:00"));

        for _ in 0..900 {
            engine.tick();
        }
        assert!(status_line(&Status::of(&engine)).starts_with("[Work 1/4] 25:00"));
    }

    #[test]
    fn test_skipped_break_has_no_counter() {
        let mut engine = PhaseEngine::new(Settings::default()).unwrap();
        engine.start();
        engine.skip();
        assert!(status_line(&Status::of(&engine)).starts_with("[Break] 05:00"));
    }

    #[test]
    fn test_draw_status_rewrites_line() {
        let engine = PhaseEngine::new(Settings::default()).unwrap();
        let mut out = Vec::new();
        draw_status(&mut out, &Status::of(&engine)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\r'));
        assert!(text.ends_with("\x1b[K"));
    }

    #[test]
    fn test_settings_text() {
        let text = settings_text(&Settings::default(), &AlertConfig::default(), false);
        assert!(text.contains("work        25 min"));
        assert!(text.contains("long every  4 sessions"));
        assert!(text.contains("sound       off"));
    }
}
