use crate::settings::{Settings, SettingsError};
use crate::format_mmss;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Work,
    Break,
    LongBreak,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Ready",
            Phase::Work => "Work",
            Phase::Break => "Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

/// Snapshot of the countdown. Handed out by value to observers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TimerState {
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub is_running: bool,
    pub completed_work_sessions: u32,
}

impl TimerState {
    fn idle(settings: &Settings) -> Self {
        Self {
            phase: Phase::Idle,
            seconds_remaining: settings.work_secs(),
            is_running: false,
            completed_work_sessions: 0,
        }
    }
}

/// A phase boundary crossed by the countdown.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub completed_work_sessions: u32,
}

impl Transition {
    pub fn alert_message(&self) -> &'static str {
        match self.to {
            Phase::LongBreak => "Work done! Long break.",
            Phase::Break => "Work done! Short break.",
            // Transitions never land in Idle; only reset goes there.
            Phase::Work | Phase::Idle => "Break over! Time to work.",
        }
    }
}

pub struct PhaseEngine {
    settings: Settings,
    state: TimerState,
    sound_enabled: bool,
}

impl PhaseEngine {
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            state: TimerState::idle(&settings),
            settings,
            sound_enabled: true,
        })
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Full length of `phase` under the current settings. Idle shows the work length.
    pub fn phase_duration_secs(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Idle | Phase::Work => self.settings.work_secs(),
            Phase::Break => self.settings.break_secs(),
            Phase::LongBreak => self.settings.long_break_secs(),
        }
    }

    pub fn start(&mut self) {
        if self.state.phase == Phase::Idle {
            self.state.phase = Phase::Work;
            self.state.seconds_remaining = self.settings.work_secs();
        }
        self.state.is_running = true;
    }

    pub fn pause(&mut self) {
        self.state.is_running = false;
    }

    pub fn reset(&mut self) {
        self.state = TimerState::idle(&self.settings);
    }

    /// Replace the settings. A paused timer reloads the current phase's full
    /// duration; a running one picks the new durations up at its next transition.
    pub fn configure(&mut self, settings: Settings) -> Result<(), SettingsError> {
        settings.validate()?;
        self.settings = settings;
        if !self.state.is_running {
            self.state.seconds_remaining = self.phase_duration_secs(self.state.phase);
        }
        Ok(())
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Advance the countdown by one second. The tick that reaches zero moves
    /// straight into the next phase, so a running timer never rests at 0.
    pub fn tick(&mut self) -> Option<Transition> {
        if !self.state.is_running {
            return None;
        }
        if self.state.seconds_remaining > 1 {
            self.state.seconds_remaining -= 1;
            return None;
        }
        Some(self.advance_phase())
    }

    /// Manual phase change. Never counts as a completed session.
    pub fn skip(&mut self) -> Transition {
        let from = self.state.phase;
        let to = match from {
            Phase::Work => Phase::Break,
            Phase::Idle | Phase::Break | Phase::LongBreak => Phase::Work,
        };
        self.enter(to);
        Transition {
            from,
            to,
            completed_work_sessions: self.state.completed_work_sessions,
        }
    }

    fn advance_phase(&mut self) -> Transition {
        let from = self.state.phase;
        let to = match from {
            Phase::Work => {
                let n = self.state.completed_work_sessions + 1;
                self.state.completed_work_sessions = n;
                if n % self.settings.sessions_until_long_break == 0 {
                    Phase::LongBreak
                } else {
                    Phase::Break
                }
            }
            Phase::Break | Phase::LongBreak | Phase::Idle => Phase::Work,
        };
        self.enter(to);
        Transition {
            from,
            to,
            completed_work_sessions: self.state.completed_work_sessions,
        }
    }

    fn enter(&mut self, phase: Phase) {
        self.state.phase = phase;
        self.state.seconds_remaining = self.phase_duration_secs(phase);
    }

    pub fn formatted_time(&self) -> String {
        format_mmss(self.state.seconds_remaining)
    }

    pub fn progress_fraction(&self) -> f32 {
        let target = self.phase_duration_secs(self.state.phase);
        if target == 0 || self.state.phase == Phase::Idle {
            return 0.0;
        }
        let elapsed = target.saturating_sub(self.state.seconds_remaining);
        let frac = elapsed as f32 / target as f32;
        if frac > 1.0 { 1.0 } else { frac }
    }
}
