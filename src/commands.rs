use std::str::FromStr;

use thiserror::Error;
use timer_core::{parse_mmss, Settings};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SettingField {
    Work,
    Break,
    LongBreak,
    Sessions,
}

impl SettingField {
    pub fn apply(self, settings: Settings, value: u32) -> Settings {
        match self {
            SettingField::Work => Settings { work_minutes: value, ..settings },
            SettingField::Break => Settings { break_minutes: value, ..settings },
            SettingField::LongBreak => Settings { long_break_minutes: value, ..settings },
            SettingField::Sessions => Settings { sessions_until_long_break: value, ..settings },
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Start,
    Pause,
    Toggle,
    Reset,
    Skip,
    Sound,
    Set(SettingField, u32),
    Status,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("unknown setting '{0}' (work, break, long, sessions)")]
    UnknownSetting(String),
    #[error("usage: set <work|break|long|sessions> <value>")]
    SetUsage,
    #[error("invalid value '{0}'")]
    BadValue(String),
}

/// Minutes, or MM:SS rounded up to the next whole minute.
fn parse_minutes(s: &str) -> Option<u32> {
    if s.contains(':') {
        parse_mmss(s).map(|secs| secs.div_ceil(60))
    } else {
        s.parse().ok()
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(CommandError::Empty);
        };
        let cmd = match head.to_ascii_lowercase().as_str() {
            "start" | "s" | "resume" => Command::Start,
            "pause" | "p" => Command::Pause,
            "toggle" | "t" => Command::Toggle,
            "reset" | "r" => Command::Reset,
            "skip" | "n" => Command::Skip,
            "sound" | "mute" => Command::Sound,
            "status" | "?" => Command::Status,
            "help" | "h" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            "set" => {
                let (Some(name), Some(raw), None) = (words.next(), words.next(), words.next())
                else {
                    return Err(CommandError::SetUsage);
                };
                let field = match name.to_ascii_lowercase().as_str() {
                    "work" => SettingField::Work,
                    "break" => SettingField::Break,
                    "long" | "longbreak" => SettingField::LongBreak,
                    "sessions" => SettingField::Sessions,
                    other => return Err(CommandError::UnknownSetting(other.to_string())),
                };
                let value = match field {
                    SettingField::Sessions => raw.parse().ok(),
                    _ => parse_minutes(raw),
                };
                let value = value.ok_or_else(|| CommandError::BadValue(raw.to_string()))?;
                return Ok(Command::Set(field, value));
            }
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!("start".parse::<Command>(), Ok(Command::Start));
        assert_eq!("  P ".parse::<Command>(), Ok(Command::Pause));
        assert_eq!("skip".parse::<Command>(), Ok(Command::Skip));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "dance".parse::<Command>(),
            Err(CommandError::Unknown("dance".into()))
        );
    }

    #[test]
    fn test_set_command() {
        assert_eq!(
            "set work 30".parse::<Command>(),
            Ok(Command::Set(SettingField::Work, 30))
        );
        assert_eq!(
            "set long 12:30".parse::<Command>(),
            Ok(Command::Set(SettingField::LongBreak, 13))
        );
        assert_eq!(
            "set sessions 2".parse::<Command>(),
            Ok(Command::Set(SettingField::Sessions, 2))
        );
        assert_eq!("set work".parse::<Command>(), Err(CommandError::SetUsage));
        assert_eq!(
            "set nap 5".parse::<Command>(),
            Err(CommandError::UnknownSetting("nap".into()))
        );
        assert_eq!(
            "set sessions 1:00".parse::<Command>(),
            Err(CommandError::BadValue("1:00".into()))
        );
    }

    #[test]
    fn test_apply_field() {
        let s = SettingField::Break.apply(Settings::default(), 8);
        assert_eq!(s.break_minutes, 8);
        assert_eq!(s.work_minutes, 25);
    }
}
