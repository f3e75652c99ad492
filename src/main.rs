mod alerts;
mod cli;
mod commands;
mod pump;
mod storage;
mod ui;

use std::io;

use anyhow::Context;
use clap::Parser;
use timer_core::{PhaseEngine, SettingsError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing_subscriber::EnvFilter;

use crate::alerts::{fire_alert, AlertSink, TerminalAlerts};
use crate::cli::Cli;
use crate::commands::{Command, SettingField};
use crate::pump::{Pump, TICK_INTERVAL};
use crate::storage::{SettingsStore, StoredPrefs};
use crate::ui::Status;

#[derive(Debug)]
pub enum AppOp {
    Command(Command),
    /// Tick from the pump, tagged with the run that produced it.
    Pump(u64),
    Quit,
}

struct PomodoroApp<A: AlertSink> {
    engine: PhaseEngine,
    pump: Pump,
    alerts: A,
    /// What the settings file holds. Command-line overrides live only in the engine.
    prefs: StoredPrefs,
    store: Option<SettingsStore>,
    status_tx: watch::Sender<Status>,
}

impl<A: AlertSink> PomodoroApp<A> {
    fn new(
        engine: PhaseEngine,
        pump: Pump,
        alerts: A,
        prefs: StoredPrefs,
        store: Option<SettingsStore>,
        status_tx: watch::Sender<Status>,
    ) -> Self {
        Self {
            engine,
            pump,
            alerts,
            prefs,
            store,
            status_tx,
        }
    }

    fn publish(&self) {
        self.status_tx.send_replace(Status::of(&self.engine));
    }

    fn start(&mut self) {
        self.engine.start();
        self.pump.start();
    }

    fn pause(&mut self) {
        self.engine.pause();
        self.pump.stop();
    }

    fn reset(&mut self) {
        self.pump.stop();
        self.engine.reset();
    }

    /// Changes one field in the engine and the same field in the stored prefs.
    fn configure(&mut self, field: SettingField, value: u32) -> Result<(), SettingsError> {
        let settings = field.apply(*self.engine.settings(), value);
        self.engine.configure(settings)?;
        log::info!("settings changed: {:?}", settings);
        self.prefs.pomodoro = field.apply(self.prefs.pomodoro, value);
        self.persist();
        Ok(())
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.prefs) {
            log::error!("Failed to save settings: {}", e);
        }
    }

    /// Runs one command to completion. Returns text to show the user, if any.
    fn handle_command(&mut self, cmd: Command) -> Option<String> {
        let reply = match cmd {
            Command::Start => {
                self.start();
                None
            }
            Command::Pause => {
                self.pause();
                None
            }
            Command::Toggle => {
                if self.engine.is_running() {
                    self.pause();
                } else {
                    self.start();
                }
                None
            }
            Command::Reset => {
                self.reset();
                None
            }
            Command::Skip => {
                let t = self.engine.skip();
                log::info!("skipped {} -> {}", t.from.label(), t.to.label());
                None
            }
            Command::Sound => {
                let on = self.engine.toggle_sound();
                self.prefs.sound_enabled = on;
                self.persist();
                Some(format!("sound {}", if on { "on" } else { "off" }))
            }
            Command::Set(field, value) => {
                match self.configure(field, value) {
                    Ok(()) => None,
                    Err(e) => Some(format!("rejected: {}", e)),
                }
            }
            Command::Status => Some(ui::settings_text(
                self.engine.settings(),
                &self.prefs.alerts,
                self.engine.sound_enabled(),
            )),
            Command::Help => Some(ui::HELP_TEXT.to_string()),
            Command::Quit => None,
        };
        self.publish();
        reply
    }

    fn handle_pump(&mut self, generation: u64) {
        if !self.pump.is_current(generation) {
            log::trace!("dropping stale tick from run {}", generation);
            return;
        }
        if let Some(t) = self.engine.tick() {
            log::info!(
                "{} -> {} (sessions completed: {})",
                t.from.label(),
                t.to.label(),
                t.completed_work_sessions
            );
            fire_alert(
                &self.prefs.alerts,
                self.engine.sound_enabled(),
                &mut self.alerts,
                t.alert_message(),
            );
        }
        self.publish();
    }

    fn shutdown(&mut self) {
        self.pump.stop();
    }
}

fn open_store(cli: &Cli) -> Option<SettingsStore> {
    let store = match &cli.config {
        Some(path) => SettingsStore::new(path.clone()),
        None => match SettingsStore::default_location() {
            Ok(store) => store,
            Err(e) => {
                log::warn!("settings will not be saved: {}", e);
                return None;
            }
        },
    };
    log::info!("settings file: {}", store.path().display());
    Some(store)
}

/// Stored prefs with the command-line overrides on top.
fn build_engine(cli: &Cli, prefs: &StoredPrefs) -> anyhow::Result<PhaseEngine> {
    let settings = cli.apply(prefs.pomodoro);
    let mut engine = PhaseEngine::new(settings).context("invalid pomodoro settings")?;
    if engine.sound_enabled() != (prefs.sound_enabled && !cli.no_sound) {
        engine.toggle_sound();
    }
    Ok(engine)
}

fn spawn_input(tx: mpsc::UnboundedSender<AppOp>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(cmd) => {
                            if tx.send(AppOp::Command(cmd)).is_err() {
                                break;
                            }
                        }
                        Err(e) => println!("\r{}", e),
                    }
                }
                Ok(None) => {
                    tx.send(AppOp::Quit).ok();
                    break;
                }
                Err(e) => {
                    log::error!("stdin: {}", e);
                    tx.send(AppOp::Quit).ok();
                    break;
                }
            }
        }
    });
}

fn spawn_redraw(mut rx: watch::Receiver<Status>) {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = *rx.borrow_and_update();
            let drawn = {
                let mut out = io::stdout().lock();
                ui::draw_status(&mut out, &status)
            };
            if let Err(e) = drawn {
                log::warn!("redraw failed: {}", e);
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    log::info!("pomodoro {} starting", env!("CARGO_PKG_VERSION"));

    let store = open_store(&cli);
    let prefs = match &store {
        Some(store) => store.load().unwrap_or_else(|e| {
            log::error!("{}; using defaults", e);
            StoredPrefs::default()
        }),
        None => StoredPrefs::default(),
    };

    let engine = build_engine(&cli, &prefs)?;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pump = Pump::new(tx.clone(), TICK_INTERVAL);
    let (status_tx, status_rx) = watch::channel(Status::of(&engine));
    let mut app = PomodoroApp::new(
        engine,
        pump,
        TerminalAlerts::new(io::stdout()),
        prefs,
        store,
        status_tx,
    );

    println!("{}\n", ui::HELP_TEXT);
    spawn_redraw(status_rx);
    spawn_input(tx.clone());

    let quit_tx = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            quit_tx.send(AppOp::Quit).ok();
        }
    });

    if cli.autostart {
        app.handle_command(Command::Start);
    } else {
        app.publish();
    }

    while let Some(op) = rx.recv().await {
        match op {
            AppOp::Command(Command::Quit) | AppOp::Quit => break,
            AppOp::Command(cmd) => {
                if let Some(text) = app.handle_command(cmd) {
                    println!("\r\n{}", text);
                }
            }
            AppOp::Pump(generation) => app.handle_pump(generation),
        }
    }

    app.shutdown();
    println!();
    log::info!("pomodoro exiting");
    Ok(())
}
