use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::AppOp;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Periodic tick source. Holds the spawned ticker while running; stopping or
/// dropping the pump aborts it. Every start bumps the generation so ticks
/// already queued by an earlier run can be recognised and dropped.
pub struct Pump {
    tx: UnboundedSender<AppOp>,
    interval: Duration,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl Pump {
    pub fn new(tx: UnboundedSender<AppOp>, interval: Duration) -> Self {
        Self {
            tx,
            interval,
            generation: 0,
            handle: None,
        }
    }

    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.generation += 1;
        let generation = self.generation;
        let tx = self.tx.clone();
        let period = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                ticker.tick().await;
                if tx.send(AppOp::Pump(generation)).is_err() {
                    break;
                }
            }
        }));
        log::debug!("pump started (generation {})", generation);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            log::debug!("pump stopped (generation {})", self.generation);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// True if a tick carrying `generation` came from the live run.
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_running() && generation == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Pump {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn drain(rx: &mut UnboundedReceiver<AppOp>) -> Vec<u64> {
        let mut ticks = Vec::new();
        while let Ok(op) = rx.try_recv() {
            if let AppOp::Pump(generation) = op {
                ticks.push(generation);
            }
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_once_per_interval() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pump = Pump::new(tx, TICK_INTERVAL);
        pump.start();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(drain(&mut rx), vec![1, 1, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pump = Pump::new(tx, TICK_INTERVAL);
        pump.start();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        pump.stop();
        pump.stop();
        assert!(!pump.is_running());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(drain(&mut rx).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_bumps_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pump = Pump::new(tx, TICK_INTERVAL);
        pump.start();
        pump.start();
        assert_eq!(pump.generation(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;
        pump.stop();
        assert!(!pump.is_current(1));

        pump.start();
        assert!(pump.is_current(2));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(drain(&mut rx), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_ticker() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut pump = Pump::new(tx, TICK_INTERVAL);
            pump.start();
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(drain(&mut rx).is_empty());
        assert!(rx.recv().await.is_none());
    }
}
