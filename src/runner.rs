/*!
 # Tick loop

 Drives a [`DynamicScheduler`](crate::DynamicScheduler) from a clock source
 at a fixed period. Each evaluation runs synchronously inside its tick; the
 loop never overlaps evaluations, which is what keeps the
 at-most-once-per-minute guarantee intact.
*/

use crate::clock::Clock;
use crate::scheduler::DynamicScheduler;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Default evaluation period. Any period of 60 seconds or less visits
/// every calendar minute at least once.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(10);

/// Periodic driver for a [`DynamicScheduler`]
pub struct SchedulerRunner {
    scheduler: Arc<Mutex<DynamicScheduler>>,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl SchedulerRunner {
    /// Creates a runner evaluating `scheduler` against `clock` every
    /// [`DEFAULT_PERIOD`]
    pub fn new(scheduler: DynamicScheduler, clock: Arc<dyn Clock>) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            clock,
            period: DEFAULT_PERIOD,
        }
    }

    /// Sets the evaluation period; must be 60 seconds or less to visit
    /// every calendar minute
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Shared handle to the scheduler, for querying the snapshot or the
    /// next occurrence while the loop runs
    pub fn scheduler(&self) -> Arc<Mutex<DynamicScheduler>> {
        self.scheduler.clone()
    }

    /// Runs the tick loop until `shutdown` turns true
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(period = ?self.period, "Scheduler loop started");
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.clock.now() {
                        Some(now) => self.scheduler.lock().on_tick(now),
                        None => debug!("Clock has no valid reading, skipping tick"),
                    }
                }
                changed = shutdown.changed() => {
                    // A dropped sender stops the loop like an explicit signal
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler loop stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Runs the tick loop until Ctrl+C
    pub async fn run_until_ctrl_c(self) {
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl+C, stopping scheduler");
                let _ = tx.send(true);
            }
        });
        self.run(rx).await;
    }
}
