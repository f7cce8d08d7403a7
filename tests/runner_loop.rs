use chrono::NaiveDateTime;
use dynamic_on_time::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

fn counting_scheduler(fired: Arc<AtomicUsize>) -> DynamicScheduler {
    let (gates, _switches) = WeekdayGates::shared_from(DaySet::ALL);
    DynamicScheduler::new(
        Arc::new(SharedNumber::with_value(7.0)),
        Arc::new(SharedNumber::with_value(30.0)),
        gates,
        Arc::new(SharedSwitch::with_state(false)),
        vec![Box::new(FnAction::new("count", move || {
            fired.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))],
    )
}

#[tokio::test(start_paused = true)]
async fn loop_fires_once_across_a_minute_of_ticks() {
    // Monday, ten seconds before the scheduled 07:30
    let start: NaiveDateTime = "2024-01-01T07:29:50".parse().unwrap();
    let clock = ManualClock::starting_at(start);

    let fired = Arc::new(AtomicUsize::new(0));
    let runner = SchedulerRunner::new(counting_scheduler(fired.clone()), Arc::new(clock.clone()))
        .with_period(Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(runner.run(shutdown_rx));

    // Advance the simulated clock in lockstep with the runner period,
    // walking well past the 07:30 minute
    for _ in 0..12 {
        tokio::time::sleep(Duration::from_secs(10)).await;
        clock.advance(chrono::Duration::seconds(10));
    }

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn loop_skips_ticks_while_the_clock_has_no_reading() {
    let clock = ManualClock::unset();

    let fired = Arc::new(AtomicUsize::new(0));
    let runner = SchedulerRunner::new(counting_scheduler(fired.clone()), Arc::new(clock.clone()))
        .with_period(Duration::from_secs(10));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(runner.run(shutdown_rx));

    for _ in 0..5 {
        tokio::time::sleep(Duration::from_secs(10)).await;
    }

    shutdown_tx.send(true).unwrap();
    task.await.unwrap();

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
