/*!
 # Dynamic on-time scheduler

 A dynamically-reconfigurable daily scheduler for home-automation actions.
 On every clock tick the scheduler reads an hour and a minute from two live
 numeric settings, checks seven weekday enable switches and one
 master-disable switch, and fires an ordered action list at most once per
 calendar minute when the current time matches.

 ## Features

 * Hour/minute read live from shared numeric settings, changeable at any time
 * Per-weekday enable switches plus a master-disable switch
 * At-most-one firing per calendar minute, independent of tick rate
 * Ordered action list executed synchronously within the tick
 * Pluggable clock source (system clock, manual clock for simulation)
 * Next-occurrence calculation for the current settings

 ## Example

 ```rust
 use chrono::NaiveDate;
 use dynamic_on_time::*;
 use std::sync::Arc;

 // Live settings, updated at any time by other parts of the system
 let hour = SharedNumber::with_value(7.0);
 let minute = SharedNumber::with_value(30.0);
 let disabled = SharedSwitch::with_state(false);
 let (gates, _switches) = WeekdayGates::shared_from(DaySet::ALL);

 let mut scheduler = DynamicScheduler::new(
     Arc::new(hour.clone()),
     Arc::new(minute.clone()),
     gates,
     Arc::new(disabled.clone()),
     vec![Box::new(LogAction::new("wake-up lights"))],
 );

 // Normally driven by `SchedulerRunner`; tick it by hand here
 let tick = NaiveDate::from_ymd_opt(2024, 1, 1)
     .unwrap()
     .and_hms_opt(7, 30, 0)
     .unwrap();
 scheduler.on_tick(tick);

 // The settings now point at tomorrow, 07:30
 let next = scheduler.next_occurrence(tick).unwrap();
 assert_eq!(
     next,
     NaiveDate::from_ymd_opt(2024, 1, 2)
         .unwrap()
         .and_hms_opt(7, 30, 0)
         .unwrap()
 );
 ```
*/

use thiserror::Error;

/// Custom error types for the dynamic on-time scheduler library
#[derive(Error, Debug)]
pub enum Error {
    /// Value out of range
    #[error("Value {0} out of range ({1}..={2})")]
    ValueOutOfRange(u32, u32, u32),

    /// Unrecognized day name in a day-set string
    #[error("Unknown day name: {0}")]
    UnknownDay(String),

    /// An action reported a failure when fired
    #[error("Action `{name}` failed: {reason}")]
    ActionFailed { name: String, reason: String },

    /// General error
    #[error("Error: {0}")]
    General(String),

    /// I/O error from an action side effect
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// Re-export modules
pub mod action;
pub mod clock;
pub mod runner;
pub mod scheduler;
pub mod source;
pub mod weekday;

// Re-export key types
pub use action::{Action, CommandAction, FnAction, LogAction};
pub use clock::{Clock, ManualClock, SystemClock};
pub use runner::SchedulerRunner;
pub use scheduler::{DynamicScheduler, ScheduleSnapshot, WeekdayGates};
pub use source::{NumberSource, SharedNumber, SharedSwitch, SwitchSource};
pub use weekday::DaySet;
