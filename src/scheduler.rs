/*!
 # Dynamic on-time scheduler core

 `DynamicScheduler` evaluates, on each clock tick, whether the configured
 fire condition holds and executes its action list exactly once for the
 matching calendar minute. The hour, minute, weekday enables and disable
 flag are read live from their sources on every tick, so the schedule can
 be retargeted at runtime without rebuilding anything.
*/

use crate::action::Action;
use crate::source::{NumberSource, SwitchSource};
use crate::weekday::DaySet;
use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};

/// The seven weekday enable switches, Monday first
pub struct WeekdayGates {
    gates: [Arc<dyn SwitchSource>; 7],
}

impl WeekdayGates {
    /// Creates the gates from one switch per weekday
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mon: Arc<dyn SwitchSource>,
        tue: Arc<dyn SwitchSource>,
        wed: Arc<dyn SwitchSource>,
        thu: Arc<dyn SwitchSource>,
        fri: Arc<dyn SwitchSource>,
        sat: Arc<dyn SwitchSource>,
        sun: Arc<dyn SwitchSource>,
    ) -> Self {
        Self {
            gates: [mon, tue, wed, thu, fri, sat, sun],
        }
    }

    /// Creates gates backed by fresh shared switches seeded from `days`,
    /// returning the writable handles alongside
    pub fn shared_from(days: DaySet) -> (Self, [crate::source::SharedSwitch; 7]) {
        let flags = days.to_flags();
        let switches: [crate::source::SharedSwitch; 7] =
            std::array::from_fn(|i| crate::source::SharedSwitch::with_state(flags[i]));
        let gates = Self {
            gates: std::array::from_fn(|i| {
                Arc::new(switches[i].clone()) as Arc<dyn SwitchSource>
            }),
        };
        (gates, switches)
    }

    /// All seven states, or `None` if any switch has no valid reading
    fn read(&self) -> Option<[bool; 7]> {
        let mut flags = [false; 7];
        for (flag, gate) in flags.iter_mut().zip(&self.gates) {
            *flag = gate.state()?;
        }
        Some(flags)
    }
}

/// One tick's coherent read of the schedule settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    /// Hour of day (0-23)
    pub hour: u32,
    /// Minute of hour (0-59)
    pub minute: u32,
    /// Weekday enables, Monday first
    pub days: [bool; 7],
    /// Master disable; suppresses all firing while set
    pub disabled: bool,
}

impl ScheduleSnapshot {
    /// Whether the weekday gate for `day` is enabled
    pub fn day_enabled(&self, day: Weekday) -> bool {
        self.days[day.num_days_from_monday() as usize]
    }

    /// The enabled days as a set
    pub fn day_set(&self) -> DaySet {
        DaySet::from_flags(self.days)
    }

    /// Whether the fire condition holds at `now`
    pub fn matches(&self, now: NaiveDateTime) -> bool {
        !self.disabled
            && self.day_enabled(now.weekday())
            && now.hour() == self.hour
            && now.minute() == self.minute
    }

    /// The next instant after `now` at which these settings would fire,
    /// or `None` when disabled or no weekday is enabled
    pub fn next_occurrence(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if self.disabled {
            return None;
        }
        let target = NaiveTime::from_hms_opt(self.hour, self.minute, 0)?;
        (0..=7)
            .filter_map(|offset| now.date().checked_add_days(Days::new(offset)))
            .filter(|date| self.day_enabled(date.weekday()))
            .map(|date| date.and_time(target))
            .find(|candidate| *candidate > now)
    }
}

/// Records the last calendar minute that fired, so sub-minute ticks cannot
/// fire the same minute twice
#[derive(Debug, Default)]
struct FireGuard {
    last_fired: Option<(NaiveDate, u32, u32)>,
}

impl FireGuard {
    fn stamp(now: NaiveDateTime) -> (NaiveDate, u32, u32) {
        (now.date(), now.hour(), now.minute())
    }

    fn already_fired(&self, now: NaiveDateTime) -> bool {
        self.last_fired == Some(Self::stamp(now))
    }

    fn mark(&mut self, now: NaiveDateTime) {
        self.last_fired = Some(Self::stamp(now));
    }
}

/// Daily scheduler firing an action list at a time-of-day read from live
/// settings, gated per weekday and by a master disable switch
pub struct DynamicScheduler {
    hour: Arc<dyn NumberSource>,
    minute: Arc<dyn NumberSource>,
    gates: WeekdayGates,
    disabled: Arc<dyn SwitchSource>,
    actions: Vec<Box<dyn Action>>,
    guard: FireGuard,
    last_seen: Option<ScheduleSnapshot>,
}

impl DynamicScheduler {
    /// Creates a scheduler reading its settings from the given sources.
    /// The action list is fixed here; everything else stays live.
    pub fn new(
        hour: Arc<dyn NumberSource>,
        minute: Arc<dyn NumberSource>,
        gates: WeekdayGates,
        disabled: Arc<dyn SwitchSource>,
        actions: Vec<Box<dyn Action>>,
    ) -> Self {
        Self {
            hour,
            minute,
            gates,
            disabled,
            actions,
            guard: FireGuard::default(),
            last_seen: None,
        }
    }

    /// Evaluates the fire condition at `now` and fires the action list if it
    /// holds and this calendar minute has not fired yet.
    ///
    /// A tick where any setting has no valid reading is a no-op; the tick
    /// loop must never be taken down by a missing dependency.
    #[instrument(skip(self), fields(time = %now.format("%a %H:%M:%S")))]
    pub fn on_tick(&mut self, now: NaiveDateTime) {
        let Some(snapshot) = self.read_snapshot() else {
            debug!("Schedule settings not ready, skipping tick");
            return;
        };

        if self.last_seen != Some(snapshot) {
            info!(
                hour = snapshot.hour,
                minute = snapshot.minute,
                days = %snapshot.day_set(),
                disabled = snapshot.disabled,
                "Schedule updated"
            );
            self.last_seen = Some(snapshot);
        }

        if !snapshot.matches(now) {
            trace!("Fire condition not met");
            return;
        }

        if self.guard.already_fired(now) {
            trace!("Already fired this minute");
            return;
        }

        // The minute is consumed up front: a failing action is not retried
        // on the next tick of the same minute
        self.guard.mark(now);

        info!(actions = self.actions.len(), "Schedule matched, firing actions");
        for action in &self.actions {
            trace!(action = action.name(), "Executing action");
            if let Err(e) = action.execute() {
                warn!(action = action.name(), error = %e, "Action failed");
            }
        }
    }

    /// Current settings, or `None` while any source has no valid reading
    pub fn snapshot(&self) -> Option<ScheduleSnapshot> {
        self.read_snapshot()
    }

    /// The next instant the current settings would fire, or `None` while
    /// disabled, while no weekday is enabled, or while settings are not ready
    pub fn next_occurrence(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        self.read_snapshot()
            .and_then(|snapshot| snapshot.next_occurrence(now))
    }

    fn read_snapshot(&self) -> Option<ScheduleSnapshot> {
        let hour = read_setting(self.hour.as_ref(), 23)?;
        let minute = read_setting(self.minute.as_ref(), 59)?;
        let days = self.gates.read()?;
        let disabled = self.disabled.state()?;
        Some(ScheduleSnapshot {
            hour,
            minute,
            days,
            disabled,
        })
    }
}

/// Reads a numeric setting as a whole number in `0..=max`; settings arrive
/// as floats from UI components and are truncated, an out-of-range reading
/// counts as unavailable
fn read_setting(source: &dyn NumberSource, max: u32) -> Option<u32> {
    let raw = source.value()?;
    let value = raw as u32;
    if raw < 0.0 || value > max {
        debug!(raw, max, "Setting out of range, treating as unavailable");
        return None;
    }
    Some(value)
}
