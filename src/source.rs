/*!
 # Live numeric and switch inputs

 The scheduler does not own its settings: the hour, the minute, the weekday
 enables and the disable flag all belong to other parts of the system (a UI,
 a daemon command loop, another task) and may change at any time without
 notification. This module defines the read-only capabilities the scheduler
 polls on each tick, plus shared in-process implementations backed by
 `parking_lot` locks.

 A source that has no valid reading yet (for example a setting that has not
 been restored after boot) returns `None`; the scheduler treats that as
 "condition not met" for the tick, never as an error.
*/

use parking_lot::RwLock;
use std::sync::Arc;

/// Read-only access to a numeric setting owned elsewhere
pub trait NumberSource: Send + Sync {
    /// Current value, or `None` if the source has no valid reading yet
    fn value(&self) -> Option<f64>;
}

/// Read-only access to a boolean switch owned elsewhere
pub trait SwitchSource: Send + Sync {
    /// Current state, or `None` if the source has no valid reading yet
    fn state(&self) -> Option<bool>;
}

/// Shared numeric setting, writable by any holder of a clone
#[derive(Debug, Clone, Default)]
pub struct SharedNumber {
    value: Arc<RwLock<Option<f64>>>,
}

impl SharedNumber {
    /// Creates a setting with no valid reading yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a setting holding `value`
    pub fn with_value(value: f64) -> Self {
        let number = Self::new();
        number.set(value);
        number
    }

    /// Updates the value
    pub fn set(&self, value: f64) {
        *self.value.write() = Some(value);
    }

    /// Drops the current reading, as if the setting had never been written
    pub fn clear(&self) {
        *self.value.write() = None;
    }
}

impl NumberSource for SharedNumber {
    fn value(&self) -> Option<f64> {
        *self.value.read()
    }
}

/// Shared boolean switch, writable by any holder of a clone
#[derive(Debug, Clone, Default)]
pub struct SharedSwitch {
    state: Arc<RwLock<Option<bool>>>,
}

impl SharedSwitch {
    /// Creates a switch with no valid reading yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a switch in the given state
    pub fn with_state(on: bool) -> Self {
        let switch = Self::new();
        switch.set(on);
        switch
    }

    /// Updates the state
    pub fn set(&self, on: bool) {
        *self.state.write() = Some(on);
    }

    /// Drops the current reading
    pub fn clear(&self) {
        *self.state.write() = None;
    }
}

impl SwitchSource for SharedSwitch {
    fn state(&self) -> Option<bool> {
        *self.state.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_starts_without_reading() {
        let number = SharedNumber::new();
        assert_eq!(number.value(), None);
    }

    #[test]
    fn number_updates_are_visible_through_clones() {
        let number = SharedNumber::with_value(7.0);
        let reader = number.clone();
        number.set(9.0);
        assert_eq!(reader.value(), Some(9.0));
        number.clear();
        assert_eq!(reader.value(), None);
    }

    #[test]
    fn switch_updates_are_visible_through_clones() {
        let switch = SharedSwitch::with_state(true);
        let reader = switch.clone();
        assert_eq!(reader.state(), Some(true));
        switch.set(false);
        assert_eq!(reader.state(), Some(false));
        switch.clear();
        assert_eq!(reader.state(), None);
    }
}
