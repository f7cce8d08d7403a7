/*!
 # Weekday sets

 This module provides a bitmask representation of a set of weekdays,
 used to seed the per-day enable switches and to parse day selections
 from the command line.
*/

use crate::{Error, Result};
use chrono::Weekday;
use std::fmt;
use std::ops::BitOr;

/// Weekdays in scheduling order, Monday first
pub const DAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Set of weekdays, one bit per day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DaySet(u8);

impl DaySet {
    /// Monday (0x01)
    pub const MONDAY: DaySet = DaySet(0x01);
    /// Tuesday (0x02)
    pub const TUESDAY: DaySet = DaySet(0x02);
    /// Wednesday (0x04)
    pub const WEDNESDAY: DaySet = DaySet(0x04);
    /// Thursday (0x08)
    pub const THURSDAY: DaySet = DaySet(0x08);
    /// Friday (0x10)
    pub const FRIDAY: DaySet = DaySet(0x10);
    /// Saturday (0x20)
    pub const SATURDAY: DaySet = DaySet(0x20);
    /// Sunday (0x40)
    pub const SUNDAY: DaySet = DaySet(0x40);
    /// All days (0x7F)
    pub const ALL: DaySet = DaySet(0x7f);
    /// Week days (Monday-Friday, 0x1F)
    pub const WEEKDAYS: DaySet = DaySet(0x1f);
    /// Weekend days (Saturday-Sunday, 0x60)
    pub const WEEKEND: DaySet = DaySet(0x60);
    /// No days (0x00)
    pub const NONE: DaySet = DaySet(0x00);

    /// Set containing only `day`
    pub fn single(day: Weekday) -> Self {
        DaySet(1 << day.num_days_from_monday())
    }

    /// Whether `day` is in the set
    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// The set with `day` added
    pub fn with(self, day: Weekday) -> Self {
        self | Self::single(day)
    }

    /// Whether the set is empty
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Days in the set, Monday first
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        DAY_ORDER.into_iter().filter(move |day| self.contains(*day))
    }

    /// Per-day flags in Monday-first order
    pub fn to_flags(self) -> [bool; 7] {
        std::array::from_fn(|i| self.contains(DAY_ORDER[i]))
    }

    /// Builds a set from per-day flags in Monday-first order
    pub fn from_flags(flags: [bool; 7]) -> Self {
        DAY_ORDER
            .into_iter()
            .zip(flags)
            .filter(|(_, enabled)| *enabled)
            .fold(Self::NONE, |set, (day, _)| set.with(day))
    }

    /// Parses a day selection such as `mon`, `weekdays` or `mon,sat,sun`
    pub fn parse(days: &str) -> Result<Self> {
        let mut combined = Self::NONE;
        for part in days.split(',') {
            combined = combined | Self::parse_single(part.trim())?;
        }
        Ok(combined)
    }

    fn parse_single(day: &str) -> Result<Self> {
        match day.to_lowercase().as_str() {
            "mon" | "monday" => Ok(Self::MONDAY),
            "tue" | "tuesday" => Ok(Self::TUESDAY),
            "wed" | "wednesday" => Ok(Self::WEDNESDAY),
            "thu" | "thursday" => Ok(Self::THURSDAY),
            "fri" | "friday" => Ok(Self::FRIDAY),
            "sat" | "saturday" => Ok(Self::SATURDAY),
            "sun" | "sunday" => Ok(Self::SUNDAY),
            "all" => Ok(Self::ALL),
            "weekdays" => Ok(Self::WEEKDAYS),
            "weekend" => Ok(Self::WEEKEND),
            "none" => Ok(Self::NONE),
            other => Err(Error::UnknownDay(other.to_string())),
        }
    }
}

impl BitOr for DaySet {
    type Output = DaySet;

    fn bitor(self, rhs: DaySet) -> DaySet {
        DaySet(self.0 | rhs.0)
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = self
            .iter()
            .map(|day| match day {
                Weekday::Mon => "mon",
                Weekday::Tue => "tue",
                Weekday::Wed => "wed",
                Weekday::Thu => "thu",
                Weekday::Fri => "fri",
                Weekday::Sat => "sat",
                Weekday::Sun => "sun",
            })
            .collect();
        write!(f, "{}", names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_groups() {
        assert_eq!(DaySet::parse("weekdays").unwrap(), DaySet::WEEKDAYS);
        assert_eq!(DaySet::parse("weekend").unwrap(), DaySet::WEEKEND);
        assert_eq!(DaySet::parse("all").unwrap(), DaySet::ALL);
        assert_eq!(DaySet::parse("none").unwrap(), DaySet::NONE);
    }

    #[test]
    fn parses_composite_lists() {
        let set = DaySet::parse("mon, sat,sunday").unwrap();
        assert_eq!(set, DaySet::MONDAY | DaySet::SATURDAY | DaySet::SUNDAY);
    }

    #[test]
    fn rejects_unknown_day_names() {
        assert!(matches!(
            DaySet::parse("mon,funday"),
            Err(Error::UnknownDay(name)) if name == "funday"
        ));
    }

    #[test]
    fn contains_follows_monday_first_order() {
        assert!(DaySet::WEEKDAYS.contains(Weekday::Fri));
        assert!(!DaySet::WEEKDAYS.contains(Weekday::Sat));
        assert!(DaySet::WEEKEND.contains(Weekday::Sun));
    }

    #[test]
    fn flags_round_trip() {
        let set = DaySet::MONDAY | DaySet::WEDNESDAY | DaySet::SUNDAY;
        assert_eq!(DaySet::from_flags(set.to_flags()), set);
        assert_eq!(
            set.to_flags(),
            [true, false, true, false, false, false, true]
        );
    }

    #[test]
    fn displays_as_comma_list() {
        let set = DaySet::MONDAY | DaySet::SATURDAY;
        assert_eq!(set.to_string(), "mon,sat");
        assert_eq!(DaySet::NONE.to_string(), "none");
    }
}
