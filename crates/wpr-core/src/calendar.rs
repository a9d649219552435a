//! Calendar arithmetic for week-based task stores.
//!
//! Dates carry no time component. Weeks start on Monday and end on Sunday
//! regardless of the host locale, so the week-start of any date is found by
//! shifting back by its Monday-based offset (Monday = 0 .. Sunday = 6).
//!
//! The canonical text form is fixed-width `YYYY-MM-DD`. It is used both for
//! display and for every persisted artifact (file names and task records),
//! so [`CalendarDate::parse`] and the `Display` impl are exact inverses.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use chrono::Weekday;

use crate::error::StoreError;

/// An immutable Gregorian calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// The current local date.
    #[must_use]
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Build a date from its components.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDateFormat`] when the components do not
    /// name a real day (e.g. February 30th).
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, StoreError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| StoreError::InvalidDateFormat(format!("{year}-{month}-{day}")))
    }

    /// Parse the canonical `YYYY-MM-DD` form.
    ///
    /// Components need not be zero-padded, but there must be exactly three
    /// of them and each must be made of ASCII digits only.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDateFormat`] on any other input.
    pub fn parse(text: &str) -> Result<Self, StoreError> {
        let invalid = || StoreError::InvalidDateFormat(text.to_string());

        let parts: Vec<&str> = text.trim().split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        if ![year, month, day]
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
        {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(invalid)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month as `1..=12`.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Day of month as `1..=31`.
    #[must_use]
    pub fn day(self) -> u32 {
        self.0.day()
    }

    #[must_use]
    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Day of year as `1..=366`.
    #[must_use]
    pub fn day_of_year(self) -> u32 {
        self.0.ordinal()
    }

    /// Week of year: `floor((day_of_year - 1) / 7) + 1`.
    #[must_use]
    pub fn week_number(self) -> u32 {
        self.0.ordinal0() / 7 + 1
    }

    /// Move by a signed number of days.
    ///
    /// Saturates at the representable calendar range instead of panicking.
    #[must_use]
    pub fn shift(self, days: i64) -> Self {
        let delta = Days::new(days.unsigned_abs());
        let moved = if days >= 0 {
            self.0.checked_add_days(delta)
        } else {
            self.0.checked_sub_days(delta)
        };
        Self(moved.unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX }))
    }

    /// The day of the same Monday-to-Sunday week that falls on `target`.
    #[must_use]
    pub fn shift_to_weekday(self, target: Weekday) -> Self {
        let offset = i64::from(target.num_days_from_monday())
            - i64::from(self.weekday().num_days_from_monday());
        self.shift(offset)
    }

    /// The Monday of this date's week.
    #[must_use]
    pub fn week_start(self) -> Self {
        self.shift_to_weekday(Weekday::Mon)
    }

    /// Signed number of days from `self` to `other` (negative when `other`
    /// lies in the past).
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).num_days()
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl FromStr for CalendarDate {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Source of "today" for editability checks and new task dates.
pub trait Clock {
    fn today(&self) -> CalendarDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        CalendarDate::today()
    }
}

/// A clock pinned to one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}
