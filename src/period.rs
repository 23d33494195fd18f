//! Time windows over which data is selected.
use anyhow::{Result, ensure};
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, Utc};

/// An inclusive range of whole calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    first_day: NaiveDate,
    last_day: NaiveDate,
}

impl Period {
    /// Create a new period covering `first_day` up to and including `last_day`
    pub fn new(first_day: NaiveDate, last_day: NaiveDate) -> Result<Self> {
        ensure!(
            first_day <= last_day,
            "Start date {first_day} is after end date {last_day}"
        );

        Ok(Self {
            first_day,
            last_day,
        })
    }

    /// The first day of the period
    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// The last day of the period
    pub fn last_day(&self) -> NaiveDate {
        self.last_day
    }

    /// Midnight at the start of the first day
    pub fn start(&self) -> DateTime<Utc> {
        start_of_day(self.first_day)
    }

    /// Midnight at the start of the day after the last day (exclusive bound)
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        let next = self
            .last_day
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);
        start_of_day(next)
    }

    /// The start of the final hour of the period (inclusive bound)
    pub fn last_hour(&self) -> DateTime<Utc> {
        self.end_exclusive() - TimeDelta::hours(1)
    }

    /// Number of days covered
    pub fn num_days(&self) -> u64 {
        // NB: last_day >= first_day is checked in the constructor
        (self.last_day - self.first_day).num_days().unsigned_abs() + 1
    }
}

/// Midnight (UTC) at the start of `day`
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// The (year, month) calendar bucket containing `hour`
pub fn calendar_month(hour: DateTime<Utc>) -> (i32, u32) {
    (hour.year(), hour.month())
}

/// Whether `hour` lies in the inclusive range `[start, end]`
pub fn within_inclusive(hour: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= hour && hour <= end
}

/// Whether `hour` lies in the half-open range `[start, end)`
pub fn within_half_open(hour: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    start <= hour && hour < end
}
