//! Calendar-day helpers and the clock seam.
//!
//! The calendar day is the atomic unit everywhere; there is no time-of-day.

use chrono::{Days, Local, NaiveDate};

/// Source of "today"
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// `date` minus `n` days, saturating at the calendar minimum
pub fn days_before(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// `date` plus `n` days, saturating at the calendar maximum
pub fn days_after(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

/// The day before `date`
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    days_before(date, 1)
}

/// The trailing `n` days ending at `today` (inclusive), oldest first
pub fn last_n_days(today: NaiveDate, n: u32) -> Vec<NaiveDate> {
    (0..n as u64).rev().map(|i| days_before(today, i)).collect()
}

/// Short day/month label, e.g. "12 Apr"
pub fn format_day_month(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// Long label for a dashboard header, e.g. "Monday, 19 Feb"
pub fn format_long(date: NaiveDate) -> String {
    date.format("%A, %-d %b").to_string()
}
