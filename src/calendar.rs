//! Work-day counting for time-to-expiration grids.

use chrono::{Datelike, Local, NaiveDate, Weekday};

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts Monday–Friday dates in the inclusive range `[from, to]`.
pub fn workdays_between(from: NaiveDate, to: NaiveDate) -> u32 {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| !is_weekend(*d))
        .count() as u32
}

/// Supplies "today" for work-day arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkdayCalendar {
    today: NaiveDate,
}

impl WorkdayCalendar {
    /// Calendar anchored on the local date.
    pub fn system() -> Self {
        Self {
            today: Local::now().date_naive(),
        }
    }

    pub fn fixed(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn workdays_until(&self, date: NaiveDate) -> u32 {
        workdays_between(self.today, date)
    }
}

impl Default for WorkdayCalendar {
    fn default() -> Self {
        Self::system()
    }
}
