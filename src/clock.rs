//! Time source for derived fields.

use chrono::{NaiveDate, Utc};

/// Gives the current calendar date.
pub trait Clock: Send + Sync {
    /// Current date, UTC.
    fn today(&self) -> NaiveDate;
}

/// System clock using the OS time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock frozen on a given date.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
