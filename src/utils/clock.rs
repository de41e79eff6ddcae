use chrono::{Local, NaiveDate};

/// Source of the current date, used to place the `--days` window. Tests substitute a fixed date.
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Uses the local calendar date.
pub struct DefaultClock;

impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
