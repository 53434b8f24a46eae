use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive analysis window that the scorer splits into weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        SeasonWindow { start, end }
    }

    /// Iterates 7-day weeks from `start` while the week start is on or before `end`.
    ///
    /// The last week may run past `end`. A window with `start > end` yields nothing.
    pub fn weeks(&self) -> Weeks {
        Weeks {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for SeasonWindow {
    type Item = Week;
    type IntoIter = Weeks;

    fn into_iter(self) -> Weeks {
        self.weeks()
    }
}

/// A single 7-day span, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Week {
    pub fn starting(start: NaiveDate) -> Option<Self> {
        let end = start.checked_add_days(Days::new(6))?;
        Some(Week { start, end })
    }
}

/// Lazy iterator over the weeks of a [`SeasonWindow`].
#[derive(Debug, Clone)]
pub struct Weeks {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Weeks {
    type Item = Week;

    fn next(&mut self) -> Option<Week> {
        let start = self.next.filter(|d| *d <= self.end)?;
        let week = Week::starting(start)?;
        self.next = start.checked_add_days(Days::new(7));
        Some(week)
    }
}
