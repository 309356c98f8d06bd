use std::sync::Arc;

use crate::catalog::models::Course;
use crate::schedule::models::{Day, TimeBlock};

/// A block of a course placed on a table
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Course the session belongs to, shared with the catalog
    pub course: Arc<Course>,

    pub day: Day,

    /// Periods the session takes up, as a number:
    /// - 1 => first period of the day
    /// - 2 => second period of the day
    /// - etc.
    pub periods: Vec<u32>,

    /// Room where the session takes place
    pub room: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(course: Arc<Course>, block: TimeBlock) -> Self {
        Self {
            course,
            day: block.day,
            periods: block.periods,
            room: block.room,
        }
    }

    /// First period of the session
    #[must_use]
    pub fn start(&self) -> u32 {
        self.periods.first().copied().unwrap_or_default()
    }

    /// Number of periods the session takes up
    #[must_use]
    pub fn size(&self) -> usize {
        self.periods.len()
    }

    #[must_use]
    pub fn covers(&self, day: Day, period: u32) -> bool {
        self.day == day && self.periods.contains(&period)
    }
}

/// Sessions of one table, replaced as a whole on every change
pub type Sessions = Arc<[Session]>;

/// Where a search was opened from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    /// Table the picked course will be added to
    pub table_id: String,

    /// Day of the clicked cell, if any
    pub day: Option<Day>,

    /// Period of the clicked cell, if any
    pub period: Option<u32>,
}

impl SearchInfo {
    /// Search opened from the table's button
    #[must_use]
    pub fn table(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_owned(),
            day: None,
            period: None,
        }
    }

    /// Search opened by clicking an empty cell
    #[must_use]
    pub fn cell(table_id: &str, day: Day, period: u32) -> Self {
        Self {
            table_id: table_id.to_owned(),
            day: Some(day),
            period: Some(period),
        }
    }
}
