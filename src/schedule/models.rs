use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseDayError;

/// Day of the week, as shown in the grid header
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Day {
    /// All the days, in grid order
    pub const ALL: [Day; 7] = [
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
        Day::Sun,
    ];

    /// Label used by the catalog and the grid header
    #[must_use]
    pub fn label(self) -> char {
        match self {
            Self::Mon => '월',
            Self::Tue => '화',
            Self::Wed => '수',
            Self::Thu => '목',
            Self::Fri => '금',
            Self::Sat => '토',
            Self::Sun => '일',
        }
    }

    /// Column of the day: Monday is 0, Sunday is 6
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn from_label(label: char) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == label)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Day {
    type Err = ParseDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(label), None) => Self::from_label(label).ok_or_else(|| ParseDayError(s.to_owned())),
            _ => Err(ParseDayError(s.to_owned())),
        }
    }
}

/// One contiguous run of periods on a single day
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBlock {
    pub day: Day,

    /// Periods taken by the block, 1-based:
    /// - always non-empty
    /// - each element is the previous one plus one
    pub periods: Vec<u32>,

    /// Room, when the catalog gives one
    pub room: Option<String>,
}

impl TimeBlock {
    /// Expand `start..=end` into a block, `None` if the range is empty or starts at 0
    #[must_use]
    pub fn new(day: Day, start: u32, end: u32, room: Option<String>) -> Option<Self> {
        if start == 0 || end < start {
            return None;
        }

        Some(Self {
            day,
            periods: (start..=end).collect(),
            room,
        })
    }

    /// True for a non-empty run of consecutive periods starting at 1 or later
    #[must_use]
    pub fn is_contiguous(periods: &[u32]) -> bool {
        periods.first().is_some_and(|&first| first > 0)
            && periods.windows(2).all(|pair| pair[1] == pair[0] + 1)
    }

    #[must_use]
    pub fn start(&self) -> u32 {
        self.periods.first().copied().unwrap_or_default()
    }

    #[must_use]
    pub fn end(&self) -> u32 {
        self.periods.last().copied().unwrap_or_default()
    }

    /// Number of periods taken by the block
    #[must_use]
    pub fn size(&self) -> usize {
        self.periods.len()
    }

    #[must_use]
    pub fn contains(&self, period: u32) -> bool {
        self.periods.contains(&period)
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.day, self.start())?;
        if self.size() > 1 {
            write!(f, "~{}", self.end())?;
        }
        if let Some(room) = &self.room {
            write!(f, "({room})")?;
        }

        Ok(())
    }
}
