use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use indexmap::IndexMap;
use uuid::Uuid;

use crate::catalog::models::Course;
use crate::error::StoreError;
use crate::placement::{self, GridGeometry, Placement, PointerDelta};
use crate::schedule::mask::{self, ScheduleMask};
use crate::schedule::models::{Day, TimeBlock};
use crate::utils::{
    self,
    models::{Glyph, Rule},
};

use self::models::{Session, Sessions};

pub mod models;

/// Name of the table every collection starts with
pub const FIRST_TABLE: &str = "schedule-1";

/// All the tables of the user, in creation order
///
/// Every change replaces the sessions of the table it touches, so a list
/// obtained from [`TimetableCollection::get`] is never modified afterwards.
#[derive(Clone, Debug)]
pub struct TimetableCollection {
    tables: IndexMap<String, Sessions>,
    version: u64,
}

impl Default for TimetableCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl TimetableCollection {
    /// A collection holding one empty table
    #[must_use]
    pub fn new() -> Self {
        let mut tables = IndexMap::new();
        tables.insert(FIRST_TABLE.to_owned(), Sessions::from(Vec::new()));

        Self { tables, version: 0 }
    }

    /// Incremented on every applied change
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of tables
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Always false, there is at least one table
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names, in display order
    #[must_use]
    pub fn table_ids(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn get(&self, table_id: &str) -> Option<Sessions> {
        self.tables.get(table_id).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Session])> {
        self.tables
            .iter()
            .map(|(id, sessions)| (id.as_str(), sessions.as_ref()))
    }

    /// False when removing a table would leave none
    #[must_use]
    pub fn can_remove_table(&self) -> bool {
        self.tables.len() > 1
    }

    /// Duplicate a table, returns the name of the copy
    pub fn add_table(&mut self, from: &str) -> Option<String> {
        let Some(sessions) = self.tables.get(from) else {
            tracing::debug!(table = from, "can't duplicate unknown table");
            return None;
        };

        // Copy by value, the tables then live their own lives
        let copy: Sessions = sessions.iter().cloned().collect();
        let table_id = new_table_id();
        self.tables.insert(table_id.clone(), copy);
        self.bump();

        tracing::debug!(from, table = %table_id, "table duplicated");
        Some(table_id)
    }

    /// Remove a table, unless it is the last one
    pub fn remove_table(&mut self, table_id: &str) -> Result<(), StoreError> {
        if !self.tables.contains_key(table_id) {
            return Err(StoreError::UnknownTable(table_id.to_owned()));
        }
        if !self.can_remove_table() {
            return Err(StoreError::LastTable);
        }

        self.tables.shift_remove(table_id);
        self.bump();

        Ok(())
    }

    /// Add one session per block of the course at the end of the table
    pub fn append_sessions(&mut self, table_id: &str, blocks: Vec<TimeBlock>, course: &Arc<Course>) -> bool {
        self.replace(table_id, |sessions| {
            sessions
                .iter()
                .cloned()
                .chain(blocks.into_iter().map(|block| Session::new(Arc::clone(course), block)))
                .collect()
        })
        .is_some()
    }

    /// Remove every session of `day` covering `period`, returns how many were removed
    pub fn remove_session(&mut self, table_id: &str, day: Day, period: u32) -> usize {
        let mut removed = 0;
        let replaced = self.replace(table_id, |sessions| {
            let kept: Sessions = sessions
                .iter()
                .filter(|session| !session.covers(day, period))
                .cloned()
                .collect();
            removed = sessions.len() - kept.len();
            kept
        });

        if replaced.is_some() {
            removed
        } else {
            0
        }
    }

    /// Move the session at `index` to a new day and periods
    ///
    /// `periods` must be a run of consecutive periods, anything else is
    /// refused and leaves the table as it was.
    pub fn update_session(&mut self, table_id: &str, index: usize, day: Day, periods: Vec<u32>) -> bool {
        if !TimeBlock::is_contiguous(&periods) {
            tracing::debug!(table = table_id, index, ?periods, "periods are not a run, session kept");
            return false;
        }

        let in_range = self
            .tables
            .get(table_id)
            .is_some_and(|sessions| index < sessions.len());
        if !in_range {
            tracing::debug!(table = table_id, index, "no session to update");
            return false;
        }

        self.replace(table_id, |sessions| {
            let mut updated = sessions.to_vec();
            updated[index].day = day;
            updated[index].periods = periods;
            updated.into()
        })
        .is_some()
    }

    /// Drop the session at `index` after a drag of `delta`
    pub fn relocate_session(
        &mut self,
        table_id: &str,
        index: usize,
        delta: PointerDelta,
        grid: &GridGeometry,
    ) -> Option<Placement> {
        let session = self.tables.get(table_id)?.get(index)?;
        let placement = placement::relocate(session, delta, grid);

        self.update_session(table_id, index, placement.day, placement.periods.clone())
            .then_some(placement)
    }

    /// Slots used by a table
    #[must_use]
    pub fn mask(&self, table_id: &str) -> ScheduleMask {
        self.tables.get(table_id).map_or(ScheduleMask::EMPTY, |sessions| {
            sessions
                .iter()
                .fold(ScheduleMask::EMPTY, |acc, session| acc | session_mask(session))
        })
    }

    /// Sessions of the table overlapping the schedule of `course`
    ///
    /// Nothing prevents overlaps in a table, this is for callers who want to
    /// warn about them.
    #[must_use]
    pub fn conflicts(&self, table_id: &str, course: &Course) -> Vec<Session> {
        let wanted = mask::encode(&course.schedule);
        if wanted.is_empty() {
            return Vec::new();
        }

        self.tables
            .get(table_id)
            .map(|sessions| {
                sessions
                    .iter()
                    .filter(|session| session_mask(session).conflicts_with(&wanted))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Swap the sessions of a table for new ones computed from the current ones
    fn replace<F>(&mut self, table_id: &str, f: F) -> Option<()>
    where
        F: FnOnce(&[Session]) -> Sessions,
    {
        let Some(sessions) = self.tables.get_mut(table_id) else {
            tracing::debug!(table = table_id, "unknown table, nothing changed");
            return None;
        };

        let updated = f(sessions);
        *sessions = updated;
        self.bump();

        Some(())
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

fn session_mask(session: &Session) -> ScheduleMask {
    session
        .periods
        .iter()
        .fold(ScheduleMask::EMPTY, |acc, &period| acc | ScheduleMask::slot(session.day, period))
}

/// Fresh table name
fn new_table_id() -> String {
    format!("schedule-{}", Uuid::new_v4())
}

/// Draw a table as a grid of days and periods
#[must_use]
pub fn render(sessions: &[Session], periods: u32, cell_length: usize) -> String {
    // Cell length for hours
    let clh = 19;
    // Cell number
    let cn = Day::ALL.len();

    let sep = Glyph::Vertical.as_char();
    let mut out = String::new();

    // Top of the tab
    out.push_str(&utils::line_table(clh, cell_length, cn, Rule::Top, &HashSet::new()));
    out.push('\n');

    // First case, then the days of the week
    let _ = write!(out, "{sep}{:^clh$}", "교시");
    for day in Day::ALL {
        let _ = write!(out, "{sep}{:^cell_length$}", day.label());
    }
    out.push(sep);
    out.push('\n');

    for period in 1..=periods {
        // Columns where a course started above goes on in this row
        let next_skip: HashSet<usize> = Day::ALL
            .iter()
            .filter(|day| {
                sessions
                    .iter()
                    .any(|s| s.covers(**day, period) && s.start() < period)
            })
            .map(|day| day.index())
            .collect();
        out.push_str(&utils::line_table(clh, cell_length, cn, Rule::Between, &next_skip));
        out.push('\n');

        let hour = utils::period_label(period).unwrap_or_default();
        let _ = write!(out, "{sep}{:^clh$}", format!("{period:02} ({hour})"));

        for day in Day::ALL {
            let text = sessions
                .iter()
                .find(|session| session.covers(day, period))
                .map(|session| cell_text(session, period, cell_length))
                .unwrap_or_default();
            let _ = write!(out, "{sep}{text:^cell_length$}");
        }
        out.push(sep);
        out.push('\n');
    }

    // Bottom of the table
    out.push_str(&utils::line_table(clh, cell_length, cn, Rule::Bottom, &HashSet::new()));
    out.push('\n');

    out
}

/// Print a table on the standard output
pub fn display(sessions: &[Session], periods: u32, cell_length: usize) {
    print!("{}", render(sessions, periods, cell_length));
}

/// What a session shows in one of its rows: the title first, then the room
fn cell_text(session: &Session, period: u32, cell_length: usize) -> String {
    let row = period.saturating_sub(session.start());
    match row {
        0 => utils::etc_str(&session.course.title, cell_length),
        1 => session
            .room
            .as_deref()
            .map(|room| utils::etc_str(room, cell_length))
            .unwrap_or_default(),
        _ => String::new(),
    }
}
