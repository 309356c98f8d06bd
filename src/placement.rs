//! Where a dragged session lands on the grid.
//!
//! The grid is laid out like this, in pixels:
//!
//! ```text
//!  header_width
//! ├────────────┤
//! ┌────────────┬──────┬──────┬─────┐ ┬
//! │            │  월  │  화  │ ... │ │ header_height
//! ├────────────┼──────┼──────┼─────┤ ┴
//! │ 01 (09:00) │      │      │     │ ┬ cell_height
//! ├────────────┼──────┼──────┼─────┤ ┴
//! │ ...        │      │      │     │
//! └────────────┴──────┴──────┴─────┘
//!                ├────┤ cell_width
//! ```
//!
//! A session is drawn one cell wide and `periods.len()` cells tall, starting
//! at the cell of its day and first period.

use serde::{Deserialize, Serialize};

use crate::schedule::models::Day;
use crate::timetable::models::Session;

/// Sizes of the grid a table is drawn on
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridGeometry {
    pub cell_width: f64,
    pub cell_height: f64,
    /// Width of the period column on the left
    pub header_width: f64,
    /// Height of the day row on top
    pub header_height: f64,
    /// Number of day columns
    pub days: usize,
    /// Number of period rows
    pub periods: u32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            cell_width: 80.0,
            cell_height: 30.0,
            header_width: 120.0,
            header_height: 40.0,
            days: Day::ALL.len(),
            periods: 24,
        }
    }
}

impl GridGeometry {
    fn is_drawable(&self) -> bool {
        self.cell_width.is_finite()
            && self.cell_height.is_finite()
            && self.header_width.is_finite()
            && self.header_height.is_finite()
            && self.cell_width > 0.0
            && self.cell_height > 0.0
            && self.days > 0
            && self.periods > 0
    }

    /// Pixel position of the top-left corner of a cell
    #[must_use]
    pub fn cell_origin(&self, day_index: usize, period: u32) -> (f64, f64) {
        (
            self.header_width + self.cell_width * to_f64(day_index),
            self.header_height + self.cell_height * f64::from(period.saturating_sub(1)),
        )
    }
}

/// Pointer movement between the start and the end of a drag, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerDelta {
    pub x: f64,
    pub y: f64,
}

impl PointerDelta {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// New position of a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub day: Day,
    pub periods: Vec<u32>,
}

/// Compute where a session dropped after a drag of `delta`
///
/// The move is snapped to whole cells and kept inside the grid. The number of
/// periods never changes, and other sessions are not looked at.
#[must_use]
pub fn relocate(session: &Session, delta: PointerDelta, grid: &GridGeometry) -> Placement {
    relocate_block(session.day, &session.periods, delta, grid)
}

/// Same as [`relocate`], for a bare day and run of periods
#[must_use]
pub fn relocate_block(day: Day, periods: &[u32], delta: PointerDelta, grid: &GridGeometry) -> Placement {
    let unchanged = || Placement {
        day,
        periods: periods.to_vec(),
    };

    let Some(&start) = periods.first() else {
        return unchanged();
    };
    if !grid.is_drawable() {
        tracing::debug!(?grid, "grid has no drawable cell, session left in place");
        return unchanged();
    }

    let (left, top) = grid.cell_origin(day.index(), start);
    let height = grid.cell_height * to_f64(periods.len());

    // Snap to the grid
    let dx = snap(delta.x, grid.cell_width);
    let dy = snap(delta.y, grid.cell_height);

    // Keep the box of the session inside the table, headers excluded
    let columns = grid.days.min(Day::ALL.len());
    let min_left = grid.header_width;
    let max_left = grid.header_width + grid.cell_width * to_f64(columns - 1);
    let min_top = grid.header_height;
    let max_top = (grid.header_height + grid.cell_height * f64::from(grid.periods) - height).max(min_top);

    let new_left = (left + dx).clamp(min_left, max_left);
    let new_top = (top + dy).clamp(min_top, max_top);

    let day_delta = cells(new_left - left, grid.cell_width);
    let period_delta = cells(new_top - top, grid.cell_height);

    // Out of range indexes can't be looked up, stick to the last valid column
    let day_index = (to_i64(day.index()) + day_delta).clamp(0, to_i64(columns - 1));
    let new_day = usize::try_from(day_index)
        .ok()
        .and_then(Day::from_index)
        .unwrap_or(day);

    let new_periods = periods
        .iter()
        .map(|&period| shift(period, period_delta))
        .collect();

    Placement {
        day: new_day,
        periods: new_periods,
    }
}

/// Round a distance to the nearest multiple of `cell`, NaN counts as no move
fn snap(distance: f64, cell: f64) -> f64 {
    if distance.is_nan() {
        return 0.0;
    }
    (distance / cell).round() * cell
}

/// Whole number of cells in a distance
#[allow(clippy::cast_possible_truncation)]
fn cells(distance: f64, cell: f64) -> i64 {
    // `as` saturates, which is fine for distances already clamped to the grid
    (distance / cell).round() as i64
}

fn shift(period: u32, delta: i64) -> u32 {
    let shifted = (i64::from(period) + delta).max(1);
    u32::try_from(shifted).unwrap_or(u32::MAX)
}

#[allow(clippy::cast_precision_loss)]
fn to_f64(n: usize) -> f64 {
    n as f64
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
