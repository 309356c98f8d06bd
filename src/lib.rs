//! Course timetable builder.
//!
//! - [`schedule`] reads raw schedules such as `월1~2(303)<p>화3(202)` and
//!   encodes them as bitmasks for overlap checks
//! - [`catalog`] loads the course collections
//! - [`filter`] and [`search`] narrow the catalog down as options change
//! - [`placement`] snaps a dragged session onto the grid
//! - [`timetable`] holds the tables and their sessions

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod placement;
pub mod schedule;
pub mod search;
pub mod timetable;
pub mod utils;
