use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::schedule::{self, models::TimeBlock};

/// A course as given by the catalog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Course's code
    pub id: String,

    /// Course's name
    pub title: String,

    /// Credits label, i.e. `3학점`
    pub credits: String,

    /// Major(s) offering the course, several majors are joined with `<p>`
    pub major: String,

    /// Raw schedule, see [`schedule::parse`]
    #[serde(default)]
    pub schedule: String,

    /// Year of study the course targets
    pub grade: u32,
}

impl Course {
    /// Major label fit for display, the last one when there are many
    #[must_use]
    pub fn major_label(&self) -> &str {
        self.major
            .rsplit(schedule::SEPARATOR)
            .next()
            .unwrap_or(&self.major)
    }
}

/// A catalog course with everything the search needs computed up front
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub course: Arc<Course>,
    pub title_lower: String,
    pub id_lower: String,
    /// Parsed schedule of the course
    pub blocks: Vec<TimeBlock>,
}

impl CatalogEntry {
    #[must_use]
    pub fn new(course: Course) -> Self {
        Self::from_shared(Arc::new(course))
    }

    #[must_use]
    pub fn from_shared(course: Arc<Course>) -> Self {
        Self {
            title_lower: course.title.to_lowercase(),
            id_lower: course.id.to_lowercase(),
            blocks: schedule::parse(&course.schedule),
            course,
        }
    }
}

/// Snapshot of the whole catalog, cheap to clone
pub type Catalog = Arc<[Arc<CatalogEntry>]>;
