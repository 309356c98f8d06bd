use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexSet;

use crate::catalog::models::CatalogEntry;
use crate::schedule::models::Day;
use crate::timetable::models::SearchInfo;

/// What the user is looking for, every empty field matches everything
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Part of the title or of the code
    pub query: Option<String>,
    pub grades: BTreeSet<u32>,
    pub days: BTreeSet<Day>,
    pub periods: BTreeSet<u32>,
    pub majors: BTreeSet<String>,
    pub credits: Option<u32>,
}

impl SearchOptions {
    /// Options of a search opened from a table, pre-filled with the clicked cell
    #[must_use]
    pub fn from_search_info(info: &SearchInfo) -> Self {
        Self {
            days: info.day.into_iter().collect(),
            periods: info.period.into_iter().collect(),
            ..Self::default()
        }
    }

    /// True when no field constrains the search
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, str::is_empty)
            && self.grades.is_empty()
            && self.days.is_empty()
            && self.periods.is_empty()
            && self.majors.is_empty()
            && self.credits.map_or(true, |credits| credits == 0)
    }
}

/// Search options prepared for matching many entries
pub struct Matcher<'a> {
    options: &'a SearchOptions,
    query: Option<String>,
    credits: Option<String>,
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub fn new(options: &'a SearchOptions) -> Self {
        Self {
            options,
            query: options
                .query
                .as_deref()
                .filter(|query| !query.is_empty())
                .map(str::to_lowercase),
            // 0 credits stands for no choice
            credits: options
                .credits
                .filter(|&credits| credits > 0)
                .map(|credits| credits.to_string()),
        }
    }

    /// True when the entry passes every active criterion
    #[must_use]
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        let options = self.options;
        let course = &entry.course;

        let query = self.query.as_deref().map_or(true, |query| {
            entry.title_lower.contains(query) || entry.id_lower.contains(query)
        });
        let grade = options.grades.is_empty() || options.grades.contains(&course.grade);
        let major = options.majors.is_empty() || options.majors.contains(&course.major);
        let credits = self
            .credits
            .as_deref()
            .map_or(true, |credits| course.credits.starts_with(credits));

        // Cheap checks first, the schedule is only walked when they all pass
        query && grade && major && credits && self.matches_days(entry) && self.matches_periods(entry)
    }

    fn matches_days(&self, entry: &CatalogEntry) -> bool {
        let days = &self.options.days;
        days.is_empty() || entry.blocks.iter().any(|block| days.contains(&block.day))
    }

    fn matches_periods(&self, entry: &CatalogEntry) -> bool {
        let periods = &self.options.periods;
        periods.is_empty()
            || entry
                .blocks
                .iter()
                .flat_map(|block| &block.periods)
                .any(|period| periods.contains(period))
    }
}

/// Keep the entries matching `options`, in catalog order
#[must_use]
pub fn filter(catalog: &[Arc<CatalogEntry>], options: &SearchOptions) -> Vec<Arc<CatalogEntry>> {
    let matcher = Matcher::new(options);

    catalog
        .iter()
        .filter(|entry| matcher.matches(entry))
        .cloned()
        .collect()
}

/// Every major of the catalog, in order of first appearance
#[must_use]
pub fn all_majors(catalog: &[Arc<CatalogEntry>]) -> Vec<String> {
    catalog
        .iter()
        .map(|entry| entry.course.major.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::catalog::models::Course;

    fn course(id: &str, title: &str, credits: &str, major: &str, schedule: &str, grade: u32) -> Arc<CatalogEntry> {
        Arc::new(CatalogEntry::new(Course {
            id: id.to_owned(),
            title: title.to_owned(),
            credits: credits.to_owned(),
            major: major.to_owned(),
            schedule: schedule.to_owned(),
            grade,
        }))
    }

    #[fixture]
    fn catalog() -> Vec<Arc<CatalogEntry>> {
        vec![
            course("CS101", "Data Structures", "3학점", "컴퓨터공학과", "월1~2(303)<p>화3(202)", 2),
            course("CS202", "Operating Systems", "3학점", "컴퓨터공학과", "수5~7", 3),
            course("MA110", "Calculus I", "2학점", "수학과", "목1~2<p>금1", 1),
            course("GE001", "Academic Writing", "1학점", "교양", "", 1),
        ]
    }

    fn ids(entries: &[Arc<CatalogEntry>]) -> Vec<&str> {
        entries.iter().map(|entry| entry.course.id.as_str()).collect()
    }

    #[rstest]
    fn empty_options_keep_everything(catalog: Vec<Arc<CatalogEntry>>) {
        let result = filter(&catalog, &SearchOptions::default());
        assert_eq!(result, catalog);
    }

    #[rstest]
    fn day_and_period_filters(catalog: Vec<Arc<CatalogEntry>>) {
        let tuesday = SearchOptions {
            days: BTreeSet::from([Day::Tue]),
            ..SearchOptions::default()
        };
        assert_eq!(ids(&filter(&catalog, &tuesday)), vec!["CS101"]);

        let fifth = SearchOptions {
            periods: BTreeSet::from([5]),
            ..SearchOptions::default()
        };
        assert_eq!(ids(&filter(&catalog, &fifth)), vec!["CS202"]);
    }

    #[rstest]
    #[case("struct", vec!["CS101"])]
    #[case("STRUCT", vec!["CS101"])]
    #[case("cs", vec!["CS101", "CS202"])]
    #[case("ma110", vec!["MA110"])]
    #[case("", vec!["CS101", "CS202", "MA110", "GE001"])]
    #[case("nothing like it", vec![])]
    fn query_matches_title_or_id(catalog: Vec<Arc<CatalogEntry>>, #[case] query: &str, #[case] expected: Vec<&str>) {
        let options = SearchOptions {
            query: Some(query.to_owned()),
            ..SearchOptions::default()
        };
        assert_eq!(ids(&filter(&catalog, &options)), expected);
    }

    #[rstest]
    fn zero_credits_is_no_constraint(catalog: Vec<Arc<CatalogEntry>>) {
        let options = SearchOptions {
            credits: Some(0),
            ..SearchOptions::default()
        };
        assert!(options.is_empty());
        assert_eq!(filter(&catalog, &options), catalog);
    }

    #[rstest]
    fn credits_match_the_label_prefix(catalog: Vec<Arc<CatalogEntry>>) {
        let options = SearchOptions {
            credits: Some(3),
            ..SearchOptions::default()
        };
        assert_eq!(ids(&filter(&catalog, &options)), vec!["CS101", "CS202"]);
    }

    #[rstest]
    fn criteria_are_combined(catalog: Vec<Arc<CatalogEntry>>) {
        let options = SearchOptions {
            grades: BTreeSet::from([1, 2]),
            majors: BTreeSet::from(["컴퓨터공학과".to_owned(), "수학과".to_owned()]),
            days: BTreeSet::from([Day::Mon, Day::Thu]),
            periods: BTreeSet::from([1]),
            ..SearchOptions::default()
        };
        assert_eq!(ids(&filter(&catalog, &options)), vec!["CS101", "MA110"]);
    }

    #[rstest]
    fn course_without_schedule_fails_time_criteria(catalog: Vec<Arc<CatalogEntry>>) {
        let options = SearchOptions {
            query: Some("writing".to_owned()),
            days: BTreeSet::from([Day::Mon]),
            ..SearchOptions::default()
        };
        assert!(filter(&catalog, &options).is_empty());
    }

    #[rstest]
    fn filtering_twice_changes_nothing(catalog: Vec<Arc<CatalogEntry>>) {
        let options = SearchOptions {
            query: Some("s".to_owned()),
            grades: BTreeSet::from([2, 3]),
            ..SearchOptions::default()
        };
        let once = filter(&catalog, &options);
        assert_eq!(filter(&once, &options), once);
    }

    #[rstest]
    fn majors_are_listed_once(catalog: Vec<Arc<CatalogEntry>>) {
        assert_eq!(all_majors(&catalog), vec!["컴퓨터공학과", "수학과", "교양"]);
    }

    #[test]
    fn search_from_a_cell_is_prefilled() {
        let info = SearchInfo {
            table_id: "schedule-1".to_owned(),
            day: Some(Day::Wed),
            period: Some(4),
        };
        let options = SearchOptions::from_search_info(&info);
        assert_eq!(options.days, BTreeSet::from([Day::Wed]));
        assert_eq!(options.periods, BTreeSet::from([4]));
        assert!(!options.is_empty());
        assert!(SearchOptions::from_search_info(&SearchInfo::table("schedule-1")).is_empty());
    }
}
