use std::collections::BTreeSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use timetabler::catalog::{self, models::Catalog};
use timetabler::filter::{filter, SearchOptions};
use timetabler::placement::{GridGeometry, PointerDelta};
use timetabler::schedule::mask::encode;
use timetabler::schedule::models::{Day, TimeBlock};
use timetabler::schedule::{parse, SEPARATOR};
use timetabler::search::{ResultWindow, SearchEngine};
use timetabler::timetable::models::SearchInfo;
use timetabler::timetable::{TimetableCollection, FIRST_TABLE};

const CATALOG: &str = r#"[
    {"id": "CS101", "title": "자료구조", "credits": "3학점", "major": "컴퓨터공학과", "schedule": "월1~2(303)<p>화3(202)", "grade": 2},
    {"id": "CS205", "title": "운영체제", "credits": "3학점", "major": "컴퓨터공학과", "schedule": "수5~7(IT-401)", "grade": 3},
    {"id": "MA101", "title": "미적분학", "credits": "2학점", "major": "수학과<p>자연과학대학", "schedule": "화3~4<p>목3~4", "grade": 1},
    {"id": "GE010", "title": "글쓰기", "credits": "1학점", "major": "교양", "grade": 1}
]"#;

fn catalog() -> Catalog {
    catalog::annotate(catalog::from_json(CATALOG, "inline").unwrap())
}

fn ids(entries: &[Arc<catalog::models::CatalogEntry>]) -> Vec<&str> {
    entries.iter().map(|entry| entry.course.id.as_str()).collect()
}

#[test]
fn documented_example() {
    let raw = format!("월1~2(303){SEPARATOR}화3(202)");
    assert_eq!(
        parse(&raw),
        vec![
            TimeBlock {
                day: Day::Mon,
                periods: vec![1, 2],
                room: Some("303".to_owned()),
            },
            TimeBlock {
                day: Day::Tue,
                periods: vec![3],
                room: Some("202".to_owned()),
            },
        ]
    );

    let catalog = catalog();
    let cs101 = &catalog[..1];

    let tuesday = SearchOptions {
        days: BTreeSet::from([Day::Tue]),
        ..SearchOptions::default()
    };
    assert_eq!(filter(cs101, &tuesday).len(), 1);

    let fifth = SearchOptions {
        periods: BTreeSet::from([5]),
        ..SearchOptions::default()
    };
    assert!(filter(cs101, &fifth).is_empty());
}

#[rstest]
#[case::by_day(SearchOptions { days: BTreeSet::from([Day::Tue]), ..SearchOptions::default() }, vec!["CS101", "MA101"])]
#[case::by_major(SearchOptions { majors: BTreeSet::from(["수학과<p>자연과학대학".to_owned()]), ..SearchOptions::default() }, vec!["MA101"])]
#[case::by_credits_and_grade(SearchOptions { credits: Some(3), grades: BTreeSet::from([3]), ..SearchOptions::default() }, vec!["CS205"])]
#[case::by_query(SearchOptions { query: Some("cs".to_owned()), ..SearchOptions::default() }, vec!["CS101", "CS205"])]
#[case::nothing(SearchOptions::default(), vec!["CS101", "CS205", "MA101", "GE010"])]
fn filtering_the_catalog(#[case] options: SearchOptions, #[case] expected: Vec<&str>) {
    let catalog = catalog();
    let once = filter(&catalog, &options);
    assert_eq!(ids(&once), expected);
    assert_eq!(filter(&once, &options), once);
}

#[test]
fn build_a_week() {
    let catalog = catalog();
    let mut tables = TimetableCollection::new();

    // Search opened from the cell of tuesday, 3rd period
    let info = SearchInfo::cell(FIRST_TABLE, Day::Tue, 3);
    let found = filter(&catalog, &SearchOptions::from_search_info(&info));
    assert_eq!(ids(&found), vec!["CS101", "MA101"]);

    for entry in &found {
        tables.append_sessions(&info.table_id, entry.blocks.clone(), &entry.course);
    }
    assert_eq!(tables.get(FIRST_TABLE).unwrap().len(), 4);

    // Both courses use tuesday 3rd period, it is allowed but detectable
    assert!(encode(&found[0].course.schedule).conflicts_with(&encode(&found[1].course.schedule)));
    // Its own two blocks plus the tuesday block of MA101
    assert_eq!(tables.conflicts(FIRST_TABLE, &found[0].course).len(), 3);

    // Keep a copy before moving things around
    let backup = tables.add_table(FIRST_TABLE).unwrap();

    // Drag the monday block one day right and two periods down
    let placement = tables
        .relocate_session(FIRST_TABLE, 0, PointerDelta::new(78.0, 64.0), &GridGeometry::default())
        .unwrap();
    assert_eq!(placement.day, Day::Tue);
    assert_eq!(placement.periods, vec![3, 4]);

    // Clicking the 4th period of the moved block deletes every tuesday session covering it
    assert_eq!(tables.remove_session(FIRST_TABLE, Day::Tue, 4), 2);
    let left: Vec<_> = tables
        .get(FIRST_TABLE)
        .unwrap()
        .iter()
        .map(|session| (session.course.id.clone(), session.day))
        .collect();
    assert_eq!(
        left,
        vec![("CS101".to_owned(), Day::Tue), ("MA101".to_owned(), Day::Thu)]
    );

    // The copy was untouched
    assert_eq!(tables.get(&backup).unwrap().len(), 4);
    assert_eq!(tables.get(&backup).unwrap()[0].day, Day::Mon);

    tables.remove_table(FIRST_TABLE).unwrap();
    assert!(tables.remove_table(&backup).is_err());
    assert_eq!(tables.len(), 1);
}

#[tokio::test]
async fn search_with_a_late_catalog() {
    let options = SearchOptions {
        query: Some("CS".to_owned()),
        ..SearchOptions::default()
    };
    let engine = SearchEngine::spawn(Catalog::from(Vec::new()), SearchOptions::default(), 2);

    engine.submit(SearchOptions {
        query: Some("C".to_owned()),
        ..SearchOptions::default()
    });
    engine.submit(options.clone());
    engine.set_catalog(catalog());

    let results = engine.wait_for(&options).await.unwrap();
    assert_eq!(results.catalog_len, 4);
    assert_eq!(ids(&results.courses), vec!["CS101", "CS205"]);

    let mut window = ResultWindow::new(1);
    assert_eq!(ids(window.window(&results.courses)), vec!["CS101"]);
    assert!(window.load_more(results.courses.len()));
    assert!(!window.load_more(results.courses.len()));
    assert_eq!(ids(window.window(&results.courses)), vec!["CS101", "CS205"]);
}
