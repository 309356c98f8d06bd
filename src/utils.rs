use std::collections::HashSet;

use chrono::{Duration, NaiveTime};

use self::models::{Glyph, Rule};

pub mod models;

/// Number of 30-minute periods, the evening ones come after
const DAY_PERIODS: u32 = 18;

/// Last period of the grid
pub const LAST_PERIOD: u32 = 24;

/// Start and end time of a period
///
/// Day periods last 30 minutes from 09:00, evening periods last 50 minutes
/// and start every 55 minutes from 18:00.
#[must_use]
pub fn period_time(period: u32) -> Option<(NaiveTime, NaiveTime)> {
    if period == 0 || period > LAST_PERIOD {
        return None;
    }

    let (origin, step, length, index) = if period <= DAY_PERIODS {
        (NaiveTime::from_hms_opt(9, 0, 0)?, 30, 30, period - 1)
    } else {
        (NaiveTime::from_hms_opt(18, 0, 0)?, 55, 50, period - DAY_PERIODS - 1)
    };

    let start = origin + Duration::minutes(i64::from(index * step));
    Some((start, start + Duration::minutes(length)))
}

/// Label of a period, i.e. `09:00~09:30`
#[must_use]
pub fn period_label(period: u32) -> Option<String> {
    period_time(period)
        .map(|(start, end)| format!("{}~{}", start.format("%H:%M"), end.format("%H:%M")))
}

/// Shorten a string to `max` chars, ending with an ellipsis when cut
#[must_use]
pub fn etc_str(data: &str, max: usize) -> String {
    if data.chars().count() <= max {
        return data.to_owned();
    }

    let mut short: String = data.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// Draw a horizontal line of the table
///
/// `clh` is the width of the hour column, `cell_length` the width of the
/// `cn` other columns. In the middle of the table, columns listed in `skip`
/// are left open because a course goes on below.
#[must_use]
pub fn line_table(
    clh: usize,
    cell_length: usize,
    cn: usize,
    rule: Rule,
    skip: &HashSet<usize>,
) -> String {
    let bar = |n: usize| Glyph::Horizontal.as_char().to_string().repeat(n);

    let (left, joint, right) = match rule {
        Rule::Top => (Glyph::TopLeft, Glyph::DownTee, Glyph::TopRight),
        Rule::Between => (Glyph::LeftTee, Glyph::Cross, Glyph::RightTee),
        Rule::Bottom => (Glyph::BottomLeft, Glyph::UpTee, Glyph::BottomRight),
    };

    let mut line = String::new();
    line.push(left.as_char());
    line.push_str(&bar(clh));

    for column in 0..cn {
        let open = rule == Rule::Between && skip.contains(&column);
        let open_before = rule == Rule::Between && column > 0 && skip.contains(&(column - 1));

        line.push(match (open_before, open) {
            (false, false) => joint.as_char(),
            (false, true) => Glyph::RightTee.as_char(),
            (true, false) => Glyph::LeftTee.as_char(),
            (true, true) => Glyph::Vertical.as_char(),
        });
        if open {
            line.push_str(&" ".repeat(cell_length));
        } else {
            line.push_str(&bar(cell_length));
        }
    }

    let last_open = rule == Rule::Between && cn > 0 && skip.contains(&(cn - 1));
    line.push(if last_open { Glyph::Vertical.as_char() } else { right.as_char() });

    line
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(1, "09:00~09:30")]
    #[case(2, "09:30~10:00")]
    #[case(18, "17:30~18:00")]
    #[case(19, "18:00~18:50")]
    #[case(20, "18:55~19:45")]
    #[case(24, "22:35~23:25")]
    fn period_labels(#[case] period: u32, #[case] label: &str) {
        assert_eq!(period_label(period).as_deref(), Some(label));
    }

    #[test]
    fn no_label_outside_the_grid() {
        assert_eq!(period_label(0), None);
        assert_eq!(period_label(25), None);
    }

    #[test]
    fn long_strings_are_cut() {
        assert_eq!(etc_str("Data", 10), "Data");
        assert_eq!(etc_str("Data Structures", 6), "Data …");
        assert_eq!(etc_str("자료구조와 알고리즘", 5), "자료구조…");
    }

    #[test]
    fn lines_of_the_table() {
        let none = HashSet::new();
        assert_eq!(line_table(2, 3, 2, Rule::Top, &none), "┌──┬───┬───┐");
        assert_eq!(line_table(2, 3, 2, Rule::Between, &none), "├──┼───┼───┤");
        assert_eq!(line_table(2, 3, 2, Rule::Bottom, &none), "└──┴───┴───┘");
    }

    #[test]
    fn open_columns_are_not_crossed() {
        let first = HashSet::from([0]);
        assert_eq!(line_table(2, 3, 2, Rule::Between, &first), "├──┤   ├───┤");

        let last = HashSet::from([1]);
        assert_eq!(line_table(2, 3, 2, Rule::Between, &last), "├──┼───┤   │");
    }
}
