//! Date windows and the month grid.
//!
//! Windows are built from whole days: a window over dates `a..=b` runs from
//! `a` 00:00:00 to `b` 23:59:59.999999999 UTC, so a record due at any time
//! on the last day is still inside. Membership is inclusive at both ends.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::agenda::{self, AgendaItem};
use crate::model::{Assignment, CalendarEvent};
use crate::store::Dated;

/// Days shown by the month grid: six Sunday-first weeks.
pub const GRID_DAYS: usize = 42;

/// A closed interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// From the start of `first` to the end of `last`.
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self::new(start_of_day(first), end_of_day(last))
    }

    /// Sunday through Saturday of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let sunday = week_start(date);
        Self::days(sunday, sunday + Duration::days(6))
    }

    /// First through last day of the month containing `date`.
    pub fn month_of(date: NaiveDate) -> Self {
        let first = month_start(date);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self::days(first, last)
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Records of an already-fetched collection whose date key falls in the
    /// window, in collection order.
    pub fn select<T: Dated>(&self, records: &[T]) -> Vec<T> {
        records
            .iter()
            .filter(|r| r.date_key().is_some_and(|d| self.contains(d)))
            .cloned()
            .collect()
    }
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub items: Vec<AgendaItem>,
}

/// Six weeks of days starting on the Sunday on or before the first of
/// `anchor`'s month, each with the events and assignments dated that day.
pub fn month_grid(
    anchor: NaiveDate,
    today: NaiveDate,
    events: &[CalendarEvent],
    assignments: &[Assignment],
) -> Vec<CalendarDay> {
    let first = month_start(anchor);
    let grid_start = week_start(first);
    grid_start
        .iter_days()
        .take(GRID_DAYS)
        .map(|date| CalendarDay {
            date,
            in_month: date.month() == first.month() && date.year() == first.year(),
            is_today: date == today,
            items: agenda::items_on(date, events, assignments),
        })
        .collect()
}

pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::days(1) - Duration::nanoseconds(1)
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{timestamp, EventType};
    use chrono::{TimeZone, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_runs_sunday_to_saturday() {
        // 2026-10-18 is a Sunday; 2026-10-21 a Wednesday.
        let window = DateWindow::week_of(date(2026, 10, 21));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap());
        assert_eq!(window.start.weekday(), Weekday::Sun);
        assert_eq!(window.end.date_naive(), date(2026, 10, 24));
        assert_eq!(window.end.weekday(), Weekday::Sat);
    }

    #[test]
    fn week_of_sunday_starts_that_day() {
        let window = DateWindow::week_of(date(2026, 10, 18));
        assert_eq!(window.start.date_naive(), date(2026, 10, 18));
    }

    #[test]
    fn month_window_covers_whole_last_day() {
        let window = DateWindow::month_of(date(2024, 2, 10));
        assert_eq!(window.start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn december_window_ends_on_new_years_eve() {
        let window = DateWindow::month_of(date(2026, 12, 5));
        assert_eq!(window.end.date_naive(), date(2026, 12, 31));
    }

    #[test]
    fn contains_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
        let window = DateWindow::new(start, end);
        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(end + Duration::milliseconds(1)));
    }

    #[test]
    fn inverted_window_contains_nothing() {
        let a = Utc.with_ymd_and_hms(2024, 6, 5, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let window = DateWindow::new(a, b);
        assert!(!window.contains(a));
        assert!(!window.contains(b));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 6, 3, 0, 0, 0).unwrap()));
    }

    #[test]
    fn select_filters_fetched_records() {
        let events = vec![
            CalendarEvent {
                id: 1,
                start_date: timestamp::parse("2026-10-19T14:00:00Z"),
                ..Default::default()
            },
            CalendarEvent {
                id: 2,
                start_date: timestamp::parse("2026-10-26T14:00:00Z"),
                ..Default::default()
            },
        ];
        let hits = DateWindow::week_of(date(2026, 10, 20)).select(&events);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
    }

    #[test]
    fn month_grid_has_six_weeks_from_sunday() {
        let grid = month_grid(date(2026, 10, 18), date(2026, 10, 18), &[], &[]);
        assert_eq!(grid.len(), GRID_DAYS);
        // October 2026 starts on a Thursday.
        assert_eq!(grid[0].date, date(2026, 9, 27));
        assert!(!grid[0].in_month);
        assert!(grid[4].in_month);
        assert_eq!(grid[4].date, date(2026, 10, 1));
        assert_eq!(grid.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn month_grid_places_items_on_their_day() {
        let events = vec![CalendarEvent {
            id: 5,
            title: "Office Hours".into(),
            start_date: timestamp::parse("2026-10-23T15:00:00Z"),
            kind: EventType::Event,
            ..Default::default()
        }];
        let assignments = vec![Assignment {
            id: 2,
            due_date: timestamp::parse("2026-10-23T09:00:00Z"),
            ..Default::default()
        }];
        let grid = month_grid(date(2026, 10, 1), date(2026, 10, 1), &events, &assignments);
        let cell = grid.iter().find(|d| d.date == date(2026, 10, 23)).unwrap();
        assert_eq!(cell.items.len(), 2);
        assert_eq!(cell.items[0].id, 5);
    }
}
