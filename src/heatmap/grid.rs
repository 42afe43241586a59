//! Time-range computation, bucket coordinates, and record matching.
//!
//! Everything here is a pure function of the (already lag-adjusted) clock,
//! the configuration, and the record sequence.  All arithmetic is UTC; a
//! bucket is identified by its UTC start instant.

use super::config::{Frequency, HeatmapConfig, Locale, WeekStart};
use crate::records::{StatusKind, StatusRecord};
use std::iter::successors;
use time::{Date, Duration, Month, OffsetDateTime, Weekday};

/// One time slot of the grid.  `col` and `row` are in cell units; the widget
/// maps them to terminal columns per frequency.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bucket {
    pub(crate) start: OffsetDateTime,
    pub(crate) col: u16,
    pub(crate) row: u16,
}

/// A labeled column group (a day of hour cells, a month of day/week columns,
/// or one month block).  A boundary tick is drawn at `col`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ColGroup {
    pub(crate) label: String,
    pub(crate) col: u16,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Grid {
    pub(crate) buckets: Vec<Bucket>,
    pub(crate) rows: u16,
    pub(crate) col_groups: Vec<ColGroup>,
    pub(crate) row_labels: Vec<String>,
}

impl Grid {
    pub(crate) fn compute(now: OffsetDateTime, config: &HeatmapConfig) -> Grid {
        match config.frequency {
            Frequency::Hour => hour_grid(now, &config.locale),
            Frequency::Day => day_grid(now, &config.locale, config.week_start),
            Frequency::Week => week_grid(now, &config.locale),
            Frequency::Month => month_grid(now, &config.locale),
        }
    }
}

/// Hourly buckets over the last two weeks: one 4-column group per day,
/// six 4-hour rows.
fn hour_grid(now: OffsetDateTime, locale: &Locale) -> Grid {
    let start_day = now.date() - Duration::weeks(2);
    let start = start_day.midnight().assume_utc();
    let buckets = successors(Some(start), |&t| Some(t + Duration::hours(1)))
        .take_while(|&t| t < now)
        .map(|t| Bucket {
            start: t,
            col: day_count(start_day, t.date()) * 4 + u16::from(t.hour() % 4),
            row: u16::from(t.hour() / 4),
        })
        .collect();
    let col_groups = successors(Some(start_day), |&d| d.next_day())
        .take_while(|&d| d <= now.date())
        .map(|d| ColGroup {
            label: locale.day_name(d.weekday()).to_owned(),
            col: day_count(start_day, d) * 4,
        })
        .collect();
    Grid {
        buckets,
        rows: Frequency::Hour.grid_rows(),
        col_groups,
        row_labels: locale.hours.clone(),
    }
}

/// Daily buckets from the first of this month one year ago through today:
/// weekday rows, one column per week.
fn day_grid(now: OffsetDateTime, locale: &Locale, week_start: WeekStart) -> Grid {
    let start = first_of_month(now.year() - 1, now.month());
    let origin = week_origin(start, week_start);
    let buckets = successors(Some(start), |&d| d.next_day())
        .take_while(|&d| d <= now.date())
        .map(|d| Bucket {
            start: d.midnight().assume_utc(),
            col: day_count(origin, d) / 7,
            row: week_start.row(d.weekday()),
        })
        .collect();
    let col_groups = month_starts(start)
        .take_while(|&d| d <= now.date())
        .map(|d| ColGroup {
            label: locale.month_name(d.month()).to_owned(),
            col: day_count(origin, d) / 7,
        })
        .collect();
    Grid {
        buckets,
        rows: Frequency::Day.grid_rows(),
        col_groups,
        row_labels: locale.ordered_days(week_start),
    }
}

/// Weekly buckets: every Monday from the first of this month one year ago up
/// to one week before now.  A single row of 7-unit-tall cells.
fn week_grid(now: OffsetDateTime, locale: &Locale) -> Grid {
    let start = first_of_month(now.year() - 1, now.month());
    let end = now - Duration::weeks(1);
    let first_monday = next_weekday(start, Weekday::Monday);
    let buckets = successors(Some(first_monday), |&d| Some(d + Duration::weeks(1)))
        .take_while(|&d| d.midnight().assume_utc() < end)
        .map(|d| Bucket {
            start: d.midnight().assume_utc(),
            col: day_count(first_monday, d) / 7,
            row: 0,
        })
        .collect();
    let col_groups = month_starts(start)
        .take_while(|&d| d <= end.date())
        .map(|d| ColGroup {
            label: locale.month_name(d.month()).to_owned(),
            col: if d <= first_monday {
                0
            } else {
                day_count(first_monday, d) / 7
            },
        })
        .collect();
    Grid {
        buckets,
        rows: Frequency::Week.grid_rows(),
        // week frequency always uses Monday-started weeks
        row_labels: locale.ordered_days(WeekStart::Monday),
        col_groups,
    }
}

/// Monthly buckets: month starts from one year and one month ago up to one
/// month before now.  One 4-cell-wide block per month.
fn month_grid(now: OffsetDateTime, locale: &Locale) -> Grid {
    let year_ago = first_of_month(now.year() - 1, now.month());
    let (start_year, start_month) = previous_month(year_ago.year(), year_ago.month());
    let end = one_month_before(now);
    let mut buckets = Vec::new();
    let mut col_groups = Vec::new();
    let months = month_starts(first_of_month(start_year, start_month))
        .take_while(|&d| d.midnight().assume_utc() < end);
    for (i, d) in (0u16..).zip(months) {
        let col = i * 4;
        buckets.push(Bucket {
            start: d.midnight().assume_utc(),
            col,
            row: 0,
        });
        col_groups.push(ColGroup {
            label: format!("{}'{:02}", locale.month_name(d.month()), d.year().rem_euclid(100)),
            col,
        });
    }
    Grid {
        buckets,
        rows: Frequency::Month.grid_rows(),
        col_groups,
        row_labels: Vec::new(),
    }
}

/// First record whose date falls in the bucket, per the frequency's equality
/// rule.  No aggregation: later matches for the same bucket are ignored.
pub(crate) fn bucket_match<'a>(
    records: &'a [StatusRecord],
    bucket: OffsetDateTime,
    frequency: Frequency,
) -> Option<&'a StatusRecord> {
    records
        .iter()
        .find(|record| same_bucket(record.date, bucket, frequency))
}

pub(crate) fn bucket_kind(
    records: &[StatusRecord],
    bucket: OffsetDateTime,
    frequency: Frequency,
) -> StatusKind {
    bucket_match(records, bucket, frequency).map_or(StatusKind::None, |record| record.kind)
}

fn same_bucket(date: OffsetDateTime, bucket: OffsetDateTime, frequency: Frequency) -> bool {
    let date = date.to_offset(time::UtcOffset::UTC);
    match frequency {
        Frequency::Hour => date.date() == bucket.date() && date.hour() == bucket.hour(),
        Frequency::Day => date.date() == bucket.date(),
        Frequency::Week => {
            let (year, week, _) = date.date().to_iso_week_date();
            let (bucket_year, bucket_week, _) = bucket.date().to_iso_week_date();
            (year, week) == (bucket_year, bucket_week)
        }
        Frequency::Month => date.year() == bucket.year() && date.month() == bucket.month(),
    }
}

/// End of the bucket starting at `start`: one frequency unit later.
pub(crate) fn bucket_end(start: OffsetDateTime, frequency: Frequency) -> OffsetDateTime {
    match frequency {
        Frequency::Hour => start + Duration::hours(1),
        Frequency::Day => start + Duration::days(1),
        Frequency::Week => start + Duration::weeks(1),
        Frequency::Month => {
            let (year, month) = next_month(start.year(), start.month());
            first_of_month(year, month).midnight().assume_utc()
        }
    }
}

fn first_of_month(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year, month, 1).expect("the first of a month is a valid date")
}

fn previous_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::January => (year - 1, Month::December),
        m => (year, m.previous()),
    }
}

fn next_month(year: i32, month: Month) -> (i32, Month) {
    match month {
        Month::December => (year + 1, Month::January),
        m => (year, m.next()),
    }
}

/// The same instant one month earlier, day clamped to the shorter month.
fn one_month_before(dt: OffsetDateTime) -> OffsetDateTime {
    let (year, month) = previous_month(dt.year(), dt.month());
    let day = dt.day().min(month.length(year));
    let date = Date::from_calendar_date(year, month, day).expect("clamped day is valid");
    dt.replace_date(date)
}

/// Month starts from `from` (itself a month start) onwards.
fn month_starts(from: Date) -> impl Iterator<Item = Date> {
    successors(Some(from), |&d| {
        let (year, month) = next_month(d.year(), d.month());
        Some(first_of_month(year, month))
    })
}

/// Whole days from `from` to `to` (`to` must not precede `from`).
fn day_count(from: Date, to: Date) -> u16 {
    u16::try_from((to - from).whole_days()).unwrap_or(0)
}

/// The week-start day of the week containing `date`.
fn week_origin(date: Date, week_start: WeekStart) -> Date {
    date - Duration::days(i64::from(week_start.row(date.weekday())))
}

/// First `weekday` on or after `date`.
fn next_weekday(date: Date, weekday: Weekday) -> Date {
    let ahead = (7 + i64::from(weekday.number_days_from_monday())
        - i64::from(date.weekday().number_days_from_monday()))
        % 7;
    date + Duration::days(ahead)
}
