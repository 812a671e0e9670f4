//! Rule table repairing known misreadings of the day component of a date.
//!
//! A rule only fires when the date as read is unusable for the expected window.
//! Rules are tried in table order and the first one landing inside the window
//! wins, unless the heading names a weekday: then a candidate on that weekday
//! beats every other.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// When a rule may be considered for a parsed date.
pub enum Condition {
    /// The date as read is not a calendar date, lies outside the window, or
    /// falls on a different weekday than the heading names.
    OutsideWindow,
    /// The date as read is not a calendar date at all.
    InvalidDate,
    /// Only when the heading names a weekday and the candidate falls on it.
    WeekdayConfirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How a rule rebuilds the day.
pub enum DayFix {
    /// Prepend a tens digit the recognizer dropped (`6` → `16`).
    RestoreTens(u32),
    /// Append a units digit the recognizer dropped (`1` → `16`).
    RestoreUnits(u32),
}

#[derive(Debug, Clone)]
/// One known recognition error on the day digits.
pub struct CorrectionRule {
    /// Short name used in logs and tests.
    pub name: &'static str,
    /// Days as read that this rule applies to.
    pub days: RangeInclusive<u32>,
    /// When the rule may fire.
    pub condition: Condition,
    /// Rebuilt day.
    pub fix: DayFix,
}

impl CorrectionRule {
    /// Corrected day if this rule covers `day`.
    #[must_use]
    pub fn apply(&self, day: u32) -> Option<u32> {
        self.days.contains(&day).then_some(match self.fix {
            DayFix::RestoreTens(tens) => tens * 10 + day,
            DayFix::RestoreUnits(units) => day * 10 + units,
        })
    }
}

/// Built-in table of day misreadings, in priority order.
pub static DAY_CORRECTIONS: &[CorrectionRule] = &[
    CorrectionRule {
        name: "missing leading 1",
        days: 0..=9,
        condition: Condition::OutsideWindow,
        fix: DayFix::RestoreTens(1),
    },
    CorrectionRule {
        name: "missing leading 2",
        days: 0..=9,
        condition: Condition::OutsideWindow,
        fix: DayFix::RestoreTens(2),
    },
    CorrectionRule {
        name: "missing leading 3",
        days: 0..=1,
        condition: Condition::InvalidDate,
        fix: DayFix::RestoreTens(3),
    },
    CorrectionRule {
        name: "missing trailing 6",
        days: 1..=2,
        condition: Condition::WeekdayConfirmed,
        fix: DayFix::RestoreUnits(6),
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A date heading as read from the image, before any repair.
pub struct DateReading {
    /// Day of month as read, possibly not a calendar day.
    pub day: u32,
    /// Month number.
    pub month: u32,
    /// Year when the heading carries one.
    pub year: Option<i32>,
    /// Weekday named next to the date.
    pub weekday: Option<Weekday>,
}

impl DateReading {
    /// Reading of `day`/`month` without year or weekday.
    #[must_use]
    pub fn new(day: u32, month: u32) -> Self {
        Self {
            day,
            month,
            year: None,
            weekday: None,
        }
    }

    /// Same reading with an explicit year.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Same reading with the weekday named next to it.
    #[must_use]
    pub fn with_weekday(mut self, weekday: Weekday) -> Self {
        self.weekday = Some(weekday);
        self
    }

    fn on_weekday(&self, date: NaiveDate) -> bool {
        self.weekday.is_some_and(|weekday| date.weekday() == weekday)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of running a parsed date through the correction table.
pub enum Repair {
    /// The date as read was kept.
    Kept(NaiveDate),
    /// A rule produced the date.
    Corrected {
        /// Repaired date.
        date: NaiveDate,
        /// Day as it was read.
        read_day: u32,
        /// Name of the rule that fired.
        rule: &'static str,
    },
    /// Neither the date as read nor any correction is a calendar date.
    Unusable,
}

impl Repair {
    /// Date to use, if any.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Repair::Kept(date) | Repair::Corrected { date, .. } => Some(*date),
            Repair::Unusable => None,
        }
    }
}

/// Build a date for `day`/`month`, inferring the year from the window when absent.
#[must_use]
pub fn place_date(
    day: u32,
    month: u32,
    year: Option<i32>,
    window: &DateRange,
) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    window
        .candidate_years()
        .filter_map(|candidate| NaiveDate::from_ymd_opt(candidate, month, day))
        .min_by_key(|date| window.distance_to(*date))
}

/// Check a parsed date against the window and repair it through `rules` when needed.
#[must_use]
pub fn repair_day(reading: DateReading, window: &DateRange, rules: &[CorrectionRule]) -> Repair {
    let as_read = place_date(reading.day, reading.month, reading.year, window);
    let read_in_window = as_read.filter(|date| window.contains(*date));

    if let Some(date) = read_in_window
        && (reading.weekday.is_none() || reading.on_weekday(date))
    {
        return Repair::Kept(date);
    }

    let candidates: Vec<(NaiveDate, &'static str)> = rules
        .iter()
        .filter(|rule| match rule.condition {
            Condition::OutsideWindow | Condition::WeekdayConfirmed => true,
            Condition::InvalidDate => as_read.is_none(),
        })
        .filter_map(|rule| {
            let corrected = rule.apply(reading.day)?;
            let date = place_date(corrected, reading.month, reading.year, window)?;
            let confirmed =
                rule.condition != Condition::WeekdayConfirmed || reading.on_weekday(date);
            (window.contains(date) && confirmed).then_some((date, rule.name))
        })
        .collect();

    let on_weekday = candidates.iter().find(|(date, _)| reading.on_weekday(*date));
    let chosen = match (on_weekday, read_in_window) {
        (Some(candidate), _) => Some(candidate),
        (None, Some(_)) => None,
        (None, None) => candidates.first(),
    };

    match (chosen, as_read) {
        (Some((date, rule)), _) => Repair::Corrected {
            date: *date,
            read_day: reading.day,
            rule: *rule,
        },
        (None, Some(date)) => Repair::Kept(date),
        (None, None) => Repair::Unusable,
    }
}
