//! Adjustment rules and transition rules -- the DST policy data a time zone
//! database hands to the engine.
//!
//! A zone carries an ordered list of [`AdjustmentRule`]s, each valid for a
//! closed range of calendar dates. Every adjustment rule names two
//! [`TransitionRule`]s: when daylight time starts and when it ends.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{DstError, Result};

/// Which occurrence of a weekday within a month a floating rule refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekOfMonth {
    First,
    Second,
    Third,
    Fourth,
    /// The final occurrence in the month, whether the month has four or five.
    Last,
}

impl WeekOfMonth {
    /// 1-based occurrence number, with `Last` reported as 5.
    pub fn number(self) -> u32 {
        match self {
            WeekOfMonth::First => 1,
            WeekOfMonth::Second => 2,
            WeekOfMonth::Third => 3,
            WeekOfMonth::Fourth => 4,
            WeekOfMonth::Last => 5,
        }
    }
}

impl TryFrom<u8> for WeekOfMonth {
    type Error = DstError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(WeekOfMonth::First),
            2 => Ok(WeekOfMonth::Second),
            3 => Ok(WeekOfMonth::Third),
            4 => Ok(WeekOfMonth::Fourth),
            5 => Ok(WeekOfMonth::Last),
            other => Err(DstError::InvalidRule(format!(
                "week of month must be 1-5, got {}",
                other
            ))),
        }
    }
}

/// Map a Sunday-based weekday index (0 = Sunday .. 6 = Saturday) to a [`Weekday`].
///
/// This is the encoding Windows time zone data uses for floating rules.
pub fn weekday_from_index(index: u8) -> Result<Weekday> {
    match index {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        other => Err(DstError::InvalidRule(format!(
            "day of week must be 0-6, got {}",
            other
        ))),
    }
}

/// When, within a year, a DST transition happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionRule {
    /// Same calendar date every year, e.g. March 15.
    Fixed {
        month: u32,
        day: u32,
        time_of_day: NaiveTime,
    },
    /// Nth weekday of a month, e.g. the second Sunday in March.
    Floating {
        month: u32,
        weekday: Weekday,
        week: WeekOfMonth,
        time_of_day: NaiveTime,
    },
}

impl TransitionRule {
    pub fn fixed(month: u32, day: u32, time_of_day: NaiveTime) -> Self {
        TransitionRule::Fixed {
            month,
            day,
            time_of_day,
        }
    }

    pub fn floating(month: u32, weekday: Weekday, week: WeekOfMonth, time_of_day: NaiveTime) -> Self {
        TransitionRule::Floating {
            month,
            weekday,
            week,
            time_of_day,
        }
    }

    /// Infer the floating rule that produces `at` in its own year.
    ///
    /// The week is `Last` when `at` falls within the final seven days of its
    /// month, otherwise the 1-based occurrence of that weekday.
    pub fn floating_for(at: NaiveDateTime) -> Self {
        let date = at.date();
        let week = if date.day() + 7 > days_in_month(date.year(), date.month()) {
            WeekOfMonth::Last
        } else {
            // day is at most 24 here, so the occurrence stays in 1..=4.
            match (date.day() - 1) / 7 {
                0 => WeekOfMonth::First,
                1 => WeekOfMonth::Second,
                2 => WeekOfMonth::Third,
                _ => WeekOfMonth::Fourth,
            }
        };
        TransitionRule::floating(date.month(), date.weekday(), week, at.time())
    }

    pub fn month(&self) -> u32 {
        match *self {
            TransitionRule::Fixed { month, .. } | TransitionRule::Floating { month, .. } => month,
        }
    }

    pub fn time_of_day(&self) -> NaiveTime {
        match *self {
            TransitionRule::Fixed { time_of_day, .. }
            | TransitionRule::Floating { time_of_day, .. } => time_of_day,
        }
    }
}

/// DST policy for a bounded period of a zone's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRule {
    /// First date the rule applies to (inclusive).
    pub date_start: NaiveDate,
    /// Last date the rule applies to (inclusive).
    pub date_end: NaiveDate,
    pub daylight_transition_start: TransitionRule,
    pub daylight_transition_end: TransitionRule,
}

impl AdjustmentRule {
    /// Build a rule, rejecting a validity interval that ends before it starts.
    pub fn new(
        date_start: NaiveDate,
        date_end: NaiveDate,
        daylight_transition_start: TransitionRule,
        daylight_transition_end: TransitionRule,
    ) -> Result<Self> {
        if date_start > date_end {
            return Err(DstError::InvalidRule(format!(
                "validity interval {} .. {} ends before it starts",
                date_start, date_end
            )));
        }
        Ok(Self {
            date_start,
            date_end,
            daylight_transition_start,
            daylight_transition_end,
        })
    }

    /// Closed-interval overlap test against the calendar year `year`.
    ///
    /// Rule bounds are compared at midnight, the year spans
    /// `Y-01-01T00:00:00 ..= Y-12-31T23:59:59`.
    pub fn overlaps_year(&self, year: i32) -> bool {
        let (Some(start_of_year), Some(end_of_year)) = (
            NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            NaiveDate::from_ymd_opt(year, 12, 31).and_then(|d| d.and_hms_opt(23, 59, 59)),
        ) else {
            return false;
        };

        self.date_start.and_time(NaiveTime::MIN) <= end_of_year
            && self.date_end.and_time(NaiveTime::MIN) >= start_of_year
    }
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (NaiveDate::from_ymd_opt(year, month, 1), next) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}
