//! Transition date resolution -- turns a [`TransitionRule`] into the concrete
//! wall-clock timestamp it names in a given year.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

use crate::error::{DstError, Result};
use crate::rule::{TransitionRule, WeekOfMonth};

/// Resolve `rule` to the local wall-clock timestamp of the transition in `year`.
///
/// # Errors
/// Returns `DstError::InvalidRule` if the rule's month is outside 1-12.
/// Returns `DstError::InvalidDate` if a fixed-date rule names a day that does not
/// exist in that month of `year` (e.g. February 30).
/// Returns `DstError::InvalidTimestamp` if `year` is outside chrono's date range.
pub fn resolve(year: i32, rule: &TransitionRule) -> Result<NaiveDateTime> {
    let month = rule.month();
    if !(1..=12).contains(&month) {
        return Err(DstError::InvalidRule(format!(
            "month must be 1-12, got {}",
            month
        )));
    }
    if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
        return Err(year_out_of_range(year));
    }

    let date = match *rule {
        TransitionRule::Fixed { day, .. } => {
            NaiveDate::from_ymd_opt(year, month, day).ok_or(DstError::InvalidDate {
                year,
                month,
                day,
            })?
        }
        TransitionRule::Floating { weekday, week, .. } => {
            nth_weekday_of_month(year, month, weekday, week)?
        }
    };

    // Time of day, never a day shift: NaiveTime is always below 24h.
    Ok(date.and_time(rule.time_of_day()))
}

/// The `week`-th `weekday` of `month` in `year`, or the last one for `WeekOfMonth::Last`.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    week: WeekOfMonth,
) -> Result<NaiveDate> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| year_out_of_range(year))?;

    let days_to_add = (weekday.num_days_from_sunday() + 7
        - first_day.weekday().num_days_from_sunday())
        % 7;
    let first_occurrence = step(first_day, u64::from(days_to_add))?;

    match week {
        WeekOfMonth::Last => {
            let mut last = first_occurrence;
            loop {
                let next = step(last, 7)?;
                if next.month() != month {
                    return Ok(last);
                }
                last = next;
            }
        }
        nth => step(first_occurrence, 7 * u64::from(nth.number() - 1)),
    }
}

fn step(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| year_out_of_range(date.year()))
}

fn year_out_of_range(year: i32) -> DstError {
    DstError::InvalidTimestamp(format!("year {} is out of range", year))
}
