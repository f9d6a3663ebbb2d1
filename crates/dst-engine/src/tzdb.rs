//! IANA time zone database provider backed by `chrono-tz`.
//!
//! `chrono-tz` exposes offsets, not rules, so adjustment rules are derived:
//! for every year in the configured span the zone's DST component is sampled
//! once a day, each change is bisected down to the second, and the wall-clock
//! time just before the change becomes the transition time. Which side of a
//! change is daylight time is read from the total offset, so zones whose tzdb
//! entry carries a negative DST component (Europe/Dublin) come out the same
//! way round as everyone else. A year with one DST start and one DST end
//! yields a floating rule; consecutive years whose transitions the previous
//! rule already predicts are folded into it.

use std::ops::RangeInclusive;

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use chrono_tz::{OffsetComponents, Tz};

use crate::error::{DstError, Result};
use crate::provider::ZoneProvider;
use crate::resolver::resolve;
use crate::rule::{AdjustmentRule, TransitionRule};
use crate::windows::windows_to_iana;

/// Years covered when no span is configured.
pub const DEFAULT_YEARS: RangeInclusive<i32> = 1970..=2037;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TzdbProvider {
    years: RangeInclusive<i32>,
}

impl Default for TzdbProvider {
    fn default() -> Self {
        Self {
            years: DEFAULT_YEARS,
        }
    }
}

impl TzdbProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive rules for `from ..= to` only.
    ///
    /// # Errors
    /// Returns `DstError::InvalidRule` if `from > to`.
    pub fn with_years(from: i32, to: i32) -> Result<Self> {
        if from > to {
            return Err(DstError::InvalidRule(format!(
                "year span {}..={} is empty",
                from, to
            )));
        }
        Ok(Self { years: from..=to })
    }

    pub fn years(&self) -> &RangeInclusive<i32> {
        &self.years
    }

    /// Look up `zone_id` as an IANA name, falling back to the Windows ID table.
    pub fn zone(&self, zone_id: &str) -> Result<Tz> {
        zone_id
            .parse::<Tz>()
            .ok()
            .or_else(|| windows_to_iana(zone_id).and_then(|iana| iana.parse::<Tz>().ok()))
            .ok_or_else(|| DstError::ZoneNotFound(zone_id.to_string()))
    }

    fn derive_rules(&self, tz: Tz) -> Vec<AdjustmentRule> {
        let mut rules: Vec<AdjustmentRule> = Vec::new();

        for year in self.years.clone() {
            let Some((start, end)) = yearly_transitions(tz, year) else {
                continue;
            };
            let (Some(first_day), Some(last_day)) = (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ) else {
                continue;
            };

            if let Some(previous) = rules.last_mut() {
                if previous.date_end.year() == year - 1 && predicts(previous, year, start, end) {
                    previous.date_end = last_day;
                    continue;
                }
            }

            rules.push(AdjustmentRule {
                date_start: first_day,
                date_end: last_day,
                daylight_transition_start: transition_rule_for(start),
                daylight_transition_end: transition_rule_for(end),
            });
        }

        log::debug!(
            "derived {} adjustment rules for {} over {}..={}",
            rules.len(),
            tz.name(),
            self.years.start(),
            self.years.end()
        );
        rules
    }
}

impl ZoneProvider for TzdbProvider {
    fn canonical_id(&self, zone_id: &str) -> Result<String> {
        self.zone(zone_id).map(|tz| tz.name().to_string())
    }

    fn adjustment_rules(&self, zone_id: &str) -> Result<Vec<AdjustmentRule>> {
        self.zone(zone_id).map(|tz| self.derive_rules(tz))
    }

    fn local_time(&self, zone_id: &str, utc: DateTime<Utc>) -> Result<NaiveDateTime> {
        let tz = self.zone(zone_id)?;
        Ok(tz.from_utc_datetime(&utc.naive_utc()).naive_local())
    }
}

fn predicts(rule: &AdjustmentRule, year: i32, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    resolve(year, &rule.daylight_transition_start).ok() == Some(start)
        && resolve(year, &rule.daylight_transition_end).ok() == Some(end)
}

/// A year boundary stands in for a transition the year did not have.
fn transition_rule_for(at: NaiveDateTime) -> TransitionRule {
    if at.ordinal() == 1 && at.time() == NaiveTime::MIN {
        TransitionRule::fixed(1, 1, NaiveTime::MIN)
    } else {
        TransitionRule::floating_for(at)
    }
}

/// A change of the zone's DST state, as local wall-clock time before the change.
#[derive(Debug, Clone, Copy)]
struct DstChange {
    at: NaiveDateTime,
    into_dst: bool,
}

/// The DST component and total offset from UTC in force at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ZoneOffset {
    dst_seconds: i64,
    total_seconds: i32,
}

/// The DST start and end observed in `year`.
///
/// A zone's first DST year may start without ending and its last may end
/// without starting. The missing side is then New Year's midnight: a start
/// with no end gives `start > end` and covers the rest of the year, an end
/// with no start covers the year up to `end`.
fn yearly_transitions(tz: Tz, year: i32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let new_year = NaiveDate::from_ymd_opt(year, 1, 1)?.and_time(NaiveTime::MIN);
    let changes = dst_changes(tz, year);
    let mut starts = changes.iter().filter(|c| c.into_dst);
    let mut ends = changes.iter().filter(|c| !c.into_dst);

    match (starts.next(), starts.next(), ends.next(), ends.next()) {
        (Some(start), None, Some(end), None) => Some((start.at, end.at)),
        (Some(start), None, None, _) => {
            log::debug!("{} starts DST in {} without ending it", tz.name(), year);
            Some((start.at, new_year))
        }
        (None, _, Some(end), None) => {
            log::debug!("{} ends DST in {} without starting it", tz.name(), year);
            Some((new_year, end.at))
        }
        (None, _, None, _) => None,
        _ => {
            log::debug!(
                "{} has {} irregular DST changes in {}; no rule derived",
                tz.name(),
                changes.len(),
                year
            );
            None
        }
    }
}

fn dst_changes(tz: Tz, year: i32) -> Vec<DstChange> {
    let (Some(from), Some(to)) = (
        Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single(),
        Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single(),
    ) else {
        return Vec::new();
    };

    // One day of padding either side catches transitions whose local date is
    // in `year` while the UTC instant is not.
    let mut lo = from.timestamp() - SECONDS_PER_DAY;
    let end = to.timestamp() + SECONDS_PER_DAY;
    let Some(mut lo_offset) = zone_offset(tz, lo) else {
        return Vec::new();
    };

    let mut changes = Vec::new();
    while lo < end {
        let hi = lo + SECONDS_PER_DAY;
        let Some(hi_offset) = zone_offset(tz, hi) else {
            break;
        };
        if hi_offset.dst_seconds != lo_offset.dst_seconds {
            if let Some(change) = bisect(tz, lo, hi, lo_offset).filter(|c| c.at.year() == year) {
                changes.push(change);
            }
        }
        lo = hi;
        lo_offset = hi_offset;
    }
    changes
}

/// Narrow `lo .. hi` to the first second with a different DST component and
/// return the change as the wall time shown by the zone's clock at that
/// instant, before it changes.
///
/// The side with the larger total offset is daylight time. A change that
/// leaves the total offset alone (the DST component traded against the
/// standard offset) is not a clock change and yields `None`.
fn bisect(tz: Tz, mut lo: i64, mut hi: i64, before: ZoneOffset) -> Option<DstChange> {
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if zone_offset(tz, mid)?.dst_seconds == before.dst_seconds {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let before = zone_offset(tz, lo)?;
    let after = zone_offset(tz, hi)?;
    if after.total_seconds == before.total_seconds {
        return None;
    }

    let at = DateTime::<Utc>::from_timestamp(hi, 0)?
        .naive_utc()
        .checked_add_signed(Duration::seconds(i64::from(before.total_seconds)))?;
    Some(DstChange {
        at,
        into_dst: after.total_seconds > before.total_seconds,
    })
}

fn zone_offset(tz: Tz, timestamp: i64) -> Option<ZoneOffset> {
    let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    let offset = tz.offset_from_utc_datetime(&utc.naive_utc());
    Some(ZoneOffset {
        dst_seconds: offset.dst_offset().num_seconds(),
        total_seconds: offset.fix().local_minus_utc(),
    })
}
