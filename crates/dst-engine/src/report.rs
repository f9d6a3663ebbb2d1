//! Zone reports -- current local time, DST state and the year's DST window
//! for one or more zones.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::provider::ZoneProvider;
use crate::window::{find_window, DstWindow};

/// What a caller asking "what time is it in Z, and when is DST?" gets back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneReport {
    /// Canonical (IANA) name of the zone the report is for.
    pub zone: String,
    pub current_time: NaiveDateTime,
    pub is_dst: bool,
    pub dst_start: Option<NaiveDateTime>,
    pub dst_end: Option<NaiveDateTime>,
}

impl ZoneReport {
    pub fn window(&self) -> Option<DstWindow> {
        match (self.dst_start, self.dst_end) {
            (Some(start), Some(end)) => Some(DstWindow { start, end }),
            _ => None,
        }
    }
}

/// Build the report for `zone_id` at `now`, with the DST window of `year`.
///
/// `is_dst` is decided by whether the local time at `now` lies in the window of
/// its own year, so it stays correct when `year` names a different year.
///
/// # Errors
/// Returns `DstError::ZoneNotFound` if the provider does not know the zone, and
/// propagates rule resolution errors.
pub fn zone_report(
    provider: &dyn ZoneProvider,
    zone_id: &str,
    now: DateTime<Utc>,
    year: i32,
) -> Result<ZoneReport> {
    let zone = provider.canonical_id(zone_id)?;
    let rules = provider.adjustment_rules(zone_id)?;
    let current_time = provider.local_time(zone_id, now)?;

    let window = find_window(year, &rules)?;
    let current_window = if current_time.year() == year {
        window
    } else {
        find_window(current_time.year(), &rules)?
    };
    let is_dst = current_window.is_some_and(|w| w.contains(current_time));

    Ok(ZoneReport {
        zone,
        current_time,
        is_dst,
        dst_start: window.map(|w| w.start),
        dst_end: window.map(|w| w.end),
    })
}

/// Reports for several zones; fails as a whole on the first unknown zone.
pub fn zone_reports(
    provider: &dyn ZoneProvider,
    zone_ids: &[&str],
    now: DateTime<Utc>,
    year: i32,
) -> Result<Vec<ZoneReport>> {
    zone_ids
        .iter()
        .map(|zone_id| zone_report(provider, zone_id, now, year))
        .collect()
}
