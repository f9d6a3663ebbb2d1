//! DST window selection -- picks the adjustment rule covering a year and
//! resolves its start and end transitions.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resolver::resolve;
use crate::rule::AdjustmentRule;

/// Start and end of daylight time for one year, in local wall-clock time.
///
/// `start` is not guaranteed to precede `end`: Southern Hemisphere zones end
/// DST in autumn (April) and start it again in spring (October) of the same
/// calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstWindow {
    #[serde(rename = "dstStart")]
    pub start: NaiveDateTime,
    #[serde(rename = "dstEnd")]
    pub end: NaiveDateTime,
}

impl DstWindow {
    /// True when DST ends earlier in the calendar year than it starts.
    pub fn is_southern(&self) -> bool {
        self.start > self.end
    }

    /// Whether daylight time is in effect at the local wall-clock time `local`.
    ///
    /// Half-open at both transitions: the start instant is inside, the end
    /// instant is not. A window that wraps the year end is inside before `end`
    /// or from `start` onward.
    pub fn contains(&self, local: NaiveDateTime) -> bool {
        if self.is_southern() {
            local >= self.start || local < self.end
        } else {
            self.start <= local && local < self.end
        }
    }
}

/// Find the DST window for `year` from an ordered list of adjustment rules.
///
/// The first rule whose validity interval overlaps the year is used; later
/// rules are ignored even if they overlap too. Returns `Ok(None)` when no rule
/// covers the year, i.e. the zone observes no DST that year.
///
/// # Errors
/// Propagates `DstError::InvalidDate` / `DstError::InvalidRule` from resolving
/// the selected rule's transitions.
pub fn find_window(year: i32, rules: &[AdjustmentRule]) -> Result<Option<DstWindow>> {
    let Some(rule) = rules.iter().find(|rule| rule.overlaps_year(year)) else {
        log::debug!("no adjustment rule covers {}", year);
        return Ok(None);
    };

    let overlapping = rules.iter().filter(|r| r.overlaps_year(year)).count();
    if overlapping > 1 {
        log::warn!(
            "{} adjustment rules overlap {}; using the first (valid {} .. {})",
            overlapping,
            year,
            rule.date_start,
            rule.date_end
        );
    }

    let start = resolve(year, &rule.daylight_transition_start)?;
    let end = resolve(year, &rule.daylight_transition_end)?;

    Ok(Some(DstWindow { start, end }))
}

