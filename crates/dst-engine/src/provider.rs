//! Zone providers -- the time zone database seam.
//!
//! The engine never looks zones up on its own. Callers inject a
//! [`ZoneProvider`], which hands out a zone's adjustment rules and converts
//! UTC instants to the zone's local wall clock. [`StaticProvider`] serves a
//! fixed in-memory set of zones; [`crate::tzdb::TzdbProvider`] serves the
//! IANA database compiled into `chrono-tz`.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DstError, Result};
use crate::rule::AdjustmentRule;
use crate::window::find_window;
use crate::windows::windows_to_iana;

/// Source of adjustment rules and local time for named zones.
pub trait ZoneProvider: Send + Sync {
    /// The IANA name `zone_id` refers to (Windows IDs are translated).
    fn canonical_id(&self, zone_id: &str) -> Result<String>;

    /// The zone's adjustment rules, in the order the finder should consider them.
    fn adjustment_rules(&self, zone_id: &str) -> Result<Vec<AdjustmentRule>>;

    /// `utc` expressed in the zone's local wall-clock time.
    fn local_time(&self, zone_id: &str, utc: DateTime<Utc>) -> Result<NaiveDateTime>;
}

/// One zone served by a [`StaticProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticZone {
    /// Standard-time offset from UTC, in seconds east.
    pub base_offset_seconds: i32,
    /// Amount added to standard time while DST is in effect, in seconds.
    #[serde(default = "default_daylight_delta")]
    pub daylight_delta_seconds: i64,
    #[serde(default)]
    pub rules: Vec<AdjustmentRule>,
}

fn default_daylight_delta() -> i64 {
    3600
}

impl StaticZone {
    pub fn new(base_offset_seconds: i32, rules: Vec<AdjustmentRule>) -> Self {
        Self {
            base_offset_seconds,
            daylight_delta_seconds: default_daylight_delta(),
            rules,
        }
    }
}

/// In-memory provider over a fixed set of zones.
///
/// Zones are looked up by exact name; a Windows ID is also tried through
/// [`windows_to_iana`] when the name itself is not registered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticProvider {
    zones: BTreeMap<String, StaticZone>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, zone_id: impl Into<String>, zone: StaticZone) -> Self {
        self.insert(zone_id, zone);
        self
    }

    pub fn insert(&mut self, zone_id: impl Into<String>, zone: StaticZone) {
        self.zones.insert(zone_id.into(), zone);
    }

    /// Parse a JSON object mapping zone names to [`StaticZone`] definitions.
    ///
    /// # Errors
    /// Returns `DstError::InvalidRule` if the JSON is malformed or a rule's
    /// validity interval ends before it starts.
    pub fn from_json(json: &str) -> Result<Self> {
        let provider: StaticProvider =
            serde_json::from_str(json).map_err(|e| DstError::InvalidRule(e.to_string()))?;
        for (name, zone) in &provider.zones {
            if let Some(rule) = zone.rules.iter().find(|r| r.date_start > r.date_end) {
                return Err(DstError::InvalidRule(format!(
                    "{}: validity interval {} .. {} ends before it starts",
                    name, rule.date_start, rule.date_end
                )));
            }
        }
        Ok(provider)
    }

    fn lookup(&self, zone_id: &str) -> Result<(&str, &StaticZone)> {
        if let Some((name, zone)) = self.zones.get_key_value(zone_id) {
            return Ok((name.as_str(), zone));
        }
        windows_to_iana(zone_id)
            .and_then(|iana| self.zones.get_key_value(iana))
            .map(|(name, zone)| (name.as_str(), zone))
            .ok_or_else(|| DstError::ZoneNotFound(zone_id.to_string()))
    }
}

impl ZoneProvider for StaticProvider {
    fn canonical_id(&self, zone_id: &str) -> Result<String> {
        self.lookup(zone_id).map(|(name, _)| name.to_string())
    }

    fn adjustment_rules(&self, zone_id: &str) -> Result<Vec<AdjustmentRule>> {
        self.lookup(zone_id).map(|(_, zone)| zone.rules.clone())
    }

    fn local_time(&self, zone_id: &str, utc: DateTime<Utc>) -> Result<NaiveDateTime> {
        let (_, zone) = self.lookup(zone_id)?;
        let offset = FixedOffset::east_opt(zone.base_offset_seconds).ok_or_else(|| {
            DstError::InvalidRule(format!(
                "{}: base offset {}s is out of range",
                zone_id, zone.base_offset_seconds
            ))
        })?;
        let standard = utc.with_timezone(&offset).naive_local();
        let daylight = standard
            .checked_add_signed(Duration::seconds(zone.daylight_delta_seconds))
            .ok_or_else(|| DstError::InvalidTimestamp(utc.to_rfc3339()))?;

        // Start transitions are written in standard time, end transitions in
        // daylight time, so each reading is checked against the window.
        match find_window(standard.year(), &zone.rules)? {
            Some(window) if window.contains(standard) && window.contains(daylight) => Ok(daylight),
            _ => Ok(standard),
        }
    }
}
