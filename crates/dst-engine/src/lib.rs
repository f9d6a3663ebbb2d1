//! # dst-engine
//!
//! Deterministic DST window computation for time zone lookups.
//!
//! Given a zone's adjustment rules (periods during which one DST policy
//! applies), the engine computes the wall-clock dates on which daylight time
//! starts and ends in a requested year. Rules come from an injected
//! [`ZoneProvider`]: either a fixed in-memory set or the IANA database compiled
//! into `chrono-tz`.
//!
//! ## Modules
//!
//! - [`rule`] — adjustment rules and fixed/floating transition rules
//! - [`resolver`] — transition rule → concrete timestamp for a year
//! - [`window`] — rule set + year → DST start/end window
//! - [`provider`] — the zone provider seam and an in-memory provider
//! - [`tzdb`] — provider deriving rules from `chrono-tz`
//! - [`windows`] — Windows time zone ID → IANA name
//! - [`report`] — current time, DST state and window per zone
//! - [`error`] — Error types

pub mod error;
pub mod provider;
pub mod report;
pub mod resolver;
pub mod rule;
pub mod tzdb;
pub mod window;
pub mod windows;

pub use error::DstError;
pub use provider::{StaticProvider, StaticZone, ZoneProvider};
pub use report::{zone_report, zone_reports, ZoneReport};
pub use resolver::resolve;
pub use rule::{AdjustmentRule, TransitionRule, WeekOfMonth};
pub use tzdb::TzdbProvider;
pub use window::{find_window, DstWindow};
