//! Step definitions for acceptance scenarios.

pub mod dashboard;
pub mod metrics;

use chrono::{DateTime, Utc};

/// Parse an RFC 3339 instant from a scenario.
pub fn instant(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .expect("Invalid RFC 3339 timestamp in scenario")
        .with_timezone(&Utc)
}
