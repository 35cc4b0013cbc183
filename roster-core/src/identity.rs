//! Identity and time types for ROSTER entities

use chrono::{DateTime, NaiveDateTime, Utc};
use uuid::Uuid;

/// Agent identifier using UUIDv7 for timestamp-sortable IDs.
pub type AgentId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Wire format for timestamps: `yyyy-MM-ddTHH:mm:ss.SSSZ`.
///
/// The trailing `Z` is a literal. Timestamps are always produced from the
/// UTC clock, so no offset conversion ever happens.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Generate a new UUIDv7 agent id.
pub fn new_agent_id() -> AgentId {
    Uuid::now_v7()
}

/// Render a timestamp using [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp rendered with [`TIMESTAMP_FORMAT`].
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}
