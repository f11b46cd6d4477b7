/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Build a time-derived entity id, e.g. `m_1736954000123`.
///
/// Matches the persisted storage format where users are `u_<millis>` and
/// archive entries are `m_<millis>`.
pub fn time_id(prefix: &str, at: Timestamp) -> String {
    format!("{prefix}_{}", at.timestamp_millis())
}
