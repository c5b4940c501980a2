/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// `now + ttl`, or `None` when the result leaves chrono's range.
pub fn expiry_after(now: Timestamp, ttl: chrono::Duration) -> Option<Timestamp> {
    now.checked_add_signed(ttl)
}
