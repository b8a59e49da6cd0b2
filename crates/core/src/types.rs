/// Primary keys are PostgreSQL BIGSERIAL; the in-memory store mirrors that.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
