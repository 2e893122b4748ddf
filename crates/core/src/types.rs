/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Wall-clock time of day used for call, wrap and shot start times.
pub type TimeOfDay = chrono::NaiveTime;
