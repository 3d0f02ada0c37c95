/// Database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Store-assigned report identifier, e.g. `"#2402"`.
pub type ReportId = String;

/// Opaque job identifier handed out by the remote workflow service.
pub type JobId = String;
