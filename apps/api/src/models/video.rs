use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `videos` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VideoRow {
    pub id: i64,
    pub filename: String,
    pub filepath: String,
    pub filesize: i64,
    pub upload_date: String,
    pub notes: String,
    pub analysis_data: String,
}

/// Metadata for a freshly stored upload, before it has an id.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub filename: String,
    pub filepath: String,
    pub filesize: i64,
    pub upload_date: DateTime<Utc>,
}

impl NewVideo {
    /// Fixed-width RFC 3339 so that string order in SQL matches time order.
    pub fn upload_date_string(&self) -> String {
        format_timestamp(self.upload_date)
    }
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_is_fixed_width() {
        let a = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let b = a + chrono::Duration::microseconds(123_456);
        assert_eq!(format_timestamp(a), "2024-01-02T03:04:05.000000Z");
        assert_eq!(format_timestamp(b), "2024-01-02T03:04:05.123456Z");
        assert!(format_timestamp(a) < format_timestamp(b));
    }
}
