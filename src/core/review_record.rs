use chrono::{DateTime, Utc};

use crate::core::sentiment::Sentiment;

/// Same layout as SQLite's `DATETIME('now')`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub text: String,
    pub sentiment: Sentiment,
    pub date: String,
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_sort_lexicographically() {
        let early = Utc.with_ymd_and_hms(2024, 1, 9, 23, 59, 59).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(format_timestamp(early), "2024-01-09 23:59:59");
        assert!(format_timestamp(early) < format_timestamp(late));
    }
}
