mod review_record;
mod sentiment;

pub use review_record::{ReviewRecord, TIMESTAMP_FORMAT, format_timestamp};
pub use sentiment::{Feedback, Sentiment, parse_field};
