use serde::Deserialize;

use crate::config::MIN_REVIEW_CHARS;
use crate::core::{Feedback, Sentiment, parse_field};
use crate::error::Result;

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Body of `POST /results`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub moviereview: String,
}

impl ReviewForm {
    /// Collects user-facing validation messages. A blank review only reports
    /// that the field is required.
    pub fn validate(&self) -> std::result::Result<&str, Vec<String>> {
        if self.moviereview.trim().is_empty() {
            return Err(vec![REQUIRED_MESSAGE.to_string()]);
        }
        if self.moviereview.chars().count() < MIN_REVIEW_CHARS {
            return Err(vec![format!(
                "Field must be at least {MIN_REVIEW_CHARS} characters long."
            )]);
        }
        Ok(&self.moviereview)
    }
}

/// Body of `POST /thanks`. Fields are kept raw so unknown values surface as
/// `InvalidInput` instead of a rejected extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedbackForm {
    #[serde(default)]
    pub feedback_button: String,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub prediction: String,
}

impl FeedbackForm {
    pub fn parse(&self) -> Result<(Feedback, Sentiment)> {
        let feedback = parse_field::<Feedback>("feedback_button", &self.feedback_button)?;
        let shown = parse_field::<Sentiment>("prediction", &self.prediction)?;
        Ok((feedback, shown))
    }
}
