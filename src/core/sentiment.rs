use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{Result, SentimentError};

/// Binary review polarity. The discriminant is the label stored in the log.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sentiment {
    Negative = 0,
    Positive = 1,
}

impl Sentiment {
    #[inline]
    pub fn label(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_label(label: i64) -> Result<Self> {
        match label {
            0 => Ok(Sentiment::Negative),
            1 => Ok(Sentiment::Positive),
            other => Err(SentimentError::invalid(format!(
                "sentiment label must be 0 or 1, got {other}"
            ))),
        }
    }

    pub fn negate(self) -> Self {
        match self {
            Sentiment::Negative => Sentiment::Positive,
            Sentiment::Positive => Sentiment::Negative,
        }
    }

    /// Target for the log-loss gradient: -1 for negative, +1 for positive.
    #[inline]
    pub fn signed(self) -> f64 {
        match self {
            Sentiment::Negative => -1.0,
            Sentiment::Positive => 1.0,
        }
    }
}

/// What the user said about a shown prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
pub enum Feedback {
    Correct,
    Incorrect,
}

impl Feedback {
    /// The label to train on given the prediction the user saw.
    pub fn resolve(self, shown: Sentiment) -> Sentiment {
        match self {
            Feedback::Correct => shown,
            Feedback::Incorrect => shown.negate(),
        }
    }
}

/// Parses a form field into one of the closed label enums.
pub fn parse_field<T>(field: &str, raw: &str) -> Result<T>
where
    T: FromStr,
{
    raw.parse::<T>()
        .map_err(|_| SentimentError::invalid(format!("unrecognized {field} value '{raw}'")))
}
