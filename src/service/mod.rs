mod pipeline;
mod sentiment_service;

pub use pipeline::Pipeline;
pub use sentiment_service::{Prediction, SentimentService};
