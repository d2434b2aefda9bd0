pub mod classifiers;
pub mod config;
pub mod core;
pub mod error;
pub mod service;
pub mod storage;
pub mod tasks;
pub mod text;
pub mod ui;
pub mod vectorizer;
pub mod web;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{Result, SentimentError};
